// Vocabulary collaborator trait and concrete symbol table.

use hashbrown::HashMap;

/// Identifier for a vocabulary symbol.
///
/// Id 0 is reserved as the epsilon / "no symbol" marker and must never be
/// handed out for a real vocabulary entry.
pub type SymbolId = u32;

/// Reserved "no symbol" id. Escape transitions carry this label.
pub const EPSILON: SymbolId = 0;

/// Tag registered in the vocabulary to annotate the start of a recognized
/// context phrase in decoder output.
pub const START_TAG: &str = "<context>";

/// Tag registered in the vocabulary to annotate the end of a recognized
/// context phrase in decoder output.
pub const END_TAG: &str = "</context>";

/// Word-boundary glyph used by sub-word vocabularies (U+2581).
///
/// Latin words at a word boundary are looked up with this glyph prepended;
/// the glyph on its own is a valid token standing for an explicit space.
pub const BOUNDARY_GLYPH: char = '\u{2581}';

/// The decoder vocabulary as seen by this module.
///
/// Implemented by whatever symbol table the surrounding decoder maintains.
/// `add_symbol` must be idempotent and must never return [`EPSILON`] for a
/// successfully registered symbol.
pub trait Vocabulary {
    /// Look up a symbol string, returning its id if present.
    fn find(&self, symbol: &str) -> Option<SymbolId>;

    /// Register a symbol, returning its (possibly pre-existing) id.
    fn add_symbol(&mut self, symbol: &str) -> SymbolId;
}

/// In-memory bidirectional symbol table.
///
/// Index 0 holds the reserved epsilon entry, so real symbols always get
/// ids starting at 1. Decoders with their own table only need to implement
/// [`Vocabulary`]; this type backs tests, benches, and the CLI tools.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    by_name: HashMap<String, SymbolId>,
    names: Vec<String>,
}

impl SymbolTable {
    /// Create a table containing only the reserved epsilon entry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            names: vec![String::new()],
        }
    }

    /// Create a table from symbol strings, assigning ids in input order
    /// starting at 1. Duplicates keep their first id.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for sym in symbols {
            table.add_symbol(sym.as_ref());
        }
        table
    }

    /// The symbol string for `id`, if `id` names a real symbol.
    pub fn name(&self, id: SymbolId) -> Option<&str> {
        if id == EPSILON {
            return None;
        }
        self.names.get(id as usize).map(String::as_str)
    }

    /// Number of real symbols (the epsilon entry is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len() - 1
    }

    /// `true` if no real symbols have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vocabulary for SymbolTable {
    fn find(&self, symbol: &str) -> Option<SymbolId> {
        self.by_name.get(symbol).copied()
    }

    fn add_symbol(&mut self, symbol: &str) -> SymbolId {
        if let Some(&id) = self.by_name.get(symbol) {
            return id;
        }
        let id = self.names.len() as SymbolId;
        self.names.push(symbol.to_string());
        self.by_name.insert(symbol.to_string(), id);
        id
    }
}
