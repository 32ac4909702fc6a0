// Context graph primitive: states, weighted labeled transitions, finality.

use vihje_core::symbols::SymbolId;

/// State identifier within one compiled graph.
pub type StateId = u32;

/// The start state. It is also the single final state, because phrases
/// are matched independently and in sequence without an external reset.
pub const START_STATE: StateId = 0;

/// Transition label: either a vocabulary symbol to consume, or the escape
/// marker used to cancel a previously granted partial-match bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// No-symbol transition back to the start state; its weight undoes the
    /// score accumulated along the abandoned phrase prefix.
    Escape,
    /// Consumes one decoded word with the given vocabulary id.
    Symbol(SymbolId),
}

/// A weighted transition to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub label: Label,
    pub weight: f32,
    pub target: StateId,
}

impl Transition {
    /// A transition consuming the vocabulary symbol `id`.
    #[must_use]
    pub fn symbol(id: SymbolId, weight: f32, target: StateId) -> Self {
        Self {
            label: Label::Symbol(id),
            weight,
            target,
        }
    }

    /// An escape transition, normally weighted with a negated prefix score.
    #[must_use]
    pub fn escape(weight: f32, target: StateId) -> Self {
        Self {
            label: Label::Escape,
            weight,
            target,
        }
    }
}

/// Weighted labeled-transition graph over vocabulary symbols.
///
/// Built nondeterministically by the graph builder (one chain per phrase,
/// all sharing state 0) and made deterministic by
/// [`determinize`](crate::determinize::determinize) before publication.
/// Published graphs are immutable and shared read-only by all concurrent
/// traversals.
#[derive(Debug, Clone, Default)]
pub struct ContextFst {
    transitions: Vec<Vec<Transition>>,
    finals: Vec<bool>,
}

impl ContextFst {
    /// Create an empty graph with no states.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state and return its id. The first state added is
    /// [`START_STATE`].
    pub fn add_state(&mut self) -> StateId {
        let id = self.transitions.len() as StateId;
        self.transitions.push(Vec::new());
        self.finals.push(false);
        id
    }

    /// Mark `state` as final.
    pub fn set_final(&mut self, state: StateId) {
        self.finals[state as usize] = true;
    }

    /// `true` if `state` is a final (phrase-completing) state. Unknown
    /// states are not final.
    #[must_use]
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.get(state as usize).copied().unwrap_or(false)
    }

    /// Append an outgoing transition to `from`. Insertion order is
    /// preserved; determinization relies on it for its weight tie policy.
    pub fn add_transition(&mut self, from: StateId, transition: Transition) {
        self.transitions[from as usize].push(transition);
    }

    /// Outgoing transitions of `state`, in insertion order. Unknown states
    /// have none.
    #[must_use]
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        self.transitions
            .get(state as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of states.
    #[must_use]
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// Total number of transitions across all states.
    #[must_use]
    pub fn num_transitions(&self) -> usize {
        self.transitions.iter().map(Vec::len).sum()
    }
}
