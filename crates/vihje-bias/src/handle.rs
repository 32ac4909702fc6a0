// VihjeHandle: decoder-facing integration point.
//
// Owns the configuration and the currently published context graph.
// Compilation runs once per session and replaces the graph wholesale;
// traversal is read-only over a published graph, so hypotheses from an
// earlier session keep their graph alive through the `Arc` they hold even
// after a rebuild.

use std::sync::{Arc, PoisonError, RwLock};

use vihje_core::config::BiasConfig;
use vihje_core::symbols::{SymbolId, Vocabulary, END_TAG, EPSILON, START_TAG};
use vihje_fst::{ContextFst, StateId, StepOutcome};

use crate::builder::{self, BuildStats};

/// Error type for context graph compilation.
#[derive(Debug, thiserror::Error)]
pub enum VihjeError {
    /// The vocabulary returned the reserved epsilon id when registering a
    /// boundary tag. A vocabulary that cannot hand out real ids would
    /// make every compiled label unreliable, so compilation refuses to
    /// proceed.
    #[error("vocabulary returned the reserved id 0 for a boundary tag")]
    InvalidVocabulary,
}

/// One compiled, immutable context graph.
///
/// Shared read-only by every live hypothesis of a decoding session; all
/// methods take `&self` and traversal never locks.
#[derive(Debug)]
pub struct ContextGraph {
    fst: ContextFst,
    start_tag: SymbolId,
    end_tag: SymbolId,
    stats: BuildStats,
}

impl ContextGraph {
    /// Advance one hypothesis by one decoded word.
    ///
    /// The caller adds `score` to the hypothesis score, stores
    /// `next_state` as its new match-state, and may use the boundary
    /// flags together with [`start_tag`](Self::start_tag) /
    /// [`end_tag`](Self::end_tag) to annotate output spans.
    #[must_use]
    pub fn step(&self, state: StateId, word: SymbolId) -> StepOutcome {
        vihje_fst::step(&self.fst, state, word)
    }

    /// Vocabulary id of the phrase-start annotation tag.
    #[must_use]
    pub fn start_tag(&self) -> SymbolId {
        self.start_tag
    }

    /// Vocabulary id of the phrase-end annotation tag.
    #[must_use]
    pub fn end_tag(&self) -> SymbolId {
        self.end_tag
    }

    /// Diagnostics from the compilation that produced this graph.
    #[must_use]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// The underlying automaton (inspection and tooling).
    #[must_use]
    pub fn fst(&self) -> &ContextFst {
        &self.fst
    }
}

/// Session handle owning the published context graph.
///
/// `rebuild` performs a full replace-on-publish: readers either see the
/// previous graph or the new one, never a partially built state. Reading
/// the handle takes one short lock to clone the `Arc`; traversal itself
/// is lock-free.
#[derive(Debug)]
pub struct VihjeHandle {
    config: BiasConfig,
    graph: RwLock<Option<Arc<ContextGraph>>>,
}

impl VihjeHandle {
    /// Create a handle with the given configuration and no active graph.
    #[must_use]
    pub fn new(config: BiasConfig) -> Self {
        Self {
            config,
            graph: RwLock::new(None),
        }
    }

    /// The handle's configuration.
    #[must_use]
    pub fn config(&self) -> &BiasConfig {
        &self.config
    }

    /// Compile `phrases` against `vocab` and publish the result, replacing
    /// any previously published graph.
    ///
    /// Registers the boundary annotation tags in the vocabulary
    /// (idempotent) before compiling. An empty phrase list publishes "no
    /// active graph". Phrases that are too long, out of vocabulary, or
    /// beyond the phrase cap are skipped and counted in the returned
    /// [`BuildStats`].
    pub fn rebuild(
        &self,
        phrases: &[impl AsRef<str>],
        vocab: &mut dyn Vocabulary,
    ) -> Result<BuildStats, VihjeError> {
        let start_tag = vocab.add_symbol(START_TAG);
        let end_tag = vocab.add_symbol(END_TAG);
        if start_tag == EPSILON || end_tag == EPSILON {
            return Err(VihjeError::InvalidVocabulary);
        }

        if phrases.is_empty() {
            self.publish(None);
            return Ok(BuildStats::default());
        }

        let (fst, stats) = builder::build_graph(&self.config, phrases, vocab);
        self.publish(Some(Arc::new(ContextGraph {
            fst,
            start_tag,
            end_tag,
            stats: stats.clone(),
        })));
        Ok(stats)
    }

    /// The currently published graph, if any.
    ///
    /// Callers hold the returned `Arc` for the lifetime of their decoding
    /// session; a later `rebuild` does not invalidate it.
    #[must_use]
    pub fn graph(&self) -> Option<Arc<ContextGraph>> {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, graph: Option<Arc<ContextGraph>>) {
        *self.graph.write().unwrap_or_else(PoisonError::into_inner) = graph;
    }
}
