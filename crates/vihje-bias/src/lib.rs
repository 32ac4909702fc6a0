//! Contextual phrase biasing for real-time recognition decoders.
//!
//! Given a small list of user-supplied "hot" phrases, this crate compiles
//! a weighted matching graph and answers, once per decoded word per live
//! hypothesis, how much to boost the hypothesis score when it starts,
//! continues, or completes one of those phrases.
//!
//! # Architecture
//!
//! - [`tokenizer`] -- maximal-munch segmentation of a phrase into
//!   vocabulary tokens, with out-of-vocabulary detection
//! - [`builder`] -- folds all phrases into one nondeterministic chain
//!   graph with undo ("escape") transitions, then determinizes it
//! - [`handle`] -- the decoder-facing session handle: atomic publication
//!   of compiled graphs and the per-token `step` query
//!
//! # Usage
//!
//! ```
//! use vihje_bias::VihjeHandle;
//! use vihje_core::config::BiasConfig;
//! use vihje_core::symbols::SymbolTable;
//!
//! let mut vocab = SymbolTable::from_symbols(["\u{2581}hi", "\u{2581}there"]);
//! let handle = VihjeHandle::new(BiasConfig::new());
//! handle.rebuild(&["hi there"], &mut vocab).unwrap();
//!
//! let graph = handle.graph().unwrap();
//! let mut state = vihje_fst::START_STATE;
//! let mut score = 0.0;
//! for word in [1, 2] {
//!     let outcome = graph.step(state, word);
//!     state = outcome.next_state;
//!     score += outcome.score;
//! }
//! assert!(score > 0.0);
//! ```

pub mod builder;
pub mod handle;
pub mod tokenizer;

pub use builder::BuildStats;
pub use handle::{ContextGraph, VihjeError, VihjeHandle};
