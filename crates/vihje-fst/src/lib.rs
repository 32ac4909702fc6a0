//! Weighted context automaton for the vihje contextual-biasing engine.
//!
//! This crate provides the matching structure the graph builder compiles
//! phrases into and the decoder queries once per decoded token:
//!
//! - [`graph`] -- the state/transition graph primitive
//! - [`determinize`] -- subset-construction transform merging parallel
//!   same-label transitions from shared prefixes
//! - [`traverse`] -- the per-token `step` query with escape fallback
//!
//! State 0 is simultaneously the start state and the single final state;
//! interior states represent "currently N tokens into some phrase" and
//! are never final.

pub mod determinize;
pub mod graph;
pub mod traverse;

pub use determinize::determinize;
pub use graph::{ContextFst, Label, StateId, Transition, START_STATE};
pub use traverse::{step, StepOutcome};
