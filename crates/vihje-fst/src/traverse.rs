// Per-token traversal of the published context graph.
//
// Called once per newly decoded word per live hypothesis, read-only, cost
// proportional to the branching factor of the current state.

use vihje_core::symbols::SymbolId;

use crate::graph::{ContextFst, Label, StateId, START_STATE};

/// Result of advancing one hypothesis by one decoded word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// The hypothesis's next match-state.
    pub next_state: StateId,
    /// Score delta to add to the hypothesis. Zero or negative when a
    /// partial match was abandoned without starting a new one.
    pub score: f32,
    /// `true` iff this word started a context phrase.
    pub starts_phrase: bool,
    /// `true` iff this word completed a context phrase.
    pub ends_phrase: bool,
}

/// Advance from `current` on the decoded word `word`.
///
/// A matching transition at `current` is taken directly; a matched
/// transition landing on the start state is a completed phrase and never
/// falls through to the root retry. Without a match at `current`, the same
/// word is retried against the start state's transitions -- the escape
/// weight captured at `current` (the undo amount for an abandoned partial
/// match) is combined with the fresh first-position score, and boundary
/// flags are computed with the start state as the effective current state.
/// When nothing matches at either level the hypothesis returns to the
/// start state with just the captured escape weight (or zero).
///
/// Traversal never fails; an unmatched word yields no progress.
#[must_use]
pub fn step(fst: &ContextFst, current: StateId, word: SymbolId) -> StepOutcome {
    let mut fallback = 0.0_f32;
    for t in fst.transitions(current) {
        match t.label {
            Label::Escape => fallback = t.weight,
            Label::Symbol(id) if id == word => {
                return StepOutcome {
                    next_state: t.target,
                    score: t.weight,
                    starts_phrase: current == START_STATE,
                    ends_phrase: fst.is_final(t.target),
                };
            }
            Label::Symbol(_) => {}
        }
    }

    if current != START_STATE {
        for t in fst.transitions(START_STATE) {
            if let Label::Symbol(id) = t.label {
                if id == word {
                    return StepOutcome {
                        next_state: t.target,
                        score: fallback + t.weight,
                        starts_phrase: true,
                        ends_phrase: fst.is_final(t.target),
                    };
                }
            }
        }
    }

    StepOutcome {
        next_state: START_STATE,
        score: fallback,
        starts_phrase: false,
        ends_phrase: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::determinize::determinize;
    use crate::graph::Transition;

    /// Graph for the phrases [1 2 3] and [4], weights 1.0 / 2.0 / 3.0 by
    /// position, with builder-style escape transitions.
    fn sample_fst() -> ContextFst {
        let mut fst = ContextFst::new();
        let s0 = fst.add_state();
        fst.set_final(s0);

        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.add_transition(s0, Transition::symbol(1, 1.0, s1));
        fst.add_transition(s1, Transition::symbol(2, 2.0, s2));
        fst.add_transition(s1, Transition::escape(-1.0, START_STATE));
        fst.add_transition(s2, Transition::symbol(3, 3.0, START_STATE));
        fst.add_transition(s2, Transition::escape(-3.0, START_STATE));

        fst.add_transition(s0, Transition::symbol(4, 1.0, START_STATE));

        determinize(&fst)
    }

    #[test]
    fn full_phrase_walk() {
        let fst = sample_fst();

        let first = step(&fst, START_STATE, 1);
        assert!((first.score - 1.0).abs() < f32::EPSILON);
        assert!(first.starts_phrase);
        assert!(!first.ends_phrase);
        assert_ne!(first.next_state, START_STATE);

        let second = step(&fst, first.next_state, 2);
        assert!((second.score - 2.0).abs() < f32::EPSILON);
        assert!(!second.starts_phrase);
        assert!(!second.ends_phrase);

        let last = step(&fst, second.next_state, 3);
        assert!((last.score - 3.0).abs() < f32::EPSILON);
        assert!(!last.starts_phrase);
        assert!(last.ends_phrase);
        assert_eq!(last.next_state, START_STATE);
    }

    #[test]
    fn single_word_phrase_does_not_double_count() {
        // A matched transition back to the start state must not fall
        // through to the root retry and re-apply the same weight.
        let fst = sample_fst();
        let outcome = step(&fst, START_STATE, 4);
        assert!((outcome.score - 1.0).abs() < f32::EPSILON);
        assert!(outcome.starts_phrase);
        assert!(outcome.ends_phrase);
        assert_eq!(outcome.next_state, START_STATE);
    }

    #[test]
    fn unmatched_word_at_start_is_a_no_op() {
        let fst = sample_fst();
        let outcome = step(&fst, START_STATE, 99);
        assert_eq!(outcome.next_state, START_STATE);
        assert!(outcome.score.abs() < f32::EPSILON);
        assert!(!outcome.starts_phrase);
        assert!(!outcome.ends_phrase);
    }

    #[test]
    fn abandoning_returns_the_escape_weight() {
        let fst = sample_fst();
        let first = step(&fst, START_STATE, 1);
        let second = step(&fst, first.next_state, 2);

        // Word 99 continues nothing and starts nothing: the prefix bonus
        // is cancelled in full.
        let abandoned = step(&fst, second.next_state, 99);
        assert_eq!(abandoned.next_state, START_STATE);
        assert!((abandoned.score + 3.0).abs() < f32::EPSILON);
        assert!(!abandoned.starts_phrase);
        assert!(!abandoned.ends_phrase);
        assert!((first.score + second.score + abandoned.score).abs() < 1e-6);
    }

    #[test]
    fn abandoning_into_a_fresh_match_combines_scores() {
        let fst = sample_fst();
        let first = step(&fst, START_STATE, 1);
        let second = step(&fst, first.next_state, 2);

        // Word 4 does not continue [1 2 3] but starts (and completes) the
        // single-word phrase: undo plus fresh first-position score.
        let switched = step(&fst, second.next_state, 4);
        assert!((switched.score - (-3.0 + 1.0)).abs() < 1e-6);
        assert!(switched.starts_phrase);
        assert!(switched.ends_phrase);
        assert_eq!(switched.next_state, START_STATE);
    }

    #[test]
    fn abandoning_after_one_token_cancels_exactly() {
        let fst = sample_fst();
        let first = step(&fst, START_STATE, 1);

        let abandoned = step(&fst, first.next_state, 99);
        assert_eq!(abandoned.next_state, START_STATE);
        assert!((first.score + abandoned.score).abs() < 1e-6);
    }

    #[test]
    fn step_on_unknown_state_is_harmless() {
        let fst = sample_fst();
        let outcome = step(&fst, 1234, 1);
        // Falls back to the root search and starts the phrase afresh.
        assert!(outcome.starts_phrase);
        assert!((outcome.score - 1.0).abs() < f32::EPSILON);
    }
}
