//! End-to-end behavior of the compiled context graph, exercised the way a
//! decoder would: compile once, then step every hypothesis word by word.

use vihje_bias::VihjeHandle;
use vihje_core::config::BiasConfig;
use vihje_core::symbols::{SymbolTable, Vocabulary};
use vihje_fst::{StateId, START_STATE};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The worked vocabulary: {▁hi: 1, ▁there: 2, 你: 3, 好: 4, ▁: 5}.
fn sample_vocab() -> SymbolTable {
    SymbolTable::from_symbols([
        "\u{2581}hi",
        "\u{2581}there",
        "\u{4F60}",
        "\u{597D}",
        "\u{2581}",
    ])
}

fn sample_config() -> BiasConfig {
    BiasConfig::new()
        .with_base_score(3.0)
        .with_incremental_score(0.5)
        .with_max_phrase_length(20)
        .with_max_phrases(10)
}

fn compiled(phrases: &[&str]) -> (std::sync::Arc<vihje_bias::ContextGraph>, SymbolTable) {
    let mut vocab = sample_vocab();
    let handle = VihjeHandle::new(sample_config());
    handle.rebuild(phrases, &mut vocab).expect("rebuild");
    (handle.graph().expect("graph"), vocab)
}

/// Walk a word sequence from the start state, returning per-step scores
/// and the boundary flags observed.
fn walk(
    graph: &vihje_bias::ContextGraph,
    words: &[u32],
) -> (Vec<f32>, Vec<(bool, bool)>, StateId) {
    let mut state = START_STATE;
    let mut scores = Vec::new();
    let mut flags = Vec::new();
    for &word in words {
        let outcome = graph.step(state, word);
        scores.push(outcome.score);
        flags.push((outcome.starts_phrase, outcome.ends_phrase));
        state = outcome.next_state;
    }
    (scores, flags, state)
}

// ---------------------------------------------------------------------------
// The worked example from the module contract
// ---------------------------------------------------------------------------

#[test]
fn hi_there_step_by_step() {
    let (graph, _) = compiled(&["hi there"]);

    let first = graph.step(START_STATE, 1);
    assert_ne!(first.next_state, START_STATE);
    assert!((first.score - 3.0).abs() < 1e-6);
    assert!(first.starts_phrase);
    assert!(!first.ends_phrase);

    let second = graph.step(first.next_state, 2);
    assert_eq!(second.next_state, START_STATE);
    assert!((second.score - 3.5).abs() < 1e-6);
    assert!(second.ends_phrase);
}

// ---------------------------------------------------------------------------
// Boundary flags
// ---------------------------------------------------------------------------

#[test]
fn boundaries_fire_only_at_the_ends() {
    let (graph, _) = compiled(&["hi there \u{4F60}"]);

    let (_, flags, end_state) = walk(&graph, &[1, 2, 3]);
    assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
    assert_eq!(end_state, START_STATE);
}

#[test]
fn back_to_back_phrases_restart_the_boundary() {
    let (graph, _) = compiled(&["hi there"]);

    let (_, flags, _) = walk(&graph, &[1, 2, 1, 2]);
    assert_eq!(
        flags,
        vec![(true, false), (false, true), (true, false), (false, true)]
    );
}

// ---------------------------------------------------------------------------
// Abandon property
// ---------------------------------------------------------------------------

#[test]
fn abandoned_prefix_bonus_is_fully_cancelled() {
    let (graph, _) = compiled(&["hi there"]);

    // Match "hi" (k = 1), then a word that continues nothing.
    let (scores, _, end_state) = walk(&graph, &[1, 99]);
    let total: f32 = scores.iter().sum();
    assert!(total.abs() < 1e-6, "expected full cancellation, got {total}");
    assert_eq!(end_state, START_STATE);
}

#[test]
fn abandoning_into_a_fresh_phrase_nets_its_first_score() {
    let (graph, _) = compiled(&["hi there", "\u{4F60}\u{597D}"]);

    // Match "hi", then abandon into 你 (which opens the second phrase).
    let (scores, flags, _) = walk(&graph, &[1, 3]);
    let total: f32 = scores.iter().sum();
    let fresh = graph.step(START_STATE, 3);
    assert!((total - fresh.score).abs() < 1e-6);
    // The fallback restart still reports the phrase start.
    assert_eq!(flags[1], (true, false));
}

#[test]
fn deep_abandon_cancels_the_whole_prefix() {
    let mut vocab = sample_vocab();
    vocab.add_symbol("\u{5417}"); // 吗: 6
    let handle = VihjeHandle::new(sample_config());
    handle
        .rebuild(&["\u{4F60}\u{597D}\u{5417}"], &mut vocab)
        .expect("rebuild");
    let graph = handle.graph().expect("graph");

    // Two matched positions (3.0 + 3.5), then a dead word.
    let (scores, _, end_state) = walk(&graph, &[3, 4, 99]);
    let total: f32 = scores.iter().sum();
    assert!(total.abs() < 1e-6);
    assert_eq!(end_state, START_STATE);
}

// ---------------------------------------------------------------------------
// Overlapping prefixes
// ---------------------------------------------------------------------------

#[test]
fn overlapping_phrases_share_one_prefix_path() {
    let (graph, _) = compiled(&["hi there", "hi \u{4F60}"]);

    // One deterministic continuation from the start.
    assert_eq!(graph.fst().transitions(START_STATE).len(), 1);

    let first = graph.step(START_STATE, 1);
    let via_there = graph.step(first.next_state, 2);
    let via_ni = graph.step(first.next_state, 3);
    assert!(via_there.ends_phrase);
    assert!(via_ni.ends_phrase);
    assert_eq!(via_there.next_state, START_STATE);
    assert_eq!(via_ni.next_state, START_STATE);
}

#[test]
fn single_word_phrase_is_not_double_counted() {
    let (graph, _) = compiled(&["\u{4F60}"]);

    let outcome = graph.step(START_STATE, 3);
    assert_eq!(outcome.next_state, START_STATE);
    assert!((outcome.score - 3.0).abs() < 1e-6);
    assert!(outcome.starts_phrase);
    assert!(outcome.ends_phrase);
}

// ---------------------------------------------------------------------------
// Caps and skips
// ---------------------------------------------------------------------------

#[test]
fn phrase_cap_compiles_only_the_first_n() {
    let mut vocab = sample_vocab();
    let handle = VihjeHandle::new(sample_config().with_max_phrases(2));
    let stats = handle
        .rebuild(&["hi", "there", "\u{4F60}"], &mut vocab)
        .expect("rebuild");
    assert_eq!(stats.compiled, 2);
    assert_eq!(stats.skipped_over_limit, 1);

    let graph = handle.graph().expect("graph");
    assert!(graph.step(START_STATE, 1).starts_phrase);
    assert!(graph.step(START_STATE, 2).starts_phrase);
    assert!(!graph.step(START_STATE, 3).starts_phrase);
}

#[test]
fn oov_phrase_does_not_poison_the_rest() {
    let mut vocab = sample_vocab();
    let handle = VihjeHandle::new(sample_config());
    let stats = handle
        .rebuild(&["hello world", "hi there"], &mut vocab)
        .expect("rebuild");
    assert_eq!(stats.compiled, 1);
    assert_eq!(stats.skipped_oov, 1);

    let graph = handle.graph().expect("graph");
    let (scores, flags, _) = walk(&graph, &[1, 2]);
    assert!((scores[0] - 3.0).abs() < 1e-6);
    assert!((scores[1] - 3.5).abs() < 1e-6);
    assert_eq!(flags[1], (false, true));
}

// ---------------------------------------------------------------------------
// Session replacement
// ---------------------------------------------------------------------------

#[test]
fn hypotheses_survive_a_concurrent_rebuild() {
    let mut vocab = sample_vocab();
    let handle = VihjeHandle::new(sample_config());
    handle.rebuild(&["hi there"], &mut vocab).expect("rebuild");
    let session_graph = handle.graph().expect("graph");

    let first = session_graph.step(START_STATE, 1);

    // A new phrase set arrives mid-session.
    handle
        .rebuild(&["\u{4F60}\u{597D}"], &mut vocab)
        .expect("rebuild");

    // The old hypothesis finishes against its own graph.
    let second = session_graph.step(first.next_state, 2);
    assert!(second.ends_phrase);
    assert!((first.score + second.score - 6.5).abs() < 1e-6);

    // New sessions see the new graph.
    let new_graph = handle.graph().expect("graph");
    assert!(new_graph.step(START_STATE, 3).starts_phrase);
    assert!(!new_graph.step(START_STATE, 1).starts_phrase);
}
