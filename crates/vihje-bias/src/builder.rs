// Context graph construction: phrase chains, positional scores, escape
// transitions, determinization.

use vihje_core::character::is_plain_latin;
use vihje_core::config::BiasConfig;
use vihje_core::symbols::{SymbolId, Vocabulary, BOUNDARY_GLYPH, EPSILON};
use vihje_fst::{determinize, ContextFst, Transition, START_STATE};

use crate::tokenizer;

/// Per-compilation diagnostics.
///
/// Skipped phrases are recoverable conditions, surfaced as counts rather
/// than errors; the caller decides whether any of them matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Phrases compiled into the graph.
    pub compiled: usize,
    /// Phrases over the character cap.
    pub skipped_too_long: usize,
    /// Phrases with out-of-vocabulary content.
    pub skipped_oov: usize,
    /// Phrases beyond the phrase-count cap.
    pub skipped_over_limit: usize,
}

/// Fold all accepted phrases into one determinized context graph.
///
/// Each phrase becomes a forward chain of states from state 0; the last
/// token arcs back to state 0, closing the loop. The per-position score is
/// `i * incremental_score + base_score`, scaled by the token's character
/// length unless the token is a plain Latin word or carries the sub-word
/// boundary marker (Latin words are weighted per word, ideographic tokens
/// per matched character). Every interior state after the first carries an
/// escape transition back to state 0 whose weight undoes the prefix bonus
/// accumulated so far.
pub fn build_graph<P: AsRef<str>>(
    config: &BiasConfig,
    phrases: &[P],
    vocab: &dyn Vocabulary,
) -> (ContextFst, BuildStats) {
    let mut fst = ContextFst::new();
    let start = fst.add_state();
    fst.set_final(start);

    let mut stats = BuildStats::default();
    log::info!("compiling context graph from {} phrases", phrases.len());

    for phrase in phrases {
        let phrase = phrase.as_ref().trim();
        if phrase.is_empty() {
            continue;
        }
        if phrase.chars().count() > config.max_phrase_length {
            log::info!("skipping over-length phrase {phrase:?}");
            stats.skipped_too_long += 1;
            continue;
        }
        if stats.compiled >= config.max_phrases {
            stats.skipped_over_limit += 1;
            continue;
        }

        let segmentation = tokenizer::split_phrase(phrase, vocab);
        let Some(ids) = resolve_ids(&segmentation, vocab) else {
            log::warn!("skipping phrase with out-of-vocabulary content: {phrase:?}");
            stats.skipped_oov += 1;
            continue;
        };

        add_phrase_chain(&mut fst, config, &ids, &segmentation.tokens);
        stats.compiled += 1;
    }

    log::info!(
        "context graph compiled: {} phrases, {} states before determinization",
        stats.compiled,
        fst.num_states()
    );
    (determinize(&fst), stats)
}

/// Map a fully matched segmentation to vocabulary ids. `None` if the
/// segmentation had out-of-vocabulary content, came up empty, or any token
/// resolves to the reserved epsilon id.
fn resolve_ids(
    segmentation: &tokenizer::Segmentation,
    vocab: &dyn Vocabulary,
) -> Option<Vec<SymbolId>> {
    if !segmentation.fully_matched() || segmentation.tokens.is_empty() {
        return None;
    }
    let mut ids = Vec::with_capacity(segmentation.tokens.len());
    for token in &segmentation.tokens {
        match vocab.find(token) {
            Some(id) if id != EPSILON => ids.push(id),
            _ => return None,
        }
    }
    Some(ids)
}

fn add_phrase_chain(
    fst: &mut ContextFst,
    config: &BiasConfig,
    ids: &[SymbolId],
    tokens: &[String],
) {
    let last = ids.len() - 1;
    let mut prev = START_STATE;
    let mut escape_score = 0.0_f32;

    for (i, (&id, token)) in ids.iter().zip(tokens).enumerate() {
        let score = position_score(config, i, token);
        let next = if i < last { fst.add_state() } else { START_STATE };
        fst.add_transition(prev, Transition::symbol(id, score, next));
        if i > 0 {
            fst.add_transition(prev, Transition::escape(-escape_score, START_STATE));
        }
        prev = next;
        escape_score += score;
    }
}

fn position_score(config: &BiasConfig, position: usize, token: &str) -> f32 {
    let positional = position as f32 * config.incremental_score + config.base_score;
    if is_plain_latin(token) || token.starts_with(BOUNDARY_GLYPH) {
        positional
    } else {
        positional * token.chars().count() as f32
    }
}
