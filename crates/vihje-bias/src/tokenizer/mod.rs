// Phrase segmentation against the decoder vocabulary.
//
// Maximal-munch over characters: at each position the longest remaining
// candidate is tried first, shrinking one character at a time. A literal
// space is never looked up; it ends the current word segment. Latin words
// at a word boundary are looked up with the sub-word boundary glyph
// prepended, mirroring the vocabulary convention that marks word starts
// explicitly.

use vihje_core::character::is_plain_latin;
use vihje_core::symbols::{Vocabulary, BOUNDARY_GLYPH};

/// Result of segmenting one phrase.
///
/// `tokens` holds the matched vocabulary token strings in input order;
/// unmatched characters are counted, not emitted, so the output is always
/// the best-effort segmentation of everything that did match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Matched vocabulary tokens, in input order.
    pub tokens: Vec<String>,
    /// Number of characters with no vocabulary match.
    pub oov_count: usize,
}

impl Segmentation {
    /// `true` iff every character of the phrase was covered by a token.
    #[must_use]
    pub fn fully_matched(&self) -> bool {
        self.oov_count == 0
    }
}

/// Segment `phrase` into vocabulary tokens.
///
/// The phrase is trimmed first. Scanning continues past unmatched
/// characters so that every problem is surfaced in one pass;
/// [`Segmentation::fully_matched`] reports whether any character failed.
pub fn split_phrase(phrase: &str, vocab: &dyn Vocabulary) -> Segmentation {
    let chars: Vec<char> = phrase.trim().chars().collect();
    let mut tokens = Vec::new();
    let mut oov_count = 0;
    let mut at_boundary = true;

    let mut start = 0;
    'scan: while start < chars.len() {
        let mut end = chars.len();
        while end > start {
            // A single space is never looked up: it terminates the word
            // segment and marks the next one as word-initial.
            if end == start + 1 && chars[start] == ' ' {
                start = end;
                at_boundary = true;
                continue 'scan;
            }

            let mut candidate: String = chars[start..end].iter().collect();
            if at_boundary && is_plain_latin(&candidate) {
                candidate.insert(0, BOUNDARY_GLYPH);
            }

            if vocab.find(&candidate).is_some() {
                tokens.push(candidate);
                start = end;
                at_boundary = false;
                continue 'scan;
            }

            if end == start + 1 {
                if chars[start] == BOUNDARY_GLYPH {
                    // A literal boundary glyph stands for an explicit
                    // space; emit it rather than fail.
                    tokens.push(BOUNDARY_GLYPH.to_string());
                    start = end;
                    at_boundary = false;
                } else if candidate.starts_with(BOUNDARY_GLYPH) {
                    // The marker-prefixed lookup failed: emit the marker
                    // on its own and retry the bare character mid-word.
                    tokens.push(BOUNDARY_GLYPH.to_string());
                    at_boundary = false;
                } else {
                    log::warn!("character {:?} is out of vocabulary", chars[start]);
                    oov_count += 1;
                    start = end;
                }
                continue 'scan;
            }

            end -= 1;
        }
    }

    Segmentation { tokens, oov_count }
}
