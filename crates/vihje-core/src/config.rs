// Scoring and capacity configuration for context graph compilation.

/// Configuration for the contextual-biasing matcher.
///
/// Supplied once at handle construction and treated as immutable. The two
/// score fields control how much a hypothesis is boosted per matched
/// phrase position; the two caps bound compilation work per session.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasConfig {
    /// Maximum number of phrases compiled into one graph. Phrases beyond
    /// the cap are ignored, not deprioritized.
    pub max_phrases: usize,
    /// Maximum phrase length in characters. Longer phrases are skipped.
    pub max_phrase_length: usize,
    /// Score granted at the first phrase position.
    pub base_score: f32,
    /// Additional score granted per subsequent phrase position.
    pub incremental_score: f32,
}

impl BiasConfig {
    /// Create a configuration with the default caps and scores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_phrases: 5000,
            max_phrase_length: 100,
            base_score: 3.0,
            incremental_score: 0.0,
        }
    }

    /// Set the phrase count cap.
    #[must_use]
    pub fn with_max_phrases(mut self, max: usize) -> Self {
        self.max_phrases = max;
        self
    }

    /// Set the per-phrase character cap.
    #[must_use]
    pub fn with_max_phrase_length(mut self, max: usize) -> Self {
        self.max_phrase_length = max;
        self
    }

    /// Set the first-position score.
    #[must_use]
    pub fn with_base_score(mut self, score: f32) -> Self {
        self.base_score = score;
        self
    }

    /// Set the per-position score growth.
    #[must_use]
    pub fn with_incremental_score(mut self, score: f32) -> Self {
        self.incremental_score = score;
        self
    }
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = BiasConfig::new();
        assert_eq!(config.max_phrases, 5000);
        assert_eq!(config.max_phrase_length, 100);
        assert!((config.base_score - 3.0).abs() < f32::EPSILON);
        assert!(config.incremental_score.abs() < f32::EPSILON);
    }

    #[test]
    fn builder_chain() {
        let config = BiasConfig::new()
            .with_max_phrases(10)
            .with_max_phrase_length(20)
            .with_base_score(1.5)
            .with_incremental_score(0.5);
        assert_eq!(config.max_phrases, 10);
        assert_eq!(config.max_phrase_length, 20);
        assert!((config.base_score - 1.5).abs() < f32::EPSILON);
        assert!((config.incremental_score - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn default_trait_matches_new() {
        assert_eq!(BiasConfig::default(), BiasConfig::new());
    }
}
