//! Sentiment classification of chat input.
//!
//! Scoring is delegated to a [`PolarityScorer`]; the classifier only applies
//! the decision thresholds. [`LexiconScorer`] is the built-in scorer.

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;

impl Sentiment {
    /// Both thresholds are strict: a polarity of exactly ±0.1 is neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Scores text on a scale from -1.0 (negative) to 1.0 (positive).
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

pub struct SentimentClassifier {
    scorer: Box<dyn PolarityScorer>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(LexiconScorer)
    }
}

impl SentimentClassifier {
    pub fn new(scorer: impl PolarityScorer + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
        }
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        let polarity = self.scorer.polarity(text).clamp(-1.0, 1.0);
        Sentiment::from_polarity(polarity)
    }
}

const INTENSIFIER: f64 = 1.3;
const NEGATION: f64 = -0.5;

const LEXICON: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("delighted", 0.7),
    ("enjoy", 0.4),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("fantastic", 0.4),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("incredible", 0.9),
    ("interesting", 0.5),
    ("kind", 0.6),
    ("love", 0.5),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("pleased", 0.5),
    ("thank", 0.2),
    ("thanks", 0.2),
    ("wonderful", 1.0),
    ("angry", -0.5),
    ("annoyed", -0.4),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("depressed", -0.6),
    ("difficult", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("frustrated", -0.7),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("lonely", -0.5),
    ("miserable", -1.0),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scared", -0.5),
    ("sick", -0.7),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("ugly", -0.7),
    ("upset", -0.5),
    ("worried", -0.5),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

const INTENSIFIERS: &[&str] = &["very", "really", "extremely", "so", "super", "incredibly"];
const NEGATORS: &[&str] = &["not", "no", "never", "nothing", "hardly"];

fn lexicon() -> &'static HashMap<&'static str, f64> {
    static LEXICON_MAP: OnceLock<HashMap<&'static str, f64>> = OnceLock::new();
    LEXICON_MAP.get_or_init(|| LEXICON.iter().copied().collect())
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

/// Word-level polarity averaging: every known sentiment word contributes its
/// score, scaled by a preceding intensifier and flipped by a preceding
/// negator. Text without sentiment words scores 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let words = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|word| !word.is_empty());

        let mut scores = Vec::new();
        let mut modifier = 1.0;
        for word in words {
            if let Some(score) = lexicon().get(word) {
                scores.push((score * modifier).clamp(-1.0, 1.0));
                modifier = 1.0;
            } else if INTENSIFIERS.contains(&word) {
                modifier *= INTENSIFIER;
            } else if is_negator(word) {
                modifier *= NEGATION;
            }
        }

        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl PolarityScorer for Fixed {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    fn classify_with(polarity: f64) -> Sentiment {
        SentimentClassifier::new(Fixed(polarity)).classify("ignored")
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify_with(0.1), Sentiment::Neutral);
        assert_eq!(classify_with(-0.1), Sentiment::Neutral);
        assert_eq!(classify_with(0.0), Sentiment::Neutral);
        assert_eq!(classify_with(0.1001), Sentiment::Positive);
        assert_eq!(classify_with(-0.1001), Sentiment::Negative);
        assert_eq!(classify_with(1.0), Sentiment::Positive);
        assert_eq!(classify_with(-1.0), Sentiment::Negative);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(classify_with(7.5), Sentiment::Positive);
        assert_eq!(classify_with(-7.5), Sentiment::Negative);
    }

    #[test]
    fn lexicon_scores_plain_sentences() {
        let classifier = SentimentClassifier::default();
        assert_eq!(
            classifier.classify("I love this, it's wonderful!"),
            Sentiment::Positive
        );
        assert_eq!(
            classifier.classify("This is terrible and I'm so sad."),
            Sentiment::Negative
        );
        assert_eq!(
            classifier.classify("the answer to the meaning of life is"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn negation_flips_and_dampens() {
        let scorer = LexiconScorer;
        assert!((scorer.polarity("good") - 0.7).abs() < 1e-9);
        assert!((scorer.polarity("not good") + 0.35).abs() < 1e-9);
        assert!((scorer.polarity("isn't bad") - 0.35).abs() < 1e-9);
    }

    #[test]
    fn intensifiers_scale_next_word() {
        let scorer = LexiconScorer;
        assert!((scorer.polarity("very nice") - 0.78).abs() < 1e-9);
        assert_eq!(scorer.polarity("very very"), 0.0);
        assert_eq!(scorer.polarity("extremely perfect"), 1.0);
    }

    #[test]
    fn empty_text_is_neutral() {
        assert_eq!(LexiconScorer.polarity(""), 0.0);
        assert_eq!(SentimentClassifier::default().classify(""), Sentiment::Neutral);
    }
}
