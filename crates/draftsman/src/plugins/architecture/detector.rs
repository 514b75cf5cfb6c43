//! Architecture pattern detectors
//!
//! One detector per pattern, each scoring text against that pattern's
//! weighted keyword set.

use crate::core::{ArchitecturePattern, Detector};
use tracing::trace;

use super::vocabulary::{count_matches, pattern_keywords};

/// Score that maps to full confidence
pub const CONFIDENCE_CALIBRATION: f64 = 10.0;

/// Weighted-keyword detector for a single architecture pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordDetector {
    pattern: ArchitecturePattern,
}

impl KeywordDetector {
    pub fn for_pattern(pattern: ArchitecturePattern) -> Self {
        Self { pattern }
    }

    /// One detector per scoring pattern, in tie-break order
    ///
    /// `general` has no keywords and is the fallback, so it is left out.
    pub fn all() -> Vec<Self> {
        ArchitecturePattern::ALL
            .iter()
            .filter(|p| **p != ArchitecturePattern::General)
            .map(|p| Self::for_pattern(*p))
            .collect()
    }

    fn score_lowercase(&self, lower: &str) -> f64 {
        pattern_keywords(self.pattern)
            .iter()
            .map(|(keyword, weight)| weight * count_matches(lower, keyword) as f64)
            .sum()
    }
}

impl Detector for KeywordDetector {
    fn score(&self, input: &str) -> f64 {
        let lower = input.to_lowercase();
        let score = self.score_lowercase(&lower);
        trace!(pattern = %self.pattern, score, "Scored pattern");
        score
    }

    fn confidence(&self, input: &str) -> f64 {
        (self.score(input) / CONFIDENCE_CALIBRATION).clamp(0.0, 1.0)
    }

    fn pattern(&self) -> ArchitecturePattern {
        self.pattern
    }

    fn patterns(&self) -> Vec<&'static str> {
        pattern_keywords(self.pattern)
            .iter()
            .map(|(keyword, _)| *keyword)
            .collect()
    }
}
