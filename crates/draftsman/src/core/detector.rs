//! Core detector trait for architecture pattern identification
//!
//! A detector scores free text against the keyword vocabulary of one
//! architectural pattern.

use super::ArchitecturePattern;

/// Core trait for pattern detectors
///
/// # Example
/// ```
/// use draftsman::core::{ArchitecturePattern, Detector};
/// use draftsman::plugins::architecture::KeywordDetector;
///
/// let detector = KeywordDetector::for_pattern(ArchitecturePattern::Microservices);
/// assert!(detector.detect("services deployed on kubernetes behind an api gateway"));
/// ```
pub trait Detector: Send + Sync {
    /// Detect if the input mentions this pattern at all
    fn detect(&self, input: &str) -> bool {
        self.score(input) > 0.0
    }

    /// Raw weighted keyword score
    fn score(&self, input: &str) -> f64;

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// The pattern this detector recognizes
    fn pattern(&self) -> ArchitecturePattern;

    /// Get key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}
