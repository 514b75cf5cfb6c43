//! Core error types for diagram processing
//!
//! Parsing the declarative language never stops at the first problem: every
//! failing line becomes a [`LineError`] and the whole set is returned as a
//! [`ParseFailure`]. [`DiagramError`] wraps that alongside the other failure
//! modes of the pipeline.

use serde::Serialize;
use thiserror::Error;

/// A single problem found on one line of diagram source
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {line}: {message}: `{text}`")]
pub struct LineError {
    /// 1-based line number
    pub line: usize,
    /// Human-readable description
    pub message: String,
    /// The offending line, trimmed
    pub text: String,
}

impl LineError {
    pub fn new(line: usize, message: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            text: text.into(),
        }
    }
}

/// Every error collected while compiling a diagram source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} error(s) in diagram source; first: {}", .errors.len(), first_message(.errors))]
pub struct ParseFailure {
    /// Errors ordered by line number
    pub errors: Vec<LineError>,
}

fn first_message(errors: &[LineError]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl ParseFailure {
    pub fn new(mut errors: Vec<LineError>) -> Self {
        errors.sort_by_key(|e| e.line);
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Line numbers that carry at least one error
    pub fn lines(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.errors.iter().map(|e| e.line).collect();
        lines.dedup();
        lines
    }
}

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_error_display() {
        let error = LineError::new(3, "Unknown icon type: spaceship", "node a: \"A\" icon=spaceship x=0 y=0");
        let msg = format!("{}", error);
        assert!(msg.contains("line 3"));
        assert!(msg.contains("Unknown icon type"));
        assert!(msg.contains("icon=spaceship"));
    }

    #[test]
    fn test_parse_failure_sorts_by_line() {
        let failure = ParseFailure::new(vec![
            LineError::new(7, "b", "x"),
            LineError::new(2, "a", "y"),
            LineError::new(7, "c", "z"),
        ]);
        assert_eq!(failure.len(), 3);
        assert_eq!(failure.errors[0].line, 2);
        assert_eq!(failure.lines(), vec![2, 7]);
    }

    #[test]
    fn test_parse_failure_display() {
        let failure = ParseFailure::new(vec![LineError::new(1, "Unrecognized statement", "hello")]);
        let msg = failure.to_string();
        assert!(msg.contains("1 error(s)"));
        assert!(msg.contains("Unrecognized statement"));
    }

    #[test]
    fn test_validation_error() {
        let error = DiagramError::validation_error("duplicate node id 'a'");
        let msg = format!("{}", error);
        assert!(msg.contains("Validation error"));
        assert!(msg.contains("duplicate node id"));
    }

    #[test]
    fn test_parse_failure_conversion() {
        let failure = ParseFailure::new(vec![LineError::new(4, "Unexpected closing brace", "}")]);
        let error: DiagramError = failure.into();
        assert!(matches!(error, DiagramError::Parse(_)));
        assert!(error.to_string().contains("Parse error"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: DiagramError = json_err.into();
        assert!(error.to_string().contains("Serialization error"));
    }
}
