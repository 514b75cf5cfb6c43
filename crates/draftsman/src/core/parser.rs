//! Core parser trait for diagram markup
//!
//! This trait defines the interface for parsing diagram markup language
//! into structured data that can be stored in a database.

use anyhow::Result;

use super::Database;

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use draftsman::core::{Database, Diagram, Parser};
/// use draftsman::plugins::dsl::DslParser;
///
/// let parser = DslParser::new();
/// let mut db = Diagram::default();
/// parser
///     .parse("node a: \"A\" icon=server x=0 y=0", &mut db)
///     .unwrap();
/// assert_eq!(db.node_count(), 1);
/// ```
pub trait Parser<D: Database>: Send + Sync {
    /// Parse diagram markup into the provided database
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input can be parsed by this parser
    fn can_parse(&self, input: &str) -> bool;
}
