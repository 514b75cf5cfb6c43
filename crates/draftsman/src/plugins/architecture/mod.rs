//! Free-text architecture path
//!
//! Pattern Analyzer → Layout Strategy Selector → Position Calculator, plus
//! the builder that turns an analysis into an unpositioned diagram.

pub mod analyzer;
pub mod builder;
pub mod detector;
pub mod layout;
pub mod strategy;
pub mod vocabulary;

pub use analyzer::*;
pub use builder::*;
pub use detector::*;
pub use layout::*;
pub use strategy::*;
