//! Draftsman - Turn architecture descriptions into positioned diagrams
//!
//! Two inputs produce the same [`Diagram`] model:
//!
//! - a free-text description of a software architecture, classified and
//!   laid out heuristically
//! - source in a small declarative diagram language with explicit
//!   coordinates
//!
//! # Quick Start
//!
//! ```rust
//! use draftsman::generate;
//!
//! let generated = generate("A user sends requests to an API service which reads from a database");
//! assert_eq!(generated.diagram.nodes.len(), 3);
//! assert_eq!(generated.diagram.links.len(), 2);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, run the stages yourself:
//!
//! ```rust
//! use draftsman::prelude::*;
//!
//! let analysis = PatternAnalyzer::new().analyze("clients call a server backed by a cache");
//! let config = LayoutStrategySelector::new().select(&analysis);
//!
//! let mut diagram = DiagramBuilder::new().build(&analysis);
//! PositionCalculator::new().calculate_diagram(&mut diagram, &config, &analysis);
//! apply_link_colors(&mut diagram);
//!
//! assert_eq!(analysis.pattern, ArchitecturePattern::ClientServer);
//! assert!(diagram.nodes.iter().all(|n| n.x >= 0.0 && n.y >= 0.0));
//! ```

pub mod core;
pub mod plugins;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        apply_link_colors, ArchitecturePattern, Container, ContainerType, Database, Detector,
        Diagram, DiagramError, Direction, IconType, Link, LinkColorAssigner, Node, ParseFailure,
        Parser, Placement,
    };
    pub use crate::plugins::architecture::{
        ArchitectureAnalysis, DiagramBuilder, LayoutAlgorithm, LayoutConfig,
        LayoutStrategySelector, PatternAnalyzer, PositionCalculator,
    };
    pub use crate::plugins::dsl::{to_source, DslParser};
    pub use crate::plugins::orchestrator::{GeneratedDiagram, Orchestrator};
}

/// Run the free-text pipeline with default settings
///
/// Links keep their default color; use [`plugins::Orchestrator`] with
/// `with_link_colors` to colorize them.
pub fn generate(prompt: &str) -> plugins::GeneratedDiagram {
    plugins::Orchestrator::new().generate(prompt)
}

/// Analyze a description without laying anything out
///
/// # Example
/// ```rust
/// use draftsman::{analyze, ArchitecturePattern};
///
/// let analysis = analyze("kafka topics feed a stream of events to consumers");
/// assert_eq!(analysis.pattern, ArchitecturePattern::EventDriven);
/// ```
pub fn analyze(prompt: &str) -> plugins::ArchitectureAnalysis {
    plugins::PatternAnalyzer::new().analyze(prompt)
}

/// Compile declarative source into a diagram
///
/// # Example
/// ```rust
/// use draftsman::compile;
///
/// let diagram = compile("node a: \"A\" icon=server x=0 y=0\nnode b: \"B\" icon=db x=0 y=200\na -> b").unwrap();
/// assert_eq!(diagram.links[0].id, "link-1");
///
/// let failure = compile("node a: \"A\" icon=spaceship x=0 y=0").unwrap_err();
/// assert_eq!(failure.errors[0].message, "Unknown icon type: spaceship");
/// ```
pub fn compile(source: &str) -> Result<Diagram, ParseFailure> {
    plugins::DslParser::new().compile(source)
}
