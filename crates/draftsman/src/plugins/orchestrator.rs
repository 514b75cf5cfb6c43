//! Pipeline orchestrator
//!
//! Wires the stages together so callers can run a full pipeline without
//! handling each one manually:
//!
//! - free text: Analyzer → Strategy Selector → Builder → Position Calculator
//!   → (optional) Link Color Assigner
//! - declarative source: Parser → (optional) Link Color Assigner

use serde::Serialize;
use tracing::{debug, info, span, Level};

use crate::core::{Diagram, LinkColorAssigner, ParseFailure};
use crate::plugins::architecture::{
    ArchitectureAnalysis, DiagramBuilder, LayoutAlgorithm, LayoutConfig, LayoutStrategySelector,
    PatternAnalyzer, PositionCalculator,
};
use crate::plugins::dsl::DslParser;

/// Everything produced by one run of the free-text pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDiagram {
    pub analysis: ArchitectureAnalysis,
    pub config: LayoutConfig,
    pub diagram: Diagram,
}

/// Coordinates the pipeline stages
#[derive(Debug, Clone)]
pub struct Orchestrator {
    analyzer: PatternAnalyzer,
    selector: LayoutStrategySelector,
    calculator: PositionCalculator,
    builder: DiagramBuilder,
    dsl_parser: DslParser,
    colorizer: Option<LinkColorAssigner>,
}

impl Orchestrator {
    /// Create an orchestrator that leaves link colors untouched
    pub fn new() -> Self {
        Self {
            analyzer: PatternAnalyzer::new(),
            selector: LayoutStrategySelector::new(),
            calculator: PositionCalculator::new(),
            builder: DiagramBuilder::new(),
            dsl_parser: DslParser::new(),
            colorizer: None,
        }
    }

    /// Run the Link Color Assigner at the end of every pipeline
    pub fn with_link_colors(mut self) -> Self {
        self.colorizer = Some(LinkColorAssigner::new());
        self
    }

    /// Use a custom assigner, e.g. one with its own palette
    pub fn with_color_assigner(mut self, assigner: LinkColorAssigner) -> Self {
        self.colorizer = Some(assigner);
        self
    }

    /// Use a custom title for compiled diagrams
    pub fn with_dsl_title(mut self, title: impl Into<String>) -> Self {
        self.dsl_parser = self.dsl_parser.with_title(title);
        self
    }

    pub fn colorizes_links(&self) -> bool {
        self.colorizer.is_some()
    }

    /// Analyze a description without building anything
    pub fn analyze(&self, prompt: &str) -> ArchitectureAnalysis {
        self.analyzer.analyze(prompt)
    }

    /// Run the full free-text pipeline with the selected layout
    pub fn generate(&self, prompt: &str) -> GeneratedDiagram {
        self.generate_with(prompt, None)
    }

    /// Run the full free-text pipeline, optionally forcing an algorithm
    pub fn generate_with(
        &self,
        prompt: &str,
        algorithm: Option<LayoutAlgorithm>,
    ) -> GeneratedDiagram {
        let generate_span = span!(Level::INFO, "generate_diagram", input_len = prompt.len());
        let _enter = generate_span.enter();

        info!("Starting free-text pipeline");

        let analysis = self.analyzer.analyze(prompt);

        let mut config = self.selector.select(&analysis);
        if let Some(algorithm) = algorithm {
            debug!(selected = %config.algorithm, forced = %algorithm, "Overriding layout algorithm");
            config = config.with_algorithm(algorithm);
        }

        let mut diagram = self.builder.build(&analysis);
        self.calculator
            .calculate_diagram(&mut diagram, &config, &analysis);

        if let Some(assigner) = &self.colorizer {
            assigner.apply(&mut diagram);
        }

        info!(
            nodes = diagram.nodes.len(),
            links = diagram.links.len(),
            algorithm = %config.algorithm,
            "Pipeline completed successfully"
        );

        GeneratedDiagram {
            analysis,
            config,
            diagram,
        }
    }

    /// Compile declarative source, coloring links if configured
    pub fn compile(&self, source: &str) -> Result<Diagram, ParseFailure> {
        let compile_span = span!(Level::INFO, "compile_pipeline", input_len = source.len());
        let _enter = compile_span.enter();

        let mut diagram = self.dsl_parser.compile(source)?;
        if let Some(assigner) = &self.colorizer {
            assigner.apply(&mut diagram);
        }
        debug!(nodes = diagram.nodes.len(), "Compiled source");
        Ok(diagram)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
