//! Layout Strategy Selector
//!
//! Maps an [`ArchitectureAnalysis`] to a [`LayoutConfig`]: which placement
//! algorithm to run and how far apart to put things.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, span, Level};

use crate::core::{ArchitecturePattern, Direction};

use super::{ArchitectureAnalysis, Complexity, Scale};

pub const BASE_NODE_SPACING: f64 = 150.0;
pub const BASE_LEVEL_SPACING: f64 = 120.0;
pub const BASE_CONTAINER_SPACING: f64 = 80.0;
pub const BASE_CANVAS_WIDTH: f64 = 1600.0;
pub const BASE_CANVAS_HEIGHT: f64 = 1200.0;

/// Component density above which the layout packs tighter
pub const DENSITY_THRESHOLD: f64 = 0.7;

/// Layer mentions from which a layered description counts as deep
pub const DEEP_LAYERING_MENTIONS: usize = 4;

/// Placement algorithm named by a layout configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    #[default]
    Hierarchical,
    Radial,
    Grid,
    Cluster,
    Flow,
    Hybrid,
    Organic,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 7] = [
        LayoutAlgorithm::Hierarchical,
        LayoutAlgorithm::Radial,
        LayoutAlgorithm::Grid,
        LayoutAlgorithm::Cluster,
        LayoutAlgorithm::Flow,
        LayoutAlgorithm::Hybrid,
        LayoutAlgorithm::Organic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Hierarchical => "hierarchical",
            LayoutAlgorithm::Radial => "radial",
            LayoutAlgorithm::Grid => "grid",
            LayoutAlgorithm::Cluster => "cluster",
            LayoutAlgorithm::Flow => "flow",
            LayoutAlgorithm::Hybrid => "hybrid",
            LayoutAlgorithm::Organic => "organic",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == lower)
            .ok_or_else(|| format!("Unknown layout algorithm: {}", s))
    }
}

/// How containers relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerHierarchy {
    #[default]
    Flat,
    Nested,
    Mixed,
}

/// Canvas size the layout aims for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            width: BASE_CANVAS_WIDTH,
            height: BASE_CANVAS_HEIGHT,
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub algorithm: LayoutAlgorithm,
    pub direction: Direction,
    /// Gap between neighbouring nodes in a level
    pub node_spacing: f64,
    /// Gap between levels
    pub level_spacing: f64,
    pub container_spacing: f64,
    pub container_hierarchy: ContainerHierarchy,
    pub optimize_density: bool,
    pub bounds: CanvasBounds,
    /// Center used by circular placement
    pub center: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let bounds = CanvasBounds::default();
        Self {
            algorithm: LayoutAlgorithm::Hierarchical,
            direction: Direction::TopDown,
            node_spacing: BASE_NODE_SPACING,
            level_spacing: BASE_LEVEL_SPACING,
            container_spacing: BASE_CONTAINER_SPACING,
            container_hierarchy: ContainerHierarchy::Flat,
            optimize_density: false,
            bounds,
            center: bounds.center(),
        }
    }
}

impl LayoutConfig {
    pub fn with_algorithm(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

/// Spacing multiplier per scale bucket
pub fn scale_multiplier(scale: Scale) -> f64 {
    match scale {
        Scale::Small => 1.0,
        Scale::Medium => 1.3,
        Scale::Large => 1.6,
        Scale::Enterprise => 2.0,
    }
}

/// Spacing adjustment per complexity bucket
pub fn complexity_adjustment(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Simple => 0.8,
        Complexity::Moderate => 1.0,
        Complexity::Complex => 1.3,
        Complexity::VeryComplex => 1.6,
    }
}

/// Base algorithm for each pattern
pub fn base_algorithm(pattern: ArchitecturePattern) -> LayoutAlgorithm {
    match pattern {
        ArchitecturePattern::ClientServer
        | ArchitecturePattern::Layered
        | ArchitecturePattern::NTier
        | ArchitecturePattern::General => LayoutAlgorithm::Hierarchical,
        ArchitecturePattern::Microservices => LayoutAlgorithm::Cluster,
        ArchitecturePattern::EventDriven
        | ArchitecturePattern::RagLlm
        | ArchitecturePattern::Pipeline => LayoutAlgorithm::Flow,
        ArchitecturePattern::HubSpoke => LayoutAlgorithm::Radial,
        ArchitecturePattern::Distributed => LayoutAlgorithm::Organic,
        ArchitecturePattern::Enterprise | ArchitecturePattern::Hybrid => LayoutAlgorithm::Hybrid,
        ArchitecturePattern::NeuralNetwork => LayoutAlgorithm::Grid,
    }
}

/// Deterministic analysis-to-configuration mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutStrategySelector;

impl LayoutStrategySelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select(&self, analysis: &ArchitectureAnalysis) -> LayoutConfig {
        let select_span = span!(Level::INFO, "select_layout", pattern = %analysis.pattern);
        let _enter = select_span.enter();

        let factor = scale_multiplier(analysis.scale) * complexity_adjustment(analysis.complexity);

        let mut hierarchy = match analysis.containers.nesting_depth {
            0 => ContainerHierarchy::Flat,
            1 => ContainerHierarchy::Mixed,
            _ => ContainerHierarchy::Nested,
        };
        let mut bounds = CanvasBounds::default();
        let mut level_boost = 1.0;

        match analysis.pattern {
            ArchitecturePattern::Enterprise | ArchitecturePattern::Hybrid => {
                hierarchy = ContainerHierarchy::Nested;
                bounds = bounds.scaled(1.5);
            }
            ArchitecturePattern::Layered
                if analysis.containers.layer_mentions >= DEEP_LAYERING_MENTIONS =>
            {
                debug!(
                    layer_mentions = analysis.containers.layer_mentions,
                    "Deep layering detected"
                );
                hierarchy = ContainerHierarchy::Nested;
                bounds = bounds.scaled(1.25);
                level_boost = 1.2;
            }
            _ => {}
        }

        let config = LayoutConfig {
            algorithm: base_algorithm(analysis.pattern),
            direction: analysis.primary_flow,
            node_spacing: BASE_NODE_SPACING * factor,
            level_spacing: BASE_LEVEL_SPACING * factor * level_boost,
            container_spacing: BASE_CONTAINER_SPACING * factor,
            container_hierarchy: hierarchy,
            optimize_density: analysis.density.component > DENSITY_THRESHOLD,
            bounds,
            center: bounds.center(),
        };

        debug!(
            algorithm = %config.algorithm,
            direction = %config.direction,
            node_spacing = config.node_spacing,
            optimize_density = config.optimize_density,
            "Layout configuration selected"
        );
        config
    }
}
