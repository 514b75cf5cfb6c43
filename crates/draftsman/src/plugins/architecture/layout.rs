//! Position Calculator
//!
//! Places nodes and containers according to a [`LayoutConfig`], then runs
//! the three passes every algorithm shares: a single collision-avoidance
//! sweep, the container-fit pass, and origin normalization.
//!
//! `radial`, `grid`, `cluster` and `flow` currently place exactly like
//! `hierarchical`. `hybrid` picks `organic` or `hierarchical` from the
//! analysis and re-enters the dispatcher with that choice.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use tracing::{debug, info, span, trace, Level};

use crate::core::{Container, Diagram, Node, Placement};

use super::strategy::{complexity_adjustment, scale_multiplier};
use super::{ArchitectureAnalysis, LayoutAlgorithm, LayoutConfig};

pub const CONTAINER_BASE_WIDTH: f64 = 300.0;
pub const CONTAINER_BASE_HEIGHT: f64 = 200.0;
pub const CONTAINER_WIDTH_PER_CHILD: f64 = 60.0;
pub const CONTAINER_HEIGHT_PER_CHILD: f64 = 40.0;

/// Space between a container's edge and its children
pub const CONTAINER_PADDING: f64 = 40.0;

/// Additional gap between rows of containers
pub const CONTAINER_ROW_GAP: f64 = 40.0;

/// Offset of the top-level node grid from the canvas origin
pub const LAYOUT_MARGIN: f64 = 50.0;

/// Fraction of node spacing below which two node centers collide
pub const COLLISION_FACTOR: f64 = 0.7;

pub const ORGANIC_MIN_RADIUS: f64 = 200.0;
pub const ORGANIC_RADIUS_PER_NODE: f64 = 15.0;

/// Hybrid scores above this switch to organic placement
pub const HYBRID_ORGANIC_THRESHOLD: f64 = 0.7;

/// Container grid columns for a container count
pub fn container_columns(count: usize, optimize_density: bool) -> usize {
    let columns = match count {
        0..=2 => 1,
        3..=6 => 2,
        7..=12 => 3,
        n => (n as f64).sqrt().ceil() as usize,
    };
    if optimize_density {
        columns.saturating_sub(1).max(1)
    } else {
        columns
    }
}

/// Provisional container size before the fit pass
pub fn container_size(children: usize) -> (f64, f64) {
    let k = children as f64;
    (
        CONTAINER_BASE_WIDTH + CONTAINER_WIDTH_PER_CHILD * k,
        CONTAINER_BASE_HEIGHT + CONTAINER_HEIGHT_PER_CHILD * k,
    )
}

/// Composite score deciding where a hybrid layout goes
///
/// Blends the scale multiplier and complexity adjustment (each normalized
/// to [0, 1]) with component and connection density.
pub fn hybrid_score(analysis: &ArchitectureAnalysis) -> f64 {
    // multipliers span 1.0..=2.0 and 0.8..=1.6
    let scale = scale_multiplier(analysis.scale) - 1.0;
    let complexity = (complexity_adjustment(analysis.complexity) - 0.8) / 0.8;
    0.3 * scale
        + 0.3 * complexity
        + 0.2 * analysis.density.component
        + 0.2 * analysis.density.connection
}

/// Grid layout with optional containers
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalPlacement;

impl HierarchicalPlacement {
    fn place_with_containers(
        &self,
        nodes: &mut [Node],
        containers: &mut [Container],
        config: &LayoutConfig,
    ) {
        let columns = container_columns(containers.len(), config.optimize_density);
        let rows = containers.len().div_ceil(columns);
        let sizes: Vec<(f64, f64)> = containers
            .iter()
            .map(|c| container_size(c.children.len()))
            .collect();
        let cell_width = sizes.iter().map(|s| s.0).fold(0.0, f64::max);
        let cell_height = sizes.iter().map(|s| s.1).fold(0.0, f64::max);
        let row_pitch = cell_height + config.container_spacing + CONTAINER_ROW_GAP;

        let index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        let mut placed = vec![false; nodes.len()];

        for (i, container) in containers.iter_mut().enumerate() {
            let (column, row) = (i % columns, i / columns);
            container.x = config.container_spacing
                + column as f64 * (cell_width + config.container_spacing);
            container.y = config.container_spacing + row as f64 * row_pitch;
            (container.width, container.height) = sizes[i];

            // A node listed by two containers stays with the first
            let mut children = Vec::new();
            for id in &container.children {
                if let Some(&n) = index.get(id) {
                    if !placed[n] {
                        placed[n] = true;
                        children.push(n);
                    }
                }
            }
            for &n in &children {
                nodes[n].container_id = Some(container.id.clone());
            }
            place_children(container, &children, nodes);
            trace!(container = %container.id, children = children.len(), "Placed container");
        }

        let orphans: Vec<usize> = (0..nodes.len()).filter(|i| !placed[*i]).collect();
        if !orphans.is_empty() {
            let top = config.container_spacing + rows as f64 * row_pitch;
            debug!(orphans = orphans.len(), "Placing uncontained nodes below containers");
            place_grid(nodes, &orphans, (LAYOUT_MARGIN, top), config);
        }
    }
}

impl Placement<LayoutConfig> for HierarchicalPlacement {
    fn place(&self, nodes: &mut [Node], containers: &mut [Container], config: &LayoutConfig) {
        if containers.is_empty() {
            let all: Vec<usize> = (0..nodes.len()).collect();
            place_grid(nodes, &all, (LAYOUT_MARGIN, LAYOUT_MARGIN), config);
        } else {
            self.place_with_containers(nodes, containers, config);
        }
    }

    fn name(&self) -> &'static str {
        "hierarchical"
    }
}

/// Equal-angle circle around the configured center
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganicPlacement;

impl OrganicPlacement {
    pub fn radius(node_count: usize) -> f64 {
        ORGANIC_MIN_RADIUS.max(node_count as f64 * ORGANIC_RADIUS_PER_NODE)
    }
}

impl Placement<LayoutConfig> for OrganicPlacement {
    fn place(&self, nodes: &mut [Node], _containers: &mut [Container], config: &LayoutConfig) {
        let count = nodes.len();
        if count == 0 {
            return;
        }
        let radius = Self::radius(count);
        let (cx, cy) = config.center;
        for (i, node) in nodes.iter_mut().enumerate() {
            let angle = TAU * i as f64 / count as f64;
            node.x = cx + radius * angle.cos() - node.width / 2.0;
            node.y = cy + radius * angle.sin() - node.height / 2.0;
        }
    }

    fn name(&self) -> &'static str {
        "organic"
    }
}

/// Centered grid inside a container's padded interior
fn place_children(container: &Container, children: &[usize], nodes: &mut [Node]) {
    if children.is_empty() {
        return;
    }
    let columns = (children.len() as f64).sqrt().ceil() as usize;
    let rows = children.len().div_ceil(columns);
    let inner_width = (container.width - 2.0 * CONTAINER_PADDING).max(0.0);
    let inner_height = (container.height - 2.0 * CONTAINER_PADDING).max(0.0);
    let cell_width = inner_width / columns as f64;
    let cell_height = inner_height / rows as f64;

    for (slot, &n) in children.iter().enumerate() {
        let (column, row) = (slot % columns, slot / columns);
        let node = &mut nodes[n];
        node.x = container.x
            + CONTAINER_PADDING
            + column as f64 * cell_width
            + (cell_width - node.width) / 2.0;
        node.y = container.y
            + CONTAINER_PADDING
            + row as f64 * cell_height
            + (cell_height - node.height) / 2.0;
    }
}

/// Top-level grid; levels run down for vertical flows and across for
/// horizontal ones
fn place_grid(nodes: &mut [Node], indices: &[usize], origin: (f64, f64), config: &LayoutConfig) {
    if indices.is_empty() {
        return;
    }
    let mut columns = (indices.len() as f64).sqrt().ceil() as usize;
    if config.optimize_density {
        columns = columns.saturating_sub(1).max(1);
    }
    let levels = indices.len().div_ceil(columns);
    let max_width = indices.iter().map(|&i| nodes[i].width).fold(0.0, f64::max);
    let max_height = indices.iter().map(|&i| nodes[i].height).fold(0.0, f64::max);

    for (slot, &i) in indices.iter().enumerate() {
        let offset = (slot % columns) as f64;
        let mut level = slot / columns;
        if config.direction.is_reversed() {
            level = levels - 1 - level;
        }
        let level = level as f64;
        let node = &mut nodes[i];
        if config.direction.is_horizontal() {
            node.x = origin.0 + level * (max_width + config.level_spacing);
            node.y = origin.1 + offset * (max_height + config.node_spacing);
        } else {
            node.x = origin.0 + offset * (max_width + config.node_spacing);
            node.y = origin.1 + level * (max_height + config.level_spacing);
        }
    }
}

/// One pairwise sweep pushing apart nodes whose centers are too close
///
/// Each colliding pair moves apart symmetrically by half the deficit, so an
/// isolated pair ends exactly at the threshold. Pairs are visited once;
/// clusters of three or more may keep residual overlap. Returns the number
/// of pairs adjusted.
pub fn avoid_collisions(nodes: &mut [Node], node_spacing: f64) -> usize {
    let collision_span = span!(Level::DEBUG, "avoid_collisions", nodes = nodes.len());
    let _enter = collision_span.enter();

    let threshold = COLLISION_FACTOR * node_spacing;
    let mut adjusted = 0;

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let (ax, ay) = nodes[i].center();
            let (bx, by) = nodes[j].center();
            let (dx, dy) = (bx - ax, by - ay);
            let distance = dx.hypot(dy);
            if distance >= threshold {
                continue;
            }

            // Coincident centers separate along x
            let (ux, uy) = if distance > f64::EPSILON {
                (dx / distance, dy / distance)
            } else {
                (1.0, 0.0)
            };
            let push = (threshold - distance) / 2.0;
            nodes[i].x -= ux * push;
            nodes[i].y -= uy * push;
            nodes[j].x += ux * push;
            nodes[j].y += uy * push;
            adjusted += 1;
            trace!(a = %nodes[i].id, b = %nodes[j].id, distance, "Separated nodes");
        }
    }

    debug!(adjusted, threshold, "Collision pass complete");
    adjusted
}

/// Resize each container to its children's bounding box plus padding
///
/// Children are the container's listed ids together with any node that
/// names the container as its owner. Containers without children keep
/// their current box.
pub fn fit_containers(nodes: &[Node], containers: &mut [Container]) {
    let fit_span = span!(Level::DEBUG, "fit_containers", containers = containers.len());
    let _enter = fit_span.enter();

    for container in containers.iter_mut() {
        let listed: HashSet<&str> = container.children.iter().map(String::as_str).collect();
        let members = nodes.iter().filter(|n| {
            listed.contains(n.id.as_str()) || n.container_id.as_deref() == Some(&container.id)
        });

        let bounds = members.fold(None, |acc: Option<(f64, f64, f64, f64)>, n| {
            Some(match acc {
                None => (n.x, n.y, n.right(), n.bottom()),
                Some((x0, y0, x1, y1)) => {
                    (x0.min(n.x), y0.min(n.y), x1.max(n.right()), y1.max(n.bottom()))
                }
            })
        });

        if let Some((x0, y0, x1, y1)) = bounds {
            container.x = x0 - CONTAINER_PADDING;
            container.y = y0 - CONTAINER_PADDING;
            container.width = x1 - x0 + 2.0 * CONTAINER_PADDING;
            container.height = y1 - y0 + 2.0 * CONTAINER_PADDING;
        }
    }
}

/// Translate everything so no coordinate is negative
///
/// Returns the applied `(dx, dy)` shift.
pub fn normalize_origin(nodes: &mut [Node], containers: &mut [Container]) -> (f64, f64) {
    let xs = nodes.iter().map(|n| n.x).chain(containers.iter().map(|c| c.x));
    let ys = nodes.iter().map(|n| n.y).chain(containers.iter().map(|c| c.y));
    let min_x = xs.fold(0.0, f64::min);
    let min_y = ys.fold(0.0, f64::min);
    let shift = (-min_x, -min_y);
    if shift == (0.0, 0.0) {
        return shift;
    }

    debug!(dx = shift.0, dy = shift.1, "Shifting drawing to non-negative coordinates");
    for node in nodes.iter_mut() {
        node.x += shift.0;
        node.y += shift.1;
    }
    for container in containers.iter_mut() {
        container.x += shift.0;
        container.y += shift.1;
    }
    shift
}

/// Runs placement and the shared post-passes
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionCalculator;

impl PositionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Finalize coordinates for every node and container
    pub fn calculate(
        &self,
        nodes: &mut [Node],
        containers: &mut [Container],
        config: &LayoutConfig,
        analysis: &ArchitectureAnalysis,
    ) {
        let calc_span = span!(
            Level::INFO,
            "calculate_positions",
            nodes = nodes.len(),
            containers = containers.len(),
            algorithm = %config.algorithm
        );
        let _enter = calc_span.enter();

        if nodes.is_empty() && containers.is_empty() {
            debug!("Nothing to place");
            return;
        }

        self.dispatch(nodes, containers, config, analysis);
        avoid_collisions(nodes, config.node_spacing);
        fit_containers(nodes, containers);
        normalize_origin(nodes, containers);

        info!("Positions calculated");
    }

    /// Calculate positions for a whole diagram in place
    pub fn calculate_diagram(
        &self,
        diagram: &mut Diagram,
        config: &LayoutConfig,
        analysis: &ArchitectureAnalysis,
    ) {
        let containers: &mut [Container] = match diagram.containers.as_mut() {
            Some(containers) => containers,
            None => &mut [],
        };
        self.calculate(&mut diagram.nodes, containers, config, analysis);
    }

    fn dispatch(
        &self,
        nodes: &mut [Node],
        containers: &mut [Container],
        config: &LayoutConfig,
        analysis: &ArchitectureAnalysis,
    ) {
        match config.algorithm {
            LayoutAlgorithm::Hierarchical
            | LayoutAlgorithm::Radial
            | LayoutAlgorithm::Grid
            | LayoutAlgorithm::Cluster
            | LayoutAlgorithm::Flow => HierarchicalPlacement.place(nodes, containers, config),
            LayoutAlgorithm::Organic => OrganicPlacement.place(nodes, containers, config),
            LayoutAlgorithm::Hybrid => {
                let score = hybrid_score(analysis);
                let target = if score > HYBRID_ORGANIC_THRESHOLD {
                    LayoutAlgorithm::Organic
                } else {
                    LayoutAlgorithm::Hierarchical
                };
                debug!(score, %target, "Hybrid layout resolved");
                let resolved = config.clone().with_algorithm(target);
                self.dispatch(nodes, containers, &resolved, analysis);
            }
        }
    }
}
