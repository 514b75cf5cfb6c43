//! Core layout trait for diagram positioning
//!
//! A placement arranges nodes and containers in place. The configuration
//! type is left generic so each layout family can carry its own knobs.

use super::{Container, Node};

/// Core trait for placement algorithms
pub trait Placement<C>: Send + Sync {
    /// Assign coordinates to every node and container
    fn place(&self, nodes: &mut [Node], containers: &mut [Container], config: &C);

    /// Get the name of this placement algorithm
    fn name(&self) -> &'static str;
}
