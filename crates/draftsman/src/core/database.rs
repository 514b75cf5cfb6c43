//! Core database trait for diagram data storage
//!
//! This trait defines the interface for storing and managing diagram data.
//! [`Diagram`] is the one store every stage writes into.

use anyhow::{bail, Result};

use super::{Diagram, Link, Node};

/// Core trait for diagram databases
///
/// The associated types let a store define its own node and edge
/// structures.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge to the database
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by ID
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}

impl Database for Diagram {
    type Node = Node;
    type Edge = Link;

    /// Rejects a node whose id is already present
    fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node(&node.id).is_some() {
            bail!("Duplicate node id: {}", node.id);
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Rejects a link whose endpoints are not both present
    fn add_edge(&mut self, edge: Link) -> Result<()> {
        for endpoint in [&edge.source, &edge.target] {
            if self.node(endpoint).is_none() {
                bail!("Link {} references unknown node: {}", edge.id, endpoint);
            }
        }
        self.links.push(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Node> {
        self.node(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.containers = None;
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.links.len()
    }
}
