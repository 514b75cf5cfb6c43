//! Link color assignment
//!
//! Gives every link a palette color such that links sharing an endpoint
//! differ whenever the palette allows it. Links that already carry a
//! non-default color are left untouched.

use std::collections::{HashMap, HashSet};

use tracing::{debug, span, trace, Level};

use super::{Diagram, Link, Node};

/// Ten visually distinct colors, tried in order
pub const LINK_PALETTE: [&str; 10] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
    "#f97316", "#6366f1",
];

/// Greedy adjacency-aware link colorer
#[derive(Debug, Clone)]
pub struct LinkColorAssigner {
    palette: Vec<String>,
}

impl Default for LinkColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkColorAssigner {
    /// Assigner using [`LINK_PALETTE`]
    pub fn new() -> Self {
        Self::with_palette(LINK_PALETTE.iter().map(|c| c.to_string()).collect())
    }

    /// Assigner with a custom palette
    pub fn with_palette(palette: Vec<String>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Map every link id to a color
    ///
    /// Pre-colored links keep their color and count as used for their
    /// neighbours. When every palette color is taken around a link, the
    /// color at `index % palette.len()` is reused.
    pub fn assign(&self, links: &[Link], nodes: &[Node]) -> HashMap<String, String> {
        let assign_span = span!(Level::DEBUG, "assign_link_colors", links = links.len());
        let _enter = assign_span.enter();

        let mut touching: HashMap<&str, Vec<&str>> = nodes
            .iter()
            .map(|n| (n.id.as_str(), Vec::new()))
            .collect();
        for link in links {
            touching.entry(&link.source).or_default().push(&link.id);
            if link.target != link.source {
                touching.entry(&link.target).or_default().push(&link.id);
            }
        }

        let mut assigned: HashMap<String, String> = links
            .iter()
            .filter(|link| link.is_colored())
            .filter_map(|link| {
                link.style
                    .color
                    .clone()
                    .map(|color| (link.id.clone(), color))
            })
            .collect();
        trace!(precolored = assigned.len(), "Seeded existing link colors");

        for (index, link) in links.iter().enumerate() {
            if assigned.contains_key(&link.id) {
                continue;
            }

            let used: HashSet<&str> = [link.source.as_str(), link.target.as_str()]
                .iter()
                .filter_map(|endpoint| touching.get(endpoint))
                .flatten()
                .filter_map(|id| assigned.get(*id))
                .map(|color| color.as_str())
                .collect();

            let color = match self.palette.iter().find(|c| !used.contains(c.as_str())) {
                Some(free) => free.clone(),
                None if self.palette.is_empty() => super::DEFAULT_LINK_COLOR.to_string(),
                None => {
                    trace!(link = %link.id, "Palette exhausted, cycling");
                    self.palette[index % self.palette.len()].clone()
                }
            };
            assigned.insert(link.id.clone(), color);
        }

        debug!(colored = assigned.len(), "Link colors assigned");
        assigned
    }

    /// Write assigned colors into the diagram's links
    pub fn apply(&self, diagram: &mut Diagram) {
        let colors = self.assign(&diagram.links, &diagram.nodes);
        for link in &mut diagram.links {
            if let Some(color) = colors.get(&link.id) {
                link.style.color = Some(color.clone());
            }
        }
    }
}

/// Color a diagram's links with the default palette
pub fn apply_link_colors(diagram: &mut Diagram) {
    LinkColorAssigner::new().apply(diagram);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IconType, DEFAULT_LINK_COLOR};

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter()
            .map(|id| Node::new(*id, id.to_uppercase(), IconType::Service))
            .collect()
    }

    #[test]
    fn test_star_links_all_differ() {
        let nodes = nodes(&["hub", "a", "b", "c", "d"]);
        let links: Vec<Link> = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, t)| Link::new(format!("link-{}", i + 1), "hub", *t))
            .collect();

        let colors = LinkColorAssigner::new().assign(&links, &nodes);
        let distinct: HashSet<&String> = colors.values().collect();
        assert_eq!(colors.len(), 4);
        assert_eq!(distinct.len(), 4);
        assert_eq!(colors["link-1"], LINK_PALETTE[0]);
        assert_eq!(colors["link-2"], LINK_PALETTE[1]);
    }

    #[test]
    fn test_disjoint_links_reuse_first_color() {
        let nodes = nodes(&["a", "b", "c", "d"]);
        let links = vec![Link::new("l1", "a", "b"), Link::new("l2", "c", "d")];
        let colors = LinkColorAssigner::new().assign(&links, &nodes);
        assert_eq!(colors["l1"], LINK_PALETTE[0]);
        assert_eq!(colors["l2"], LINK_PALETTE[0]);
    }

    #[test]
    fn test_precolored_link_is_kept_and_avoided() {
        let nodes = nodes(&["a", "b", "c"]);
        let mut first = Link::new("l1", "a", "b");
        first.style.color = Some(LINK_PALETTE[0].to_string());
        let links = vec![Link::new("l0", "b", "c"), first];

        let colors = LinkColorAssigner::new().assign(&links, &nodes);
        assert_eq!(colors["l1"], LINK_PALETTE[0]);
        assert_eq!(colors["l0"], LINK_PALETTE[1]);
    }

    #[test]
    fn test_default_gray_counts_as_uncolored() {
        let nodes = nodes(&["a", "b"]);
        let mut link = Link::new("l1", "a", "b");
        link.style.color = Some(DEFAULT_LINK_COLOR.to_string());
        let colors = LinkColorAssigner::new().assign(&[link], &nodes);
        assert_eq!(colors["l1"], LINK_PALETTE[0]);
    }

    #[test]
    fn test_exhausted_palette_falls_back_to_index() {
        let assigner = LinkColorAssigner::with_palette(vec!["red".into(), "blue".into()]);
        let nodes = nodes(&["hub", "a", "b", "c"]);
        let links = vec![
            Link::new("l1", "hub", "a"),
            Link::new("l2", "hub", "b"),
            Link::new("l3", "hub", "c"),
        ];
        let colors = assigner.assign(&links, &nodes);
        assert_eq!(colors["l1"], "red");
        assert_eq!(colors["l2"], "blue");
        // index 2 % 2 == 0
        assert_eq!(colors["l3"], "red");
    }

    #[test]
    fn test_apply_writes_into_diagram() {
        let mut diagram = Diagram::new("Colors");
        diagram.nodes = nodes(&["a", "b"]);
        diagram.links.push(Link::new("link-1", "a", "b"));
        apply_link_colors(&mut diagram);
        assert_eq!(diagram.links[0].style.color.as_deref(), Some(LINK_PALETTE[0]));
    }

    #[test]
    fn test_empty_input() {
        let colors = LinkColorAssigner::new().assign(&[], &[]);
        assert!(colors.is_empty());
    }
}
