//! Diagram to declarative source
//!
//! Any diagram, including one produced by the layout pipeline, can be
//! written back out and re-parsed. Coordinates are rounded to integers and
//! double quotes in labels become single quotes.

use std::fmt::Write;

use crate::core::{Container, Diagram, Link, Node};

const INDENT: &str = "    ";

fn clean_label(label: &str) -> String {
    label.replace('"', "'")
}

fn int(value: f64) -> i64 {
    value.round() as i64
}

fn write_node(out: &mut String, node: &Node, indent: &str) {
    let _ = writeln!(
        out,
        "{}node {}: \"{}\" icon={} x={} y={} width={} height={}",
        indent,
        node.id,
        clean_label(&node.label),
        node.icon.name(),
        int(node.x),
        int(node.y),
        int(node.width),
        int(node.height),
    );
}

fn write_container_header(out: &mut String, container: &Container) {
    let _ = writeln!(
        out,
        "container {}: \"{}\" type={} x={} y={} width={} height={} {{",
        container.id,
        clean_label(&container.label),
        container.container_type.name(),
        int(container.x),
        int(container.y),
        int(container.width),
        int(container.height),
    );
}

fn write_link(out: &mut String, link: &Link) {
    let arrow = if link.bidirectional { "<->" } else { "->" };
    let _ = write!(out, "{} {} {}", link.source, arrow, link.target);
    if let Some(label) = &link.label {
        let _ = write!(out, ": \"{}\"", clean_label(label));
    }
    out.push('\n');
}

/// Index of the container a node is written inside, if any
///
/// The first container listing the node wins, then its back-reference.
fn owner_of(diagram: &Diagram, node: &Node) -> Option<usize> {
    let containers = diagram.container_list();
    containers
        .iter()
        .position(|c| c.children.contains(&node.id))
        .or_else(|| {
            let id = node.container_id.as_deref()?;
            containers.iter().position(|c| c.id == id)
        })
}

/// Render a diagram as declarative source
pub fn to_source(diagram: &Diagram) -> String {
    let mut out = String::new();
    if !diagram.title.is_empty() {
        let _ = writeln!(out, "// {}", diagram.title);
    }

    let owners: Vec<Option<usize>> = diagram
        .nodes
        .iter()
        .map(|node| owner_of(diagram, node))
        .collect();

    for (node, owner) in diagram.nodes.iter().zip(&owners) {
        if owner.is_none() {
            write_node(&mut out, node, "");
        }
    }

    for (index, container) in diagram.container_list().iter().enumerate() {
        if !out.is_empty() {
            out.push('\n');
        }
        write_container_header(&mut out, container);
        // children order first, then nodes that only carry a back-reference
        let mut members: Vec<&Node> = container
            .children
            .iter()
            .filter_map(|id| diagram.node(id))
            .filter(|node| owner_of(diagram, node) == Some(index))
            .collect();
        for (node, owner) in diagram.nodes.iter().zip(&owners) {
            if *owner == Some(index) && !members.iter().any(|m| m.id == node.id) {
                members.push(node);
            }
        }
        for node in members {
            write_node(&mut out, node, INDENT);
        }
        out.push_str("}\n");
    }

    if !diagram.links.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        for link in &diagram.links {
            write_link(&mut out, link);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ContainerType, IconType};
    use crate::plugins::dsl::DslParser;

    fn sample() -> Diagram {
        let mut diagram = Diagram::new("Sample");
        diagram.nodes = vec![
            Node::new("user", "User", IconType::User).at(10.4, 20.6),
            Node::new("api", "The \"API\"", IconType::Api)
                .at(200.0, 40.0)
                .in_container("vpc"),
            Node::new("lb", "LB", IconType::LoadBalancer).in_container("vpc"),
        ];
        diagram.links = vec![
            Link::new("link-1", "user", "api").with_label("calls"),
            Link::new("link-2", "api", "lb").bidirectional(),
        ];
        let mut vpc = Container::new("vpc", "VPC", ContainerType::Vpc)
            .with_bounds(0.0, 0.0, 500.0, 300.0);
        vpc.children = vec!["api".to_string()];
        diagram.add_container(vpc);
        diagram
    }

    #[test]
    fn test_writes_expected_lines() {
        let source = to_source(&sample());
        let lines: Vec<&str> = source.lines().collect();

        assert_eq!(lines[0], "// Sample");
        assert_eq!(
            lines[1],
            "node user: \"User\" icon=user x=10 y=21 width=120 height=100"
        );
        assert_eq!(
            lines[3],
            "container vpc: \"VPC\" type=vpc x=0 y=0 width=500 height=300 {"
        );
        assert_eq!(
            lines[4],
            "    node api: \"The 'API'\" icon=api x=200 y=40 width=120 height=100"
        );
        assert!(lines[5].starts_with("    node lb: \"LB\" icon=load-balancer"));
        assert_eq!(lines[6], "}");
        assert!(source.contains("user -> api: \"calls\"\n"));
        assert!(source.contains("api <-> lb\n"));
    }

    #[test]
    fn test_output_reparses() {
        let diagram = sample();
        let reparsed = DslParser::new()
            .with_title(&diagram.title)
            .compile(&to_source(&diagram))
            .unwrap();

        assert_eq!(reparsed.nodes.len(), 3);
        assert_eq!(reparsed.links.len(), 2);
        let vpc = reparsed.container("vpc").unwrap();
        assert_eq!(vpc.children, vec!["api", "lb"]);
        assert_eq!(reparsed.node("lb").unwrap().container_id.as_deref(), Some("vpc"));
        assert_eq!(reparsed.node("user").unwrap().x, 10.0);
    }

    #[test]
    fn test_empty_diagram() {
        assert_eq!(to_source(&Diagram::default()), "");
    }
}
