//! Property tests for the position calculator's shared passes

use std::f64::consts::TAU;

use proptest::prelude::*;

use draftsman::plugins::architecture::{
    avoid_collisions, fit_containers, normalize_origin, LayoutAlgorithm, OrganicPlacement,
    COLLISION_FACTOR,
};
use draftsman::plugins::Orchestrator;
use draftsman::{Container, ContainerType, IconType, Node};

const PROMPTS: [&str; 6] = [
    "A user sends requests to an API service which reads from a database",
    "clients call a server backed by a cache",
    "Microservices: an api gateway routes to the order service and the payment service, each with its own database",
    "kafka topics feed a stream of events to consumers and the billing worker writes to postgres",
    "a three-tier app: the web tier talks to the app tier which uses the data tier database",
    "deploy across two regions, each region has a vpc with private subnets hosting the web server and redis",
];

// ===================
// Strategies
// ===================

fn spacing_strategy() -> impl Strategy<Value = f64> {
    50.0f64..300.0
}

fn node_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-500.0f64..500.0, -500.0f64..500.0, 20.0f64..200.0, 20.0f64..200.0)
}

fn nodes_strategy() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(node_strategy(), 1..12).prop_map(|boxes| {
        boxes
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, w, h))| {
                Node::new(format!("n{}", i), format!("N{}", i), IconType::Service)
                    .at(x, y)
                    .with_size(w, h)
            })
            .collect()
    })
}

fn algorithm_strategy() -> impl Strategy<Value = LayoutAlgorithm> {
    prop::sample::select(LayoutAlgorithm::ALL.to_vec())
}

fn prompt_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(PROMPTS.to_vec())
}

// ===================
// Property Test Functions
// ===================

fn distance(a: &Node, b: &Node) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (bx - ax).hypot(by - ay)
}

/// A lone colliding pair is pushed apart to exactly the threshold.
fn check_isolated_pair_ends_at_threshold(
    spacing: f64,
    angle: f64,
    fraction: f64,
) -> Result<(), TestCaseError> {
    let threshold = COLLISION_FACTOR * spacing;
    let gap = threshold * fraction;
    let mut nodes = vec![
        Node::new("a", "A", IconType::Server),
        Node::new("b", "B", IconType::Server).at(gap * angle.cos(), gap * angle.sin()),
    ];

    let adjusted = avoid_collisions(&mut nodes, spacing);

    prop_assert_eq!(adjusted, 1);
    prop_assert!((distance(&nodes[0], &nodes[1]) - threshold).abs() < 1e-6);
    Ok(())
}

/// Pairs already at or beyond the threshold are never moved.
fn check_distant_pair_is_untouched(spacing: f64, extra: f64) -> Result<(), TestCaseError> {
    let threshold = COLLISION_FACTOR * spacing;
    let original = vec![
        Node::new("a", "A", IconType::Server),
        Node::new("b", "B", IconType::Server).at(threshold + extra, 0.0),
    ];
    let mut nodes = original.clone();

    prop_assert_eq!(avoid_collisions(&mut nodes, spacing), 0);
    prop_assert_eq!(nodes, original);
    Ok(())
}

/// After fitting, every member lies inside its container.
fn check_fit_contains_members(nodes: Vec<Node>) -> Result<(), TestCaseError> {
    let mut nodes = nodes;
    let mut container = Container::new("group", "Group", ContainerType::Group);
    for (i, node) in nodes.iter_mut().enumerate() {
        // half listed as children, half only pointing back
        if i % 2 == 0 {
            container.children.push(node.id.clone());
        } else {
            node.container_id = Some("group".to_string());
        }
    }
    let mut containers = vec![container];

    fit_containers(&nodes, &mut containers);

    for node in &nodes {
        prop_assert!(containers[0].encloses(node), "{} escapes", node.id);
    }
    Ok(())
}

/// Normalization leaves nothing negative and keeps relative offsets.
fn check_normalize_is_non_negative(nodes: Vec<Node>) -> Result<(), TestCaseError> {
    let mut nodes = nodes;
    let before: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
    let mut containers = vec![
        Container::new("c", "C", ContainerType::Vpc).with_bounds(-700.0, 20.0, 100.0, 100.0),
    ];

    let (dx, dy) = normalize_origin(&mut nodes, &mut containers);

    prop_assert!(dx >= 0.0 && dy >= 0.0);
    prop_assert!(containers[0].x >= 0.0 && containers[0].y >= 0.0);
    for (node, (x, y)) in nodes.iter().zip(before) {
        prop_assert!(node.x >= 0.0 && node.y >= 0.0);
        prop_assert!((node.x - (x + dx)).abs() < 1e-9);
        prop_assert!((node.y - (y + dy)).abs() < 1e-9);
    }
    Ok(())
}

/// Every algorithm yields non-negative coordinates and fitted containers.
fn check_generated_layout_is_well_formed(
    prompt: &str,
    algorithm: LayoutAlgorithm,
) -> Result<(), TestCaseError> {
    let generated = Orchestrator::new().generate_with(prompt, Some(algorithm));
    let diagram = &generated.diagram;

    prop_assert_eq!(generated.config.algorithm, algorithm);
    prop_assert!(diagram.validate().is_ok(), "{:?}", diagram.violations());
    for node in &diagram.nodes {
        prop_assert!(node.x >= 0.0 && node.y >= 0.0, "{} at ({}, {})", node.id, node.x, node.y);
    }
    for container in diagram.container_list() {
        prop_assert!(container.x >= 0.0 && container.y >= 0.0);
        for node in diagram.nodes.iter().filter(|n| n.container_id.as_deref() == Some(&container.id)) {
            prop_assert!(container.encloses(node), "{} escapes {}", node.id, container.id);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn isolated_pair_ends_at_threshold(
        spacing in spacing_strategy(),
        angle in 0.0f64..TAU,
        fraction in 0.05f64..0.95,
    ) {
        check_isolated_pair_ends_at_threshold(spacing, angle, fraction)?;
    }

    #[test]
    fn distant_pair_is_untouched(spacing in spacing_strategy(), extra in 0.0f64..500.0) {
        check_distant_pair_is_untouched(spacing, extra)?;
    }

    #[test]
    fn fit_contains_members(nodes in nodes_strategy()) {
        check_fit_contains_members(nodes)?;
    }

    #[test]
    fn normalize_is_non_negative(nodes in nodes_strategy()) {
        check_normalize_is_non_negative(nodes)?;
    }

    #[test]
    fn generated_layout_is_well_formed(prompt in prompt_strategy(), algorithm in algorithm_strategy()) {
        check_generated_layout_is_well_formed(prompt, algorithm)?;
    }
}

#[test]
fn test_coincident_nodes_separate_horizontally() {
    let mut nodes = vec![
        Node::new("a", "A", IconType::Server),
        Node::new("b", "B", IconType::Server),
    ];
    avoid_collisions(&mut nodes, 100.0);

    assert_eq!(nodes[0].y, nodes[1].y);
    assert!((nodes[1].x - nodes[0].x - 70.0).abs() < 1e-9);
}

#[test]
fn test_collinear_cluster_gets_one_sweep() {
    // centers 30 apart on one row, threshold 70
    let mut nodes = vec![
        Node::new("a", "A", IconType::Server),
        Node::new("b", "B", IconType::Server).at(30.0, 0.0),
        Node::new("c", "C", IconType::Server).at(60.0, 0.0),
    ];

    let adjusted = avoid_collisions(&mut nodes, 100.0);

    // (a, b) pushed by 20 each, (a, c) already clear, (b, c) pushed by 30 each
    assert_eq!(adjusted, 2);
    let xs: Vec<f64> = nodes.iter().map(|n| n.x).collect();
    assert_eq!(xs, vec![-20.0, 20.0, 90.0]);
    assert!(nodes.iter().all(|n| n.y == 0.0));

    // the second push undoes part of the first
    assert_eq!(distance(&nodes[0], &nodes[1]), 40.0);
    assert!(distance(&nodes[0], &nodes[1]) < COLLISION_FACTOR * 100.0);
    assert_eq!(distance(&nodes[1], &nodes[2]), 70.0);
}

#[test]
fn test_organic_radius_grows_with_node_count() {
    assert_eq!(OrganicPlacement::radius(3), 200.0);
    assert_eq!(OrganicPlacement::radius(20), 300.0);
}

#[test]
fn test_empty_container_keeps_its_box() {
    let mut containers =
        vec![Container::new("c", "C", ContainerType::Tier).with_bounds(10.0, 20.0, 30.0, 40.0)];
    fit_containers(&[], &mut containers);
    assert_eq!(
        (containers[0].x, containers[0].y, containers[0].width, containers[0].height),
        (10.0, 20.0, 30.0, 40.0)
    );
}
