//! Core type definitions for diagram processing
//!
//! This module contains the fundamental types shared by every stage of
//! Draftsman: nodes, containers, links, the diagram itself, and the closed
//! enumerations (icons, container types, patterns, directions) they use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default node width used when a declaration omits `width=`
pub const DEFAULT_NODE_WIDTH: f64 = 120.0;

/// Default node height used when a declaration omits `height=`
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

/// Link color that counts as "not explicitly colored"
pub const DEFAULT_LINK_COLOR: &str = "#6b7280";

/// Icon (category) of a node
///
/// Resolved case-insensitively from the declarative language, with a few
/// accepted aliases (`lb`, `db`, `k8s`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum IconType {
    User,
    Client,
    Browser,
    Mobile,
    Server,
    Api,
    Gateway,
    LoadBalancer,
    Database,
    Cache,
    Queue,
    Storage,
    Cdn,
    Dns,
    Firewall,
    Function,
    Container,
    Kubernetes,
    Monitoring,
    Auth,
    Search,
    Analytics,
    Email,
    Payment,
    Llm,
    VectorDb,
    Embedding,
    #[default]
    Service,
    Network,
}

impl IconType {
    /// Every icon, in table order
    pub const ALL: [IconType; 29] = [
        IconType::User,
        IconType::Client,
        IconType::Browser,
        IconType::Mobile,
        IconType::Server,
        IconType::Api,
        IconType::Gateway,
        IconType::LoadBalancer,
        IconType::Database,
        IconType::Cache,
        IconType::Queue,
        IconType::Storage,
        IconType::Cdn,
        IconType::Dns,
        IconType::Firewall,
        IconType::Function,
        IconType::Container,
        IconType::Kubernetes,
        IconType::Monitoring,
        IconType::Auth,
        IconType::Search,
        IconType::Analytics,
        IconType::Email,
        IconType::Payment,
        IconType::Llm,
        IconType::VectorDb,
        IconType::Embedding,
        IconType::Service,
        IconType::Network,
    ];

    /// Canonical name as written in diagram source
    pub fn name(&self) -> &'static str {
        match self {
            IconType::User => "user",
            IconType::Client => "client",
            IconType::Browser => "browser",
            IconType::Mobile => "mobile",
            IconType::Server => "server",
            IconType::Api => "api",
            IconType::Gateway => "gateway",
            IconType::LoadBalancer => "load-balancer",
            IconType::Database => "database",
            IconType::Cache => "cache",
            IconType::Queue => "queue",
            IconType::Storage => "storage",
            IconType::Cdn => "cdn",
            IconType::Dns => "dns",
            IconType::Firewall => "firewall",
            IconType::Function => "function",
            IconType::Container => "container",
            IconType::Kubernetes => "kubernetes",
            IconType::Monitoring => "monitoring",
            IconType::Auth => "auth",
            IconType::Search => "search",
            IconType::Analytics => "analytics",
            IconType::Email => "email",
            IconType::Payment => "payment",
            IconType::Llm => "llm",
            IconType::VectorDb => "vector-db",
            IconType::Embedding => "embedding",
            IconType::Service => "service",
            IconType::Network => "network",
        }
    }

    /// Resolve an icon name case-insensitively, accepting aliases
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "loadbalancer" | "lb" => Some(IconType::LoadBalancer),
            "db" => Some(IconType::Database),
            "lambda" => Some(IconType::Function),
            "docker" => Some(IconType::Container),
            "k8s" => Some(IconType::Kubernetes),
            "vectordb" => Some(IconType::VectorDb),
            _ => None,
        };
        alias.or_else(|| Self::ALL.iter().copied().find(|icon| icon.name() == lower))
    }
}

impl fmt::Display for IconType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of grouping box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerType {
    Region,
    AvailabilityZone,
    Tier,
    Vpc,
    Subnet,
    SecurityGroup,
    Group,
}

impl ContainerType {
    /// Every container type, in declaration order
    pub const ALL: [ContainerType; 7] = [
        ContainerType::Region,
        ContainerType::AvailabilityZone,
        ContainerType::Tier,
        ContainerType::Vpc,
        ContainerType::Subnet,
        ContainerType::SecurityGroup,
        ContainerType::Group,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContainerType::Region => "region",
            ContainerType::AvailabilityZone => "availability-zone",
            ContainerType::Tier => "tier",
            ContainerType::Vpc => "vpc",
            ContainerType::Subnet => "subnet",
            ContainerType::SecurityGroup => "security-group",
            ContainerType::Group => "group",
        }
    }

    /// Resolve a container type name case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|t| t.name() == lower)
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classified architectural style of a described system
///
/// Declaration order doubles as the tie-break order when two patterns
/// score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitecturePattern {
    ClientServer,
    Layered,
    Microservices,
    EventDriven,
    NTier,
    HubSpoke,
    Distributed,
    Enterprise,
    Hybrid,
    RagLlm,
    Pipeline,
    NeuralNetwork,
    #[default]
    General,
}

impl ArchitecturePattern {
    /// Every pattern, in tie-break order
    pub const ALL: [ArchitecturePattern; 13] = [
        ArchitecturePattern::ClientServer,
        ArchitecturePattern::Layered,
        ArchitecturePattern::Microservices,
        ArchitecturePattern::EventDriven,
        ArchitecturePattern::NTier,
        ArchitecturePattern::HubSpoke,
        ArchitecturePattern::Distributed,
        ArchitecturePattern::Enterprise,
        ArchitecturePattern::Hybrid,
        ArchitecturePattern::RagLlm,
        ArchitecturePattern::Pipeline,
        ArchitecturePattern::NeuralNetwork,
        ArchitecturePattern::General,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArchitecturePattern::ClientServer => "client-server",
            ArchitecturePattern::Layered => "layered",
            ArchitecturePattern::Microservices => "microservices",
            ArchitecturePattern::EventDriven => "event-driven",
            ArchitecturePattern::NTier => "n-tier",
            ArchitecturePattern::HubSpoke => "hub-spoke",
            ArchitecturePattern::Distributed => "distributed",
            ArchitecturePattern::Enterprise => "enterprise",
            ArchitecturePattern::Hybrid => "hybrid",
            ArchitecturePattern::RagLlm => "rag-llm",
            ArchitecturePattern::Pipeline => "pipeline",
            ArchitecturePattern::NeuralNetwork => "neural-network",
            ArchitecturePattern::General => "general",
        }
    }

    /// Human-readable title, used for generated diagram titles
    pub fn title(&self) -> &'static str {
        match self {
            ArchitecturePattern::ClientServer => "Client-Server",
            ArchitecturePattern::Layered => "Layered",
            ArchitecturePattern::Microservices => "Microservices",
            ArchitecturePattern::EventDriven => "Event-Driven",
            ArchitecturePattern::NTier => "N-Tier",
            ArchitecturePattern::HubSpoke => "Hub-and-Spoke",
            ArchitecturePattern::Distributed => "Distributed",
            ArchitecturePattern::Enterprise => "Enterprise",
            ArchitecturePattern::Hybrid => "Hybrid Cloud",
            ArchitecturePattern::RagLlm => "RAG / LLM",
            ArchitecturePattern::Pipeline => "Pipeline",
            ArchitecturePattern::NeuralNetwork => "Neural Network",
            ArchitecturePattern::General => "System",
        }
    }

    /// Direction the pattern naturally reads in when the text gives no hint
    pub fn natural_flow(&self) -> Direction {
        match self {
            ArchitecturePattern::ClientServer
            | ArchitecturePattern::EventDriven
            | ArchitecturePattern::Hybrid
            | ArchitecturePattern::RagLlm
            | ArchitecturePattern::Pipeline
            | ArchitecturePattern::NeuralNetwork => Direction::LeftRight,
            ArchitecturePattern::Layered
            | ArchitecturePattern::Microservices
            | ArchitecturePattern::NTier
            | ArchitecturePattern::HubSpoke
            | ArchitecturePattern::Distributed
            | ArchitecturePattern::Enterprise
            | ArchitecturePattern::General => Direction::TopDown,
        }
    }
}

impl fmt::Display for ArchitecturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flow direction for the diagram layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Top to bottom (TD or TB)
    #[default]
    TopDown,
    /// Left to right (LR)
    LeftRight,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomUp,
}

impl Direction {
    /// Returns true if this is a vertical layout (TD or BT)
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::TopDown | Direction::BottomUp)
    }

    /// Returns true if this is a horizontal layout (LR or RL)
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }

    /// Returns true if the flow is reversed (RL or BT)
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::RightLeft | Direction::BottomUp)
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Parse direction from its short form (TD, TB, LR, RL, BT)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TD" | "TB" => Ok(Direction::TopDown),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            "BT" => Ok(Direction::BottomUp),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopDown => write!(f, "TD"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
            Direction::BottomUp => write!(f, "BT"),
        }
    }
}

/// Stroke pattern of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineStyle::Solid => write!(f, "solid"),
            LineStyle::Dashed => write!(f, "dashed"),
            LineStyle::Dotted => write!(f, "dotted"),
        }
    }
}

/// Optional presentation attributes of a node
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
}

impl NodeStyle {
    pub fn is_empty(&self) -> bool {
        self.shape.is_none() && self.fill.is_none() && self.stroke.is_none()
    }
}

/// A positioned diagram entity representing one architecture component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for the node
    pub id: String,
    /// Display label
    pub label: String,
    /// Category tag, rendered as an icon
    #[serde(rename = "type")]
    pub icon: IconType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "NodeStyle::is_empty")]
    pub style: NodeStyle,
    /// Owning container, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

impl Node {
    /// Create a node at the origin with the default size
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: IconType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon,
            x: 0.0,
            y: 0.0,
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
            style: NodeStyle::default(),
            container_id: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn in_container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    /// Center point of the node's box
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A grouping box that visually encloses a set of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub container_type: ContainerType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Child node ids, in declaration order
    #[serde(default)]
    pub children: Vec<String>,
}

impl Container {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        container_type: ContainerType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            container_type,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            children: Vec::new(),
        }
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Returns true if the node's box lies entirely inside this container
    pub fn encloses(&self, node: &Node) -> bool {
        const EPSILON: f64 = 1e-6;
        node.x >= self.x - EPSILON
            && node.y >= self.y - EPSILON
            && node.right() <= self.x + self.width + EPSILON
            && node.bottom() <= self.y + self.height + EPSILON
    }
}

/// Presentation attributes of a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStyle {
    pub line: LineStyle,
    pub thickness: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            line: LineStyle::Solid,
            thickness: 2,
            color: None,
        }
    }
}

/// A directed or bidirectional connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub style: LinkStyle,
}

impl Link {
    /// Create a new directed link without a label
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            bidirectional: false,
            style: LinkStyle::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    pub fn with_style(mut self, style: LinkStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns true if the link carries an explicit, non-default color
    pub fn is_colored(&self) -> bool {
        self.style
            .color
            .as_deref()
            .is_some_and(|color| !color.eq_ignore_ascii_case(DEFAULT_LINK_COLOR))
    }

    /// Returns true if the link touches the given node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A complete diagram: nodes, links and optional containers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagram {
    pub title: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<Container>>,
}

impl Diagram {
    /// Create an empty diagram with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.container_list().iter().find(|c| c.id == id)
    }

    /// Containers as a slice (empty when none were declared)
    pub fn container_list(&self) -> &[Container] {
        self.containers.as_deref().unwrap_or(&[])
    }

    /// Append a container, creating the container list on first use
    pub fn add_container(&mut self, container: Container) {
        self.containers.get_or_insert_with(Vec::new).push(container);
    }

    /// Every violation of the diagram's referential invariants
    ///
    /// Checks unique node ids, link endpoints and container children.
    pub fn violations(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut violations = Vec::new();

        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                violations.push(format!("duplicate node id '{}'", node.id));
            }
        }

        for link in &self.links {
            for endpoint in [&link.source, &link.target] {
                if !seen.contains(endpoint.as_str()) {
                    violations.push(format!(
                        "link '{}' references unknown node '{}'",
                        link.id, endpoint
                    ));
                }
            }
        }

        for container in self.container_list() {
            for child in &container.children {
                if !seen.contains(child.as_str()) {
                    violations.push(format!(
                        "container '{}' lists unknown child '{}'",
                        container.id, child
                    ));
                }
            }
        }

        violations
    }

    /// Check the referential invariants, bundling every violation found
    pub fn validate(&self) -> Result<(), super::DiagramError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(super::DiagramError::validation_error(violations.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_lookup_is_case_insensitive() {
        assert_eq!(IconType::from_name("Database"), Some(IconType::Database));
        assert_eq!(IconType::from_name("SERVER"), Some(IconType::Server));
        assert_eq!(IconType::from_name("vector-db"), Some(IconType::VectorDb));
        assert_eq!(IconType::from_name("spaceship"), None);
    }

    #[test]
    fn test_icon_aliases() {
        assert_eq!(IconType::from_name("lb"), Some(IconType::LoadBalancer));
        assert_eq!(IconType::from_name("LoadBalancer"), Some(IconType::LoadBalancer));
        assert_eq!(IconType::from_name("k8s"), Some(IconType::Kubernetes));
        assert_eq!(IconType::from_name("db"), Some(IconType::Database));
    }

    #[test]
    fn test_every_icon_name_round_trips() {
        for icon in IconType::ALL {
            assert_eq!(IconType::from_name(icon.name()), Some(icon));
        }
    }

    #[test]
    fn test_container_type_names() {
        assert_eq!(
            ContainerType::from_name("availability-zone"),
            Some(ContainerType::AvailabilityZone)
        );
        assert_eq!(ContainerType::from_name("VPC"), Some(ContainerType::Vpc));
        assert_eq!(ContainerType::from_name("datacenter"), None);
        for ty in ContainerType::ALL {
            assert_eq!(ContainerType::from_name(&ty.to_string()), Some(ty));
        }
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("TD".parse::<Direction>(), Ok(Direction::TopDown));
        assert_eq!("tb".parse::<Direction>(), Ok(Direction::TopDown));
        assert_eq!("LR".parse::<Direction>(), Ok(Direction::LeftRight));
        assert_eq!("RL".parse::<Direction>(), Ok(Direction::RightLeft));
        assert_eq!("BT".parse::<Direction>(), Ok(Direction::BottomUp));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_properties() {
        assert!(Direction::TopDown.is_vertical());
        assert!(Direction::LeftRight.is_horizontal());
        assert!(Direction::BottomUp.is_reversed());
        assert!(!Direction::LeftRight.is_reversed());
    }

    #[test]
    fn test_node_geometry() {
        let node = Node::new("a", "A", IconType::Server).at(10.0, 20.0);
        assert_eq!(node.center(), (70.0, 70.0));
        assert_eq!(node.right(), 130.0);
        assert_eq!(node.bottom(), 120.0);
    }

    #[test]
    fn test_link_coloring_state() {
        let link = Link::new("l1", "a", "b");
        assert!(!link.is_colored());

        let mut gray = link.clone();
        gray.style.color = Some(DEFAULT_LINK_COLOR.to_string());
        assert!(!gray.is_colored());

        let mut red = link;
        red.style.color = Some("#ff0000".to_string());
        assert!(red.is_colored());
    }

    #[test]
    fn test_diagram_violations() {
        let mut diagram = Diagram::new("Broken");
        diagram.nodes.push(Node::new("a", "A", IconType::Server));
        diagram.nodes.push(Node::new("a", "A again", IconType::Server));
        diagram.links.push(Link::new("l1", "a", "ghost"));
        let mut group = Container::new("g", "G", ContainerType::Group);
        group.children.push("missing".to_string());
        diagram.add_container(group);

        let violations = diagram.violations();
        assert_eq!(violations.len(), 3);
        assert!(diagram.validate().is_err());
    }

    #[test]
    fn test_container_serializes_type_field() {
        let container = Container::new("vpc1", "Main VPC", ContainerType::Vpc);
        let json = serde_json::to_value(&container).unwrap();
        assert_eq!(json["type"], "vpc");
    }

    #[test]
    fn test_diagram_omits_absent_containers() {
        let diagram = Diagram::new("Empty");
        let json = serde_json::to_value(&diagram).unwrap();
        assert!(json.get("containers").is_none());
    }
}
