//! Analysis to diagram construction
//!
//! Turns extracted entities and relationships into unpositioned nodes,
//! links and, when the description talks about groupings, one container per
//! populated tier.

use tracing::{debug, span, Level};

use crate::core::{
    node_size_for_label, Container, ContainerType, Diagram, IconType, LineStyle, Link, LinkStyle,
    Node,
};

use super::{ArchitectureAnalysis, RelationshipKind};

/// Coarse placement band for an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Presentation,
    Application,
    Data,
    Infrastructure,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Presentation,
        Tier::Application,
        Tier::Data,
        Tier::Infrastructure,
    ];

    pub fn of(icon: IconType) -> Self {
        match icon {
            IconType::User
            | IconType::Client
            | IconType::Browser
            | IconType::Mobile
            | IconType::Cdn
            | IconType::Dns => Tier::Presentation,
            IconType::Server
            | IconType::Api
            | IconType::Gateway
            | IconType::LoadBalancer
            | IconType::Function
            | IconType::Service
            | IconType::Auth
            | IconType::Payment
            | IconType::Email
            | IconType::Search
            | IconType::Analytics
            | IconType::Llm
            | IconType::Embedding => Tier::Application,
            IconType::Database
            | IconType::Cache
            | IconType::Queue
            | IconType::Storage
            | IconType::VectorDb => Tier::Data,
            IconType::Firewall
            | IconType::Container
            | IconType::Kubernetes
            | IconType::Monitoring
            | IconType::Network => Tier::Infrastructure,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Tier::Presentation => "presentation",
            Tier::Application => "application",
            Tier::Data => "data",
            Tier::Infrastructure => "infrastructure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Presentation => "Presentation",
            Tier::Application => "Application",
            Tier::Data => "Data",
            Tier::Infrastructure => "Infrastructure",
        }
    }
}

/// Link style for a relationship kind
pub fn link_style(kind: RelationshipKind) -> LinkStyle {
    let (line, thickness) = match kind {
        RelationshipKind::Dependency => (LineStyle::Dashed, 2),
        RelationshipKind::DataFlow => (LineStyle::Solid, 3),
        RelationshipKind::Communication => (LineStyle::Solid, 2),
        RelationshipKind::Containment => (LineStyle::Dotted, 1),
    };
    LinkStyle {
        line,
        thickness,
        color: None,
    }
}

/// Builds unpositioned diagrams from analyses
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramBuilder;

impl DiagramBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Title used for a generated diagram
    pub fn title(analysis: &ArchitectureAnalysis) -> String {
        format!("{} Architecture", analysis.pattern.title())
    }

    pub fn build(&self, analysis: &ArchitectureAnalysis) -> Diagram {
        let build_span = span!(Level::DEBUG, "build_diagram", entities = analysis.entities.len());
        let _enter = build_span.enter();

        let mut diagram = Diagram::new(Self::title(analysis));

        diagram.nodes = analysis
            .entities
            .iter()
            .map(|entity| {
                let (width, height) = node_size_for_label(&entity.name);
                Node::new(&entity.id, &entity.name, entity.icon).with_size(width, height)
            })
            .collect();

        diagram.links = analysis
            .relationships
            .iter()
            .enumerate()
            .map(|(i, rel)| {
                Link::new(format!("link-{}", i + 1), &rel.source, &rel.target)
                    .with_label(&rel.label)
                    .with_style(link_style(rel.kind))
            })
            .collect();

        if analysis.containers.needs_containers() && diagram.nodes.len() >= 2 {
            let container_type = analysis
                .containers
                .dominant_type()
                .unwrap_or(ContainerType::Tier);
            for tier in Tier::ALL {
                let id = format!("tier_{}", tier.slug());
                let mut container = Container::new(&id, tier.label(), container_type);
                for node in diagram.nodes.iter_mut().filter(|n| Tier::of(n.icon) == tier) {
                    node.container_id = Some(id.clone());
                    container.children.push(node.id.clone());
                }
                if !container.children.is_empty() {
                    diagram.add_container(container);
                }
            }
        }

        debug!(
            nodes = diagram.nodes.len(),
            links = diagram.links.len(),
            containers = diagram.container_list().len(),
            "Built diagram"
        );
        diagram
    }
}
