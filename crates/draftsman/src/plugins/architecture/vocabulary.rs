//! Keyword tables and word-bounded matching
//!
//! Every table is matched against lowercased text. A match only counts when
//! it is not glued to another letter or digit on either side.

use crate::core::{ArchitecturePattern, ContainerType, Direction, IconType};

use super::RelationshipKind;

/// A phrase that names a known architecture component
#[derive(Debug, Clone, Copy)]
pub struct EntityTerm {
    pub phrase: &'static str,
    pub name: &'static str,
    pub icon: IconType,
}

const fn term(phrase: &'static str, name: &'static str, icon: IconType) -> EntityTerm {
    EntityTerm { phrase, name, icon }
}

pub const ENTITY_TERMS: &[EntityTerm] = &[
    term("user", "User", IconType::User),
    term("users", "User", IconType::User),
    term("end user", "User", IconType::User),
    term("customer", "Customer", IconType::User),
    term("customers", "Customer", IconType::User),
    term("client", "Client", IconType::Client),
    term("clients", "Client", IconType::Client),
    term("browser", "Browser", IconType::Browser),
    term("web browser", "Browser", IconType::Browser),
    term("frontend", "Frontend", IconType::Client),
    term("front-end", "Frontend", IconType::Client),
    term("front end", "Frontend", IconType::Client),
    term("web app", "Web App", IconType::Client),
    term("web application", "Web App", IconType::Client),
    term("mobile app", "Mobile App", IconType::Mobile),
    term("mobile", "Mobile App", IconType::Mobile),
    term("api gateway", "API Gateway", IconType::Gateway),
    term("gateway", "Gateway", IconType::Gateway),
    term("api", "API", IconType::Api),
    term("apis", "API", IconType::Api),
    term("rest api", "API", IconType::Api),
    term("backend", "Backend", IconType::Server),
    term("back-end", "Backend", IconType::Server),
    term("web server", "Web Server", IconType::Server),
    term("app server", "App Server", IconType::Server),
    term("application server", "App Server", IconType::Server),
    term("server", "Server", IconType::Server),
    term("servers", "Server", IconType::Server),
    term("load balancer", "Load Balancer", IconType::LoadBalancer),
    term("load balancers", "Load Balancer", IconType::LoadBalancer),
    term("database", "Database", IconType::Database),
    term("databases", "Database", IconType::Database),
    term("db", "Database", IconType::Database),
    term("postgres", "PostgreSQL", IconType::Database),
    term("postgresql", "PostgreSQL", IconType::Database),
    term("mysql", "MySQL", IconType::Database),
    term("mongodb", "MongoDB", IconType::Database),
    term("dynamodb", "DynamoDB", IconType::Database),
    term("data warehouse", "Data Warehouse", IconType::Database),
    term("redis", "Redis", IconType::Cache),
    term("memcached", "Memcached", IconType::Cache),
    term("cache", "Cache", IconType::Cache),
    term("message queue", "Message Queue", IconType::Queue),
    term("queue", "Queue", IconType::Queue),
    term("kafka", "Kafka", IconType::Queue),
    term("rabbitmq", "RabbitMQ", IconType::Queue),
    term("sqs", "SQS", IconType::Queue),
    term("message broker", "Message Broker", IconType::Queue),
    term("event bus", "Event Bus", IconType::Queue),
    term("s3", "S3", IconType::Storage),
    term("object storage", "Object Storage", IconType::Storage),
    term("blob storage", "Blob Storage", IconType::Storage),
    term("storage", "Storage", IconType::Storage),
    term("cdn", "CDN", IconType::Cdn),
    term("dns", "DNS", IconType::Dns),
    term("firewall", "Firewall", IconType::Firewall),
    term("waf", "WAF", IconType::Firewall),
    term("lambda", "Lambda", IconType::Function),
    term("serverless function", "Function", IconType::Function),
    term("docker", "Docker", IconType::Container),
    term("kubernetes", "Kubernetes", IconType::Kubernetes),
    term("k8s", "Kubernetes", IconType::Kubernetes),
    term("monitoring", "Monitoring", IconType::Monitoring),
    term("prometheus", "Prometheus", IconType::Monitoring),
    term("grafana", "Grafana", IconType::Monitoring),
    term("auth", "Auth", IconType::Auth),
    term("authentication", "Auth", IconType::Auth),
    term("identity provider", "Identity Provider", IconType::Auth),
    term("elasticsearch", "Elasticsearch", IconType::Search),
    term("search", "Search", IconType::Search),
    term("analytics", "Analytics", IconType::Analytics),
    term("email", "Email", IconType::Email),
    term("payment", "Payment", IconType::Payment),
    term("payments", "Payment", IconType::Payment),
    term("stripe", "Stripe", IconType::Payment),
    term("llm", "LLM", IconType::Llm),
    term("language model", "LLM", IconType::Llm),
    term("gpt", "LLM", IconType::Llm),
    term("vector database", "Vector DB", IconType::VectorDb),
    term("vector db", "Vector DB", IconType::VectorDb),
    term("vector store", "Vector DB", IconType::VectorDb),
    term("embedding model", "Embeddings", IconType::Embedding),
    term("embedding", "Embeddings", IconType::Embedding),
    term("embeddings", "Embeddings", IconType::Embedding),
    term("retriever", "Retriever", IconType::Service),
    term("vpn", "VPN", IconType::Network),
];

/// Nouns that turn the preceding word into a named component
/// ("order service", "billing engine")
pub const SYSTEM_NOUNS: &[&str] = &[
    "service", "server", "system", "engine", "store", "worker", "manager", "processor", "handler",
];

/// Words that never name a component on their own
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "which", "each", "every", "our", "their", "its", "my",
    "your", "one", "two", "three", "some", "any", "other", "another", "main", "new", "and", "or",
    "to", "from", "with", "of", "in", "on", "for", "by", "is", "are", "then", "via", "as",
];

/// A phrase between two mentions that implies a relationship
#[derive(Debug, Clone, Copy)]
pub struct RelationTemplate {
    pub phrase: &'static str,
    pub kind: RelationshipKind,
    pub strength: f64,
}

const fn relation(phrase: &'static str, kind: RelationshipKind) -> RelationTemplate {
    RelationTemplate {
        phrase,
        kind,
        strength: kind.strength(),
    }
}

/// Tried in order; longer phrases precede their prefixes
pub const RELATION_TEMPLATES: &[RelationTemplate] = &[
    relation("sends data to", RelationshipKind::DataFlow),
    relation("sends requests to", RelationshipKind::DataFlow),
    relation("sends events to", RelationshipKind::DataFlow),
    relation("sends to", RelationshipKind::DataFlow),
    relation("writes to", RelationshipKind::DataFlow),
    relation("reads from", RelationshipKind::DataFlow),
    relation("streams to", RelationshipKind::DataFlow),
    relation("pushes to", RelationshipKind::DataFlow),
    relation("forwards to", RelationshipKind::DataFlow),
    relation("routes to", RelationshipKind::DataFlow),
    relation("loads into", RelationshipKind::DataFlow),
    relation("feeds", RelationshipKind::DataFlow),
    relation("connects to", RelationshipKind::Communication),
    relation("talks to", RelationshipKind::Communication),
    relation("communicates with", RelationshipKind::Communication),
    relation("publishes to", RelationshipKind::Communication),
    relation("subscribes to", RelationshipKind::Communication),
    relation("notifies", RelationshipKind::Communication),
    relation("calls", RelationshipKind::Communication),
    relation("depends on", RelationshipKind::Dependency),
    relation("relies on", RelationshipKind::Dependency),
    relation("queries", RelationshipKind::Dependency),
    relation("uses", RelationshipKind::Dependency),
    relation("contains", RelationshipKind::Containment),
    relation("hosts", RelationshipKind::Containment),
    relation("includes", RelationshipKind::Containment),
    relation("runs", RelationshipKind::Containment),
];

/// Container vocabulary
pub const CONTAINER_TERMS: &[(&str, ContainerType)] = &[
    ("region", ContainerType::Region),
    ("regions", ContainerType::Region),
    ("availability zone", ContainerType::AvailabilityZone),
    ("availability zones", ContainerType::AvailabilityZone),
    ("az", ContainerType::AvailabilityZone),
    ("tier", ContainerType::Tier),
    ("tiers", ContainerType::Tier),
    ("layer", ContainerType::Tier),
    ("layers", ContainerType::Tier),
    ("vpc", ContainerType::Vpc),
    ("subnet", ContainerType::Subnet),
    ("subnets", ContainerType::Subnet),
    ("security group", ContainerType::SecurityGroup),
    ("security groups", ContainerType::SecurityGroup),
    ("group", ContainerType::Group),
    ("groups", ContainerType::Group),
];

/// Words describing layers; counted separately for deep-layering detection
pub const LAYER_TERMS: &[&str] = &["layer", "layers", "tier", "tiers"];

/// Words indicating one grouping sits inside another
pub const NESTING_INDICATORS: &[&str] =
    &["inside", "within", "nested", "contains", "across", "in each"];

/// Words indicating a large deployment
pub const SCALE_TERMS: &[&str] = &[
    "million",
    "millions",
    "thousands",
    "global",
    "worldwide",
    "multi-region",
    "high availability",
    "scalable",
    "petabyte",
    "enterprise",
    "auto-scaling",
];

/// Explicit flow phrases
pub const FLOW_TERMS: &[(&str, Direction)] = &[
    ("left to right", Direction::LeftRight),
    ("left-to-right", Direction::LeftRight),
    ("horizontal", Direction::LeftRight),
    ("horizontally", Direction::LeftRight),
    ("right to left", Direction::RightLeft),
    ("right-to-left", Direction::RightLeft),
    ("top down", Direction::TopDown),
    ("top-down", Direction::TopDown),
    ("top to bottom", Direction::TopDown),
    ("vertical", Direction::TopDown),
    ("vertically", Direction::TopDown),
    ("bottom up", Direction::BottomUp),
    ("bottom-up", Direction::BottomUp),
    ("bottom to top", Direction::BottomUp),
];

/// Weighted keywords for one pattern
pub fn pattern_keywords(pattern: ArchitecturePattern) -> &'static [(&'static str, f64)] {
    match pattern {
        ArchitecturePattern::ClientServer => &[
            ("client-server", 4.0),
            ("client", 2.0),
            ("clients", 2.0),
            ("server", 2.0),
            ("request", 1.0),
            ("requests", 1.0),
            ("response", 1.0),
            ("responses", 1.0),
            ("frontend", 1.0),
            ("backend", 1.0),
            ("browser", 1.0),
            ("user", 1.0),
            ("users", 1.0),
        ],
        ArchitecturePattern::Layered => &[
            ("layered", 4.0),
            ("layer", 2.0),
            ("layers", 2.0),
            ("presentation", 1.0),
            ("business logic", 2.0),
            ("data access", 2.0),
            ("persistence", 1.0),
        ],
        ArchitecturePattern::Microservices => &[
            ("microservices", 4.0),
            ("microservice", 3.0),
            ("service mesh", 3.0),
            ("api gateway", 2.0),
            ("kubernetes", 2.0),
            ("k8s", 2.0),
            ("docker", 2.0),
            ("container", 1.0),
            ("containers", 1.0),
            ("service", 1.0),
            ("services", 1.0),
        ],
        ArchitecturePattern::EventDriven => &[
            ("event-driven", 4.0),
            ("event driven", 4.0),
            ("event", 1.0),
            ("events", 2.0),
            ("publish", 2.0),
            ("publishes", 2.0),
            ("subscribe", 2.0),
            ("subscribes", 2.0),
            ("pub/sub", 3.0),
            ("kafka", 2.0),
            ("message broker", 2.0),
            ("event bus", 3.0),
            ("queue", 1.0),
            ("consumer", 1.0),
            ("consumers", 1.0),
            ("producer", 1.0),
            ("producers", 1.0),
        ],
        ArchitecturePattern::NTier => &[
            ("n-tier", 4.0),
            ("three-tier", 4.0),
            ("3-tier", 4.0),
            ("multi-tier", 4.0),
            ("two-tier", 3.0),
            ("tier", 2.0),
            ("tiers", 2.0),
        ],
        ArchitecturePattern::HubSpoke => &[
            ("hub-and-spoke", 4.0),
            ("hub and spoke", 4.0),
            ("hub", 3.0),
            ("spoke", 3.0),
            ("spokes", 3.0),
            ("central", 1.0),
            ("centralized", 1.0),
        ],
        ArchitecturePattern::Distributed => &[
            ("distributed", 3.0),
            ("peer-to-peer", 3.0),
            ("p2p", 3.0),
            ("nodes", 1.0),
            ("replication", 2.0),
            ("replicated", 2.0),
            ("consensus", 2.0),
            ("sharded", 2.0),
            ("partition", 1.0),
            ("partitions", 1.0),
            ("cluster", 1.0),
        ],
        ArchitecturePattern::Enterprise => &[
            ("enterprise", 4.0),
            ("erp", 3.0),
            ("crm", 2.0),
            ("esb", 3.0),
            ("service bus", 3.0),
            ("legacy", 2.0),
            ("mainframe", 2.0),
            ("compliance", 1.0),
            ("governance", 1.0),
        ],
        ArchitecturePattern::Hybrid => &[
            ("hybrid", 4.0),
            ("hybrid cloud", 3.0),
            ("on-premise", 3.0),
            ("on-premises", 3.0),
            ("on-prem", 3.0),
            ("multi-cloud", 3.0),
            ("cloud", 1.0),
            ("data center", 2.0),
            ("datacenter", 2.0),
        ],
        ArchitecturePattern::RagLlm => &[
            ("rag", 4.0),
            ("retrieval", 3.0),
            ("retrieval-augmented", 4.0),
            ("llm", 3.0),
            ("embedding", 2.0),
            ("embeddings", 2.0),
            ("vector", 2.0),
            ("vector database", 3.0),
            ("prompt", 1.0),
            ("retriever", 2.0),
            ("chunks", 1.0),
        ],
        ArchitecturePattern::Pipeline => &[
            ("pipeline", 4.0),
            ("pipelines", 4.0),
            ("etl", 3.0),
            ("ingest", 2.0),
            ("ingestion", 2.0),
            ("transform", 2.0),
            ("stage", 1.0),
            ("stages", 1.0),
            ("batch", 1.0),
            ("stream", 1.0),
            ("streaming", 1.0),
        ],
        ArchitecturePattern::NeuralNetwork => &[
            ("neural network", 5.0),
            ("neural", 3.0),
            ("neuron", 2.0),
            ("neurons", 2.0),
            ("hidden layer", 3.0),
            ("input layer", 3.0),
            ("output layer", 3.0),
            ("perceptron", 3.0),
            ("activation", 1.0),
            ("weights", 1.0),
        ],
        ArchitecturePattern::General => &[],
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Byte offsets of every word-bounded occurrence of `phrase` in `text`
pub fn find_matches(text: &str, phrase: &str) -> Vec<usize> {
    if phrase.is_empty() {
        return Vec::new();
    }
    text.match_indices(phrase)
        .filter(|(start, _)| {
            let before = text[..*start].chars().next_back();
            let after = text[start + phrase.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .map(|(start, _)| start)
        .collect()
}

/// Number of word-bounded occurrences of `phrase` in `text`
pub fn count_matches(text: &str, phrase: &str) -> usize {
    find_matches(text, phrase).len()
}

/// Returns true if `phrase` occurs word-bounded anywhere in `text`
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    !find_matches(text, phrase).is_empty()
}

/// Returns true if the word is itself a vocabulary phrase
pub fn is_vocabulary_word(word: &str) -> bool {
    ENTITY_TERMS.iter().any(|t| t.phrase == word)
}
