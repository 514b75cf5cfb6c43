//! Statement shapes of the declarative diagram language
//!
//! ```text
//! node <id>: "<label>" icon=<type> x=<n> y=<n> [width=<n>] [height=<n>]
//! <id> -> <id>[: "<label>"]
//! <id> <-> <id>[: "<label>"]
//! container <id>: "<label>" type=<type> x=<n> y=<n> width=<n> height=<n> {
//!     node ...
//! }
//! ```
//!
//! Lines starting with `//` are comments.

/// A `node` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecl {
    pub id: String,
    pub label: String,
    /// Icon name as written; resolved after parsing
    pub icon: String,
    pub x: i64,
    pub y: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A connection line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDecl {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub bidirectional: bool,
}

/// A `container` header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDecl {
    pub id: String,
    pub label: String,
    /// Container type as written; resolved after parsing
    pub container_type: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// `{ }` on the header line itself
    pub closed: bool,
}

/// One parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Node(NodeDecl),
    Connection(ConnectionDecl),
    ContainerOpen(ContainerDecl),
    ContainerClose,
}

/// Statement kind guessed from a line's leading token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Node,
    Connection,
    Container,
    Close,
    Unknown,
}

impl StatementKind {
    /// Classify a trimmed, non-comment line
    ///
    /// `node` and `container` are valid ids, so a keyword followed by an
    /// arrow starts a connection.
    pub fn classify(line: &str) -> Self {
        let keyword = |word: &str| {
            line.strip_prefix(word).is_some_and(|rest| {
                let next = rest.trim_start();
                rest.starts_with([' ', '\t'])
                    && !next.starts_with("->")
                    && !next.starts_with("<->")
            })
        };
        if keyword("node") {
            StatementKind::Node
        } else if keyword("container") {
            StatementKind::Container
        } else if line.starts_with('}') {
            StatementKind::Close
        } else if line.contains("->") {
            StatementKind::Connection
        } else {
            StatementKind::Unknown
        }
    }

    /// Message used when a line of this kind does not match its shape
    pub fn error_message(&self) -> &'static str {
        match self {
            StatementKind::Node => "Invalid node declaration",
            StatementKind::Connection => "Invalid connection",
            StatementKind::Container => "Invalid container declaration",
            StatementKind::Close => "Unexpected text after closing brace",
            StatementKind::Unknown => "Unrecognized statement",
        }
    }
}
