//! Declarative diagram parser
//!
//! Compiles source text line by line into a [`Diagram`]. Every failing line
//! is recorded and compilation carries on, so a single run reports the whole
//! file's problems. Any error at all means no diagram is returned.

use std::collections::HashSet;

use anyhow::{bail, Result};
use tracing::{debug, span, trace, Level};

use crate::core::{
    Container, ContainerType, Database, Diagram, IconType, LineError, Link, Node, ParseFailure,
    Parser, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH,
};

use super::chumsky_parser::parse_statement;
use super::syntax::{ConnectionDecl, ContainerDecl, NodeDecl, Statement, StatementKind};

/// Title given to compiled diagrams when the caller supplies none
pub const DEFAULT_TITLE: &str = "Untitled Diagram";

/// A `{` block that has not been closed yet
struct OpenBlock {
    /// Index into the compiled containers, `None` if the header line failed
    container: Option<usize>,
    line: usize,
    text: String,
}

/// A connection waiting for every node to be declared
struct PendingConnection {
    decl: ConnectionDecl,
    line: usize,
    text: String,
}

/// Accumulates nodes, containers and errors across one source
#[derive(Default)]
struct Compilation {
    nodes: Vec<Node>,
    node_ids: HashSet<String>,
    containers: Vec<Container>,
    stack: Vec<OpenBlock>,
    connections: Vec<PendingConnection>,
    errors: Vec<LineError>,
}

impl Compilation {
    fn error(&mut self, line: usize, message: impl Into<String>, text: &str) {
        self.errors.push(LineError::new(line, message, text));
    }

    fn innermost_container(&self) -> Option<usize> {
        self.stack.last().and_then(|block| block.container)
    }

    fn node(&mut self, decl: NodeDecl, line: usize, text: &str) {
        let Some(icon) = IconType::from_name(&decl.icon) else {
            self.error(line, format!("Unknown icon type: {}", decl.icon), text);
            return;
        };
        if !self.node_ids.insert(decl.id.clone()) {
            self.error(line, format!("Duplicate node id: {}", decl.id), text);
            return;
        }

        let width = decl.width.map_or(DEFAULT_NODE_WIDTH, |w| w as f64);
        let height = decl.height.map_or(DEFAULT_NODE_HEIGHT, |h| h as f64);
        let mut node = Node::new(decl.id, decl.label, icon)
            .at(decl.x as f64, decl.y as f64)
            .with_size(width, height);

        if let Some(index) = self.innermost_container() {
            let container = &mut self.containers[index];
            container.children.push(node.id.clone());
            node.container_id = Some(container.id.clone());
        }
        self.nodes.push(node);
    }

    fn open_container(&mut self, decl: ContainerDecl, line: usize, text: &str) {
        let closed = decl.closed;
        let container = match ContainerType::from_name(&decl.container_type) {
            None => {
                self.error(
                    line,
                    format!("Unknown container type: {}", decl.container_type),
                    text,
                );
                None
            }
            Some(_) if self.containers.iter().any(|c| c.id == decl.id) => {
                self.error(line, format!("Duplicate container id: {}", decl.id), text);
                None
            }
            Some(container_type) => {
                self.containers.push(
                    Container::new(decl.id, decl.label, container_type).with_bounds(
                        decl.x as f64,
                        decl.y as f64,
                        decl.width as f64,
                        decl.height as f64,
                    ),
                );
                Some(self.containers.len() - 1)
            }
        };

        if !closed {
            self.stack.push(OpenBlock {
                container,
                line,
                text: text.to_string(),
            });
        }
    }

    fn close_container(&mut self, line: usize, text: &str) {
        if self.stack.pop().is_none() {
            self.error(line, "Unexpected closing brace", text);
        }
    }

    /// Keep brace depth in step with the source when a line fails to parse
    fn track_braces(&mut self, line: usize, text: &str) {
        if text.starts_with('}') {
            self.stack.pop();
        } else if text.ends_with('{') {
            self.stack.push(OpenBlock {
                container: None,
                line,
                text: text.to_string(),
            });
        }
    }

    /// Resolve connections and produce the diagram or every collected error
    fn finish(mut self, title: &str) -> Result<Diagram, ParseFailure> {
        for block in std::mem::take(&mut self.stack) {
            self.error(block.line, "Unclosed container block", &block.text);
        }

        let mut links = Vec::with_capacity(self.connections.len());
        for pending in std::mem::take(&mut self.connections) {
            let decl = pending.decl;
            let unknown = [&decl.from, &decl.to]
                .into_iter()
                .find(|id| !self.node_ids.contains(id.as_str()))
                .cloned();
            if let Some(id) = unknown {
                self.error(
                    pending.line,
                    format!("Unknown node reference: {}", id),
                    &pending.text,
                );
                continue;
            }

            let mut link = Link::new(format!("link-{}", links.len() + 1), decl.from, decl.to);
            if let Some(label) = decl.label {
                link = link.with_label(label);
            }
            if decl.bidirectional {
                link = link.bidirectional();
            }
            links.push(link);
        }

        if !self.errors.is_empty() {
            return Err(ParseFailure::new(self.errors));
        }

        Ok(Diagram {
            title: title.to_string(),
            nodes: self.nodes,
            links,
            containers: (!self.containers.is_empty()).then_some(self.containers),
        })
    }
}

/// Parser for the declarative diagram language
#[derive(Debug, Clone)]
pub struct DslParser {
    title: String,
}

impl DslParser {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Use a custom title for compiled diagrams
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn is_comment(line: &str) -> bool {
        line.starts_with("//")
    }

    /// Compile source into a diagram, collecting every line error
    ///
    /// Succeeds only when no line has an error. Link ids are `link-1`,
    /// `link-2`, ... in source order.
    pub fn compile(&self, source: &str) -> Result<Diagram, ParseFailure> {
        let compile_span = span!(Level::INFO, "compile_dsl", input_len = source.len());
        let _enter = compile_span.enter();

        let mut state = Compilation::default();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = raw.trim();
            if text.is_empty() || Self::is_comment(text) {
                continue;
            }

            match parse_statement(text) {
                Ok(Statement::Node(decl)) => state.node(decl, line, text),
                Ok(Statement::Connection(decl)) => state.connections.push(PendingConnection {
                    decl,
                    line,
                    text: text.to_string(),
                }),
                Ok(Statement::ContainerOpen(decl)) => state.open_container(decl, line, text),
                Ok(Statement::ContainerClose) => state.close_container(line, text),
                Err(message) => {
                    trace!(line, reason = %message, "Line failed to parse");
                    state.error(line, message, text);
                    state.track_braces(line, text);
                }
            }
        }

        let result = state.finish(&self.title);
        match &result {
            Ok(diagram) => debug!(
                nodes = diagram.nodes.len(),
                links = diagram.links.len(),
                containers = diagram.container_list().len(),
                "Compiled diagram"
            ),
            Err(failure) => debug!(errors = failure.len(), "Diagram source has errors"),
        }
        result
    }
}

impl Default for DslParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<Diagram> for DslParser {
    /// Compile and merge into an existing diagram
    ///
    /// Links may only reference nodes declared in the same input. Nothing
    /// is added when the source has errors or reuses an id the diagram
    /// already holds.
    fn parse(&self, input: &str, database: &mut Diagram) -> Result<()> {
        let compiled = self.compile(input)?;

        for node in &compiled.nodes {
            if database.get_node(&node.id).is_some() {
                bail!("Duplicate node id: {}", node.id);
            }
        }
        for container in compiled.container_list() {
            if database.container(&container.id).is_some() {
                bail!("Duplicate container id: {}", container.id);
            }
        }

        let offset = database.edge_count();
        for node in compiled.nodes {
            database.add_node(node)?;
        }
        for (i, mut link) in compiled.links.into_iter().enumerate() {
            link.id = format!("link-{}", offset + i + 1);
            database.add_edge(link)?;
        }
        for container in compiled.containers.into_iter().flatten() {
            database.add_container(container);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dsl"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !Self::is_comment(line))
            .is_some_and(|line| StatementKind::classify(line) != StatementKind::Unknown)
    }
}
