//! Declarative diagram language
//!
//! Diagrams written directly as code, with explicit coordinates and no
//! layout stage.
//!
//! Syntax example:
//! ```text
//! // checkout flow
//! node user: "Shopper" icon=user x=40 y=60
//! container backend: "Backend" type=vpc x=220 y=20 width=400 height=200 {
//!     node api: "Checkout API" icon=api x=260 y=60
//!     node db: "Orders" icon=database x=440 y=60 width=140
//! }
//! user -> api: "places order"
//! api <-> db
//! ```

mod chumsky_parser;
mod parser;
mod syntax;
mod writer;

pub use chumsky_parser::parse_statement;
pub use parser::{DslParser, DEFAULT_TITLE};
pub use syntax::{ConnectionDecl, ContainerDecl, NodeDecl, Statement, StatementKind};
pub use writer::to_source;
