//! Chumsky grammar for single statements
//!
//! Each statement kind has exactly one accepted shape. The leading token
//! picks the grammar, so a failed line reports what it was trying to be.

use chumsky::prelude::*;

use crate::core::chumsky_utils::{
    attribute, describe_errors, identifier, inline_whitespace, integer, quoted_string,
    value_word, whitespace_required, LineExtra,
};

use super::syntax::{ConnectionDecl, ContainerDecl, NodeDecl, Statement, StatementKind};

/// `<id>: "<label>"` shared by node and container headers
fn id_and_label<'src>() -> impl Parser<'src, &'src str, (String, String), LineExtra<'src>> + Clone
{
    identifier()
        .then_ignore(inline_whitespace())
        .then_ignore(just(':'))
        .then_ignore(inline_whitespace())
        .then(quoted_string())
}

/// `node <id>: "<label>" icon=<type> x=<n> y=<n> [width=<n>] [height=<n>]`
fn node_parser<'src>() -> impl Parser<'src, &'src str, Statement, LineExtra<'src>> + Clone {
    let ws = whitespace_required();

    just("node")
        .ignore_then(ws.clone())
        .ignore_then(id_and_label())
        .then_ignore(ws.clone())
        .then(attribute("icon", value_word()))
        .then_ignore(ws.clone())
        .then(attribute("x", integer()))
        .then_ignore(ws.clone())
        .then(attribute("y", integer()))
        .then(ws.clone().ignore_then(attribute("width", integer())).or_not())
        .then(ws.ignore_then(attribute("height", integer())).or_not())
        .map(|((((((id, label), icon), x), y), width), height)| {
            Statement::Node(NodeDecl {
                id,
                label,
                icon,
                x,
                y,
                width,
                height,
            })
        })
}

/// `<id> <arrow> <id>[: "<label>"]`
fn arrow_parser<'src>(
    arrow: &'static str,
) -> impl Parser<'src, &'src str, ((String, String), Option<String>), LineExtra<'src>> + Clone {
    let label = inline_whitespace()
        .ignore_then(just(':'))
        .ignore_then(inline_whitespace())
        .ignore_then(quoted_string())
        .or_not();

    identifier()
        .then_ignore(inline_whitespace())
        .then_ignore(just(arrow))
        .then_ignore(inline_whitespace())
        .then(identifier())
        .then(label)
}

/// Bidirectional is tried first so `<->` is never split as `<` + `->`
fn connection_parser<'src>() -> impl Parser<'src, &'src str, Statement, LineExtra<'src>> + Clone {
    let connection = |bidirectional: bool| {
        move |((from, to), label): ((String, String), Option<String>)| {
            Statement::Connection(ConnectionDecl {
                from,
                to,
                label,
                bidirectional,
            })
        }
    };

    choice((
        arrow_parser("<->").map(connection(true)),
        arrow_parser("->").map(connection(false)),
    ))
}

/// `container <id>: "<label>" type=<t> x=<n> y=<n> width=<n> height=<n> {`
fn container_parser<'src>() -> impl Parser<'src, &'src str, Statement, LineExtra<'src>> + Clone {
    let ws = whitespace_required();

    just("container")
        .ignore_then(ws.clone())
        .ignore_then(id_and_label())
        .then_ignore(ws.clone())
        .then(attribute("type", value_word()))
        .then_ignore(ws.clone())
        .then(attribute("x", integer()))
        .then_ignore(ws.clone())
        .then(attribute("y", integer()))
        .then_ignore(ws.clone())
        .then(attribute("width", integer()))
        .then_ignore(ws)
        .then(attribute("height", integer()))
        .then_ignore(inline_whitespace())
        .then_ignore(just('{'))
        .then(
            inline_whitespace()
                .ignore_then(just('}'))
                .or_not()
                .map(|close| close.is_some()),
        )
        .map(
            |(((((((id, label), container_type), x), y), width), height), closed)| {
                Statement::ContainerOpen(ContainerDecl {
                    id,
                    label,
                    container_type,
                    x,
                    y,
                    width,
                    height,
                    closed,
                })
            },
        )
}

/// Trailing inline whitespace up to the end of the line
fn line_end<'src>() -> impl Parser<'src, &'src str, (), LineExtra<'src>> + Clone {
    inline_whitespace().then_ignore(end())
}

fn close_parser<'src>() -> impl Parser<'src, &'src str, Statement, LineExtra<'src>> + Clone {
    just('}').to(Statement::ContainerClose)
}

/// Parse one trimmed, non-comment line
///
/// On failure returns a message naming the expected statement kind.
pub fn parse_statement(line: &str) -> Result<Statement, String> {
    let kind = StatementKind::classify(line);

    let result = match kind {
        StatementKind::Node => node_parser().then_ignore(line_end()).parse(line).into_result(),
        StatementKind::Connection => connection_parser()
            .then_ignore(line_end())
            .parse(line)
            .into_result(),
        StatementKind::Container => container_parser()
            .then_ignore(line_end())
            .parse(line)
            .into_result(),
        StatementKind::Close => close_parser().then_ignore(line_end()).parse(line).into_result(),
        StatementKind::Unknown => return Err(kind.error_message().to_string()),
    };

    result.map_err(|errors| format!("{} ({})", kind.error_message(), describe_errors(&errors)))
}
