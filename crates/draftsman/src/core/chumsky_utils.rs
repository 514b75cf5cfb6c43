//! Shared chumsky parser utilities for diagram parsing
//!
//! Every combinator here uses [`Rich`] errors so the declarative parser can
//! turn a failed line into a readable message.

use chumsky::prelude::*;

/// Extra type shared by all line grammars
pub type LineExtra<'src> = extra::Err<Rich<'src, char>>;

/// Parse inline whitespace only (spaces and tabs, no newlines).
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, (), LineExtra<'src>> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse required inline whitespace (at least one space or tab).
pub fn whitespace_required<'src>() -> impl Parser<'src, &'src str, (), LineExtra<'src>> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

/// Parse an identifier: `[A-Za-z0-9_]+`
pub fn identifier<'src>() -> impl Parser<'src, &'src str, String, LineExtra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>()
}

/// Parse a bare attribute value: `[A-Za-z0-9_-]+`
pub fn value_word<'src>() -> impl Parser<'src, &'src str, String, LineExtra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .repeated()
        .at_least(1)
        .collect::<String>()
}

/// Parse a double-quoted string without escapes, returning its contents
pub fn quoted_string<'src>() -> impl Parser<'src, &'src str, String, LineExtra<'src>> + Clone {
    none_of("\"\n")
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
}

/// Parse a signed decimal integer
pub fn integer<'src>() -> impl Parser<'src, &'src str, i64, LineExtra<'src>> + Clone {
    just('-')
        .or_not()
        .then(text::int(10))
        .to_slice()
        .try_map(|digits: &str, span| {
            digits
                .parse::<i64>()
                .map_err(|e| Rich::custom(span, format!("invalid integer '{}': {}", digits, e)))
        })
}

/// Parse `key=<value>` and return the value
pub fn attribute<'src, T, P>(
    key: &'static str,
    value: P,
) -> impl Parser<'src, &'src str, T, LineExtra<'src>> + Clone
where
    P: Parser<'src, &'src str, T, LineExtra<'src>> + Clone,
{
    just(key).then(just('=')).ignore_then(value)
}

/// Render the first chumsky error of a failed line as a short reason
pub fn describe_errors(errors: &[Rich<'_, char>]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unexpected input".to_string())
}
