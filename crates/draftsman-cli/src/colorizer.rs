//! Terminal colorization for diagnostics
//!
//! Applies ANSI escape codes to parse errors and status lines using
//! crossterm. Every function takes a `colored` flag so callers decide once
//! (terminal, `--color`, `NO_COLOR`) and the formatting stays testable.

use crossterm::style::{Color, Stylize};

use draftsman::plugins::ArchitectureAnalysis;
use draftsman::{LineError, ParseFailure};

fn paint(text: &str, color: Color, colored: bool) -> String {
    if colored {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

/// One error as `line N: message` followed by the offending text
///
/// - Line numbers: Yellow
/// - Messages: Red
/// - Source text: Dark grey
pub fn format_line_error(error: &LineError, colored: bool) -> String {
    format!(
        "{}: {}\n    | {}",
        paint(&format!("line {}", error.line), Color::Yellow, colored),
        paint(&error.message, Color::Red, colored),
        paint(&error.text, Color::DarkGrey, colored),
    )
}

/// Every error of a failed compilation plus a count line
pub fn format_failure(failure: &ParseFailure, colored: bool) -> String {
    let mut out: Vec<String> = failure
        .errors
        .iter()
        .map(|e| format_line_error(e, colored))
        .collect();
    let summary = format!(
        "{} error{} found",
        failure.len(),
        if failure.len() == 1 { "" } else { "s" }
    );
    out.push(paint(&summary, Color::Red, colored));
    out.join("\n")
}

pub fn success(message: &str, colored: bool) -> String {
    paint(&format!("✓ {}", message), Color::Green, colored)
}

pub fn failure(message: &str, colored: bool) -> String {
    paint(&format!("✗ {}", message), Color::Red, colored)
}

/// Human-readable analysis summary
pub fn format_analysis(analysis: &ArchitectureAnalysis, colored: bool) -> String {
    let heading = |text: &str| paint(text, Color::Cyan, colored);
    let mut lines = vec![
        format!(
            "{} {} ({:.0}% confidence)",
            heading("Pattern:"),
            analysis.pattern.title(),
            analysis.confidence * 100.0
        ),
        format!("{} {}", heading("Flow:"), analysis.primary_flow),
        format!(
            "{} {} / {}",
            heading("Complexity / scale:"),
            analysis.complexity,
            analysis.scale
        ),
        format!("{} {}", heading("Entities:"), analysis.entities.len()),
    ];
    for entity in &analysis.entities {
        lines.push(format!("  {} [{}] {}", entity.id, entity.icon, entity.name));
    }
    lines.push(format!(
        "{} {}",
        heading("Relationships:"),
        analysis.relationships.len()
    ));
    for rel in &analysis.relationships {
        lines.push(format!(
            "  {} -> {} ({}, {})",
            rel.source, rel.target, rel.kind, rel.label
        ));
    }
    if analysis.containers.needs_containers() {
        let kinds: Vec<String> = analysis
            .containers
            .counts
            .iter()
            .map(|(kind, count)| format!("{}×{}", kind, count))
            .collect();
        lines.push(format!("{} {}", heading("Containers:"), kinds.join(", ")));
    }
    lines.join("\n")
}
