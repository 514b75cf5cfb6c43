//! WebAssembly bindings for Draftsman
//!
//! Browser-facing wrappers around the pipelines. Every function returns a
//! JSON string so a rendering surface can consume the diagram directly.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::core::{DiagramError, LineError};
use crate::plugins::{LayoutAlgorithm, Orchestrator};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Result envelope for [`compile_diagram`]
#[derive(Serialize)]
struct CompileResponse<'a> {
    diagram: Option<&'a crate::core::Diagram>,
    errors: &'a [LineError],
}

fn orchestrator(colorize: bool) -> Orchestrator {
    if colorize {
        Orchestrator::new().with_link_colors()
    } else {
        Orchestrator::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(DiagramError::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Generate a positioned diagram from a description
///
/// # Arguments
/// * `prompt` - Free-text architecture description
/// * `algorithm` - Optional layout override ("hierarchical", "organic", ...)
/// * `colorize` - Assign distinguishable link colors
///
/// # Returns
/// * JSON with `analysis`, `config` and `diagram`
/// * Throws a JavaScript error for an unknown algorithm name
#[wasm_bindgen]
pub fn generate_diagram(
    prompt: &str,
    algorithm: Option<String>,
    colorize: bool,
) -> Result<String, JsValue> {
    let algorithm = algorithm
        .map(|name| name.parse::<LayoutAlgorithm>())
        .transpose()
        .map_err(|e| JsValue::from_str(&e))?;

    let generated = orchestrator(colorize).generate_with(prompt, algorithm);
    to_json(&generated)
}

/// Compile declarative source
///
/// # Returns
/// * JSON with `diagram` (null on failure) and `errors` (each with `line`,
///   `message` and `text`)
#[wasm_bindgen]
pub fn compile_diagram(source: &str, colorize: bool) -> Result<String, JsValue> {
    match orchestrator(colorize).compile(source) {
        Ok(diagram) => to_json(&CompileResponse {
            diagram: Some(&diagram),
            errors: &[],
        }),
        Err(failure) => to_json(&CompileResponse {
            diagram: None,
            errors: &failure.errors,
        }),
    }
}

/// Analyze a description without laying it out
#[wasm_bindgen]
pub fn analyze_prompt(prompt: &str) -> Result<String, JsValue> {
    to_json(&Orchestrator::new().analyze(prompt))
}
