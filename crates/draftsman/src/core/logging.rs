//! Tracing subscriber setup
//!
//! Every pipeline stage opens its own span (`analyze_architecture`,
//! `calculate_positions`, `compile_dsl`, ...) so `RUST_LOG` directives can
//! target a single stage:
//!
//! ```bash
//! RUST_LOG="info,draftsman::plugins::architecture::layout=trace" draftsman generate -i prompt.txt
//! ```
//!
//! Events go to stderr; stdout belongs to diagram output. On wasm32 the
//! browser console receives them through `tracing-wasm`.

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Level used when neither an argument nor the environment names one
pub const DEFAULT_LEVEL: &str = "info";

/// Output layout of log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// Multi-line, with source locations and span enter/exit events
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Level and format after applying argument → environment → default
///
/// Level falls back through `DRAFTSMAN_LOG_LEVEL` and `RUST_LOG`; format
/// through `DRAFTSMAN_LOG_FORMAT`. `env` is the variable lookup.
pub fn resolve_settings(
    level: Option<&str>,
    format: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(String, LogFormat), String> {
    let level = level
        .map(str::to_string)
        .or_else(|| env("DRAFTSMAN_LOG_LEVEL"))
        .or_else(|| env("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let format = match format.map(str::to_string).or_else(|| env("DRAFTSMAN_LOG_FORMAT")) {
        Some(name) => LogFormat::from_str(&name).map_err(|e| format!("Invalid log format: {}", e))?,
        None => LogFormat::default(),
    };

    Ok((level, format))
}

/// Install the global subscriber
///
/// Fails on an unknown format or when a subscriber is already installed.
/// Unparseable levels fall back to [`DEFAULT_LEVEL`].
///
/// ```no_run
/// use draftsman::core::logging::init_logging;
///
/// init_logging(Some("debug"), Some("pretty"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let (level, format) = resolve_settings(level, format, |key| std::env::var(key).ok())?;

        let filter = if level == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
        };

        let base = fmt::layer().with_writer(std::io::stderr).with_level(true);
        let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
            LogFormat::Compact => base
                .with_target(false)
                .with_span_events(FmtSpan::NONE)
                .boxed(),
            LogFormat::Pretty => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
                .boxed(),
            LogFormat::Json => base
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .json()
                .boxed(),
        };

        Registry::default().with(layer).with(filter).try_init()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = resolve_settings(None, None, env(&[])).unwrap();
        assert_eq!(settings, ("info".to_string(), LogFormat::Compact));
    }

    #[test]
    fn test_argument_beats_environment() {
        let vars = env(&[("DRAFTSMAN_LOG_LEVEL", "trace"), ("DRAFTSMAN_LOG_FORMAT", "json")]);
        let settings = resolve_settings(Some("warn"), Some("pretty"), vars).unwrap();
        assert_eq!(settings, ("warn".to_string(), LogFormat::Pretty));
    }

    #[test]
    fn test_draftsman_level_beats_rust_log() {
        let vars = env(&[("DRAFTSMAN_LOG_LEVEL", "debug"), ("RUST_LOG", "error")]);
        assert_eq!(resolve_settings(None, None, vars).unwrap().0, "debug");

        let vars = env(&[("RUST_LOG", "error")]);
        assert_eq!(resolve_settings(None, None, vars).unwrap().0, "error");
    }

    #[test]
    fn test_bad_format_from_environment() {
        let vars = env(&[("DRAFTSMAN_LOG_FORMAT", "xml")]);
        let error = resolve_settings(None, None, vars).unwrap_err();
        assert_eq!(error, "Invalid log format: Unknown log format: xml");
    }
}
