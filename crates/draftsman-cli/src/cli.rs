//! Command-line interface for the draftsman utility
//!
//! Turns architecture descriptions and declarative diagram source into
//! positioned diagrams, emitted as JSON or as declarative source.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, span, Level};

use crate::colorizer;
use draftsman::core::logging::init_logging;
use draftsman::plugins::{to_source, LayoutAlgorithm, Orchestrator};
use draftsman::{ArchitecturePattern, Diagram};

/// Draftsman - Turn architecture descriptions into positioned diagrams
#[derive(Parser)]
#[command(name = "draftsman")]
#[command(about = "Turn architecture descriptions and diagram-as-code into positioned diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// When to use colors in diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a free-text architecture description
    Analyze {
        /// Input file containing the description (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a positioned diagram from a description
    Generate {
        /// Input file containing the description (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force a layout algorithm instead of the selected one
        #[arg(short, long, value_enum)]
        algorithm: Option<AlgorithmChoice>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Assign distinguishable link colors
        #[arg(long)]
        colorize: bool,
    },

    /// Compile declarative diagram source
    Compile {
        /// Input file containing diagram source (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Assign distinguishable link colors
        #[arg(long)]
        colorize: bool,

        /// Title of the compiled diagram
        #[arg(long)]
        title: Option<String>,
    },

    /// Validate declarative diagram source
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show recognized architecture patterns
    Patterns {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Layout algorithms selectable from the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum AlgorithmChoice {
    Hierarchical,
    Organic,
    Radial,
    Cluster,
    Flow,
    Grid,
    Hybrid,
}

impl From<AlgorithmChoice> for LayoutAlgorithm {
    fn from(value: AlgorithmChoice) -> Self {
        match value {
            AlgorithmChoice::Hierarchical => LayoutAlgorithm::Hierarchical,
            AlgorithmChoice::Organic => LayoutAlgorithm::Organic,
            AlgorithmChoice::Radial => LayoutAlgorithm::Radial,
            AlgorithmChoice::Cluster => LayoutAlgorithm::Cluster,
            AlgorithmChoice::Flow => LayoutAlgorithm::Flow,
            AlgorithmChoice::Grid => LayoutAlgorithm::Grid,
            AlgorithmChoice::Hybrid => LayoutAlgorithm::Hybrid,
        }
    }
}

/// Diagram output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Serialized diagram
    #[default]
    Json,
    /// Declarative diagram source
    Dsl,
}

/// When to colorize diagnostics
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stderr is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct DraftsmanApp {
    colored: bool,
}

impl DraftsmanApp {
    /// Create a new application instance with uncolored diagnostics
    pub fn new() -> Self {
        Self { colored: false }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("DRAFTSMAN_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("DRAFTSMAN_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.colored = Self::should_colorize(cli.color);
        debug!(colored = self.colored, "Resolved diagnostic colors");

        if cli.verbose {
            eprintln!("Draftsman v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Analyze {
                input,
                output,
                json,
            } => self.analyze_command(input, output, json, cli.verbose),
            Commands::Generate {
                input,
                output,
                algorithm,
                format,
                colorize,
            } => self.generate_command(
                input,
                output,
                algorithm.map(LayoutAlgorithm::from),
                format,
                colorize,
                cli.verbose,
            ),
            Commands::Compile {
                input,
                output,
                format,
                colorize,
                title,
            } => self.compile_command(input, output, format, colorize, title, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Patterns { json } => self.patterns_command(json),
        }
    }

    /// Determine if diagnostics on stderr should carry colors
    fn should_colorize(color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stderr())
            }
        }
    }

    fn render(diagram: &Diagram, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(diagram)?,
            OutputFormat::Dsl => to_source(diagram),
        })
    }

    /// Handle the analyze command
    pub fn analyze_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        json: bool,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let analysis = Orchestrator::new().analyze(&content);
        let rendered = if json {
            serde_json::to_string_pretty(&analysis)?
        } else {
            let to_terminal = output.as_ref().map_or(true, |p| p.to_str() == Some("-"));
            colorizer::format_analysis(&analysis, self.colored && to_terminal)
        };
        self.write_output(output, &rendered)
    }

    /// Handle the generate command
    pub fn generate_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        algorithm: Option<LayoutAlgorithm>,
        format: OutputFormat,
        colorize: bool,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        let command_span = span!(Level::INFO, "generate_command", ?format, colorize);
        let _enter = command_span.enter();

        let orchestrator = if colorize {
            Orchestrator::new().with_link_colors()
        } else {
            Orchestrator::new()
        };
        let generated = orchestrator.generate_with(&content, algorithm);

        if verbose {
            eprintln!(
                "Detected {} pattern, laid out with {}",
                generated.analysis.pattern, generated.config.algorithm
            );
        }

        let rendered = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&generated)?,
            OutputFormat::Dsl => to_source(&generated.diagram),
        };
        self.write_output(output, &rendered)
    }

    /// Handle the compile command
    pub fn compile_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        format: OutputFormat,
        colorize: bool,
        title: Option<String>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        let command_span = span!(Level::INFO, "compile_command", ?format, colorize);
        let _enter = command_span.enter();

        let mut orchestrator = Orchestrator::new();
        if colorize {
            orchestrator = orchestrator.with_link_colors();
        }
        if let Some(title) = title {
            orchestrator = orchestrator.with_dsl_title(title);
        }

        match orchestrator.compile(&content) {
            Ok(diagram) => {
                if verbose {
                    eprintln!(
                        "Compiled {} nodes and {} links",
                        diagram.nodes.len(),
                        diagram.links.len()
                    );
                }
                self.write_output(output, &Self::render(&diagram, format)?)
            }
            Err(failure) => {
                info!(errors = failure.len(), "Compilation failed");
                eprintln!("{}", colorizer::format_failure(&failure, self.colored));
                Err(anyhow!("Compilation failed with {} error(s)", failure.len()))
            }
        }
    }

    /// Handle the validate command
    pub fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match Orchestrator::new().compile(&content) {
            Ok(diagram) => {
                diagram.validate()?;
                println!(
                    "{}",
                    colorizer::success(
                        &format!(
                            "Valid diagram ({} nodes, {} links, {} containers)",
                            diagram.nodes.len(),
                            diagram.links.len(),
                            diagram.container_list().len()
                        ),
                        self.colored
                    )
                );
                Ok(())
            }
            Err(failure) => {
                println!("{}", colorizer::failure("Invalid diagram", self.colored));
                eprintln!("{}", colorizer::format_failure(&failure, self.colored));
                Err(anyhow!("{} error(s) found", failure.len()))
            }
        }
    }

    /// Handle the patterns command
    pub fn patterns_command(&self, json: bool) -> Result<()> {
        let algorithms = draftsman::plugins::architecture::base_algorithm;

        if json {
            let patterns: Vec<_> = ArchitecturePattern::ALL
                .iter()
                .map(|pattern| {
                    serde_json::json!({
                        "name": pattern.name(),
                        "title": pattern.title(),
                        "layout": algorithms(*pattern).name(),
                        "flow": pattern.natural_flow().to_string(),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "patterns": patterns,
                "total": ArchitecturePattern::ALL.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Recognized architecture patterns:");
            for pattern in ArchitecturePattern::ALL {
                println!(
                    "  {:<16} {:<14} layout={}",
                    pattern.name(),
                    pattern.title(),
                    algorithms(pattern)
                );
            }
            println!();
            println!("Total: {} patterns", ArchitecturePattern::ALL.len());
        }

        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        debug!(path = ?input, "Reading input");
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for DraftsmanApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const PROMPT: &str = "A user sends requests to an API service which reads from a database";

    #[test]
    fn test_cli_parsing_generate_command() {
        let args = vec![
            "draftsman",
            "generate",
            "--input",
            "prompt.txt",
            "--output",
            "diagram.json",
            "--algorithm",
            "organic",
            "--colorize",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate {
                input,
                output,
                algorithm,
                format,
                colorize,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "prompt.txt");
                assert_eq!(output.unwrap().to_string_lossy(), "diagram.json");
                assert_eq!(algorithm, Some(AlgorithmChoice::Organic));
                assert_eq!(format, OutputFormat::Json); // default
                assert!(colorize);
            }
            _ => panic!("Expected Generate command"),
        }
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn test_cli_parsing_compile_command() {
        let args = vec!["draftsman", "compile", "--format", "dsl", "--title", "Mine"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Compile { format, title, .. } => {
                assert_eq!(format, OutputFormat::Dsl);
                assert_eq!(title.as_deref(), Some("Mine"));
            }
            _ => panic!("Expected Compile command"),
        }
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let args = vec!["draftsman", "validate", "--color", "never", "--verbose"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert!(matches!(cli.command, Commands::Validate { input: None }));
    }

    #[test]
    fn test_cli_rejects_unknown_algorithm() {
        let args = vec!["draftsman", "generate", "--algorithm", "spiral"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_algorithm_choice_covers_all() {
        for algorithm in LayoutAlgorithm::ALL {
            let choice = AlgorithmChoice::from_str(algorithm.name(), true).unwrap();
            assert_eq!(LayoutAlgorithm::from(choice), algorithm);
        }
    }

    #[test]
    fn test_read_input_from_file() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("prompt.txt");
        fs::write(&file_path, PROMPT).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, PROMPT);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = DraftsmanApp::new();
        let err = app
            .read_input(Some(PathBuf::from("/nonexistent/prompt.txt")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_generate_to_file() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("prompt.txt");
        let output = dir.path().join("diagram.json");
        fs::write(&input, PROMPT).unwrap();

        app.generate_command(
            Some(input),
            Some(output.clone()),
            None,
            OutputFormat::Json,
            true,
            false,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["diagram"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(json["analysis"]["pattern"], "client-server");
        assert!(json["diagram"]["links"][0]["style"]["color"].is_string());
    }

    #[test]
    fn test_generate_dsl_output_compiles() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("prompt.txt");
        let output = dir.path().join("diagram.dsl");
        fs::write(&input, PROMPT).unwrap();

        app.generate_command(
            Some(input),
            Some(output.clone()),
            Some(LayoutAlgorithm::Grid),
            OutputFormat::Dsl,
            false,
            false,
        )
        .unwrap();

        let source = fs::read_to_string(&output).unwrap();
        let diagram = draftsman::compile(&source).unwrap();
        assert_eq!(diagram.nodes.len(), 3);
    }

    #[test]
    fn test_compile_to_file() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("diagram.dsl");
        let output = dir.path().join("diagram.json");
        fs::write(
            &input,
            "node a: \"A\" icon=server x=0 y=0\nnode b: \"B\" icon=db x=0 y=200\na -> b: \"reads\"\n",
        )
        .unwrap();

        app.compile_command(
            Some(input),
            Some(output.clone()),
            OutputFormat::Json,
            false,
            Some("Mine".to_string()),
            false,
        )
        .unwrap();

        let diagram: Diagram = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(diagram.title, "Mine");
        assert_eq!(diagram.links[0].label.as_deref(), Some("reads"));
    }

    #[test]
    fn test_compile_reports_errors() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.dsl");
        let output = dir.path().join("out.json");
        fs::write(&input, "node a: \"A\" icon=spaceship x=0 y=0\nwhat is this\n").unwrap();

        let err = app
            .compile_command(Some(input), Some(output.clone()), OutputFormat::Json, false, None, false)
            .unwrap_err();
        assert!(err.to_string().contains("2 error(s)"));
        assert!(!output.exists());
    }

    #[test]
    fn test_validate_command() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.dsl");
        let bad = dir.path().join("bad.dsl");
        fs::write(&good, "node a: \"A\" icon=server x=0 y=0\n").unwrap();
        fs::write(&bad, "a -> b\n").unwrap();

        assert!(app.validate_command(Some(good), false).is_ok());
        assert!(app.validate_command(Some(bad), false).is_err());
    }

    #[test]
    fn test_analyze_to_file() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("prompt.txt");
        let output = dir.path().join("analysis.txt");
        fs::write(&input, PROMPT).unwrap();

        app.analyze_command(Some(input), Some(output.clone()), false, false)
            .unwrap();
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("Pattern: Client-Server"));
    }

    #[test]
    fn test_patterns_command() {
        let app = DraftsmanApp::new();
        assert!(app.patterns_command(true).is_ok());
        assert!(app.patterns_command(false).is_ok());
    }

    #[test]
    fn test_write_output_to_file() {
        let app = DraftsmanApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("output.txt");

        app.write_output(Some(file_path.clone()), "Test output").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Test output");
    }
}
