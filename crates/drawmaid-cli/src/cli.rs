//! Command-line interface for the drawmaid utility
//!
//! Converts diagram markup into draw.io documents or Markdown pages,
//! validates it for import problems, and reports the detected dialect.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::colorizer::format_report;
use drawmaid::core::logging::{init_logging, FORMAT_ENV, LEVEL_ENV};
use drawmaid::{validate, DiagramError, DiagramKind, Orchestrator, OutputFormat};

/// Drawmaid - Convert Mermaid-style diagrams to draw.io documents
#[derive(Parser)]
#[command(name = "drawmaid")]
#[command(about = "Convert Mermaid-style diagrams into draw.io documents and Markdown pages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging unless --log-level is given)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
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
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
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
    /// Convert a diagram to a draw.io document or a Markdown page
    Convert {
        /// Input file containing the diagram (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; defaults to markdown for `.md` outputs, drawio otherwise
        #[arg(short, long, value_enum)]
        format: Option<FormatChoice>,
    },

    /// Check a diagram for constructs that do not convert cleanly
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// When to use colors in the report
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Detect diagram type in input
    Detect {
        /// Input file to analyze (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show supported diagram types
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Output formats selectable on the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Drawio,
    Markdown,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Drawio => OutputFormat::Drawio,
            FormatChoice::Markdown => OutputFormat::Markdown,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

/// Pick the output format from the flag, then the output extension
pub fn resolve_format(choice: Option<FormatChoice>, output: Option<&Path>) -> OutputFormat {
    if let Some(choice) = choice {
        return choice.into();
    }
    match output.and_then(|path| path.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") => {
            OutputFormat::Markdown
        }
        _ => OutputFormat::Drawio,
    }
}

/// Level to hand to the logger
///
/// An explicit flag wins, then `--verbose`. Without either the environment
/// decides, and a quiet `warn` applies when it is silent too.
pub fn effective_log_level(cli: &Cli) -> Option<String> {
    if let Some(level) = cli.log_level {
        return Some(level.as_str().to_string());
    }
    if cli.verbose {
        return Some("debug".to_string());
    }
    if std::env::var_os(LEVEL_ENV).is_some() || std::env::var_os("RUST_LOG").is_some() {
        return None;
    }
    Some("warn".to_string())
}

/// Main CLI application
pub struct DrawmaidApp {
    orchestrator: Orchestrator,
}

impl DrawmaidApp {
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        let level = effective_log_level(&cli);
        let format = cli
            .log_format
            .map(|f| f.as_str().to_string())
            .or_else(|| std::env::var(FORMAT_ENV).ok());
        if let Err(e) = init_logging(level.as_deref(), format.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Drawmaid v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Convert {
                input,
                output,
                format,
            } => self.convert_command(input, output, format, cli.verbose),
            Commands::Validate { input, json, color } => {
                self.validate_command(input, json, color, cli.verbose)
            }
            Commands::Detect { input } => self.detect_command(input, cli.verbose),
            Commands::Types { json } => self.types_command(json, cli.verbose),
        }
    }

    /// Handle the convert command
    pub fn convert_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        format: Option<FormatChoice>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let format = resolve_format(format, output.as_deref());
        debug!(format = %format, input_len = content.len(), "Converting");
        let document = self.orchestrator.convert(&content, format)?;
        if verbose {
            eprintln!("Converted diagram to {}", format);
        }

        self.write_output(output, &document)
    }

    /// Handle the validate command
    ///
    /// Fails when the report carries blocking issues so the exit status
    /// reflects the verdict.
    pub fn validate_command(
        &self,
        input: Option<PathBuf>,
        json: bool,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let report = validate(&content);
        info!(
            is_valid = report.is_valid,
            compatibility = %report.compatibility,
            "Validation report ready"
        );
        if json {
            println!("{}", report.to_json()?);
        } else {
            print!("{}", format_report(&report, self.should_colorize(color)));
        }
        io::stdout().flush()?;

        if report.is_valid {
            Ok(())
        } else {
            Err(anyhow!(
                "Diagram has {} blocking issue{}",
                report.issues.len(),
                if report.issues.len() == 1 { "" } else { "s" }
            ))
        }
    }

    /// Determine if the human-readable report should be colorized
    fn should_colorize(&self, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&io::stdout())
            }
        }
    }

    /// Handle the detect command
    pub fn detect_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        if content.trim().is_empty() {
            return Err(anyhow!("Could not detect diagram type: input is empty"));
        }

        println!("{}", self.orchestrator.detect(&content));
        Ok(())
    }

    /// Handle the types command
    pub fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported diagram types");
        }
        println!("{}", Self::types_listing(json)?);
        Ok(())
    }

    fn types_listing(json: bool) -> Result<String> {
        if json {
            let types: Vec<_> = DiagramKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "name": kind.as_str(),
                        "keyword": kind.keyword(),
                        "description": kind.description(),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "supported_types": types,
                "total": DiagramKind::ALL.len(),
            });
            return Ok(serde_json::to_string_pretty(&listing)?);
        }

        let mut lines = vec!["Supported diagram types:".to_string()];
        for kind in DiagramKind::ALL {
            lines.push(format!("  {:<10} - {}", kind.as_str(), kind.description()));
        }
        lines.push(String::new());
        lines.push(format!("Total: {} diagram types supported", DiagramKind::ALL.len()));
        Ok(lines.join("\n"))
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if !is_stdio(&path) => fs::read_to_string(&path)
                .map_err(DiagramError::from)
                .with_context(|| format!("Failed to read input file '{}'", path.display())),
            _ => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .map_err(DiagramError::from)
                    .context("Failed to read standard input")?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if !is_stdio(&path) => {
                fs::write(&path, content)
                    .map_err(DiagramError::from)
                    .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for DrawmaidApp {
    fn default() -> Self {
        Self::new()
    }
}
