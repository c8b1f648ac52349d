//! CLI argument definitions
//!
//! All Clap derive structs for `typecycle` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Typewriter-style phrase rotation for the terminal.
#[derive(Parser, Debug)]
#[command(name = "typecycle", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "TYPECYCLE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "TYPECYCLE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Animate the rotating hero line in the terminal.
    Run(RunArgs),

    /// Print the tick timeline without sleeping.
    Frames(FramesArgs),

    /// Validate configuration files.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Shared rotation source
// ============================================================================

/// Where phrases and delays come from. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to YAML configuration file.
    #[arg(short, long, env = "TYPECYCLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Phrase to rotate (repeatable, replaces the configured list).
    #[arg(short, long = "phrase", value_name = "TEXT")]
    pub phrases: Vec<String>,

    /// Delay after each typed character (e.g. `150ms`).
    #[arg(long, value_parser = parse_duration)]
    pub type_delay: Option<Duration>,

    /// Pause once a phrase is fully typed (e.g. `2s`).
    #[arg(long, value_parser = parse_duration)]
    pub hold_delay: Option<Duration>,

    /// Delay after each deleted character (e.g. `50ms`).
    #[arg(long, value_parser = parse_duration)]
    pub delete_delay: Option<Duration>,

    /// Playback speed multiplier; 2 runs twice as fast.
    #[arg(long, value_name = "FACTOR", value_parser = parse_speed)]
    pub speed: Option<f64>,
}

// ============================================================================
// Run / Frames / Validate
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Phrase source and timing.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Static text before the rotating phrase.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Cursor glyph.
    #[arg(long, conflicts_with = "no_cursor")]
    pub cursor: Option<String>,

    /// Hide the blinking cursor.
    #[arg(long)]
    pub no_cursor: bool,

    /// Stop after this long (e.g. `30s`); runs until interrupted otherwise.
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Write JSONL rotation events to this file.
    #[arg(long, env = "TYPECYCLE_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Serve Prometheus metrics on `127.0.0.1:<PORT>`.
    #[arg(long, env = "TYPECYCLE_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `frames`.
#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Phrase source and timing.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of complete passes through the phrase list to print.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub cycles: u64,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Value parsers
// ============================================================================

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| format!("invalid duration '{s}': {e}"))
}

fn parse_speed(s: &str) -> Result<f64, String> {
    let factor: f64 = s
        .parse()
        .map_err(|_| format!("invalid speed '{s}': expected a number"))?;
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(format!("invalid speed '{s}': must be greater than zero"))
    }
}

// ============================================================================
// Tests
// ============================================================================
