//! CLI argument definitions.

use crate::constants::DEFAULT_LIST_LIMIT;
use crate::output::OutputMode;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Wildlife observation log with tiered species identification.
#[derive(Debug, Parser)]
#[command(name = "wildid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Options shared by all subcommands.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by all subcommands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "WILDID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Human)]
    pub output_mode: OutputMode,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Identify the species in a photo.
    Identify {
        /// Image URL, data URL, or local file path.
        image: String,
        /// Look up missing scientific names and attach a narrative.
        #[arg(long)]
        enhanced: bool,
    },
    /// Submit a new observation.
    Submit(SubmitArgs),
    /// Browse stored observations.
    Observations {
        /// Observations action to perform.
        #[command(subcommand)]
        action: ObservationsAction,
    },
    /// Query the built-in species reference table.
    Species {
        /// Species action to perform.
        #[command(subcommand)]
        action: SpeciesAction,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `submit`.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Photo of the observed organism.
    #[arg(long)]
    pub image: PathBuf,

    /// Species name (scientific if known).
    #[arg(long)]
    pub species: String,

    /// Common name.
    #[arg(long)]
    pub common: Option<String>,

    /// Where the observation was made.
    #[arg(long)]
    pub location: String,

    /// Observation date (YYYY-MM-DD, default: today).
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Free-text notes.
    #[arg(long)]
    pub notes: Option<String>,
}

/// Observations subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ObservationsAction {
    /// List stored observations, newest first.
    List {
        /// Maximum number of observations to show.
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },
    /// Category counts and most frequent locations.
    Stats,
    /// Show one observation.
    Show {
        /// Observation id.
        id: String,
    },
}

/// Species subcommand actions.
#[derive(Debug, Subcommand)]
pub enum SpeciesAction {
    /// Look up a common or scientific name.
    Lookup {
        /// Name to look up.
        name: String,
    },
    /// List all reference entries.
    List,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid limit '{s}': {e}")),
    }
}
