//! Wildid - wildlife observation log with tiered species identification.
//!
//! Photos are identified by remote image classifiers with graceful
//! degradation: primary model, two backups, then local heuristics that
//! always produce an answer.

#![warn(missing_docs)]
#![allow(clippy::print_stdout)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod identify;
pub mod observation;
pub mod output;
pub mod remote;
pub mod species;

use clap::Parser;
use cli::{Cli, Command, ConfigAction, ObservationsAction, SpeciesAction, SubmitArgs};
use config::{Config, load_config, resolve_config_path, save_config};
use identify::{Identifier, mime_from_extension, to_data_url};
use observation::{FileObservationStore, ObservationForm, ObservationStore};
use output::OutputMode;
use output::json_envelope::{
    ConfigPayload, IdentificationPayload, ObservationListPayload, ObservationPayload,
    ObservationStatsPayload, ResultType, SpeciesEntry, SpeciesListPayload, SpeciesLookupPayload,
    SubmissionPayload,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub use error::{Error, Result};

/// Main entry point for the wildid CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet);

    let config_path = cli.global.config.as_deref();
    let mode = cli.global.output_mode;

    match cli.command {
        Command::Config { action } => handle_config_command(action, config_path, mode),
        Command::Species { action } => {
            handle_species_command(action, mode);
            Ok(())
        }
        command => {
            let config = load_config(config_path)?;
            let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
                message: format!("failed to start async runtime: {e}"),
            })?;
            runtime.block_on(handle_async_command(command, &config, mode))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // HTTP client internals stay quiet unless asked for with -vv.
    let filter_str = if quiet {
        "warn".to_string()
    } else {
        match verbose {
            0 => "info,hyper=warn,reqwest=warn".to_string(),
            1 => "debug,hyper=warn,reqwest=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Logs go to stderr so JSON output on stdout stays parseable.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn handle_async_command(command: Command, config: &Config, mode: OutputMode) -> Result<()> {
    match command {
        Command::Identify { image, enhanced } => {
            handle_identify(&image, enhanced, config, mode).await
        }
        Command::Submit(args) => handle_submit(args, config, mode).await,
        Command::Observations { action } => handle_observations(action, config, mode).await,
        Command::Species { .. } | Command::Config { .. } => Err(Error::Internal {
            message: "command does not need the async runtime".to_string(),
        }),
    }
}

/// Turn a local file path into a data URL; URLs and data URLs pass through.
fn resolve_image_arg(image: &str) -> Result<String> {
    if image.starts_with("data:") || image.starts_with("http://") || image.starts_with("https://")
    {
        return Ok(image.to_string());
    }

    let path = Path::new(image);
    let bytes = std::fs::read(path).map_err(|source| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(to_data_url(&bytes, Some(mime_from_extension(path))))
}

async fn handle_identify(
    image: &str,
    enhanced: bool,
    config: &Config,
    mode: OutputMode,
) -> Result<()> {
    let resolved = resolve_image_arg(image)?;
    let identifier = Identifier::from_config(config)?;

    info!("Identifying species");
    let result = identifier.identify(&resolved, enhanced).await;

    match mode {
        OutputMode::Json => {
            output::emit_json_result(&IdentificationPayload::new(image, enhanced, result));
        }
        OutputMode::Human => print!("{}", output::format_identification(&result)),
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<FileObservationStore> {
    let root = match &config.storage.data_dir {
        Some(dir) => dir.clone(),
        None => config::data_dir()?,
    };
    Ok(FileObservationStore::new(root))
}

async fn handle_submit(args: SubmitArgs, config: &Config, mode: OutputMode) -> Result<()> {
    let image = std::fs::read(&args.image).map_err(|source| Error::ImageRead {
        path: args.image.clone(),
        source,
    })?;

    let form = ObservationForm {
        species_name: args.species,
        common_name: args.common,
        date_observed: args.date,
        location: args.location,
        notes: args.notes,
        image,
        image_type: mime_from_extension(&args.image).to_string(),
    };

    let store = open_store(config)?;
    let identifier = Identifier::from_config(config)?;
    let deadline = Duration::from_secs(config.pipeline.deadline_secs);

    let submission = observation::submit(form, &identifier, &store, deadline).await?;

    match mode {
        OutputMode::Json => output::emit_json_result(&SubmissionPayload {
            result_type: ResultType::Submission,
            observation_id: submission.observation_id,
            observation: submission.observation,
        }),
        OutputMode::Human => {
            println!("Observation submitted: {}", submission.observation_id);
            if let Some(result) = &submission.observation.ai_identification {
                println!();
                print!("{}", output::format_identification(result));
            } else if let Some(error) = &submission.observation.ai_error {
                println!("Identification skipped: {error}");
            }
        }
    }
    Ok(())
}

async fn handle_observations(
    action: ObservationsAction,
    config: &Config,
    mode: OutputMode,
) -> Result<()> {
    let store = open_store(config)?;

    match action {
        ObservationsAction::List { limit } => {
            let observations = store.recent_observations(limit).await?;
            match mode {
                OutputMode::Json => output::emit_json_result(&ObservationListPayload {
                    result_type: ResultType::ObservationList,
                    count: observations.len(),
                    observations,
                }),
                OutputMode::Human => {
                    if observations.is_empty() {
                        println!("No observations stored.");
                    }
                    for observation in &observations {
                        println!("{}", output::format_observation_line(observation));
                    }
                }
            }
        }
        ObservationsAction::Stats => {
            let stats = store.stats().await?;
            match mode {
                OutputMode::Json => output::emit_json_result(&ObservationStatsPayload {
                    result_type: ResultType::ObservationStats,
                    stats,
                }),
                OutputMode::Human => print!("{}", output::format_stats(&stats)),
            }
        }
        ObservationsAction::Show { id } => {
            let observation = store.get_observation(&id).await?;
            match mode {
                OutputMode::Json => output::emit_json_result(&ObservationPayload {
                    result_type: ResultType::Observation,
                    observation,
                }),
                OutputMode::Human => print!("{}", output::format_observation(&observation)),
            }
        }
    }
    Ok(())
}

fn handle_species_command(action: SpeciesAction, mode: OutputMode) {
    match action {
        SpeciesAction::Lookup { name } => {
            // Accept either direction: scientific → common, or common → scientific.
            let (scientific_name, common_name) = species::lookup_common_name(&name).map_or_else(
                || {
                    let scientific = species::lookup_scientific_name(&name);
                    let common = scientific
                        .as_deref()
                        .and_then(species::lookup_common_name)
                        .map(str::to_string);
                    (scientific, common)
                },
                |common| {
                    let scientific = species::lookup_scientific_name(common);
                    (scientific, Some(common.to_string()))
                },
            );

            match mode {
                OutputMode::Json => output::emit_json_result(&SpeciesLookupPayload {
                    result_type: ResultType::SpeciesLookup,
                    query: name,
                    scientific_name,
                    common_name,
                }),
                OutputMode::Human => match (scientific_name, common_name) {
                    (Some(scientific), Some(common)) => println!("{common} ({scientific})"),
                    (Some(scientific), None) => println!("{scientific} (no common name on record)"),
                    _ => println!("No match for '{name}'"),
                },
            }
        }
        SpeciesAction::List => {
            let entries = species::entries();
            match mode {
                OutputMode::Json => output::emit_json_result(&SpeciesListPayload {
                    result_type: ResultType::SpeciesList,
                    species_count: entries.len(),
                    species: entries
                        .iter()
                        .map(|&(scientific, common)| SpeciesEntry {
                            scientific_name: scientific.to_string(),
                            common_name: common.to_string(),
                        })
                        .collect(),
                }),
                OutputMode::Human => {
                    for (scientific, common) in entries {
                        println!("{scientific:<32} {common}");
                    }
                }
            }
        }
    }
}

fn handle_config_command(
    action: ConfigAction,
    explicit: Option<&Path>,
    mode: OutputMode,
) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = resolve_config_path(explicit)?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), &path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nSet classifiers.api_token or HUGGINGFACE_API_KEY to use hosted models.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let path = resolve_config_path(explicit)?;
            let config = config::load_config_file(&path)?;
            match mode {
                OutputMode::Json => {
                    let value = serde_json::to_value(redacted(&config)).map_err(|e| {
                        Error::Internal {
                            message: format!("failed to serialize config: {e}"),
                        }
                    })?;
                    output::emit_json_result(&ConfigPayload {
                        result_type: ResultType::Config,
                        config_path: path,
                        config: value,
                    });
                }
                OutputMode::Human => {
                    let text = toml::to_string_pretty(&redacted(&config))
                        .map_err(|source| Error::ConfigSerialize { source })?;
                    println!("# {}", path.display());
                    print!("{text}");
                }
            }
            Ok(())
        }
        ConfigAction::Path => {
            let path = resolve_config_path(explicit)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Copy of `config` with the API token masked.
fn redacted(config: &Config) -> Config {
    let mut copy = config.clone();
    if copy.classifiers.api_token.is_some() {
        copy.classifiers.api_token = Some("********".to_string());
    }
    copy
}
