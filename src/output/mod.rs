//! CLI output: human-readable reports and JSON envelopes.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

mod human;
pub mod json_envelope;

pub use human::{format_identification, format_observation, format_observation_line, format_stats};

use serde::{Deserialize, Serialize};

/// How command results are printed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Plain text for terminals.
    #[default]
    Human,
    /// One JSON envelope per result on stdout.
    Json,
}

/// Emit a JSON result event to stdout.
pub fn emit_json_result<T: Serialize>(payload: &T) {
    use json_envelope::{EventType, JsonEnvelope};

    let envelope = JsonEnvelope::new(EventType::Result, payload);
    match serde_json::to_string(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            // stderr keeps the JSON stream clean
            eprintln!("error: failed to serialize JSON result: {e}");
        }
    }
}
