//! JSON envelope types for CLI output.
//!
//! Every JSON line the CLI prints is wrapped in the same envelope so
//! scripts and web frontends can dispatch on `event` and `result_type`.

use crate::identify::{IdentificationResult, Suggestion, Tier};
use crate::observation::{Observation, ObservationStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Envelope format version.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// Envelope format version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Final result.
    Result,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Species identification.
    Identification,
    /// Stored observation submission.
    Submission,
    /// Observation listing.
    ObservationList,
    /// Single observation.
    Observation,
    /// Observation statistics.
    ObservationStats,
    /// Reference name lookup.
    SpeciesLookup,
    /// Reference table listing.
    SpeciesList,
    /// Configuration display.
    Config,
}

/// Payload for an identification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// The image argument as given (data URLs are elided).
    pub image: String,
    /// Whether enhanced mode was requested.
    pub enhanced: bool,
    /// True when suggestions came from local heuristics, not a live model.
    pub local_fallback: bool,
    /// Ranked suggestions.
    pub suggestions: Vec<Suggestion>,
    /// Narrative, in enhanced mode.
    #[serde(rename = "rawResponse", skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Producing tier.
    pub tier: Tier,
}

impl IdentificationPayload {
    /// Wrap a pipeline result.
    pub fn new(image: &str, enhanced: bool, result: IdentificationResult) -> Self {
        Self {
            result_type: ResultType::Identification,
            image: display_image_arg(image),
            enhanced,
            local_fallback: result.is_local_fallback(),
            suggestions: result.suggestions,
            raw_response: result.raw_response,
            tier: result.tier,
        }
    }
}

/// Shorten data URLs for display.
pub fn display_image_arg(image: &str) -> String {
    if image.starts_with("data:") {
        let header = image.split(',').next().unwrap_or("data:");
        format!("{header},...")
    } else {
        image.to_string()
    }
}

/// Payload for a stored submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Id of the new observation.
    pub observation_id: String,
    /// The stored record.
    pub observation: Observation,
}

/// Payload for observation listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Number of observations.
    pub count: usize,
    /// Observations, newest first.
    pub observations: Vec<Observation>,
}

/// Payload for a single observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// The record.
    pub observation: Observation,
}

/// Payload for observation statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationStatsPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Aggregated counts.
    #[serde(flatten)]
    pub stats: ObservationStats,
}

/// Payload for a reference name lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesLookupPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Name as queried.
    pub query: String,
    /// Matched scientific name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    /// Matched common name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
}

/// Payload for reference table listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Number of species.
    pub species_count: usize,
    /// List of species.
    pub species: Vec<SpeciesEntry>,
}

/// A single species entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Scientific name.
    pub scientific_name: String,
    /// Common name.
    pub common_name: String,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents (as JSON value for flexibility).
    pub config: serde_json::Value,
}
