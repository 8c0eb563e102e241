//! Observation records and submission input.

use crate::identify::IdentificationResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored wildlife observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// UUID v4 identifier.
    pub observation_id: String,
    /// Scientific (or user-supplied) species name.
    pub species_name: String,
    /// Common name, possibly filled from a confident identification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Day the observation was made.
    pub date_observed: NaiveDate,
    /// Free-text location.
    pub location: String,
    /// Reference to the stored image.
    pub image_url: String,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Identification pipeline output, absent when it did not finish in time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_identification: Option<IdentificationResult>,
    /// Why `ai_identification` is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
    /// When the record was stored.
    pub created_at: DateTime<Utc>,
}

/// User-supplied fields for a new observation.
#[derive(Debug, Clone)]
pub struct ObservationForm {
    /// Species name as entered.
    pub species_name: String,
    /// Optional common name.
    pub common_name: Option<String>,
    /// Observation day; defaults to today.
    pub date_observed: Option<NaiveDate>,
    /// Location, required.
    pub location: String,
    /// Optional notes.
    pub notes: Option<String>,
    /// Image bytes.
    pub image: Vec<u8>,
    /// Image MIME type.
    pub image_type: String,
}
