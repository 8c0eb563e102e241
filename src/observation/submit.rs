//! Observation submission workflow.

use super::store::ObservationStore;
use super::types::{Observation, ObservationForm};
use crate::constants::{ADOPT_CONFIDENCE, MAX_IMAGE_BYTES};
use crate::error::{Error, Result};
use crate::identify::{IdentificationResult, Identifier, to_data_url};
use chrono::{Local, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Id of the stored observation.
    pub observation_id: String,
    /// The stored record.
    pub observation: Observation,
}

/// Check required fields and image size.
pub fn validate_form(form: &ObservationForm) -> Result<()> {
    if form.species_name.trim().is_empty() {
        return Err(Error::ObservationValidation {
            message: "species name is required".to_string(),
        });
    }
    if form.location.trim().is_empty() {
        return Err(Error::ObservationValidation {
            message: "location is required".to_string(),
        });
    }
    if form.image.is_empty() {
        return Err(Error::ObservationValidation {
            message: "image is required".to_string(),
        });
    }
    if form.image.len() > MAX_IMAGE_BYTES {
        return Err(Error::ImageTooLarge {
            size: form.image.len(),
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Fill blank name fields from a confident top suggestion.
///
/// Only applies when the top confidence is strictly above the adoption
/// threshold; user-entered names are never overwritten.
pub fn adopt_names(observation: &mut Observation, result: &IdentificationResult) {
    let Some(top) = result.top() else {
        return;
    };
    if top.confidence <= ADOPT_CONFIDENCE {
        return;
    }

    if observation.species_name.trim().is_empty()
        && let Some(scientific) = &top.scientific_name
    {
        tracing::info!(%scientific, "Using identified scientific name");
        observation.species_name.clone_from(scientific);
    }

    let common_missing = observation
        .common_name
        .as_deref()
        .is_none_or(|c| c.trim().is_empty());
    if common_missing {
        tracing::info!(name = %top.name, "Using identified common name");
        observation.common_name = Some(top.name.clone());
    }
}

/// Validate, store the image, identify under `deadline`, and persist.
///
/// Identification overrunning the deadline does not fail the submission;
/// the observation is stored with `ai_error` set instead.
pub async fn submit(
    form: ObservationForm,
    identifier: &Identifier,
    store: &dyn ObservationStore,
    deadline: Duration,
) -> Result<Submission> {
    validate_form(&form)?;

    let image_url = store.store_image(&form.image, &form.image_type).await?;
    tracing::info!(%image_url, size = form.image.len(), "Image stored");

    let data_url = to_data_url(&form.image, Some(&form.image_type));
    let identification = tokio::time::timeout(deadline, identifier.identify(&data_url, true)).await;

    let mut observation = Observation {
        observation_id: Uuid::new_v4().to_string(),
        species_name: form.species_name.trim().to_string(),
        common_name: form
            .common_name
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        date_observed: form
            .date_observed
            .unwrap_or_else(|| Local::now().date_naive()),
        location: form.location.trim().to_string(),
        image_url,
        notes: form.notes.filter(|n| !n.trim().is_empty()),
        ai_identification: None,
        ai_error: None,
        created_at: Utc::now(),
    };

    match identification {
        Ok(result) => {
            adopt_names(&mut observation, &result);
            observation.ai_identification = Some(result);
        }
        Err(_) => {
            let message = format!("identification timed out after {}s", deadline.as_secs());
            tracing::warn!(%message, "Storing observation without identification");
            observation.ai_error = Some(message);
        }
    }

    store.store_observation(&observation).await?;
    tracing::info!(id = %observation.observation_id, "Observation stored");

    Ok(Submission {
        observation_id: observation.observation_id.clone(),
        observation,
    })
}
