//! Public identification entry point.

use super::chain::ClassifierChain;
use super::fallback::{emergency_suggestions, local_suggestions};
use super::image::{ImagePayload, is_data_url};
use super::types::{IdentificationResult, Suggestion, Tier, rank};
use crate::config::Config;
use crate::constants::{MAX_SUGGESTIONS, timeouts};
use crate::error::{Error, Result};
use crate::remote::{ImageFetcher, ReferenceLookup, RemoteServices, extract_scientific_name};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Runs the tiered identification pipeline.
///
/// `identify` never fails: every error path ends in a suggestion list.
/// Instances hold no per-request state and can be shared across tasks.
pub struct Identifier {
    fetcher: Arc<dyn ImageFetcher>,
    chain: ClassifierChain,
    reference: Option<Arc<dyn ReferenceLookup>>,
    fetch_timeout: Duration,
    reference_timeout: Duration,
}

impl Identifier {
    /// Identifier over an explicit fetcher and chain, without reference lookup.
    pub fn new(fetcher: Arc<dyn ImageFetcher>, chain: ClassifierChain) -> Self {
        Self {
            fetcher,
            chain,
            reference: None,
            fetch_timeout: Duration::from_secs(timeouts::FETCH_SECS),
            reference_timeout: Duration::from_secs(timeouts::REFERENCE_SECS),
        }
    }

    /// Enable best-effort scientific name lookup in enhanced mode.
    #[must_use]
    pub fn with_reference(mut self, reference: Arc<dyn ReferenceLookup>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Override the image fetch bound.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Override the reference lookup bound.
    #[must_use]
    pub const fn with_reference_timeout(mut self, reference_timeout: Duration) -> Self {
        self.reference_timeout = reference_timeout;
        self
    }

    /// Build the HTTP-backed pipeline described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let services = RemoteServices::from_config(config)?;
        let chain = ClassifierChain::new(services.classifiers)
            .with_call_timeout(Duration::from_secs(config.classifiers.timeout_secs));

        let mut identifier = Self::new(services.fetcher, chain)
            .with_fetch_timeout(Duration::from_secs(config.pipeline.fetch_timeout_secs))
            .with_reference_timeout(Duration::from_secs(config.reference.timeout_secs));
        if let Some(reference) = services.reference {
            identifier = identifier.with_reference(reference);
        }
        Ok(identifier)
    }

    /// Identify the species in `image`: a `data:` URL or a fetchable URL.
    ///
    /// With `enhanced_mode`, a missing scientific name on the top suggestion
    /// is looked up and a narrative is attached.
    pub async fn identify(&self, image: &str, enhanced_mode: bool) -> IdentificationResult {
        match AssertUnwindSafe(self.run(image, enhanced_mode))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Identification pipeline panicked, returning emergency suggestions");
                IdentificationResult {
                    suggestions: emergency_suggestions(),
                    raw_response: None,
                    tier: Tier::LocalFallback,
                }
            }
        }
    }

    async fn run(&self, image: &str, enhanced_mode: bool) -> IdentificationResult {
        let payload = match self.resolve(image).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Image unavailable, skipping remote classifiers");
                let suggestions = local_suggestions(None);
                let raw_response = if enhanced_mode {
                    suggestions.first().map(source_unavailable_narrative)
                } else {
                    None
                };
                return IdentificationResult {
                    suggestions,
                    raw_response,
                    tier: Tier::LocalFallback,
                };
            }
        };

        let outcome = self.chain.run(&payload).await;
        let mut suggestions = outcome.suggestions;
        rank(&mut suggestions, MAX_SUGGESTIONS);

        if enhanced_mode
            && let Some(top) = suggestions.first_mut()
            && top.scientific_name.is_none()
        {
            self.enrich(top).await;
        }

        let raw_response = if enhanced_mode {
            suggestions.first().map(|top| narrative(top, outcome.tier))
        } else {
            None
        };

        IdentificationResult {
            suggestions,
            raw_response,
            tier: outcome.tier,
        }
    }

    async fn resolve(&self, image: &str) -> Result<ImagePayload> {
        if is_data_url(image) {
            return ImagePayload::from_data_url(image);
        }

        let fetched = timeout(self.fetch_timeout, self.fetcher.fetch(image))
            .await
            .map_err(|_| Error::Timeout {
                operation: "image fetch".to_string(),
                after: self.fetch_timeout,
            })??;

        Ok(ImagePayload::from_bytes(
            fetched.bytes,
            fetched.content_type.as_deref(),
        ))
    }

    /// Best-effort scientific name for the top suggestion. Failures are logged only.
    async fn enrich(&self, top: &mut Suggestion) {
        let Some(reference) = &self.reference else {
            return;
        };

        match timeout(self.reference_timeout, reference.summary(&top.name)).await {
            Ok(Ok(text)) => match extract_scientific_name(&text) {
                Some(scientific) => {
                    tracing::debug!(name = %top.name, %scientific, "Reference lookup found scientific name");
                    top.scientific_name = Some(scientific);
                }
                None => tracing::debug!(name = %top.name, "Reference summary has no binomial"),
            },
            Ok(Err(e)) => tracing::warn!(name = %top.name, error = %e, "Reference lookup failed"),
            Err(_) => tracing::warn!(
                name = %top.name,
                after = ?self.reference_timeout,
                "Reference lookup timed out"
            ),
        }
    }
}

/// Narrative for a completed chain run.
pub fn narrative(top: &Suggestion, tier: Tier) -> String {
    let disclosure = match tier {
        Tier::Primary => {
            "This identification is based on visual features analyzed by a general image classification model."
        }
        Tier::Backup1 | Tier::Backup2 => {
            "Note: This identification used a fallback image classifier since the primary model was unavailable."
        }
        Tier::LocalFallback => {
            "Note: This is a suggested match from our local database as online identification services are currently unavailable."
        }
    };

    format!(
        "I've identified this as a {} with {}% confidence. {disclosure}",
        top.display_name(),
        top.confidence_percent()
    )
}

/// Narrative used when the image itself could not be obtained.
pub fn source_unavailable_narrative(top: &Suggestion) -> String {
    format!(
        "I couldn't reach the online identification services for this image. Based on basic image analysis, this might be {} with {}% confidence, but this is a low-confidence guess. Note: online identification services are currently unavailable, please try again later for an accurate identification.",
        top.display_name(),
        top.confidence_percent()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_narrative() {
        let top = Suggestion::new("Rock Pigeon", Some("Columba livia".to_string()), 0.834);
        assert_eq!(
            narrative(&top, Tier::Primary),
            "I've identified this as a Rock Pigeon (Columba livia) with 83% confidence. \
             This identification is based on visual features analyzed by a general image classification model."
        );
    }

    #[test]
    fn test_backup_and_local_disclosures() {
        let top = Suggestion::new("goldfinch", None, 0.4);
        assert!(narrative(&top, Tier::Backup2).contains("fallback image classifier"));
        assert!(narrative(&top, Tier::Backup1).starts_with("I've identified this as a goldfinch with 40%"));
        assert!(
            narrative(&top, Tier::LocalFallback)
                .contains("online identification services are currently unavailable")
        );
    }

    #[test]
    fn test_source_unavailable_narrative() {
        let top = Suggestion::new("Unidentified Plant", None, 0.4);
        let text = source_unavailable_narrative(&top);
        assert!(text.contains("Unidentified Plant with 40% confidence"));
        assert!(text.contains("online identification services are currently unavailable"));
    }
}
