//! Remote collaborators: image hosting, classifier endpoints, reference text.
//!
//! Each collaborator is a trait so the identification pipeline can run
//! against in-process doubles. The HTTP implementations live alongside.

mod classifier;
mod fetch;
mod reference;

pub use classifier::InferenceClassifier;
pub use fetch::HttpImageFetcher;
pub use reference::{WikipediaLookup, extract_scientific_name};

use crate::config::{ClassifierModelConfig, Config, ModelKind};
use crate::constants::{API_TOKEN_ENV, timeouts};
use crate::error::{Error, Result};
use crate::identify::RawLabel;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Image bytes downloaded from a URL.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Body bytes.
    pub bytes: Vec<u8>,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
}

/// Downloads images referenced by URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the image at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedImage>;
}

/// One remote image classification model.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Model identifier, used for logging.
    fn model_id(&self) -> &str;

    /// Label format the model emits.
    fn kind(&self) -> ModelKind;

    /// Classify raw image bytes.
    async fn classify(&self, image: &[u8]) -> Result<Vec<RawLabel>>;
}

/// Encyclopedic summary text for a species name.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Summary text for `name`.
    async fn summary(&self, name: &str) -> Result<String>;
}

/// Build the shared HTTP client.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeouts::CONNECT)
        .timeout(timeout)
        .user_agent(concat!("wildid/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::HttpClient {
            reason: e.to_string(),
        })
}

/// Remote collaborators built from configuration.
pub struct RemoteServices {
    /// Image fetcher for URL inputs.
    pub fetcher: Arc<dyn ImageFetcher>,
    /// Classifiers in tier order: primary, backup 1, backup 2.
    pub classifiers: [Arc<dyn ImageClassifier>; 3],
    /// Reference text lookup, when enabled.
    pub reference: Option<Arc<dyn ReferenceLookup>>,
}

impl RemoteServices {
    /// Build HTTP collaborators from configuration.
    ///
    /// The API token falls back to the `HUGGINGFACE_API_KEY` environment variable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifiers_cfg = &config.classifiers;
        let token = classifiers_cfg
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty()));

        if token.is_none() {
            tracing::debug!("No inference API token configured, requests are anonymous");
        }

        let classifier_client = http_client(Duration::from_secs(classifiers_cfg.timeout_secs))?;
        let build = |model: &ClassifierModelConfig| -> Arc<dyn ImageClassifier> {
            Arc::new(InferenceClassifier::new(
                classifier_client.clone(),
                &classifiers_cfg.endpoint,
                model,
                token.clone(),
            ))
        };
        let classifiers = [
            build(&classifiers_cfg.primary),
            build(&classifiers_cfg.backup_1),
            build(&classifiers_cfg.backup_2),
        ];

        let fetch_client = http_client(Duration::from_secs(config.pipeline.fetch_timeout_secs))?;
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new(fetch_client));

        let reference: Option<Arc<dyn ReferenceLookup>> = if config.reference.enabled {
            let client = http_client(Duration::from_secs(config.reference.timeout_secs))?;
            Some(Arc::new(WikipediaLookup::new(client, &config.reference.endpoint)))
        } else {
            None
        };

        Ok(Self {
            fetcher,
            classifiers,
            reference,
        })
    }
}
