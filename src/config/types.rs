//! Configuration type definitions.

use crate::constants::{endpoints, timeouts};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote image classifiers.
    pub classifiers: ClassifiersConfig,

    /// Reference text lookup used for enrichment.
    pub reference: ReferenceConfig,

    /// Pipeline timing settings.
    pub pipeline: PipelineConfig,

    /// Observation storage settings.
    pub storage: StorageConfig,
}

/// Remote classifier settings shared by every tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifiersConfig {
    /// Base URL of the inference API; the model id is appended as path.
    pub endpoint: String,

    /// Bearer token for the inference API.
    ///
    /// Falls back to the `HUGGINGFACE_API_KEY` environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Primary classifier.
    pub primary: ClassifierModelConfig,

    /// First backup classifier.
    pub backup_1: ClassifierModelConfig,

    /// Second backup classifier.
    pub backup_2: ClassifierModelConfig,
}

impl Default for ClassifiersConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::INFERENCE.to_string(),
            api_token: None,
            timeout_secs: timeouts::CLASSIFIER_SECS,
            primary: ClassifierModelConfig::generic(endpoints::PRIMARY_MODEL),
            backup_1: ClassifierModelConfig::generic(endpoints::BACKUP_1_MODEL),
            backup_2: ClassifierModelConfig::generic(endpoints::BACKUP_2_MODEL),
        }
    }
}

/// Configuration for a single classifier tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierModelConfig {
    /// Model id appended to the endpoint.
    pub model: String,

    /// Label format produced by the model.
    #[serde(default)]
    pub kind: ModelKind,
}

impl ClassifierModelConfig {
    /// Generic-label classifier for the given model id.
    pub fn generic(model: &str) -> Self {
        Self {
            model: model.to_string(),
            kind: ModelKind::Generic,
        }
    }
}

/// Label format emitted by a classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Plain class labels such as `"rock dove"` or `"tabby, tabby cat"`.
    #[default]
    Generic,
    /// Labels formatted `"Common Name (Scientific name)"`.
    Taxonomic,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::Taxonomic => write!(f, "taxonomic"),
        }
    }
}

/// Reference text lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Whether enhanced mode may query the reference service.
    pub enabled: bool,

    /// Summary endpoint; the page title is appended as path.
    pub endpoint: String,

    /// Lookup timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: endpoints::REFERENCE.to_string(),
            timeout_secs: timeouts::REFERENCE_SECS,
        }
    }
}

/// Pipeline timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Image fetch timeout in seconds.
    pub fetch_timeout_secs: u64,

    /// End-to-end identification deadline for submissions, in seconds.
    pub deadline_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: timeouts::FETCH_SECS,
            deadline_secs: timeouts::DEADLINE_SECS,
        }
    }
}

/// Observation storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for observations and images (default: platform data dir).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}
