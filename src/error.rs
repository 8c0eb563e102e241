//! Error types for wildid.

use std::time::Duration;

/// Result type alias for wildid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for wildid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Data directory could not be determined.
    #[error("could not determine data directory for this platform")]
    DataDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// HTTP client could not be constructed.
    #[error("failed to create HTTP client: {reason}")]
    HttpClient {
        /// Description of the failure.
        reason: String,
    },

    /// Remote request could not be completed.
    #[error("request to '{url}' failed")]
    RequestFailed {
        /// URL that failed.
        url: String,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote service answered with a non-success status.
    #[error("'{url}' returned HTTP {status}")]
    HttpStatus {
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Remote service returned a payload we could not interpret.
    #[error("malformed response from '{url}': {reason}")]
    MalformedResponse {
        /// URL that was requested.
        url: String,
        /// Description of the problem.
        reason: String,
    },

    /// Remote operation exceeded its time budget.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// Name of the operation.
        operation: String,
        /// Time budget that elapsed.
        after: Duration,
    },

    /// Inline image payload could not be decoded.
    #[error("invalid data URL: {reason}")]
    InvalidDataUrl {
        /// Description of the problem.
        reason: String,
    },

    /// Submitted observation is missing a required field or is malformed.
    #[error("invalid observation: {message}")]
    ObservationValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Submitted image exceeds the size limit.
    #[error("image is {size} bytes, maximum allowed is {max} bytes")]
    ImageTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// Failed to read an image file from disk.
    #[error("failed to read image file '{path}'")]
    ImageRead {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to the observation store.
    #[error("failed to write '{path}'")]
    StoreWrite {
        /// Path being written.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read from the observation store.
    #[error("failed to read '{path}'")]
    StoreRead {
        /// Path being read.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Stored observation document could not be parsed.
    #[error("failed to parse observation document '{path}'")]
    ObservationParse {
        /// Path to the document.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Observation could not be serialized.
    #[error("failed to serialize observation")]
    ObservationSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Observation not found in the store.
    #[error("observation '{id}' not found")]
    ObservationNotFound {
        /// ID of the missing observation.
        id: String,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}
