//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

use std::time::Duration;

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "wildid";

/// Environment variable holding the inference API token.
pub const API_TOKEN_ENV: &str = "HUGGINGFACE_API_KEY";

/// Maximum number of suggestions returned by the pipeline.
pub const MAX_SUGGESTIONS: usize = 5;

/// Raw model scores at or below this value are discarded as noise.
///
/// This is a noise floor, not a confidence threshold.
pub const NOISE_FLOOR: f32 = 0.01;

/// Top-suggestion confidence above which AI names are adopted for an observation.
pub const ADOPT_CONFIDENCE: f32 = 0.7;

/// Default number of observations shown by `observations list`.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Locations reported in observation statistics.
pub const TOP_LOCATIONS: usize = 5;

/// Maximum accepted image size for observation submissions (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Timeouts for remote collaborators.
pub mod timeouts {
    use super::Duration;

    /// Image fetch timeout in seconds.
    pub const FETCH_SECS: u64 = 10;

    /// Classifier request timeout in seconds.
    ///
    /// Three tiers run back to back inside [`DEADLINE_SECS`], so this stays short.
    pub const CLASSIFIER_SECS: u64 = 6;

    /// Reference text lookup timeout in seconds.
    pub const REFERENCE_SECS: u64 = 5;

    /// End-to-end identification deadline used by the submission workflow.
    ///
    /// Must exceed fetch + three classifier calls + reference lookup.
    pub const DEADLINE_SECS: u64 = 35;

    /// TCP connect timeout shared by all HTTP clients.
    pub const CONNECT: Duration = Duration::from_secs(5);
}

/// Default remote endpoints and models.
pub mod endpoints {
    /// Hosted inference API base URL. The model id is appended as path.
    pub const INFERENCE: &str = "https://api-inference.huggingface.co/models";

    /// Wikipedia REST summary endpoint. The page title is appended as path.
    pub const REFERENCE: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

    /// Primary classifier model id.
    pub const PRIMARY_MODEL: &str = "google/vit-base-patch16-224";

    /// First backup classifier model id.
    pub const BACKUP_1_MODEL: &str = "microsoft/resnet-50";

    /// Second backup classifier model id.
    pub const BACKUP_2_MODEL: &str = "facebook/deit-base-distilled-patch16-224";
}

/// Heuristic image analyzer tuning.
pub mod heuristic {
    /// Target number of samples taken from the encoded payload.
    pub const SAMPLE_TARGET: usize = 1000;

    /// Minimum fraction of samples for a color bucket to count as dominant.
    pub const DOMINANCE_MIN: f64 = 0.10;

    /// Score bonus applied to the category of the dominant color bucket.
    pub const COLOR_BONUS: u32 = 3;

    /// Bird flag threshold.
    pub const BIRD_THRESHOLD: u32 = 3;

    /// Pigeon flag threshold (also requires the bird flag).
    pub const PIGEON_THRESHOLD: u32 = 4;

    /// Plant flag threshold.
    pub const PLANT_THRESHOLD: u32 = 4;

    /// Mammal flag threshold, higher to suppress false positives.
    pub const MAMMAL_THRESHOLD: u32 = 5;

    /// Bird score required before the bird lists are offered.
    pub const BIRD_LIST_MIN: u32 = 4;

    /// Pigeon score required before the pigeon list is offered.
    pub const PIGEON_LIST_MIN: u32 = 4;

    /// Plant score required before the plant list is offered.
    pub const PLANT_LIST_MIN: u32 = 3;

    /// Mammal score required before the mammal list is offered.
    pub const MAMMAL_LIST_MIN: u32 = 6;
}

/// Observation store layout.
pub mod storage {
    /// Subdirectory holding image files.
    pub const IMAGES_DIR: &str = "images";

    /// Subdirectory holding observation documents.
    pub const OBSERVATIONS_DIR: &str = "observations";

    /// URL scheme prefix used for images kept in the local store.
    pub const IMAGE_URL_PREFIX: &str = "store://";
}
