//! Wildlife observation submission and storage.

mod stats;
mod store;
mod submit;
mod types;

pub use stats::{Category, CategoryCounts, LocationCount, ObservationStats, categorize, summarize};
pub use store::{FileObservationStore, ObservationStore};
pub use submit::{Submission, adopt_names, submit, validate_form};
pub use types::{Observation, ObservationForm};
