//! Tiered species identification.
//!
//! Remote classifiers are tried in order; when all of them fail, local
//! heuristics pick a canned suggestion list so callers always get an answer.

mod chain;
mod fallback;
mod heuristic;
mod image;
mod normalize;
mod orchestrator;
mod types;

pub use chain::{ChainOutcome, ClassifierChain, Strategy};
pub use fallback::{CannedList, choose_list, emergency_suggestions, local_suggestions};
pub use heuristic::{ColorProfile, ContentAnalysis, analyze, analyze_colors};
pub use image::{ImagePayload, decode_data_url, is_data_url, mime_from_extension, to_data_url};
pub use normalize::{normalize, normalize_all};
pub use orchestrator::{Identifier, narrative, source_unavailable_narrative};
pub use types::{IdentificationResult, RawLabel, Suggestion, Tier, rank};
