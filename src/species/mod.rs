//! Species name reference data.

mod reference;
mod synonyms;

pub use reference::{entries, is_binomial, lookup_common_name, lookup_scientific_name};
pub use synonyms::{CanonicalSpecies, lookup_bird_synonym};
