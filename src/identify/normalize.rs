//! Conversion of raw classifier output into [`Suggestion`]s.

use super::types::{RawLabel, Suggestion};
use crate::config::ModelKind;
use crate::constants::NOISE_FLOOR;
use crate::species::{is_binomial, lookup_bird_synonym, lookup_common_name, lookup_scientific_name};

/// Normalize one raw label according to the model's label format.
///
/// Returns `None` for empty labels and for scores at or below the noise floor.
pub fn normalize(raw: &RawLabel, kind: ModelKind) -> Option<Suggestion> {
    if raw.score <= NOISE_FLOOR || raw.label.trim().is_empty() {
        return None;
    }

    let (name, scientific_name) = match kind {
        ModelKind::Taxonomic => parse_taxonomic(&raw.label),
        ModelKind::Generic => parse_generic(&raw.label),
    };

    Some(Suggestion::new(name, scientific_name, raw.score))
}

/// Normalize a full classifier response, dropping noise.
pub fn normalize_all(raw: &[RawLabel], kind: ModelKind) -> Vec<Suggestion> {
    raw.iter().filter_map(|r| normalize(r, kind)).collect()
}

/// Split `"Common Name (Scientific name)"` labels.
fn parse_taxonomic(label: &str) -> (String, Option<String>) {
    let label = label.trim();

    let split = label
        .strip_suffix(')')
        .and_then(|rest| rest.split_once('('))
        .map(|(common, scientific)| (common.trim(), scientific.trim()));

    match split {
        Some((common, scientific)) if !scientific.is_empty() => {
            let name = if common.is_empty() {
                lookup_common_name(scientific).map_or_else(
                    || genus(scientific).to_string(),
                    ToString::to_string,
                )
            } else {
                common.to_string()
            };
            (name, Some(scientific.to_string()))
        }
        _ if is_binomial(label) => {
            let name = lookup_common_name(label).unwrap_or(label);
            (name.to_string(), Some(label.to_string()))
        }
        _ => (label.to_string(), lookup_scientific_name(label)),
    }
}

/// Map generic classifier labels onto reference species.
fn parse_generic(label: &str) -> (String, Option<String>) {
    if let Some(species) = lookup_bird_synonym(label) {
        return (
            species.name.to_string(),
            Some(species.scientific_name.to_string()),
        );
    }

    let cleaned = label.to_lowercase().replace('_', " ");
    let scientific = lookup_scientific_name(&cleaned)
        .or_else(|| is_binomial(label).then(|| label.trim().to_string()));

    (label.trim().to_string(), scientific)
}

fn genus(scientific: &str) -> &str {
    scientific.split_whitespace().next().unwrap_or(scientific)
}
