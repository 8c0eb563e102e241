//! Plain-text reports for terminal output.

use crate::identify::IdentificationResult;
use crate::observation::{Observation, ObservationStats};
use std::fmt::Write as _;

/// Render an identification result.
pub fn format_identification(result: &IdentificationResult) -> String {
    let mut out = String::new();

    if result.suggestions.is_empty() {
        out.push_str("No suggestions.\n");
        return out;
    }

    let _ = writeln!(out, "Suggestions ({}):", result.tier);
    for (i, suggestion) in result.suggestions.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<40} {:>3}%",
            i + 1,
            suggestion.display_name(),
            suggestion.confidence_percent()
        );
    }

    if result.is_local_fallback() {
        out.push_str("\nNote: online classifiers were unavailable; these are low-confidence local guesses.\n");
    }

    if let Some(narrative) = &result.raw_response {
        let _ = write!(out, "\n{narrative}\n");
    }

    out
}

/// One-line summary of an observation.
pub fn format_observation_line(observation: &Observation) -> String {
    let common = observation
        .common_name
        .as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default();
    format!(
        "{}  {}  {}{}  @ {}",
        observation.observation_id,
        observation.date_observed,
        observation.species_name,
        common,
        observation.location
    )
}

/// Full observation details.
pub fn format_observation(observation: &Observation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Observation {}", observation.observation_id);
    let _ = writeln!(out, "  Species:   {}", observation.species_name);
    if let Some(common) = &observation.common_name {
        let _ = writeln!(out, "  Common:    {common}");
    }
    let _ = writeln!(out, "  Observed:  {}", observation.date_observed);
    let _ = writeln!(out, "  Location:  {}", observation.location);
    let _ = writeln!(out, "  Image:     {}", observation.image_url);
    if let Some(notes) = &observation.notes {
        let _ = writeln!(out, "  Notes:     {notes}");
    }
    let _ = writeln!(
        out,
        "  Stored:    {}",
        observation.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    match (&observation.ai_identification, &observation.ai_error) {
        (Some(result), _) => {
            out.push('\n');
            out.push_str(&format_identification(result));
        }
        (None, Some(error)) => {
            let _ = writeln!(out, "  AI:        {error}");
        }
        (None, None) => {}
    }

    out
}

/// Category counts and top locations.
pub fn format_stats(stats: &ObservationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Observations: {}", stats.total_observations);

    let c = &stats.categories;
    for (label, count) in [
        ("Mammals", c.mammals),
        ("Birds", c.birds),
        ("Plants", c.plants),
        ("Reptiles", c.reptiles),
        ("Insects", c.insects),
        ("Others", c.others),
    ] {
        let _ = writeln!(out, "  {label:<10} {count}");
    }

    if !stats.top_locations.is_empty() {
        out.push_str("
Top locations:
");
        for entry in &stats.top_locations {
            let _ = writeln!(out, "  {:<30} {}", entry.location, entry.count);
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identify::{Suggestion, Tier};

    #[test]
    fn test_format_identification_lists_ranked() {
        let result = IdentificationResult {
            suggestions: vec![
                Suggestion::new("Rock Pigeon", Some("Columba livia".to_string()), 0.83),
                Suggestion::new("goldfinch", None, 0.1),
            ],
            raw_response: Some("narrative".to_string()),
            tier: Tier::Primary,
        };
        let text = format_identification(&result);
        assert!(text.starts_with("Suggestions (primary):"));
        assert!(text.contains("1. Rock Pigeon (Columba livia)"));
        assert!(text.contains("83%"));
        assert!(text.contains("2. goldfinch"));
        assert!(text.trim_end().ends_with("narrative"));
        assert!(!text.contains("low-confidence local guesses"));
    }

    #[test]
    fn test_format_identification_flags_fallback() {
        let result = IdentificationResult {
            suggestions: vec![Suggestion::new("Unidentified Plant", None, 0.4)],
            raw_response: None,
            tier: Tier::LocalFallback,
        };
        assert!(format_identification(&result).contains("low-confidence local guesses"));
    }

    #[test]
    fn test_format_empty() {
        let result = IdentificationResult {
            suggestions: Vec::new(),
            raw_response: None,
            tier: Tier::Primary,
        };
        assert_eq!(format_identification(&result), "No suggestions.\n");
    }

    #[test]
    fn test_format_stats() {
        let stats = ObservationStats {
            total_observations: 3,
            categories: crate::observation::CategoryCounts {
                birds: 2,
                others: 1,
                ..Default::default()
            },
            top_locations: vec![crate::observation::LocationCount {
                location: "Trail 3".to_string(),
                count: 3,
            }],
        };
        let text = format_stats(&stats);
        assert!(text.starts_with("Observations: 3\n"));
        assert!(text.contains("  Birds      2\n"));
        assert!(text.contains("Top locations:"));
        assert!(text.contains("Trail 3"));
    }
}
