//! Identification result types.

use serde::{Deserialize, Serialize};

/// One candidate species match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Common name (never empty).
    pub name: String,
    /// Binomial scientific name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    /// Confidence in `[0, 1]`; model probability or heuristic plausibility.
    pub confidence: f32,
}

impl Suggestion {
    /// Build a suggestion, clamping confidence into `[0, 1]`.
    pub fn new(name: impl Into<String>, scientific_name: Option<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            scientific_name,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Confidence as a rounded percentage.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    /// `"Name (Scientific name)"`, or just the name.
    pub fn display_name(&self) -> String {
        self.scientific_name
            .as_ref()
            .map_or_else(|| self.name.clone(), |sci| format!("{} ({sci})", self.name))
    }
}

/// Sort suggestions by descending confidence and keep the top `limit`.
///
/// The sort is stable, so equally ranked suggestions keep their source order.
pub fn rank(suggestions: &mut Vec<Suggestion>, limit: usize) {
    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    suggestions.truncate(limit);
}

/// Stage of the fallback chain that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Primary remote classifier.
    #[serde(rename = "primary")]
    Primary,
    /// First backup remote classifier.
    #[serde(rename = "backup_1")]
    Backup1,
    /// Second backup remote classifier.
    #[serde(rename = "backup_2")]
    Backup2,
    /// Network-free heuristic analysis.
    #[serde(rename = "local_fallback")]
    LocalFallback,
}

impl Tier {
    /// Whether this tier called a live remote model.
    pub const fn is_remote(self) -> bool {
        !matches!(self, Self::LocalFallback)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Backup1 => write!(f, "backup_1"),
            Self::Backup2 => write!(f, "backup_2"),
            Self::LocalFallback => write!(f, "local_fallback"),
        }
    }
}

/// Output of one identification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationResult {
    /// Ranked suggestions, at most five.
    pub suggestions: Vec<Suggestion>,
    /// Human-readable narrative, only in enhanced mode.
    #[serde(
        rename = "rawResponse",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_response: Option<String>,
    /// Tier that produced the suggestions.
    pub tier: Tier,
}

impl IdentificationResult {
    /// Highest ranked suggestion, if any.
    pub fn top(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }

    /// Whether the suggestions came from local heuristics rather than a live model.
    pub fn is_local_fallback(&self) -> bool {
        self.tier == Tier::LocalFallback
    }
}

/// One `(label, score)` pair as returned by a remote classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLabel {
    /// Model label text.
    pub label: String,
    /// Model score.
    pub score: f32,
}

impl RawLabel {
    /// Convenience constructor.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}
