//! Network-free content heuristics over the textual encoding of an image.
//!
//! This is not image recognition. Indicator words are matched against the
//! lower-cased data URL, and base64 payload characters are bucketed into
//! rough color families. The result only decides which canned suggestion
//! list is least implausible when every remote classifier is unreachable.

use crate::constants::heuristic::{
    BIRD_THRESHOLD, COLOR_BONUS, DOMINANCE_MIN, MAMMAL_THRESHOLD, PIGEON_THRESHOLD,
    PLANT_THRESHOLD, SAMPLE_TARGET,
};

const BIRD_INDICATORS: &[&str] = &[
    "bird",
    "feather",
    "wing",
    "beak",
    "pigeon",
    "dove",
    "sparrow",
    "grey-blue",
    "blue-grey",
    "gray-blue",
    "blue-gray",
    "white-gray",
    "white-grey",
    "gray-white",
    "grey-white",
];

const PIGEON_INDICATORS: &[&str] = &[
    "pigeon", "dove", "columba", "rock", "blue-gray", "blue-grey", "gray", "grey", "white",
    "round", "head",
];

const PLANT_INDICATORS: &[&str] = &[
    "green", "leaf", "tree", "plant", "branch", "flower", "grass", "trunk", "seed", "pine",
    "needle", "bush", "forest", "wood",
];

const MAMMAL_INDICATORS: &[&str] = &[
    "fur",
    "mammal",
    "cat",
    "dog",
    "bear",
    "paws",
    "face",
    "tail",
    "leopard",
    "spots",
    "stripes",
    "porcupine",
    "quills",
    "brown",
    "black",
    "orange",
    "yellow",
];

const GRAY_BUCKET: &[u8] = b"AQgw+/89";
const GREEN_BUCKET: &[u8] = b"GHIJKLMN";
const BROWN_BUCKET: &[u8] = b"BCDEFRST";

/// Sampled color-bucket fractions of a base64 payload.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorProfile {
    /// Fraction of samples in the gray/blue/white bucket.
    pub gray_blue_white: f64,
    /// Fraction of samples in the green bucket.
    pub green: f64,
    /// Fraction of samples in the brown/tan bucket.
    pub brown_tan: f64,
}

impl ColorProfile {
    /// Gray/blue/white is above the minimum and strictly ahead of both others.
    pub fn is_gray_dominant(&self) -> bool {
        dominates(self.gray_blue_white, self.green, self.brown_tan)
    }

    /// Green is above the minimum and strictly ahead of both others.
    pub fn is_green_dominant(&self) -> bool {
        dominates(self.green, self.gray_blue_white, self.brown_tan)
    }

    /// Brown/tan is above the minimum and strictly ahead of both others.
    pub fn is_brown_dominant(&self) -> bool {
        dominates(self.brown_tan, self.gray_blue_white, self.green)
    }
}

fn dominates(value: f64, a: f64, b: f64) -> bool {
    value > DOMINANCE_MIN && value > a && value > b
}

/// Scores and flags produced by [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentAnalysis {
    /// Bird indicator hits plus color bonus.
    pub bird_score: u32,
    /// Pigeon/dove indicator hits plus color bonus.
    pub pigeon_score: u32,
    /// Plant indicator hits plus color bonus.
    pub plant_score: u32,
    /// Mammal indicator hits plus color bonus.
    pub mammal_score: u32,
    /// Bird threshold reached and not overruled by plant.
    pub is_probably_bird: bool,
    /// Bird flagged and pigeon threshold reached.
    pub is_probably_pigeon: bool,
    /// Plant threshold reached and not overruled by bird.
    pub is_probably_plant: bool,
    /// Mammal threshold reached.
    pub is_probably_mammal: bool,
}

/// Analyze an encoded image (normally a `data:` URL).
pub fn analyze(encoded: &str) -> ContentAnalysis {
    let lower = encoded.to_lowercase();

    let mut analysis = ContentAnalysis {
        bird_score: count_indicators(&lower, BIRD_INDICATORS),
        pigeon_score: count_indicators(&lower, PIGEON_INDICATORS),
        plant_score: count_indicators(&lower, PLANT_INDICATORS),
        mammal_score: count_indicators(&lower, MAMMAL_INDICATORS),
        ..ContentAnalysis::default()
    };

    if let Some(colors) = analyze_colors(encoded) {
        if colors.is_gray_dominant() {
            analysis.bird_score += COLOR_BONUS;
            analysis.pigeon_score += COLOR_BONUS;
        }
        if colors.is_green_dominant() {
            analysis.plant_score += COLOR_BONUS;
        }
        if colors.is_brown_dominant() {
            analysis.mammal_score += COLOR_BONUS;
        }
    }

    analysis.is_probably_bird = analysis.bird_score >= BIRD_THRESHOLD;
    analysis.is_probably_pigeon =
        analysis.is_probably_bird && analysis.pigeon_score >= PIGEON_THRESHOLD;
    analysis.is_probably_plant = analysis.plant_score >= PLANT_THRESHOLD;
    analysis.is_probably_mammal = analysis.mammal_score >= MAMMAL_THRESHOLD;

    // Bird and plant are mutually exclusive; bird keeps its flag on a tie.
    if analysis.is_probably_bird && analysis.is_probably_plant {
        if analysis.plant_score > analysis.bird_score {
            analysis.is_probably_bird = false;
            analysis.is_probably_pigeon = false;
        } else {
            analysis.is_probably_plant = false;
        }
    }

    tracing::debug!(
        bird = analysis.bird_score,
        pigeon = analysis.pigeon_score,
        plant = analysis.plant_score,
        mammal = analysis.mammal_score,
        "Heuristic content analysis"
    );

    analysis
}

fn count_indicators(haystack: &str, indicators: &[&str]) -> u32 {
    let hits = indicators.iter().filter(|i| haystack.contains(*i)).count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

/// Sample the base64 payload into color buckets.
///
/// Returns `None` when the text is not base64 or has no payload after the
/// first comma.
pub fn analyze_colors(encoded: &str) -> Option<ColorProfile> {
    if !encoded.contains("base64") {
        return None;
    }
    let payload = encoded.split(',').nth(1).filter(|p| !p.is_empty())?;

    let step = (payload.len() / SAMPLE_TARGET).max(1);

    let (mut gray, mut green, mut brown, mut total) = (0_u32, 0_u32, 0_u32, 0_u32);
    for b in payload.bytes().step_by(step) {
        if GRAY_BUCKET.contains(&b) {
            gray += 1;
        }
        if GREEN_BUCKET.contains(&b) {
            green += 1;
        }
        if BROWN_BUCKET.contains(&b) {
            brown += 1;
        }
        total += 1;
    }

    let total = f64::from(total);
    Some(ColorProfile {
        gray_blue_white: f64::from(gray) / total,
        green: f64::from(green) / total,
        brown_tan: f64::from(brown) / total,
    })
}
