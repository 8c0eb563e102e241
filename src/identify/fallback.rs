//! Canned suggestion lists for the local fallback tier.
//!
//! Confidences here are a fixed plausibility ranking, not probabilities.

use super::heuristic::{ContentAnalysis, analyze};
use super::types::Suggestion;
use crate::constants::MAX_SUGGESTIONS;
use crate::constants::heuristic::{
    BIRD_LIST_MIN, MAMMAL_LIST_MIN, PIGEON_LIST_MIN, PLANT_LIST_MIN,
};

type Entry = (&'static str, Option<&'static str>, f32);

const PIGEON: &[Entry] = &[
    ("Rock Pigeon", Some("Columba livia"), 0.65),
    ("Eurasian Collared-Dove", Some("Streptopelia decaocto"), 0.60),
    ("House Sparrow", Some("Passer domesticus"), 0.45),
    ("Common Myna", Some("Acridotheres tristis"), 0.40),
    ("Blue Rock Thrush", Some("Monticola solitarius"), 0.35),
];

const BIRD: &[Entry] = &[
    ("Rock Pigeon", Some("Columba livia"), 0.92),
    ("Eurasian Collared-Dove", Some("Streptopelia decaocto"), 0.85),
    ("House Sparrow", Some("Passer domesticus"), 0.72),
    ("Common Myna", Some("Acridotheres tristis"), 0.68),
    ("Rose-ringed Parakeet", Some("Psittacula krameri"), 0.65),
    ("Spotted Owlet", Some("Athene brama"), 0.58),
    ("Hoopoe", Some("Upupa epops"), 0.55),
];

const PLANT: &[Entry] = &[
    ("Chir Pine", Some("Pinus roxburghii"), 0.72),
    ("Shisham", Some("Dalbergia sissoo"), 0.69),
    ("Paper Mulberry", Some("Broussonetia papyrifera"), 0.65),
    ("Himalayan Cedar", Some("Cedrus deodara"), 0.63),
    ("Chinaberry Tree", Some("Melia azedarach"), 0.61),
    ("Sacred Fig", Some("Ficus religiosa"), 0.59),
    ("Orchid Tree", Some("Bauhinia variegata"), 0.57),
];

const MAMMAL: &[Entry] = &[
    ("Leopard", Some("Panthera pardus"), 0.71),
    ("Indian Crested Porcupine", Some("Hystrix indica"), 0.68),
    ("Asiatic Black Bear", Some("Ursus thibetanus"), 0.65),
    ("Indian Grey Mongoose", Some("Herpestes edwardsii"), 0.62),
    ("Golden Jackal", Some("Canis aureus"), 0.60),
    ("Bengal Fox", Some("Vulpes bengalensis"), 0.58),
    ("Rhesus Macaque", Some("Macaca mulatta"), 0.56),
];

const UNDETERMINED: &[Entry] = &[
    ("Unidentified Plant", None, 0.45),
    ("Chir Pine", Some("Pinus roxburghii"), 0.38),
    ("Shisham", Some("Dalbergia sissoo"), 0.35),
    ("Himalayan Cedar", Some("Cedrus deodara"), 0.32),
    ("Common Wild Grass", None, 0.30),
];

const NO_IMAGE: &[Entry] = &[
    ("Unidentified Plant", None, 0.40),
    ("Chir Pine", Some("Pinus roxburghii"), 0.35),
    ("Shisham", Some("Dalbergia sissoo"), 0.32),
    ("Himalayan Cedar", Some("Cedrus deodara"), 0.30),
    ("Common Wild Grass", None, 0.28),
];

const MIXED: &[Entry] = &[
    ("Unidentified Plant", None, 0.35),
    ("Chir Pine", Some("Pinus roxburghii"), 0.33),
    ("Shisham", Some("Dalbergia sissoo"), 0.31),
    ("Himalayan Cedar", Some("Cedrus deodara"), 0.28),
    ("Common Wild Grass", None, 0.26),
];

/// Which canned list the local tier settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedList {
    /// Pigeon and dove lookalikes.
    Pigeon,
    /// Common regional birds.
    Bird,
    /// Regional trees.
    Plant,
    /// Regional mammals.
    Mammal,
    /// Image present but no category reached its threshold.
    Undetermined,
    /// No usable image data.
    NoImage,
    /// Emergency list used after an internal failure.
    Mixed,
}

impl CannedList {
    fn entries(self) -> &'static [Entry] {
        match self {
            Self::Pigeon => PIGEON,
            Self::Bird => BIRD,
            Self::Plant => PLANT,
            Self::Mammal => MAMMAL,
            Self::Undetermined => UNDETERMINED,
            Self::NoImage => NO_IMAGE,
            Self::Mixed => MIXED,
        }
    }

    /// The list as ranked suggestions, at most five.
    pub fn suggestions(self) -> Vec<Suggestion> {
        self.entries()
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|&(name, scientific, confidence)| {
                Suggestion::new(name, scientific.map(str::to_string), confidence)
            })
            .collect()
    }

    /// Pick a list from a content analysis.
    pub const fn select(analysis: &ContentAnalysis) -> Self {
        if analysis.is_probably_bird && analysis.bird_score >= BIRD_LIST_MIN {
            if analysis.is_probably_pigeon && analysis.pigeon_score >= PIGEON_LIST_MIN {
                Self::Pigeon
            } else {
                Self::Bird
            }
        } else if analysis.is_probably_plant && analysis.plant_score >= PLANT_LIST_MIN {
            Self::Plant
        } else if analysis.is_probably_mammal && analysis.mammal_score >= MAMMAL_LIST_MIN {
            Self::Mammal
        } else {
            Self::Undetermined
        }
    }
}

/// Choose the canned list for an optional textual image.
///
/// Only `data:` URLs are analyzed; anything else counts as no image.
pub fn choose_list(image: Option<&str>) -> CannedList {
    match image {
        Some(text) if text.starts_with("data:") => CannedList::select(&analyze(text)),
        _ => CannedList::NoImage,
    }
}

/// Local suggestions for an optional textual image.
pub fn local_suggestions(image: Option<&str>) -> Vec<Suggestion> {
    let list = choose_list(image);
    tracing::debug!(?list, "Using canned local suggestions");
    list.suggestions()
}

/// Suggestions returned when the pipeline itself failed.
pub fn emergency_suggestions() -> Vec<Suggestion> {
    CannedList::Mixed.suggestions()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [CannedList; 7] = [
        CannedList::Pigeon,
        CannedList::Bird,
        CannedList::Plant,
        CannedList::Mammal,
        CannedList::Undetermined,
        CannedList::NoImage,
        CannedList::Mixed,
    ];

    #[test]
    fn test_lists_are_five_and_sorted() {
        for list in ALL {
            let suggestions = list.suggestions();
            assert_eq!(suggestions.len(), 5, "{list:?}");
            assert!(
                suggestions
                    .windows(2)
                    .all(|w| w[0].confidence >= w[1].confidence),
                "{list:?} not sorted"
            );
            assert!(suggestions.iter().all(|s| s.confidence >= 0.26));
        }
    }

    #[test]
    fn test_no_image_list() {
        let suggestions = local_suggestions(None);
        assert_eq!(suggestions[0].name, "Unidentified Plant");
        assert!((suggestions[0].confidence - 0.40).abs() < f32::EPSILON);
        assert!((suggestions[4].confidence - 0.28).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_data_url_counts_as_no_image() {
        assert_eq!(
            choose_list(Some("https://example.org/pigeon-bird-feather.jpg")),
            CannedList::NoImage
        );
    }

    #[test]
    fn test_pigeon_data_selects_pigeon_list() {
        let data = format!(
            "data:image/png;base64,pigeon-gray-blue-gray-round-head{}",
            "A".repeat(500)
        );
        assert_eq!(choose_list(Some(&data)), CannedList::Pigeon);
        assert_eq!(local_suggestions(Some(&data))[0].name, "Rock Pigeon");
    }

    #[test]
    fn test_plain_data_is_undetermined() {
        assert_eq!(
            choose_list(Some("data:image/png;base64,xyz0123")),
            CannedList::Undetermined
        );
    }

    #[test]
    fn test_select_requires_list_minimum() {
        let weak_bird = ContentAnalysis {
            bird_score: 3,
            is_probably_bird: true,
            ..ContentAnalysis::default()
        };
        assert_eq!(CannedList::select(&weak_bird), CannedList::Undetermined);

        let strong_bird = ContentAnalysis {
            bird_score: 4,
            pigeon_score: 3,
            is_probably_bird: true,
            ..ContentAnalysis::default()
        };
        assert_eq!(CannedList::select(&strong_bird), CannedList::Bird);

        let weak_mammal = ContentAnalysis {
            mammal_score: 5,
            is_probably_mammal: true,
            ..ContentAnalysis::default()
        };
        assert_eq!(CannedList::select(&weak_mammal), CannedList::Undetermined);
    }

    #[test]
    fn test_emergency_is_mixed() {
        let suggestions = emergency_suggestions();
        assert!((suggestions[0].confidence - 0.35).abs() < f32::EPSILON);
        assert!((suggestions[4].confidence - 0.26).abs() < f32::EPSILON);
    }
}
