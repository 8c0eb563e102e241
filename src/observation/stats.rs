//! Aggregate counts over stored observations.

use super::types::Observation;
use crate::constants::TOP_LOCATIONS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad organism group an observation is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Mammals.
    Mammals,
    /// Birds.
    Birds,
    /// Plants.
    Plants,
    /// Reptiles.
    Reptiles,
    /// Insects and spiders.
    Insects,
    /// Anything no keyword matched.
    Others,
}

/// Keywords checked in this order; the first category with a hit wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Mammals,
        &["mammal", "leopard", "monkey", "deer", "squirrel", "boar", "fox", "jackal"],
    ),
    (
        Category::Birds,
        &["bird", "vulture", "eagle", "hawk", "sparrow", "bulbul", "parrot", "parakeet", "owl"],
    ),
    (
        Category::Plants,
        &["plant", "tree", "flower", "shrub", "herb", "grass", "pine", "oak"],
    ),
    (
        Category::Reptiles,
        &["reptile", "snake", "cobra", "viper", "lizard", "crocodile", "turtle"],
    ),
    (
        Category::Insects,
        &["insect", "butterfly", "moth", "beetle", "ant", "bee", "wasp", "spider"],
    ),
];

/// Classify an observation by keywords in its species and common names.
///
/// Matching is plain substring containment on the lower-cased names.
pub fn categorize(observation: &Observation) -> Category {
    let combined = format!(
        "{} {}",
        observation.species_name,
        observation.common_name.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| combined.contains(k)))
        .map_or(Category::Others, |&(category, _)| category)
}

/// Observation counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    /// Mammal observations.
    pub mammals: usize,
    /// Bird observations.
    pub birds: usize,
    /// Plant observations.
    pub plants: usize,
    /// Reptile observations.
    pub reptiles: usize,
    /// Insect observations.
    pub insects: usize,
    /// Uncategorized observations.
    pub others: usize,
}

impl CategoryCounts {
    fn bump(&mut self, category: Category) {
        let slot = match category {
            Category::Mammals => &mut self.mammals,
            Category::Birds => &mut self.birds,
            Category::Plants => &mut self.plants,
            Category::Reptiles => &mut self.reptiles,
            Category::Insects => &mut self.insects,
            Category::Others => &mut self.others,
        };
        *slot += 1;
    }
}

/// How often a location appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    /// Location text as entered.
    pub location: String,
    /// Observations recorded there.
    pub count: usize,
}

/// Summary statistics for an observation log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationStats {
    /// Number of observations counted.
    pub total_observations: usize,
    /// Per-category counts.
    pub categories: CategoryCounts,
    /// Most frequent locations, most common first.
    pub top_locations: Vec<LocationCount>,
}

/// Count categories and rank locations.
///
/// Locations with equal counts are ordered by name. Blank locations are
/// not ranked.
pub fn summarize(observations: &[Observation]) -> ObservationStats {
    let mut categories = CategoryCounts::default();
    let mut by_location: HashMap<&str, usize> = HashMap::new();

    for observation in observations {
        categories.bump(categorize(observation));

        let location = observation.location.trim();
        if !location.is_empty() {
            *by_location.entry(location).or_default() += 1;
        }
    }

    let mut top_locations: Vec<LocationCount> = by_location
        .into_iter()
        .map(|(location, count)| LocationCount {
            location: location.to_string(),
            count,
        })
        .collect();
    top_locations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.location.cmp(&b.location)));
    top_locations.truncate(TOP_LOCATIONS);

    ObservationStats {
        total_observations: observations.len(),
        categories,
        top_locations,
    }
}
