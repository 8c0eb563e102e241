//! Canonical species for near-miss labels emitted by generic image classifiers.
//!
//! General-purpose classifiers say "rock dove", "feral pigeon" or just "bird";
//! these all need to land on one reference species.

/// A canonical species a synonym resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalSpecies {
    /// Common name.
    pub name: &'static str,
    /// Scientific name.
    pub scientific_name: &'static str,
}

const ROCK_PIGEON: CanonicalSpecies = CanonicalSpecies {
    name: "Rock Pigeon",
    scientific_name: "Columba livia",
};

/// Lower-case synonym → canonical species. Substring matching walks this in order.
const BIRD_SYNONYMS: &[(&str, CanonicalSpecies)] = &[
    ("bird", ROCK_PIGEON),
    ("rock pigeon", ROCK_PIGEON),
    ("pigeon", ROCK_PIGEON),
    (
        "dove",
        CanonicalSpecies {
            name: "Eurasian Collared-Dove",
            scientific_name: "Streptopelia decaocto",
        },
    ),
    ("columbidae", ROCK_PIGEON),
    ("domestic pigeon", ROCK_PIGEON),
    ("rock dove", ROCK_PIGEON),
    ("feral pigeon", ROCK_PIGEON),
    ("street pigeon", ROCK_PIGEON),
    ("columba", ROCK_PIGEON),
    ("city pigeon", ROCK_PIGEON),
    (
        "sparrow",
        CanonicalSpecies {
            name: "House Sparrow",
            scientific_name: "Passer domesticus",
        },
    ),
    (
        "myna",
        CanonicalSpecies {
            name: "Common Myna",
            scientific_name: "Acridotheres tristis",
        },
    ),
    (
        "parakeet",
        CanonicalSpecies {
            name: "Rose-ringed Parakeet",
            scientific_name: "Psittacula krameri",
        },
    ),
    (
        "parrot",
        CanonicalSpecies {
            name: "Rose-ringed Parakeet",
            scientific_name: "Psittacula krameri",
        },
    ),
    (
        "goose",
        CanonicalSpecies {
            name: "Greylag Goose",
            scientific_name: "Anser anser",
        },
    ),
    (
        "duck",
        CanonicalSpecies {
            name: "Mallard Duck",
            scientific_name: "Anas platyrhynchos",
        },
    ),
    (
        "crow",
        CanonicalSpecies {
            name: "House Crow",
            scientific_name: "Corvus splendens",
        },
    ),
    (
        "eagle",
        CanonicalSpecies {
            name: "Golden Eagle",
            scientific_name: "Aquila chrysaetos",
        },
    ),
    (
        "owl",
        CanonicalSpecies {
            name: "Spotted Owlet",
            scientific_name: "Athene brama",
        },
    ),
    (
        "vulture",
        CanonicalSpecies {
            name: "Egyptian Vulture",
            scientific_name: "Neophron percnopterus",
        },
    ),
];

/// Resolve a classifier label to a canonical bird species.
///
/// Exact match on the lower-cased, trimmed label wins; otherwise the first
/// synonym contained in the label is used.
pub fn lookup_bird_synonym(label: &str) -> Option<CanonicalSpecies> {
    let lower = label.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    BIRD_SYNONYMS
        .iter()
        .find(|(key, _)| *key == lower)
        .or_else(|| BIRD_SYNONYMS.iter().find(|(key, _)| lower.contains(key)))
        .map(|&(_, species)| species)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_synonym() {
        assert_eq!(lookup_bird_synonym("Rock Dove"), Some(ROCK_PIGEON));
        assert_eq!(
            lookup_bird_synonym(" sparrow ").map(|s| s.scientific_name),
            Some("Passer domesticus")
        );
    }

    #[test]
    fn test_feral_pigeon_resolves_to_columba_livia() {
        let species = lookup_bird_synonym("feral pigeon");
        assert_eq!(species.map(|s| s.scientific_name), Some("Columba livia"));
    }

    #[test]
    fn test_substring_synonym_uses_table_order() {
        // "mourning dove" has no exact entry; "dove" is the first contained key.
        assert_eq!(
            lookup_bird_synonym("mourning dove").map(|s| s.name),
            Some("Eurasian Collared-Dove")
        );
        // "great horned owl" only contains "owl".
        assert_eq!(
            lookup_bird_synonym("great horned owl").map(|s| s.name),
            Some("Spotted Owlet")
        );
    }

    #[test]
    fn test_non_bird_label() {
        assert_eq!(lookup_bird_synonym("tabby, tabby cat"), None);
        assert_eq!(lookup_bird_synonym(""), None);
    }
}
