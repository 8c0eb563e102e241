//! Static scientific ↔ common name reference table.
//!
//! The table is compiled into the binary and indexed once on first use.
//! It is never mutated afterwards, so lookups are safe from any thread.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Reference entries as `(scientific name, common name)`, in lookup priority order.
const ENTRIES: &[(&str, &str)] = &[
    // Mammals
    ("Felis catus", "Domestic Cat"),
    ("Canis lupus familiaris", "Domestic Dog"),
    ("Panthera leo", "Lion"),
    ("Panthera tigris", "Tiger"),
    ("Panthera pardus", "Leopard"),
    ("Acinonyx jubatus", "Cheetah"),
    ("Loxodonta africana", "African Elephant"),
    ("Giraffa camelopardalis", "Giraffe"),
    ("Equus quagga", "Zebra"),
    ("Equus ferus caballus", "Horse"),
    ("Bos taurus", "Cow"),
    ("Ovis aries", "Sheep"),
    ("Capra aegagrus hircus", "Goat"),
    ("Sus scrofa domesticus", "Domestic Pig"),
    ("Vulpes vulpes", "Red Fox"),
    ("Canis lupus", "Wolf"),
    ("Ursus arctos", "Brown Bear"),
    ("Ailuropoda melanoleuca", "Giant Panda"),
    ("Phascolarctos cinereus", "Koala"),
    ("Macropus rufus", "Red Kangaroo"),
    ("Cervus elaphus", "Red Deer"),
    // Birds
    ("Aquila chrysaetos", "Golden Eagle"),
    ("Bubo bubo", "Eurasian Eagle-Owl"),
    ("Columba livia", "Rock Pigeon"),
    ("Anas platyrhynchos", "Mallard Duck"),
    ("Anser anser", "Greylag Goose"),
    ("Cygnus olor", "Mute Swan"),
    ("Gallus gallus domesticus", "Chicken"),
    ("Meleagris gallopavo", "Wild Turkey"),
    // Reptiles & amphibians
    ("Crocodylus niloticus", "Nile Crocodile"),
    ("Python bivittatus", "Burmese Python"),
    ("Chelonia mydas", "Green Sea Turtle"),
    ("Iguana iguana", "Green Iguana"),
    ("Xenopus laevis", "African Clawed Frog"),
    ("Rana temporaria", "European Common Frog"),
    // Insects
    ("Danaus plexippus", "Monarch Butterfly"),
    ("Apis mellifera", "Western Honey Bee"),
    ("Formica rufa", "Red Wood Ant"),
    // Plants
    ("Quercus robur", "English Oak"),
    ("Pinus sylvestris", "Scots Pine"),
    ("Rosa chinensis", "China Rose"),
    ("Tulipa gesneriana", "Garden Tulip"),
    ("Bellis perennis", "Common Daisy"),
    ("Helianthus annuus", "Common Sunflower"),
    ("Orchis mascula", "Early-purple Orchid"),
    ("Phoenix dactylifera", "Date Palm"),
    ("Acer saccharum", "Sugar Maple"),
    ("Pteridium aquilinum", "Bracken Fern"),
    // Margalla Hills / Islamabad region
    ("Pinus roxburghii", "Chir Pine"),
    ("Pinus wallichiana", "Blue Pine"),
    ("Cedrus deodara", "Himalayan Cedar"),
    ("Acacia modesta", "Phulai"),
    ("Dalbergia sissoo", "Shisham"),
    ("Melia azedarach", "Chinaberry Tree"),
    ("Bauhinia variegata", "Orchid Tree"),
    ("Ficus religiosa", "Sacred Fig"),
    ("Broussonetia papyrifera", "Paper Mulberry"),
    ("Capra falconeri", "Markhor"),
    ("Panthera pardus saxicolor", "Persian Leopard"),
    ("Ursus thibetanus", "Asiatic Black Bear"),
    ("Vulpes bengalensis", "Bengal Fox"),
    ("Canis aureus", "Golden Jackal"),
    ("Hystrix indica", "Indian Crested Porcupine"),
    ("Macaca mulatta", "Rhesus Macaque"),
    ("Herpestes edwardsii", "Indian Grey Mongoose"),
    ("Francolinus pondicerianus", "Grey Francolin"),
    ("Pavo cristatus", "Indian Peafowl"),
    ("Athene brama", "Spotted Owlet"),
    ("Prinia inornata", "Plain Prinia"),
    ("Upupa epops", "Hoopoe"),
    ("Passer domesticus", "House Sparrow"),
    ("Acridotheres tristis", "Common Myna"),
    ("Psittacula krameri", "Rose-ringed Parakeet"),
    ("Corvus splendens", "House Crow"),
    ("Streptopelia decaocto", "Eurasian Collared-Dove"),
    ("Neophron percnopterus", "Egyptian Vulture"),
    ("Monticola solitarius", "Blue Rock Thrush"),
    ("Naja naja", "Indian Cobra"),
    ("Echis carinatus", "Saw-scaled Viper"),
];

/// Indexed view over [`ENTRIES`].
struct ReferenceTable {
    by_scientific: HashMap<&'static str, &'static str>,
    by_common_lower: HashMap<String, &'static str>,
}

static TABLE: LazyLock<ReferenceTable> = LazyLock::new(|| ReferenceTable {
    by_scientific: ENTRIES.iter().copied().collect(),
    by_common_lower: ENTRIES
        .iter()
        .map(|&(scientific, common)| (common.to_lowercase(), scientific))
        .collect(),
});

static BINOMIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+\s+[a-z]+$").unwrap_or_else(|e| unreachable!("binomial regex: {e}"))
});

static LABELLED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:species|scientific name|name):\s*([A-Z][a-z]+\s+[a-z]+(?:\s+var\.\s+[a-z]+)?)")
        .unwrap_or_else(|e| unreachable!("labelled name regex: {e}"))
});

/// All reference entries as `(scientific name, common name)`.
pub fn entries() -> &'static [(&'static str, &'static str)] {
    ENTRIES
}

/// Whether `name` has the shape of a binomial (`Genus species`).
pub fn is_binomial(name: &str) -> bool {
    BINOMIAL.is_match(name.trim())
}

/// Strip descriptive prefixes such as `"Scientific name: Felis catus"`.
fn clean_scientific(name: &str) -> &str {
    LABELLED_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| name.trim(), |m| m.as_str())
}

/// Look up the common name for a scientific name.
///
/// Exact match first, then case-insensitive containment in either direction.
pub fn lookup_common_name(scientific: &str) -> Option<&'static str> {
    let cleaned = clean_scientific(scientific);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(common) = TABLE.by_scientific.get(cleaned) {
        return Some(common);
    }

    let lower = cleaned.to_lowercase();
    ENTRIES
        .iter()
        .find(|(sci, _)| {
            let sci = sci.to_lowercase();
            lower.contains(&sci) || sci.contains(&lower)
        })
        .map(|&(_, common)| common)
}

/// Look up the scientific name for a common name.
///
/// Input that already looks like a binomial is returned unchanged when it
/// is not a known common name.
pub fn lookup_scientific_name(common: &str) -> Option<String> {
    let trimmed = common.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if let Some(scientific) = TABLE.by_common_lower.get(&lower) {
        return Some((*scientific).to_string());
    }

    if is_binomial(trimmed) {
        return Some(trimmed.to_string());
    }

    ENTRIES
        .iter()
        .find(|(_, name)| {
            let name = name.to_lowercase();
            lower.contains(&name) || name.contains(&lower)
        })
        .map(|&(scientific, _)| scientific.to_string())
}
