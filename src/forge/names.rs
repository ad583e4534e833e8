//! Name tables

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::Disposition;
use crate::forge::npc::Sex;

const SETTLEMENT_PREFIXES: &[&str] = &["Oak", "Green", "Stone", "River", "Clear", "Iron", "White"];
const SETTLEMENT_SUFFIXES: &[&str] = &["wood", "haven", "bridge", "creek", "fall", "dale", "watch"];

const DUNGEON_PREFIXES: &[&str] = &["Gloom", "Shadow", "Blood", "Skull", "Whispering", "Forgotten"];
const DUNGEON_SUFFIXES: &[&str] = &["Caverns", "Crypt", "Lair", "Ruins", "Tomb", "Spire"];

const ISLAND_NAMES: &[&str] = &["Gull", "Mist", "Saltmarrow", "Thornholm", "Keel", "Driftwood"];

const MALE_NAMES: &[&str] = &[
    "Roric", "Gunnar", "Falk", "Bjorn", "Sten", "Arne", "Erik", "Ulf", "Halvard", "Torvin", "Leif", "Osric",
];
const FEMALE_NAMES: &[&str] = &[
    "Astrid", "Freya", "Ingrid", "Sigrid", "Hilda", "Gerda", "Sif", "Ragna", "Solveig", "Thyra", "Edda", "Runa",
];
const FAMILY_NAMES: &[&str] = &[
    "Ironhand", "Stonefist", "Longbeard", "Swiftfoot", "Greymane", "Ashford", "Brightwater", "Oakenshield",
    "Ravenhill", "Thornwood",
];

/// Realm name, its moral bent and what its ruler is called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealmSeed {
    pub name: &'static str,
    pub disposition: Disposition,
    pub ruler_title: &'static str,
}

const REALMS: [RealmSeed; 4] = [
    RealmSeed {
        name: "Eldoria",
        disposition: Disposition::LawfulGood,
        ruler_title: "King",
    },
    RealmSeed {
        name: "Zarthus",
        disposition: Disposition::LawfulEvil,
        ruler_title: "Sorcerer-King",
    },
    RealmSeed {
        name: "Silverwood",
        disposition: Disposition::TrueNeutral,
        ruler_title: "Archdruid",
    },
    RealmSeed {
        name: "Blacksail Archipelago",
        disposition: Disposition::ChaoticEvil,
        ruler_title: "Pirate King",
    },
];

const WAR_NAMES: &[&str] = &[
    "The War of {a} and {b}",
    "The {a} Uprising",
    "The Long Feud of {b}",
    "The Night of Broken Oaths",
];

fn pick<'a>(rng: &mut ChaCha8Rng, table: &[&'a str]) -> &'a str {
    table.choose(rng).copied().unwrap_or("Nameless")
}

/// Draw names from `make` until one is not yet taken; numbered suffixes break ties
pub fn unique(
    rng: &mut ChaCha8Rng,
    taken: &mut AHashSet<String>,
    make: impl Fn(&mut ChaCha8Rng) -> String,
) -> String {
    for _ in 0..16 {
        let name = make(rng);
        if taken.insert(name.clone()) {
            return name;
        }
    }
    let base = make(rng);
    let mut n = 2;
    loop {
        let name = format!("{} {}", base, roman(n));
        if taken.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}

fn roman(n: u32) -> String {
    const NUMERALS: [(u32, &str); 9] = [
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut rest = n;
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while rest >= value {
            out.push_str(numeral);
            rest -= value;
        }
    }
    out
}

pub fn realm(rng: &mut ChaCha8Rng) -> RealmSeed {
    REALMS[rng.gen_range(0..REALMS.len())]
}

pub fn settlement_name(rng: &mut ChaCha8Rng, taken: &mut AHashSet<String>) -> String {
    unique(rng, taken, |rng| {
        format!("{}{}", pick(rng, SETTLEMENT_PREFIXES), pick(rng, SETTLEMENT_SUFFIXES))
    })
}

pub fn dungeon_name(rng: &mut ChaCha8Rng, taken: &mut AHashSet<String>) -> String {
    unique(rng, taken, |rng| {
        format!("{} {}", pick(rng, DUNGEON_PREFIXES), pick(rng, DUNGEON_SUFFIXES))
    })
}

pub fn island_name(rng: &mut ChaCha8Rng, taken: &mut AHashSet<String>) -> String {
    unique(rng, taken, |rng| format!("Isle of {}", pick(rng, ISLAND_NAMES)))
}

pub fn given_name(rng: &mut ChaCha8Rng, sex: Sex) -> &'static str {
    match sex {
        Sex::Male => pick(rng, MALE_NAMES),
        Sex::Female => pick(rng, FEMALE_NAMES),
    }
}

pub fn family_name(rng: &mut ChaCha8Rng) -> &'static str {
    pick(rng, FAMILY_NAMES)
}

pub fn random_sex(rng: &mut ChaCha8Rng) -> Sex {
    if rng.gen_bool(0.5) {
        Sex::Male
    } else {
        Sex::Female
    }
}

pub fn war_name(rng: &mut ChaCha8Rng, a: &str, b: &str) -> String {
    pick(rng, WAR_NAMES).replace("{a}", a).replace("{b}", b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_names_never_repeat() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut taken = AHashSet::new();
        // More draws than the table has combinations of dungeon names
        let names: Vec<String> = (0..60).map(|_| dungeon_name(&mut rng, &mut taken)).collect();
        let distinct: AHashSet<&String> = names.iter().collect();
        assert_eq!(distinct.len(), names.len());
    }

    #[test]
    fn test_exhausted_table_falls_back_to_numerals() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut taken = AHashSet::new();
        let first = unique(&mut rng, &mut taken, |_| "Astrid Swiftfoot".to_string());
        let second = unique(&mut rng, &mut taken, |_| "Astrid Swiftfoot".to_string());
        assert_eq!(first, "Astrid Swiftfoot");
        assert_eq!(second, "Astrid Swiftfoot II");
    }

    #[test]
    fn test_roman_suffixes() {
        assert_eq!(roman(2), "II");
        assert_eq!(roman(4), "IV");
        assert_eq!(roman(14), "XIV");
    }

    #[test]
    fn test_names_are_seed_stable() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            settlement_name(&mut a, &mut AHashSet::new()),
            settlement_name(&mut b, &mut AHashSet::new())
        );
    }
}
