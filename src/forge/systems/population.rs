//! Families, the royal court, and the shared NPC detail routine

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{Catalog, Race};
use crate::core::types::{Attribute, NpcId, NpcStatus, Span, Stats, Tier};
use crate::forge::config::PopulationConfig;
use crate::forge::location::LocationKind;
use crate::forge::names::{self, RealmSeed};
use crate::forge::npc::{Equipment, FamilyLink, FamilyRole, Npc, Sex};
use crate::forge::world::WorldState;

const ATTRIBUTES: [Attribute; 6] = [
    Attribute::Strength,
    Attribute::Dexterity,
    Attribute::Constitution,
    Attribute::Intelligence,
    Attribute::Wisdom,
    Attribute::Charisma,
];

const PARENT_AGE: Span = Span::new(30, 55);
const CHILD_AGE: Span = Span::new(5, 16);
const RULER_AGE: Span = Span::new(40, 70);
const GUARD_AGE: Span = Span::new(19, 45);
const GARRISON_LEVEL: Span = Span::new(3, 6);

/// Weights for 0, 1 and 2 children per family
const CHILD_WEIGHTS: [u32; 3] = [4, 4, 2];

/// Who an NPC is before their details are rolled
pub struct NpcSeed {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub status: NpcStatus,
    pub race: String,
    pub family: Option<FamilyLink>,
    pub home: String,
}

/// Any race from the catalog
pub fn pick_race(catalog: &Catalog, rng: &mut ChaCha8Rng) -> String {
    catalog
        .races
        .choose(rng)
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

/// Roll level, stats, class, alignment and hit points for an NPC
///
/// Used for townsfolk, the court and guild officers alike; only the level
/// band and status differ.
pub fn npc_details(npc: &mut Npc, catalog: &Catalog, level_range: Span, rng: &mut ChaCha8Rng) {
    npc.level = Tier::clamped(level_range.sample(rng) as i32);

    let race = catalog.races.iter().find(|r| r.name == npc.race);
    npc.stats = roll_stats(race, rng);

    let preferred = catalog.classes_for(npc.status);
    let class = if preferred.is_empty() {
        catalog.classes.choose(rng)
    } else {
        preferred.choose(rng).copied()
    };
    let hit_die = class.map(|c| c.hit_die).unwrap_or(8);
    npc.class = class.map(|c| c.name.clone()).unwrap_or_default();

    npc.alignment = catalog
        .alignments
        .choose(rng)
        .map(|a| a.name.clone())
        .unwrap_or_default();

    let level = npc.level.get() as i32;
    let con = npc.stats.modifier(Attribute::Constitution);
    let per_level = (hit_die as i32 / 2 + 1 + con).max(1);
    npc.hit_points = (hit_die as i32 + con + (level - 1) * per_level).max(1) as u32;
}

/// 4d6, drop the lowest, plus racial bonuses
fn roll_stats(race: Option<&Race>, rng: &mut ChaCha8Rng) -> Stats {
    let mut stats = Stats::default();
    for attribute in ATTRIBUTES {
        let mut dice: [u8; 4] = [0; 4];
        for d in dice.iter_mut() {
            *d = rng.gen_range(1..=6);
        }
        dice.sort_unstable();
        *stats.get_mut(attribute) = dice[1] + dice[2] + dice[3];
    }
    if let Some(race) = race {
        for bonus in &race.ability_bonuses {
            let score = stats.get_mut(bonus.ability);
            *score = (*score as i16 + bonus.value as i16).clamp(1, 30) as u8;
        }
    }
    stats
}

/// Create an NPC, roll its details and register it with the world
///
/// A name someone already wears gets a numeral suffix.
pub fn spawn_npc(
    world: &mut WorldState,
    catalog: &Catalog,
    seed: NpcSeed,
    level_range: Span,
    rng: &mut ChaCha8Rng,
) -> NpcId {
    let id = world.next_npc_id();
    let name = world.register_npc_name(rng, seed.name);

    let mut npc = Npc {
        id,
        name,
        age: seed.age,
        sex: seed.sex,
        race: seed.race,
        class: String::new(),
        alignment: String::new(),
        status: seed.status,
        family: seed.family,
        faction: None,
        level: Tier::MIN,
        stats: Stats::default(),
        hit_points: 1,
        gold: 0,
        inventory: Vec::new(),
        equipment: Equipment::default(),
        abilities_for_sale: Vec::new(),
        home: seed.home,
    };
    npc_details(&mut npc, catalog, level_range, rng);

    if let Some(home) = world.locations.get_mut(&npc.home) {
        home.inhabitants.push(id);
    }
    world.npcs.insert(id, npc);
    id
}

/// Fill every placed settlement with families
pub fn populate_settlements(
    world: &mut WorldState,
    config: &PopulationConfig,
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
) -> usize {
    let settlements: Vec<String> = world
        .locations_of(LocationKind::Settlement)
        .filter(|l| l.is_placed())
        .map(|l| l.name.clone())
        .collect();

    let before = world.npcs.len();
    let mut families = 0;
    for home in &settlements {
        for _ in 0..config.families_per_settlement.sample(rng) {
            spawn_family(world, catalog, home, rng);
            families += 1;
        }
    }

    let spawned = world.npcs.len() - before;
    tracing::info!(
        "Populated {} settlements with {} families ({} NPCs)",
        settlements.len(),
        families,
        spawned
    );
    spawned
}

fn spawn_family(world: &mut WorldState, catalog: &Catalog, home: &str, rng: &mut ChaCha8Rng) {
    let family_id = world.next_family_id();
    let surname = names::family_name(rng);
    let race = pick_race(catalog, rng);

    let parents = rng.gen_range(1..=2);
    let first_sex = names::random_sex(rng);
    for i in 0..parents {
        let sex = match (i, first_sex) {
            (0, sex) => sex,
            (_, Sex::Male) => Sex::Female,
            (_, Sex::Female) => Sex::Male,
        };
        let seed = NpcSeed {
            name: world.draw_npc_name(rng, |rng| format!("{} {}", names::given_name(rng, sex), surname)),
            age: PARENT_AGE.sample(rng),
            sex,
            status: NpcStatus::Commoner,
            race: race.clone(),
            family: Some(FamilyLink {
                family_id,
                role: FamilyRole::Parent,
            }),
            home: home.to_string(),
        };
        spawn_npc(world, catalog, seed, NpcStatus::Commoner.level_range(), rng);
    }

    let children = WeightedIndex::new(CHILD_WEIGHTS)
        .map(|dist| dist.sample(rng))
        .unwrap_or(0);
    for _ in 0..children {
        let sex = names::random_sex(rng);
        let seed = NpcSeed {
            name: world.draw_npc_name(rng, |rng| format!("{} {}", names::given_name(rng, sex), surname)),
            age: CHILD_AGE.sample(rng),
            sex,
            status: NpcStatus::Child,
            race: race.clone(),
            family: Some(FamilyLink {
                family_id,
                role: FamilyRole::Child,
            }),
            home: home.to_string(),
        };
        spawn_npc(world, catalog, seed, NpcStatus::Child.level_range(), rng);
    }

    tracing::debug!("Family {} ({}) settled in {}", family_id, surname, home);
}

/// Seat the ruler and garrison in the capital
///
/// Court NPCs have no family and never join a faction.
pub fn populate_court(
    world: &mut WorldState,
    config: &PopulationConfig,
    catalog: &Catalog,
    realm: &RealmSeed,
    rng: &mut ChaCha8Rng,
) -> usize {
    let capital = world.realm.capital.clone();
    if !world.locations.get(&capital).is_some_and(|l| l.is_placed()) {
        tracing::warn!("Capital {} was not placed; realm has no court", capital);
        return 0;
    }

    let sex = names::random_sex(rng);
    let ruler = NpcSeed {
        name: world.draw_npc_name(rng, |rng| format!("{} {}", realm.ruler_title, names::given_name(rng, sex))),
        age: RULER_AGE.sample(rng),
        sex,
        status: NpcStatus::Ruler,
        race: pick_race(catalog, rng),
        family: None,
        home: capital.clone(),
    };
    let ruler_id = spawn_npc(world, catalog, ruler, NpcStatus::Ruler.level_range(), rng);
    world.realm.ruler = Some(ruler_id);

    for _ in 0..config.garrison_size {
        let sex = names::random_sex(rng);
        let guard = NpcSeed {
            name: world.draw_npc_name(rng, |rng| {
                format!("{} {}", names::given_name(rng, sex), names::family_name(rng))
            }),
            age: GUARD_AGE.sample(rng),
            sex,
            status: NpcStatus::Guard,
            race: pick_race(catalog, rng),
            family: None,
            home: capital.clone(),
        };
        let id = spawn_npc(world, catalog, guard, GARRISON_LEVEL, rng);
        world.realm.garrison.push(id);
    }

    tracing::info!(
        "Court of {}: {} and {} guards",
        world.realm.name,
        world.npc_name(ruler_id),
        world.realm.garrison.len()
    );
    1 + world.realm.garrison.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{Coord, Grid};
    use crate::core::types::Size;
    use crate::forge::location::Location;
    use crate::forge::map::{Terrain, WorldMap};
    use crate::forge::player::PlayerCharacter;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, BTreeSet};

    fn world_with_settlement() -> WorldState {
        let map = WorldMap::from_terrain(Grid::filled(20, 20, Terrain::Plains));
        let mut world = WorldState::new(42, map, PlayerCharacter::default(), 0);
        for (name, kind, size) in [
            ("Eldoria City", LocationKind::Capital, 8),
            ("Oakwood", LocationKind::Settlement, 3),
        ] {
            let mut loc = Location::new(name, kind, Size::square(size), Tier::MIN);
            loc.coordinates = Some(Coord::new(if size == 8 { 0 } else { 10 }, 0));
            world.locations.insert(name.into(), loc);
        }
        world.realm.capital = "Eldoria City".into();
        world.realm.name = "Eldoria".into();
        world
    }

    #[test]
    fn test_families_have_parents_and_children() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_settlement();
        let config = PopulationConfig::default();
        let spawned = populate_settlements(&mut world, &config, &catalog, &mut rng);

        assert_eq!(spawned, world.npcs.len());
        assert!(spawned >= 2);
        assert_eq!(world.locations["Oakwood"].inhabitants.len(), spawned);
        for npc in world.npcs.values() {
            let link = npc.family.unwrap();
            match link.role {
                FamilyRole::Parent => {
                    assert!((30..=55).contains(&npc.age));
                    assert_eq!(npc.status, NpcStatus::Commoner);
                }
                FamilyRole::Child => {
                    assert!((5..=16).contains(&npc.age));
                    assert_eq!(npc.status, NpcStatus::Child);
                    assert_eq!(npc.level, Tier::MIN);
                }
            }
        }
    }

    #[test]
    fn test_families_share_a_race() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_settlement();
        let config = PopulationConfig {
            families_per_settlement: Span::new(12, 12),
            ..PopulationConfig::default()
        };
        populate_settlements(&mut world, &config, &catalog, &mut rng);

        let mut races: BTreeMap<u32, &str> = BTreeMap::new();
        for npc in world.npcs.values() {
            let family = npc.family.unwrap().family_id;
            let race = races.entry(family).or_insert(npc.race.as_str());
            assert_eq!(*race, npc.race, "{} breaks family {}", npc.name, family);
        }
        assert_eq!(races.len(), 12);
    }

    #[test]
    fn test_npc_names_are_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_settlement();
        // Far more people than the name tables have given/family pairs
        let config = PopulationConfig {
            families_per_settlement: Span::new(150, 150),
            ..PopulationConfig::default()
        };
        populate_settlements(&mut world, &config, &catalog, &mut rng);
        let realm = names::realm(&mut rng);
        populate_court(&mut world, &config, &catalog, &realm, &mut rng);

        let names: BTreeSet<&str> = world.npcs.values().map(|n| n.name.as_str()).collect();
        assert_eq!(names.len(), world.npcs.len());
    }

    #[test]
    fn test_court_is_not_faction_eligible() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_settlement();
        let realm = names::realm(&mut rng);
        let count = populate_court(&mut world, &PopulationConfig::default(), &catalog, &realm, &mut rng);
        assert_eq!(count, 5);

        let ruler = &world.npcs[&world.realm.ruler.unwrap()];
        assert!((8..=10).contains(&ruler.level.get()));
        assert!(!ruler.is_faction_eligible());
        for id in &world.realm.garrison {
            let guard = &world.npcs[id];
            assert!((3..=6).contains(&guard.level.get()));
            assert!(!guard.is_faction_eligible());
        }
    }

    #[test]
    fn test_npc_details_fill_the_record() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_settlement();
        let seed = NpcSeed {
            name: "Sigrid Greymane".into(),
            age: 40,
            sex: Sex::Female,
            status: NpcStatus::Mage,
            race: "Elf".into(),
            family: None,
            home: "Oakwood".into(),
        };
        let id = spawn_npc(&mut world, &catalog, seed, Span::new(5, 10), &mut rng);
        let npc = &world.npcs[&id];
        assert!((5..=10).contains(&npc.level.get()));
        assert_eq!(npc.class, "Wizard");
        assert!(!npc.alignment.is_empty());
        assert!(npc.hit_points >= 1);
        assert!(npc.stats.get(Attribute::Strength) >= 3);
    }
}
