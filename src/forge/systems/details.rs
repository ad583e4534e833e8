//! Finishing touches: history, chronicle hooks, scenery, the player's start and the clock

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::forge::config::TimeConfig;
use crate::forge::faction::Relation;
use crate::forge::map::Biome;
use crate::forge::names;
use crate::forge::world::{ChronicleTrigger, GameTime, WarHistory, WorldState};

pub const DEATH_KEY: &str = "NPC_DEATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Day,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weather {
    Clear,
    Rain,
    Fog,
}

const PHASES: [DayPhase; 2] = [DayPhase::Day, DayPhase::Night];
const WEATHERS: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Fog];

/// Hand-written scenes that replace the stock sentence
const SCENES: [(&str, &str); 9] = [
    (
        "FOREST_DAY_CLEAR",
        "Sunlight breaks through the canopy in shifting patches. Insects hum and birds call somewhere out of sight.",
    ),
    (
        "FOREST_NIGHT_RAIN",
        "Rain drums steadily on the leaves overhead. Beyond the nearest wet trunks the woods are silent and smell of soaked earth.",
    ),
    (
        "MOUNTAINS_DAY_CLEAR",
        "The air is thin and sharp. Grey peaks cut into a deep blue sky, and the lowlands spread out far below like a map.",
    ),
    (
        "MOUNTAINS_NIGHT_FOG",
        "Cold fog swallows the slope. Sound dies a few feet away and the world is a grey, silent void.",
    ),
    (
        "PLAINS_DAY_CLEAR",
        "Grass rolls in the breeze to a flat horizon under an enormous sky. There is nowhere to hide and no one in sight.",
    ),
    (
        "SWAMP_NIGHT_RAIN",
        "Warm rain hisses on black standing water. Something gurgles among the twisted trees and the air is thick with rot.",
    ),
    (
        "COAST_NIGHT_FOG",
        "Surf booms somewhere inside the fog. A lighthouse glow comes and goes and the rocks drip with salt.",
    ),
    (
        "UNDERGROUND_DAY_CLEAR",
        "Still, stale air and the drip of water. Whatever the sky is doing, it does not reach down here.",
    ),
    (
        "RUINS_NIGHT_CLEAR",
        "Moonlight picks out broken columns and a toppled statue. Every shadow between the stones could hold a watcher.",
    ),
];

pub fn prose_key(biome: Biome, phase: DayPhase, weather: Weather) -> String {
    format!("{:?}_{:?}_{:?}", biome, phase, weather).to_uppercase()
}

fn setting(biome: Biome) -> &'static str {
    match biome {
        Biome::Coast => "on a windswept coast",
        Biome::Plains => "out on the open plains",
        Biome::Forest => "deep in the forest",
        Biome::Hills => "among rolling hills",
        Biome::Mountains => "high in the mountains",
        Biome::Swamp => "knee-deep in a swamp",
        Biome::Underground => "far underground",
        Biome::Ruins => "among crumbling ruins",
    }
}

fn sky(weather: Weather) -> &'static str {
    match weather {
        Weather::Clear => "the air is clear",
        Weather::Rain => "rain is falling",
        Weather::Fog => "fog hangs low",
    }
}

/// Scene text for every biome, time of day and weather
pub fn write_prose(world: &mut WorldState) -> usize {
    let mut prose = std::collections::BTreeMap::new();
    for biome in Biome::ALL {
        for phase in PHASES {
            for weather in WEATHERS {
                let key = prose_key(biome, phase, weather);
                let text = match SCENES.iter().find(|(k, _)| *k == key) {
                    Some((_, scene)) => scene.to_string(),
                    None => format!(
                        "You are {} by {} and {}.",
                        setting(biome),
                        match phase {
                            DayPhase::Day => "day",
                            DayPhase::Night => "night",
                        },
                        sky(weather)
                    ),
                };
                prose.insert(key, text);
            }
        }
    }
    world.prose = prose;
    tracing::debug!("Wrote {} scene descriptions", world.prose.len());
    world.prose.len()
}

/// One war for every hostile faction pair
pub fn record_wars(world: &mut WorldState, rng: &mut ChaCha8Rng) -> usize {
    let hostile: Vec<_> = world
        .relations
        .pairs()
        .filter(|(_, _, r)| *r == Relation::Hostile)
        .map(|(a, b, _)| (a, b))
        .collect();

    for (a, b) in hostile {
        let (aggressor, defender) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
        let name = names::war_name(rng, aggressor.name(), defender.name());
        let years = rng.gen_range(3..=80);
        world.histories.push(WarHistory {
            summary: format!(
                "{} years ago the {} struck first against the {}. Neither side has forgotten.",
                years, aggressor, defender
            ),
            name,
            aggressor,
            defender,
        });
    }

    tracing::info!("Recorded {} wars", world.histories.len());
    world.histories.len()
}

/// Hooks the narrator fires when a ruler or faction leader dies
pub fn write_chronicle(world: &mut WorldState) -> usize {
    let mut triggers = Vec::new();

    if let Some(ruler) = world.realm.ruler.and_then(|id| world.npcs.get(&id)) {
        triggers.push(ChronicleTrigger {
            key: format!("{}:{}", DEATH_KEY, ruler.name),
            outcome: format!(
                "{} mourns its ruler. The throne of {} stands empty and the garrison looks for a new master.",
                world.realm.name, world.realm.capital
            ),
        });
    }

    for faction in world.factions.values() {
        let Some(leader) = faction.leader.and_then(|id| world.npcs.get(&id)) else {
            continue;
        };
        let mut outcome = format!("The {} falls into disarray.", faction.name);
        if let Some(heir) = faction.right_hand.and_then(|id| world.npcs.get(&id)) {
            outcome.push_str(&format!(" {} seizes command.", heir.name));
        }
        if let Some(enemy) = world.relations.hostile_to(faction.kind).first() {
            outcome.push_str(&format!(" The {} moves to exploit the weakness.", enemy));
        }
        triggers.push(ChronicleTrigger {
            key: format!("{}:{}", DEATH_KEY, leader.name),
            outcome,
        });
    }

    tracing::debug!("Wrote {} chronicle triggers", triggers.len());
    world.chronicle = triggers;
    world.chronicle.len()
}

/// The player starts in the capital with neutral standing everywhere
pub fn prepare_player(world: &mut WorldState) {
    let capital = world.realm.capital.clone();
    if world.locations.get(&capital).is_some_and(|l| l.is_placed()) {
        world.player.learn_location(&capital);
    }
    for kind in world.factions.keys() {
        world.player.reputation.entry(*kind).or_insert(0);
    }
}

pub fn set_clock(world: &mut WorldState, config: &TimeConfig) {
    world.time = GameTime::new(config.start_day, config.start_hour);
    tracing::debug!("World clock set to {}", world.time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{Coord, Grid};
    use crate::core::types::{FactionKind, NpcStatus, Size, Span, Tier};
    use crate::forge::faction::Faction;
    use crate::forge::location::{Location, LocationKind};
    use crate::forge::map::{Terrain, WorldMap};
    use crate::forge::npc::Sex;
    use crate::forge::player::PlayerCharacter;
    use crate::forge::systems::population::{spawn_npc, NpcSeed};
    use rand::SeedableRng;

    fn world() -> WorldState {
        let map = WorldMap::from_terrain(Grid::filled(10, 10, Terrain::Plains));
        WorldState::new(42, map, PlayerCharacter::default(), 0)
    }

    #[test]
    fn test_one_war_per_hostile_pair() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut world = world();
        world.relations.set(FactionKind::RoyalGuard, FactionKind::ThievesGuild, Relation::Hostile);
        world.relations.set(FactionKind::RoyalGuard, FactionKind::MagesGuild, Relation::Allied);
        world.relations.set(FactionKind::MagesGuild, FactionKind::ThievesGuild, Relation::Hostile);

        assert_eq!(record_wars(&mut world, &mut rng), 2);
        for war in &world.histories {
            assert_ne!(war.aggressor, war.defender);
            assert_eq!(world.relations.get(war.aggressor, war.defender), Some(Relation::Hostile));
        }
    }

    #[test]
    fn test_leaderless_factions_get_no_trigger() {
        let mut world = world();
        world.factions.insert(FactionKind::MagesGuild, Faction::new(FactionKind::MagesGuild));
        assert_eq!(write_chronicle(&mut world), 0);
    }

    #[test]
    fn test_player_knows_placed_capital() {
        let mut world = world();
        let mut capital = Location::new("Eldoria City", LocationKind::Capital, Size::square(8), Tier::MIN);
        capital.coordinates = Some(Coord::new(1, 1));
        world.locations.insert(capital.name.clone(), capital);
        world.realm.capital = "Eldoria City".into();
        world.factions.insert(FactionKind::CrimsonHand, Faction::new(FactionKind::CrimsonHand));

        prepare_player(&mut world);
        prepare_player(&mut world);
        assert_eq!(world.player.known_locations, vec!["Eldoria City"]);
        assert_eq!(world.player.reputation[&FactionKind::CrimsonHand], 0);
    }

    #[test]
    fn test_prose_covers_every_scene() {
        let mut world = world();
        assert_eq!(write_prose(&mut world), Biome::ALL.len() * 6);
        assert!(world.prose["FOREST_DAY_CLEAR"].starts_with("Sunlight"));
        assert_eq!(
            world.prose["HILLS_NIGHT_FOG"],
            "You are among rolling hills by night and fog hangs low."
        );
        for (key, _) in SCENES {
            assert!(world.prose.contains_key(key), "{} is never generated", key);
        }
    }

    #[test]
    fn test_chronicle_keys_are_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = crate::catalog::Catalog::embedded().unwrap();
        let mut world = world();
        let mut town = Location::new("Oakwood", LocationKind::Settlement, Size::square(3), Tier::MIN);
        town.coordinates = Some(Coord::new(0, 0));
        world.locations.insert(town.name.clone(), town);
        for kind in [FactionKind::MagesGuild, FactionKind::MerchantsGuild] {
            let seed = NpcSeed {
                name: "Astrid Swiftfoot".into(),
                age: 40,
                sex: Sex::Female,
                status: NpcStatus::Commoner,
                race: "Human".into(),
                family: None,
                home: "Oakwood".into(),
            };
            let id = spawn_npc(&mut world, &catalog, seed, Span::new(1, 3), &mut rng);
            let mut faction = Faction::new(kind);
            faction.members = vec![id];
            faction.leader = Some(id);
            world.factions.insert(kind, faction);
        }

        assert_eq!(write_chronicle(&mut world), 2);
        let mut keys: Vec<&str> = world.chronicle.iter().map(|t| t.key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["NPC_DEATH:Astrid Swiftfoot", "NPC_DEATH:Astrid Swiftfoot II"]);
    }

    #[test]
    fn test_clock_from_config() {
        let mut world = world();
        set_clock(&mut world, &TimeConfig { start_day: 3, start_hour: 21 });
        assert_eq!(world.time.to_string(), "Day 3, 21:00");
    }
}
