//! The generation cascade
//!
//! Each stage reads what earlier stages wrote into the `WorldState` and adds
//! its own layer. One seeded generator drives every stage in a fixed order,
//! so a seed always forges the same world.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::Catalog;
use crate::core::error::Result;
use crate::forge::config::ForgeConfig;
use crate::forge::names;
use crate::forge::output::{ForgeOutput, ForgeReport};
use crate::forge::player::PlayerCharacter;
use crate::forge::systems;
use crate::forge::world::WorldState;

/// Run the whole cascade
///
/// Recoverable shortfalls (unplaced locations, missing quest targets,
/// leaderless factions) are logged and recorded in the report. Only invalid
/// input or a broken final world is an error.
pub fn forge_world(config: &ForgeConfig, catalog: &Catalog, player: PlayerCharacter) -> Result<ForgeOutput> {
    let start = std::time::Instant::now();
    config.validate()?;
    catalog.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut report = ForgeReport::default();

    // Terrain
    let realm = names::realm(&mut rng);
    tracing::info!("Forging the realm of {} (seed {})", realm.name, config.seed);
    let map = systems::generate_terrain(&config.map, config.seed);
    let mut world = WorldState::new(config.seed, map, player, config.economy.total_gold);
    world.realm.name = realm.name.to_string();
    world.realm.capital = format!("{} City", realm.name);
    world.realm.disposition = Some(realm.disposition);

    // Locations
    let planned = systems::plan_locations(&config.locations, &world.realm.capital, &mut rng);
    let failures = systems::place_locations(&mut world, planned, config.locations.placement_attempts, &mut rng);
    report.unplaced = failures.iter().map(|f| f.name().to_string()).collect();

    // Connectivity
    report.connections = systems::connect_locations(&mut world, &config.locations, &mut rng);
    report.roads = systems::build_roads(&mut world);
    report.road_cells = world.map.road_cells();

    // Population
    systems::populate_settlements(&mut world, &config.population, catalog, &mut rng);
    systems::populate_court(&mut world, &config.population, catalog, &realm, &mut rng);
    report.npcs = world.npcs.len();

    // Factions and guilds
    report.faction_members = systems::allocate_factions(&mut world, &config.population.factions, catalog, &mut rng);
    systems::elect_leaders(&mut world);
    systems::determine_relations(&mut world);
    systems::assign_guild_abilities(&mut world, catalog, &mut rng);

    // Creatures
    report.creatures = systems::populate_dungeons(&mut world, &config.creatures, catalog, &mut rng);

    // Economy
    report.gold_distributed = systems::distribute_gold(&mut world, &config.economy);
    report.items_stocked = systems::stock_inventories(&mut world, &config.economy, catalog, &mut rng);
    systems::equip_roles(&mut world, catalog);

    // Quests
    let generic = systems::generate_generic_quests(&mut world, &config.quests, catalog, &mut rng);
    report.generic_quests = generic.generated;
    report.skipped_quests = generic.skipped;
    let chains = systems::generate_faction_chains(&mut world, catalog, &mut rng);
    report.quest_chains = chains.generated;
    report.skipped_chains = world
        .factions
        .values()
        .filter(|f| f.leader.is_none())
        .map(|f| f.kind)
        .collect();

    // Details and time
    report.wars = systems::record_wars(&mut world, &mut rng);
    systems::write_chronicle(&mut world);
    systems::write_prose(&mut world);
    systems::prepare_player(&mut world);
    systems::set_clock(&mut world, &config.time);

    world.check_consistency()?;

    report.simulation_time_ms = start.elapsed().as_millis() as u64;
    let output = ForgeOutput { world, report };
    tracing::info!("{}", output.summary());
    Ok(output)
}
