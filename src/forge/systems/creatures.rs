//! Dungeon creature placement

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{Catalog, CreatureTemplate};
use crate::core::grid::{Coord, Footprint};
use crate::core::types::Tier;
use crate::forge::config::CreatureConfig;
use crate::forge::creature::{Creature, CreatureRank};
use crate::forge::location::LocationKind;
use crate::forge::world::WorldState;

/// Templates at exactly `tier`, or failing that at the nearest tier present
pub fn templates_near<'a>(
    templates: impl Iterator<Item = &'a CreatureTemplate>,
    tier: Tier,
) -> Vec<&'a CreatureTemplate> {
    let all: Vec<&CreatureTemplate> = templates.collect();
    let Some(best) = all.iter().map(|t| t.tier.distance(tier)).min() else {
        return Vec::new();
    };
    all.into_iter().filter(|t| t.tier.distance(tier) == best).collect()
}

/// Creatures a footprint of `area` cells holds at `density`; never zero
pub fn creature_count(area: usize, density: f64) -> usize {
    ((area as f64 * density).ceil() as usize).max(1)
}

/// Stock every placed dungeon with creatures, plus a boss in the deadliest
pub fn populate_dungeons(
    world: &mut WorldState,
    config: &CreatureConfig,
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
) -> usize {
    let dungeons: Vec<(String, Footprint, Tier)> = world
        .locations_of(LocationKind::Dungeon)
        .filter_map(|l| l.footprint().map(|fp| (l.name.clone(), fp, l.challenge)))
        .collect();

    let before = world.creatures.len();
    let mut bosses = 0;
    for (name, footprint, challenge) in &dungeons {
        let count = creature_count(footprint.size.area(), config.density);
        for _ in 0..count {
            let wanted = challenge.offset(rng.gen_range(-1..=1));
            let pool = templates_near(catalog.regular_creatures(), wanted);
            let Some(template) = pool.choose(rng) else { continue };
            let at = Coord::new(
                rng.gen_range(footprint.origin.x..footprint.right()),
                rng.gen_range(footprint.origin.y..footprint.bottom()),
            );
            spawn(world, template, name, at, template.tier, CreatureRank::for_tier(template.tier));
        }

        if *challenge >= config.boss_threshold {
            let pool = templates_near(catalog.boss_creatures(), *challenge);
            if let Some(template) = pool.first() {
                spawn(world, template, name, footprint.center(), *challenge, CreatureRank::Boss);
                bosses += 1;
                tracing::debug!("{} guards {}", template.name, name);
            }
        }
    }

    let spawned = world.creatures.len() - before;
    tracing::info!(
        "Placed {} creatures ({} bosses) in {} dungeons",
        spawned,
        bosses,
        dungeons.len()
    );
    spawned
}

fn spawn(
    world: &mut WorldState,
    template: &CreatureTemplate,
    dungeon: &str,
    at: Coord,
    tier: Tier,
    rank: CreatureRank,
) {
    let id = world.next_creature_id();
    world.creatures.insert(
        id,
        Creature {
            id,
            name: template.name.clone(),
            dungeon: dungeon.to_string(),
            coordinates: at,
            tier,
            rank,
            xp: template.xp,
            loot: Vec::new(),
            gold: 0,
        },
    );
}
