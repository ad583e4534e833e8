//! Guild officers and the abilities they teach

use rand_chacha::ChaCha8Rng;

use crate::catalog::Catalog;
use crate::core::types::{NpcId, Span, Tier};
use crate::forge::systems::population::npc_details;
use crate::forge::world::WorldState;

const OFFICER_LEVEL: Span = Span::new(5, 10);
const BASIC_TIER: u8 = 2;

/// Leaders teach the advanced abilities of their guild, right hands the basic ones
///
/// Leaderless factions are skipped.
pub fn assign_guild_abilities(world: &mut WorldState, catalog: &Catalog, rng: &mut ChaCha8Rng) -> usize {
    let basic = Tier::clamped(BASIC_TIER as i32);
    let mut officers: Vec<(NpcId, Vec<String>)> = Vec::new();

    for faction in world.factions.values() {
        let Some(leader) = faction.leader else {
            tracing::debug!("{} has no leader; no abilities on offer", faction.name);
            continue;
        };
        let (advanced, basics): (Vec<_>, Vec<_>) = catalog
            .guild_abilities(faction.kind)
            .partition(|a| a.tier > basic);

        officers.push((leader, advanced.into_iter().map(|a| a.name.clone()).collect()));
        if let Some(right_hand) = faction.right_hand {
            officers.push((right_hand, basics.into_iter().map(|a| a.name.clone()).collect()));
        }
    }

    let mut offered = 0;
    for (id, mut abilities) in officers {
        let Some(npc) = world.npcs.get_mut(&id) else { continue };
        abilities.sort();
        offered += abilities.len();
        npc.abilities_for_sale = abilities;
        npc_details(npc, catalog, OFFICER_LEVEL, rng);
        tracing::debug!("{} teaches {:?}", npc.name, npc.abilities_for_sale);
    }

    tracing::info!("Guild officers offer {} abilities", offered);
    offered
}
