//! Finite gold pool, inventories and role equipment

use std::collections::BTreeMap;

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{role_gear, Catalog, Item, ItemKind};
use crate::core::types::{EntityRef, NpcStatus};
use crate::forge::config::EconomyConfig;
use crate::forge::creature::CreatureRank;
use crate::forge::world::WorldState;

const ALL_KINDS: &[ItemKind] = &[ItemKind::Weapon, ItemKind::Armor, ItemKind::Misc, ItemKind::Consumable];
const LOOT_KINDS: &[ItemKind] = &[ItemKind::Misc, ItemKind::Consumable];

/// Scores are scaled by ten so the family bonus stays integral
const SCORE_SCALE: u64 = 10;

pub fn status_wealth(status: NpcStatus) -> u64 {
    match status {
        NpcStatus::Ruler => 40,
        NpcStatus::Merchant => 15,
        NpcStatus::Mage => 12,
        NpcStatus::Thief => 10,
        NpcStatus::Cultist => 9,
        NpcStatus::Guard => 8,
        NpcStatus::Commoner => 3,
        NpcStatus::Child => 0,
    }
}

pub fn rank_wealth(rank: CreatureRank) -> u64 {
    match rank {
        CreatureRank::Boss => 50,
        CreatureRank::Hard => 10,
        CreatureRank::Medium => 5,
        CreatureRank::Easy => 2,
    }
}

/// Item kinds an entity shops for
fn shopping_list(entity: EntityRef, world: &WorldState) -> &'static [ItemKind] {
    match entity {
        EntityRef::Creature(_) => LOOT_KINDS,
        EntityRef::Npc(id) => match world.npcs.get(&id).map(|n| n.status) {
            Some(NpcStatus::Guard) => &[ItemKind::Weapon, ItemKind::Armor],
            Some(NpcStatus::Thief) => &[ItemKind::Weapon, ItemKind::Misc],
            _ => ALL_KINDS,
        },
    }
}

/// Wealth score of every NPC and creature
///
/// With the family bonus each extra family member adds a tenth of the base.
pub fn wealth_scores(world: &WorldState, family_bonus: bool) -> BTreeMap<EntityRef, u64> {
    let mut family_sizes: AHashMap<u32, u64> = AHashMap::new();
    for npc in world.npcs.values() {
        if let Some(link) = npc.family {
            *family_sizes.entry(link.family_id).or_default() += 1;
        }
    }

    let mut scores = BTreeMap::new();
    for npc in world.npcs.values() {
        let size = npc
            .family
            .and_then(|link| family_sizes.get(&link.family_id).copied())
            .unwrap_or(1);
        let multiplier = if family_bonus {
            SCORE_SCALE + size - 1
        } else {
            SCORE_SCALE
        };
        scores.insert(EntityRef::Npc(npc.id), status_wealth(npc.status) * multiplier);
    }
    for creature in world.creatures.values() {
        scores.insert(
            EntityRef::Creature(creature.id),
            rank_wealth(creature.rank) * SCORE_SCALE,
        );
    }
    scores
}

/// Proportional floor split of `total_gold`; `None` when every score is zero
pub fn split_gold(scores: &BTreeMap<EntityRef, u64>, total_gold: u64) -> Option<BTreeMap<EntityRef, u64>> {
    let total_score: u128 = scores.values().map(|s| *s as u128).sum();
    if total_score == 0 {
        return None;
    }
    Some(
        scores
            .iter()
            .map(|(entity, score)| {
                let share = *score as u128 * total_gold as u128 / total_score;
                (*entity, share as u64)
            })
            .collect(),
    )
}

/// Share the world's gold pool out by wealth score
pub fn distribute_gold(world: &mut WorldState, config: &EconomyConfig) -> u64 {
    let scores = wealth_scores(world, config.family_bonus);
    let Some(shares) = split_gold(&scores, world.total_gold) else {
        tracing::warn!(
            "Total wealth score of {} entities is zero; no gold distributed",
            scores.len()
        );
        return 0;
    };

    for (entity, gold) in &shares {
        match entity {
            EntityRef::Npc(id) => {
                if let Some(npc) = world.npcs.get_mut(id) {
                    npc.gold = *gold;
                }
            }
            EntityRef::Creature(id) => {
                if let Some(creature) = world.creatures.get_mut(id) {
                    creature.gold = *gold;
                }
            }
        }
    }

    let distributed: u64 = shares.values().sum();
    tracing::info!(
        "Distributed {} of {} gold across {} entities",
        distributed,
        world.total_gold,
        shares.len()
    );
    distributed
}

/// Buy random affordable items until the budget runs dry
pub fn shop(items: &[&Item], mut budget: u64, rng: &mut ChaCha8Rng) -> Vec<String> {
    let mut bought = Vec::new();
    loop {
        let affordable: Vec<&&Item> = items
            .iter()
            .filter(|i| i.value > 0 && i.value <= budget)
            .collect();
        let Some(item) = affordable.choose(rng) else { break };
        budget -= item.value;
        bought.push(item.name.clone());
    }
    bought
}

/// Spend a random slice of each holder's gold on goods
///
/// Gold balances are left untouched; the budget only shapes what they own.
pub fn stock_inventories(
    world: &mut WorldState,
    config: &EconomyConfig,
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
) -> usize {
    let mut holders: Vec<(EntityRef, u64)> = world
        .npcs
        .values()
        .map(|n| (EntityRef::Npc(n.id), n.gold))
        .chain(world.creatures.values().map(|c| (EntityRef::Creature(c.id), c.gold)))
        .filter(|(_, gold)| *gold > 0)
        .collect();
    holders.sort();

    let mut total_items = 0;
    for (entity, gold) in holders {
        let kinds = shopping_list(entity, world);
        let items: Vec<&Item> = catalog.items.iter().filter(|i| kinds.contains(&i.kind)).collect();
        let fraction = rng.gen_range(config.budget_fraction_min..=config.budget_fraction_max);
        let budget = (gold as f64 * fraction).floor() as u64;
        let goods = shop(&items, budget, rng);
        total_items += goods.len();

        match entity {
            EntityRef::Npc(id) => {
                if let Some(npc) = world.npcs.get_mut(&id) {
                    npc.inventory = goods;
                }
            }
            EntityRef::Creature(id) => {
                if let Some(creature) = world.creatures.get_mut(&id) {
                    creature.loot = goods;
                }
            }
        }
    }

    tracing::info!("Stocked {} items into inventories and loot", total_items);
    total_items
}

/// Outfit each NPC with its role's fixed gear, overwriting those slots
pub fn equip_roles(world: &mut WorldState, catalog: &Catalog) -> usize {
    let mut equipped = 0;
    for npc in world.npcs.values_mut() {
        for name in role_gear(npc.status) {
            let Some(slot) = catalog.item(name).and_then(|i| i.slot) else {
                continue;
            };
            npc.equipment.equip(slot, *name);
            equipped += 1;
        }
    }
    tracing::debug!("Equipped {} gear pieces", equipped);
    equipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CreatureId, NpcId};
    use rand::SeedableRng;

    #[test]
    fn test_split_is_exact_when_divisible() {
        let mut scores = BTreeMap::new();
        scores.insert(EntityRef::Npc(NpcId(1)), 10);
        scores.insert(EntityRef::Creature(CreatureId(1)), 30);
        let shares = split_gold(&scores, 100).unwrap();
        assert_eq!(shares[&EntityRef::Npc(NpcId(1))], 25);
        assert_eq!(shares[&EntityRef::Creature(CreatureId(1))], 75);
    }

    #[test]
    fn test_split_floors_and_never_exceeds_pool() {
        let mut scores = BTreeMap::new();
        for i in 0..3 {
            scores.insert(EntityRef::Npc(NpcId(i)), 1);
        }
        let shares = split_gold(&scores, 100).unwrap();
        let total: u64 = shares.values().sum();
        assert_eq!(total, 99);
        assert!(shares.values().all(|g| *g == 33));
    }

    #[test]
    fn test_zero_scores_skip_distribution() {
        let mut scores = BTreeMap::new();
        scores.insert(EntityRef::Npc(NpcId(1)), 0);
        assert!(split_gold(&scores, 100).is_none());
        assert!(split_gold(&BTreeMap::new(), 100).is_none());
    }

    #[test]
    fn test_children_only_world_keeps_its_gold() {
        use crate::core::grid::Grid;
        use crate::core::types::Span;
        use crate::forge::map::{Terrain, WorldMap};
        use crate::forge::npc::Sex;
        use crate::forge::player::PlayerCharacter;
        use crate::forge::systems::population::{spawn_npc, NpcSeed};

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let map = WorldMap::from_terrain(Grid::filled(4, 4, Terrain::Plains));
        let mut world = WorldState::new(42, map, PlayerCharacter::default(), 1000);
        for name in ["Runa", "Leif"] {
            let seed = NpcSeed {
                name: name.into(),
                age: 9,
                sex: Sex::Female,
                status: NpcStatus::Child,
                race: "Human".into(),
                family: None,
                home: "Oakwood".into(),
            };
            spawn_npc(&mut world, &catalog, seed, Span::new(1, 1), &mut rng);
        }

        assert_eq!(distribute_gold(&mut world, &EconomyConfig::default()), 0);
        assert!(world.npcs.values().all(|n| n.gold == 0));
        assert_eq!(world.distributed_gold(), 0);
    }

    #[test]
    fn test_shop_respects_budget() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let items: Vec<&Item> = catalog.items.iter().collect();
        let bought = shop(&items, 120, &mut rng);
        let spent: u64 = bought.iter().map(|n| catalog.item(n).unwrap().value).sum();
        assert!(spent <= 120);
        assert!(!bought.is_empty());
        assert!(shop(&items, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_wealth_table_order() {
        assert!(rank_wealth(CreatureRank::Boss) > status_wealth(NpcStatus::Ruler));
        assert!(status_wealth(NpcStatus::Merchant) > status_wealth(NpcStatus::Guard));
        assert_eq!(status_wealth(NpcStatus::Child), 0);
    }
}
