//! Faction roster allocation, leadership elections and relations

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::catalog::Catalog;
use crate::core::types::{FactionKind, NpcId, NpcStatus};
use crate::forge::faction::{Faction, Interest, Relation};
use crate::forge::npc::{FamilyRole, Npc};
use crate::forge::systems::population::npc_details;
use crate::forge::world::WorldState;

/// Split `total` as evenly as possible into `parts`, remainder to the first ones
pub fn balanced_shares(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let remainder = total % parts;
    (0..parts).map(|i| base + usize::from(i < remainder)).collect()
}

/// Create the factions and deal every eligible adult into one of them
///
/// Members take on the faction's status and are re-detailed for it.
pub fn allocate_factions(
    world: &mut WorldState,
    roster: &[FactionKind],
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
) -> usize {
    for kind in roster {
        let mut faction = Faction::new(*kind);
        let table = Interest::table(kind.disposition());
        faction.interests = table.choose_multiple(rng, 2).copied().collect();
        faction.interests.sort();
        world.factions.insert(*kind, faction);
    }

    let mut eligible: Vec<NpcId> = world
        .npcs
        .values()
        .filter(|n| n.is_faction_eligible())
        .map(|n| n.id)
        .collect();
    eligible.shuffle(rng);

    let shares = balanced_shares(eligible.len(), roster.len());
    let mut pool = eligible.into_iter();
    for (kind, share) in roster.iter().zip(shares) {
        let status = kind.member_status();
        for id in pool.by_ref().take(share) {
            if let Some(npc) = world.npcs.get_mut(&id) {
                npc.status = status;
                npc.faction = Some(*kind);
                npc_details(npc, catalog, status.level_range(), rng);
            }
            if let Some(faction) = world.factions.get_mut(kind) {
                faction.members.push(id);
            }
        }
        if let Some(faction) = world.factions.get_mut(kind) {
            faction.members.sort();
            tracing::debug!("{} takes {} members", faction.name, faction.members.len());
        }
    }

    let allocated: usize = world.factions.values().map(|f| f.members.len()).sum();
    tracing::info!(
        "Allocated {} NPCs across {} factions",
        allocated,
        world.factions.len()
    );
    allocated
}

/// Leadership weight: seniority, standing in the faction, and having a family
pub fn leadership_score(npc: &Npc) -> f64 {
    let mut score = 0.0;
    if npc.age > 20 {
        score += (npc.age - 20) as f64 / 10.0;
    }
    score += match npc.status {
        NpcStatus::Guard
        | NpcStatus::Merchant
        | NpcStatus::Mage
        | NpcStatus::Thief
        | NpcStatus::Cultist => 5.0,
        NpcStatus::Commoner => 1.0,
        NpcStatus::Child | NpcStatus::Ruler => 0.0,
    };
    if npc.family_role() == Some(FamilyRole::Parent) {
        score += 3.0;
    }
    score
}

/// Elect a leader and a right hand for every faction
///
/// Highest score wins, older breaks ties, then lower id. A faction with no
/// members stays leaderless.
pub fn elect_leaders(world: &mut WorldState) -> usize {
    let mut elected = 0;
    for faction in world.factions.values_mut() {
        let mut ranked: Vec<&Npc> = faction
            .members
            .iter()
            .filter_map(|id| world.npcs.get(id))
            .collect();
        ranked.sort_by_key(|n| {
            (
                std::cmp::Reverse(OrderedFloat(leadership_score(n))),
                std::cmp::Reverse(n.age),
                n.id,
            )
        });

        faction.leader = ranked.first().map(|n| n.id);
        faction.right_hand = ranked.get(1).map(|n| n.id);

        match ranked.first() {
            Some(leader) => {
                elected += 1;
                tracing::debug!("{} is led by {}", faction.name, leader.name);
            }
            None => tracing::warn!("{} has no members and no leader", faction.name),
        }
    }
    tracing::info!("Elected {} faction leaders", elected);
    elected
}

/// Fill the relation matrix from faction interests, each pair once
pub fn determine_relations(world: &mut WorldState) -> usize {
    let kinds: Vec<FactionKind> = world.factions.keys().copied().collect();
    let mut hostile = 0;
    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            let relation = Relation::between(&world.factions[a].interests, &world.factions[b].interests);
            if relation == Relation::Hostile {
                hostile += 1;
            }
            world.relations.set(*a, *b, relation);
        }
    }
    tracing::info!(
        "Determined relations for {} factions ({} hostile pairs)",
        kinds.len(),
        hostile
    );
    hostile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;
    use crate::core::types::{Stats, Tier};
    use crate::forge::map::{Terrain, WorldMap};
    use crate::forge::npc::{Equipment, FamilyLink, Sex};
    use crate::forge::player::PlayerCharacter;
    use rand::SeedableRng;

    fn parent(id: u32, age: u32) -> Npc {
        Npc {
            id: NpcId(id),
            name: format!("Parent {}", id),
            age,
            sex: Sex::Male,
            race: "Human".into(),
            class: "Fighter".into(),
            alignment: "True Neutral".into(),
            status: NpcStatus::Commoner,
            family: Some(FamilyLink {
                family_id: id,
                role: FamilyRole::Parent,
            }),
            faction: None,
            level: Tier::MIN,
            stats: Stats::default(),
            hit_points: 8,
            gold: 0,
            inventory: Vec::new(),
            equipment: Equipment::default(),
            abilities_for_sale: Vec::new(),
            home: "Oakwood".into(),
        }
    }

    fn world_with_parents(count: u32) -> WorldState {
        let map = WorldMap::from_terrain(Grid::filled(4, 4, Terrain::Plains));
        let mut world = WorldState::new(42, map, PlayerCharacter::default(), 0);
        for i in 0..count {
            let id = world.next_npc_id();
            world.npcs.insert(id, parent(id.0, 30 + i));
        }
        world
    }

    #[test]
    fn test_balanced_shares() {
        assert_eq!(balanced_shares(11, 4), vec![3, 3, 3, 2]);
        assert_eq!(balanced_shares(3, 5), vec![1, 1, 1, 0, 0]);
        assert_eq!(balanced_shares(0, 3), vec![0, 0, 0]);
        assert!(balanced_shares(5, 0).is_empty());
    }

    #[test]
    fn test_allocation_is_balanced_and_bidirectional() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_parents(13);
        let allocated = allocate_factions(&mut world, &FactionKind::ALL, &catalog, &mut rng);
        assert_eq!(allocated, 13);

        for faction in world.factions.values() {
            assert!(faction.members.len() == 2 || faction.members.len() == 3);
            for id in &faction.members {
                let npc = &world.npcs[id];
                assert_eq!(npc.faction, Some(faction.kind));
                assert_eq!(npc.status, faction.kind.member_status());
            }
        }
    }

    #[test]
    fn test_leader_is_highest_scoring_member() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_parents(4);
        allocate_factions(&mut world, &[FactionKind::MagesGuild], &catalog, &mut rng);
        elect_leaders(&mut world);

        let faction = &world.factions[&FactionKind::MagesGuild];
        // Same status and family role, so the oldest (age 33) wins
        assert_eq!(faction.leader, Some(NpcId(4)));
        assert_eq!(faction.right_hand, Some(NpcId(3)));
        assert!(faction.members.contains(&NpcId(4)));
    }

    #[test]
    fn test_empty_faction_has_no_leader() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_parents(0);
        allocate_factions(&mut world, &FactionKind::ALL, &catalog, &mut rng);
        assert_eq!(elect_leaders(&mut world), 0);
        assert!(world.factions.values().all(|f| f.leader.is_none() && f.members.is_empty()));
    }

    #[test]
    fn test_relations_cover_every_pair() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = world_with_parents(5);
        allocate_factions(&mut world, &FactionKind::ALL, &catalog, &mut rng);
        determine_relations(&mut world);
        assert_eq!(world.relations.pairs().count(), 10);
        assert!(world.relations.is_symmetric());
    }

    #[test]
    fn test_leadership_score_weights() {
        let mut npc = parent(1, 40);
        assert_eq!(leadership_score(&npc), 2.0 + 1.0 + 3.0);
        npc.status = NpcStatus::Thief;
        npc.family = None;
        assert_eq!(leadership_score(&npc), 2.0 + 5.0);
    }
}
