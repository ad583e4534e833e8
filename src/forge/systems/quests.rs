//! Generic tiered quests and faction quest chains

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{Catalog, ItemKind};
use crate::core::types::{FactionKind, NpcId, QuestId, QuestKind, Tier};
use crate::forge::config::QuestConfig;
use crate::forge::location::LocationKind;
use crate::forge::npc::Npc;
use crate::forge::quest::{ChainLink, Quest, QuestTarget, Reward};
use crate::forge::world::WorldState;

/// How far a target's tier may stray from the quest's
const TIER_SLACK: u8 = 1;

pub const CHAIN_LENGTH: u8 = 10;

struct ChainStep {
    kind: QuestKind,
    title: &'static str,
    description: &'static str,
}

const CHAIN_STEPS: [ChainStep; CHAIN_LENGTH as usize] = [
    ChainStep {
        kind: QuestKind::Investigate,
        title: "An Errand for the <faction>",
        description: "<giver> wants to know whether you can be trusted. Look into <target>.",
    },
    ChainStep {
        kind: QuestKind::Fetch,
        title: "Proof of Worth",
        description: "Bring <giver> the <target> to prove your worth to the <faction>.",
    },
    ChainStep {
        kind: QuestKind::Escort,
        title: "Safe Conduct",
        description: "A courier of the <faction> must reach <target> unharmed.",
    },
    ChainStep {
        kind: QuestKind::Kill,
        title: "Thinning the Herd",
        description: "The <target> near <location> threatens the <faction>'s interests.",
    },
    ChainStep {
        kind: QuestKind::Investigate,
        title: "The Informant",
        description: "Someone inside the <faction> is talking. <giver> suspects <target>.",
    },
    ChainStep {
        kind: QuestKind::Clear,
        title: "Cleansing <target>",
        description: "The <faction> claims <target>. Drive out whatever lives there.",
    },
    ChainStep {
        kind: QuestKind::Fetch,
        title: "The Lost Relic",
        description: "<giver> has learned where the <target> is kept. Recover it.",
    },
    ChainStep {
        kind: QuestKind::Kill,
        title: "A Debt in Blood",
        description: "The <target> wronged the <faction>. <giver> wants the debt paid.",
    },
    ChainStep {
        kind: QuestKind::Clear,
        title: "Into the Depths",
        description: "The deepest halls of <target> hide the <faction>'s oldest secret.",
    },
    ChainStep {
        kind: QuestKind::Kill,
        title: "The Reckoning",
        description: "<giver> names the enemy at last: <target>. End this.",
    },
];

/// Outcome counts of a quest pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestTally {
    pub generated: usize,
    pub skipped: usize,
}

fn fill(text: &str, giver: &str, target: &str, location: &str, faction: &str) -> String {
    text.replace("<giver>", giver)
        .replace("<target>", target)
        .replace("<location>", location)
        .replace("<faction>", faction)
}

fn near(a: Tier, b: Tier) -> bool {
    a.distance(b) <= TIER_SLACK
}

/// Adults living in settlements; the court does not hand out quests
fn townsfolk(world: &WorldState) -> Vec<&Npc> {
    world
        .npcs
        .values()
        .filter(|n| n.is_adult())
        .filter(|n| {
            world
                .locations
                .get(&n.home)
                .is_some_and(|l| l.kind == LocationKind::Settlement)
        })
        .collect()
}

fn pick_giver(world: &WorldState, tier: Tier, rng: &mut ChaCha8Rng) -> Option<NpcId> {
    let folk = townsfolk(world);
    let matched: Vec<&Npc> = folk
        .iter()
        .copied()
        .filter(|n| n.level.distance(tier) <= 2)
        .collect();
    let pool = if matched.is_empty() { folk } else { matched };
    pool.choose(rng).map(|n| n.id)
}

/// A target of the right kind near `tier`, with the place it is found
fn pick_target(
    world: &WorldState,
    kind: QuestKind,
    tier: Tier,
    avoid: &str,
    rng: &mut ChaCha8Rng,
) -> Option<(QuestTarget, String)> {
    match kind {
        QuestKind::Kill => {
            let pool: Vec<_> = world.creatures.values().filter(|c| near(c.tier, tier)).collect();
            pool.choose(rng).map(|c| {
                (
                    QuestTarget::Creature {
                        id: c.id,
                        name: c.name.clone(),
                    },
                    c.dungeon.clone(),
                )
            })
        }
        QuestKind::Fetch => {
            let pool: Vec<_> = world
                .creatures
                .values()
                .filter(|c| near(c.tier, tier) && !c.loot.is_empty())
                .collect();
            let holder = pool.choose(rng)?;
            let item = holder.loot.choose(rng)?;
            Some((
                QuestTarget::Item {
                    name: item.clone(),
                    holder: holder.id,
                },
                holder.dungeon.clone(),
            ))
        }
        QuestKind::Clear | QuestKind::Investigate => {
            let pool: Vec<_> = world
                .locations_of(LocationKind::Dungeon)
                .filter(|l| l.is_placed() && near(l.challenge, tier))
                .collect();
            pool.choose(rng)
                .map(|l| (QuestTarget::Location(l.name.clone()), l.name.clone()))
        }
        QuestKind::Escort => {
            let pool: Vec<_> = world
                .placed_locations()
                .filter(|l| matches!(l.kind, LocationKind::Settlement | LocationKind::Capital))
                .filter(|l| l.name != avoid && near(l.challenge, tier))
                .collect();
            pool.choose(rng)
                .map(|l| (QuestTarget::Location(l.name.clone()), avoid.to_string()))
        }
    }
}

fn reward_gold(tier: Tier, rng: &mut ChaCha8Rng) -> u64 {
    let t = tier.get() as u64;
    rng.gen_range(10 * t * t..=20 * t * t)
}

/// Generic quests for every tier; any quest without a giver or target is skipped
pub fn generate_generic_quests(
    world: &mut WorldState,
    config: &QuestConfig,
    catalog: &Catalog,
    rng: &mut ChaCha8Rng,
) -> QuestTally {
    let mut tally = QuestTally::default();

    for tier in Tier::all() {
        for _ in 0..config.generic_per_tier {
            let templates: Vec<_> = catalog.quest_templates.iter().filter(|t| t.covers(tier)).collect();
            let Some(template) = templates.choose(rng).copied() else {
                tracing::debug!("No quest template covers tier {}", tier);
                tally.skipped += 1;
                continue;
            };
            let Some(giver_id) = pick_giver(world, tier, rng) else {
                tracing::debug!("No quest giver for tier {} {}", tier, template.kind);
                tally.skipped += 1;
                continue;
            };
            let giver = &world.npcs[&giver_id];
            let Some((target, location)) = pick_target(world, template.kind, tier, &giver.home, rng) else {
                tracing::debug!("No tier {} target for {} quest", tier, template.kind);
                tally.skipped += 1;
                continue;
            };

            let faction = giver
                .faction
                .map(|f| f.name().to_string())
                .unwrap_or_else(|| world.realm.name.clone());
            let target_name = target.to_string();
            let quest = Quest {
                id: QuestId::from_rng(rng),
                title: fill(&template.title, &giver.name, &target_name, &location, &faction),
                kind: template.kind,
                description: fill(&template.description, &giver.name, &target_name, &location, &faction),
                giver: giver_id,
                target,
                reward: Reward {
                    gold: reward_gold(tier, rng),
                    item: None,
                },
                prerequisite: None,
                required_reputation: 0,
                tier,
                chain: None,
            };
            tracing::debug!("Quest '{}' (tier {})", quest.title, tier);
            world.quests.insert(quest.id, quest);
            tally.generated += 1;
        }
    }

    if tally.skipped > 0 {
        tracing::warn!("Skipped {} generic quests with no giver or target", tally.skipped);
    }
    tracing::info!("Generated {} generic quests", tally.generated);
    tally
}

/// Build a full chain for `kind`, or nothing when the faction has no leader
fn build_chain(world: &WorldState, kind: FactionKind, catalog: &Catalog, rng: &mut ChaCha8Rng) -> Option<Vec<Quest>> {
    let leader = world.leader_of(kind)?;
    let faction = kind.name();
    let final_prize = catalog
        .items
        .iter()
        .filter(|i| i.kind == ItemKind::Misc)
        .max_by(|a, b| a.value.cmp(&b.value).then_with(|| b.name.cmp(&a.name)))
        .map(|i| i.name.clone());
    let nemesis = world
        .relations
        .hostile_to(kind)
        .into_iter()
        .find_map(|enemy| world.leader_of(enemy));

    let mut chain = Vec::with_capacity(CHAIN_STEPS.len());
    let mut previous: Option<QuestId> = None;
    for (i, step) in CHAIN_STEPS.iter().enumerate() {
        let number = i as u8 + 1;
        let tier = Tier::clamped(number as i32);
        let last = number == CHAIN_LENGTH;

        let (target, location) = match (last, nemesis) {
            (true, Some(enemy)) => (
                QuestTarget::Npc {
                    id: enemy.id,
                    name: enemy.name.clone(),
                },
                enemy.home.clone(),
            ),
            (true, None) => (
                QuestTarget::Rumor(format!("the hidden enemy of the {}", faction)),
                leader.home.clone(),
            ),
            (false, _) => pick_target(world, step.kind, tier, &leader.home, rng).unwrap_or_else(|| {
                (
                    QuestTarget::Rumor(format!("rumours of trouble near {}", leader.home)),
                    leader.home.clone(),
                )
            }),
        };

        let target_name = target.to_string();
        let t = tier.get() as u64;
        let quest = Quest {
            id: QuestId::from_rng(rng),
            title: fill(step.title, &leader.name, &target_name, &location, faction),
            kind: step.kind,
            description: fill(step.description, &leader.name, &target_name, &location, faction),
            giver: leader.id,
            target,
            reward: Reward {
                gold: 25 * t * t,
                item: if last { final_prize.clone() } else { None },
            },
            prerequisite: previous,
            required_reputation: number as u32 * 10,
            tier,
            chain: Some(ChainLink { faction: kind, step: number }),
        };
        previous = Some(quest.id);
        chain.push(quest);
    }
    Some(chain)
}

/// Ten-step chains for every led faction; leaderless factions get none at all
pub fn generate_faction_chains(world: &mut WorldState, catalog: &Catalog, rng: &mut ChaCha8Rng) -> QuestTally {
    let mut tally = QuestTally::default();
    let kinds: Vec<FactionKind> = world.factions.keys().copied().collect();

    for kind in kinds {
        match build_chain(world, kind, catalog, rng) {
            Some(chain) => {
                tracing::debug!("{} chain of {} steps", kind, chain.len());
                for quest in chain {
                    world.quests.insert(quest.id, quest);
                }
                tally.generated += 1;
            }
            None => {
                tracing::warn!("{} has no leader; its quest chain is skipped", kind);
                tally.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Generated {} faction quest chains ({} skipped)",
        tally.generated,
        tally.skipped
    );
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{Coord, Grid};
    use crate::core::types::{NpcStatus, Size, Span};
    use crate::forge::faction::Faction;
    use crate::forge::location::Location;
    use crate::forge::map::{Terrain, WorldMap};
    use crate::forge::npc::{FamilyLink, FamilyRole, Sex};
    use crate::forge::player::PlayerCharacter;
    use crate::forge::systems::population::{spawn_npc, NpcSeed};
    use rand::SeedableRng;

    fn small_world(catalog: &Catalog, rng: &mut ChaCha8Rng) -> WorldState {
        let map = WorldMap::from_terrain(Grid::filled(20, 20, Terrain::Plains));
        let mut world = WorldState::new(42, map, PlayerCharacter::default(), 0);
        let mut town = Location::new("Oakwood", LocationKind::Settlement, Size::square(3), Tier::MIN);
        town.coordinates = Some(Coord::new(0, 0));
        world.locations.insert(town.name.clone(), town);
        let mut lair = Location::new("Gloom Lair", LocationKind::Dungeon, Size::square(3), Tier::clamped(2));
        lair.coordinates = Some(Coord::new(10, 10));
        world.locations.insert(lair.name.clone(), lair);

        for i in 0..2 {
            let seed = NpcSeed {
                name: format!("Astrid {}", i),
                age: 40,
                sex: Sex::Female,
                status: NpcStatus::Commoner,
                race: "Human".into(),
                family: Some(FamilyLink {
                    family_id: 1,
                    role: FamilyRole::Parent,
                }),
                home: "Oakwood".into(),
            };
            spawn_npc(&mut world, catalog, seed, Span::new(1, 3), rng);
        }
        world
    }

    #[test]
    fn test_generic_quests_reference_existing_entities() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = small_world(&catalog, &mut rng);
        let config = QuestConfig { generic_per_tier: 10 };
        let tally = generate_generic_quests(&mut world, &config, &catalog, &mut rng);

        // Only the tier 2 dungeon can be targeted; escorts have nowhere to go
        assert_eq!(tally.generated + tally.skipped, 100);
        assert!(tally.generated > 0);
        for quest in world.quests.values() {
            assert!(world.npcs.contains_key(&quest.giver));
            assert!(quest.tier.distance(Tier::clamped(2)) <= 1);
            assert!(matches!(quest.kind, QuestKind::Clear | QuestKind::Investigate));
            let t = quest.tier.get() as u64;
            assert!((10 * t * t..=20 * t * t).contains(&quest.reward.gold));
            assert!(!quest.title.contains('<'));
        }
    }

    #[test]
    fn test_no_townsfolk_means_no_quests() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let map = WorldMap::from_terrain(Grid::filled(10, 10, Terrain::Plains));
        let mut world = WorldState::new(42, map, PlayerCharacter::default(), 0);
        let tally = generate_generic_quests(&mut world, &QuestConfig::default(), &catalog, &mut rng);
        assert_eq!(tally.generated, 0);
        assert!(world.quests.is_empty());
    }

    #[test]
    fn test_chain_is_linear_and_gated() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let catalog = Catalog::embedded().unwrap();
        let mut world = small_world(&catalog, &mut rng);
        let mut faction = Faction::new(FactionKind::RoyalGuard);
        faction.members = vec![NpcId(1)];
        faction.leader = Some(NpcId(1));
        world.factions.insert(FactionKind::RoyalGuard, faction);
        world.factions.insert(FactionKind::ThievesGuild, Faction::new(FactionKind::ThievesGuild));

        let tally = generate_faction_chains(&mut world, &catalog, &mut rng);
        assert_eq!(tally, QuestTally { generated: 1, skipped: 1 });
        assert_eq!(world.quests.len(), CHAIN_LENGTH as usize);

        let mut steps: Vec<&Quest> = world.quests.values().collect();
        steps.sort_by_key(|q| q.chain.map(|c| c.step));
        assert!(steps[0].prerequisite.is_none());
        for pair in steps.windows(2) {
            assert_eq!(pair[1].prerequisite, Some(pair[0].id));
            assert!(pair[0].tier <= pair[1].tier);
            assert!(pair[0].required_reputation < pair[1].required_reputation);
            assert_eq!(pair[1].giver, NpcId(1));
        }
        assert!(steps.iter().all(|q| q.chain.unwrap().faction == FactionKind::RoyalGuard));
        assert_eq!(steps[9].reward.item.as_deref(), Some("Crown"));
    }
}
