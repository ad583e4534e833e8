//! World-Weave: the line-oriented text form handed to the narrator
//!
//! Every section header is always written, even when the section is empty.
//! Entity lines are `key: value` pairs joined by ` | `.

use crate::forge::map::{Terrain, ROAD_GLYPH};
use crate::forge::quest::QuestTarget;
use crate::forge::world::WorldState;

pub const SECTIONS: [&str; 11] = [
    "PLAYER",
    "MAP",
    "TIME",
    "SCENERY",
    "HISTORY",
    "KINGDOMS",
    "FACTIONS",
    "LOCATIONS",
    "NPCS",
    "CREATURES",
    "QUESTS",
];

const LEGEND_TERRAIN: [Terrain; 7] = [
    Terrain::DeepWater,
    Terrain::Shallows,
    Terrain::Beach,
    Terrain::Plains,
    Terrain::Forest,
    Terrain::Hills,
    Terrain::Mountains,
];

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn render(world: &WorldState) -> String {
    let mut lines: Vec<String> = Vec::new();
    for section in SECTIONS {
        lines.push(format!("[{}]", section));
        match section {
            "PLAYER" => player(world, &mut lines),
            "MAP" => map(world, &mut lines),
            "TIME" => lines.push(format!("Now: {}", world.time)),
            "SCENERY" => lines.extend(world.prose.iter().map(|(key, text)| format!("{}: {}", key, text))),
            "HISTORY" => history(world, &mut lines),
            "KINGDOMS" => kingdoms(world, &mut lines),
            "FACTIONS" => factions(world, &mut lines),
            "LOCATIONS" => locations(world, &mut lines),
            "NPCS" => npcs(world, &mut lines),
            "CREATURES" => creatures(world, &mut lines),
            "QUESTS" => quests(world, &mut lines),
            _ => {}
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn player(world: &WorldState, lines: &mut Vec<String>) {
    let p = &world.player;
    lines.push(format!(
        "Name: {} | Race: {} | Class: {} | Level: {} | Age: {} | Sex: {} | Gold: {}",
        p.name, p.race, p.class, p.level, p.age, p.sex, p.gold
    ));
    lines.push(format!("Known locations: {}", list(&p.known_locations)));
    let standing: Vec<String> = p
        .reputation
        .iter()
        .map(|(kind, rep)| format!("{} {}", kind, rep))
        .collect();
    lines.push(format!("Reputation: {}", list(&standing)));
}

fn map(world: &WorldState, lines: &mut Vec<String>) {
    lines.push(format!("Size: {}x{}", world.map.width(), world.map.height()));
    let mut legend: Vec<String> = LEGEND_TERRAIN
        .iter()
        .map(|t| format!("{} {:?}", t.glyph(), t))
        .collect();
    legend.push(format!("{} Road", ROAD_GLYPH));
    legend.push("C Capital, S Settlement, D Dungeon, I Island".to_string());
    lines.push(format!("Legend: {}", legend.join(", ")));
    lines.extend(world.map.icons.rows());
}

fn history(world: &WorldState, lines: &mut Vec<String>) {
    for war in &world.histories {
        lines.push(format!(
            "War: {} | Aggressor: {} | Defender: {} | {}",
            war.name, war.aggressor, war.defender, war.summary
        ));
    }
    for trigger in &world.chronicle {
        lines.push(format!("Trigger: {} => {}", trigger.key, trigger.outcome));
    }
}

fn kingdoms(world: &WorldState, lines: &mut Vec<String>) {
    let realm = &world.realm;
    if realm.name.is_empty() {
        return;
    }
    let ruler = realm.ruler.map(|id| world.npc_name(id)).unwrap_or("none");
    let disposition = realm
        .disposition
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(format!(
        "Kingdom: {} | Capital: {} | Ruler: {} | Disposition: {} | Garrison: {}",
        realm.name,
        realm.capital,
        ruler,
        disposition,
        realm.garrison.len()
    ));
}

fn factions(world: &WorldState, lines: &mut Vec<String>) {
    for faction in world.factions.values() {
        let leader = faction.leader.map(|id| world.npc_name(id)).unwrap_or("none");
        let right_hand = faction.right_hand.map(|id| world.npc_name(id)).unwrap_or("none");
        let interests: Vec<String> = faction.interests.iter().map(|i| format!("{:?}", i)).collect();
        let members: Vec<String> = faction.members.iter().map(|id| world.npc_name(*id).to_string()).collect();
        lines.push(format!(
            "Faction: {} | Disposition: {} | Leader: {} | Right hand: {} | Interests: {} | Members: {}",
            faction.name,
            faction.disposition,
            leader,
            right_hand,
            list(&interests),
            list(&members)
        ));
    }
    for (a, b, relation) in world.relations.pairs() {
        lines.push(format!("Relation: {} / {} = {}", a, b, relation));
    }
}

fn locations(world: &WorldState, lines: &mut Vec<String>) {
    for loc in world.locations.values() {
        let at = loc
            .coordinates
            .map(|c| format!("({}, {})", c.x, c.y))
            .unwrap_or_else(|| "unplaced".to_string());
        let mut line = format!(
            "Location: {} | Type: {} | Biome: {} | Challenge: {} | At: {} | Size: {}x{}",
            loc.name, loc.kind, loc.biome, loc.challenge, at, loc.size.width, loc.size.height
        );
        if let Some(kind) = loc.dungeon {
            line.push_str(&format!(" | Dungeon: {:?}", kind));
        }
        line.push_str(&format!(
            " | Connections: {} | Inside: {} | {}",
            list(&loc.connections),
            list(&loc.sub_locations),
            loc.description
        ));
        lines.push(line);
    }
}

fn npcs(world: &WorldState, lines: &mut Vec<String>) {
    for npc in world.npcs.values() {
        let faction = npc.faction.map(|f| f.name()).unwrap_or("none");
        let worn: Vec<String> = npc.equipment.worn().map(str::to_string).collect();
        let mut line = format!(
            "NPC: {} | Age: {} | Sex: {} | Race: {} | Class: {} | Level: {} | HP: {} | \
             Status: {} | Alignment: {} | Faction: {} | Home: {} | Gold: {} | Equipped: {} | Inventory: {}",
            npc.name,
            npc.age,
            npc.sex,
            npc.race,
            npc.class,
            npc.level,
            npc.hit_points,
            npc.status,
            npc.alignment,
            faction,
            npc.home,
            npc.gold,
            list(&worn),
            list(&npc.inventory)
        );
        if !npc.abilities_for_sale.is_empty() {
            line.push_str(&format!(" | Teaches: {}", npc.abilities_for_sale.join(", ")));
        }
        lines.push(line);
    }
}

fn creatures(world: &WorldState, lines: &mut Vec<String>) {
    for c in world.creatures.values() {
        lines.push(format!(
            "Creature: {} | Id: {} | Rank: {} | Tier: {} | XP: {} | Lair: {} | At: ({}, {}) | Gold: {} | Loot: {}",
            c.name,
            c.id,
            c.rank,
            c.tier,
            c.xp,
            c.dungeon,
            c.coordinates.x,
            c.coordinates.y,
            c.gold,
            list(&c.loot)
        ));
    }
}

fn quests(world: &WorldState, lines: &mut Vec<String>) {
    for quest in world.quests.values() {
        let target = match &quest.target {
            QuestTarget::Item { name, holder } => {
                let carrier = world.creatures.get(holder).map(|c| c.name.as_str()).unwrap_or("unknown");
                format!("{} (carried by {})", name, carrier)
            }
            other => other.to_string(),
        };
        let prerequisite = quest
            .prerequisite
            .and_then(|id| world.quests.get(&id))
            .map(|q| q.title.as_str())
            .unwrap_or("none");
        let mut line = format!(
            "Quest: {} | Type: {} | Tier: {} | Giver: {} | Target: {} | Reward: {} gold",
            quest.title,
            quest.kind,
            quest.tier,
            world.npc_name(quest.giver),
            target,
            quest.reward.gold
        );
        if let Some(item) = &quest.reward.item {
            line.push_str(&format!(" + {}", item));
        }
        if let Some(link) = quest.chain {
            line.push_str(&format!(
                " | Chain: {} step {} | Requires: {} and reputation {}",
                link.faction, link.step, prerequisite, quest.required_reputation
            ));
        }
        line.push_str(&format!(" | {}", quest.description));
        lines.push(line);
    }
}
