//! Structural checks over a finished world

use std::collections::BTreeSet;

use crate::core::error::{ForgeError, Result};
use crate::core::types::QuestId;
use crate::forge::world::WorldState;

impl WorldState {
    /// Every broken cross-reference in the world, as readable messages
    pub fn violations(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.check_locations(&mut found);
        self.check_names(&mut found);
        self.check_factions(&mut found);
        self.check_quests(&mut found);
        self.check_creatures(&mut found);

        let distributed = self.distributed_gold();
        if distributed > self.total_gold {
            found.push(format!(
                "{} gold distributed from a pool of {}",
                distributed, self.total_gold
            ));
        }
        found
    }

    /// Fails with the first few violations if the world is inconsistent
    pub fn check_consistency(&self) -> Result<()> {
        let found = self.violations();
        if found.is_empty() {
            return Ok(());
        }
        for violation in &found {
            tracing::error!("{}", violation);
        }
        Err(ForgeError::Invariant(format!(
            "{} problems, first: {}",
            found.len(),
            found[0]
        )))
    }

    fn check_locations(&self, found: &mut Vec<String>) {
        let placed: Vec<_> = self
            .locations
            .values()
            .filter_map(|l| l.footprint().map(|fp| (l, fp)))
            .collect();

        for (i, (a, fa)) in placed.iter().enumerate() {
            if fa.right() > self.map.width() || fa.bottom() > self.map.height() {
                found.push(format!("{} extends past the map edge", a.name));
            }
            for (b, fb) in &placed[i + 1..] {
                if fa.overlaps(fb) {
                    found.push(format!("{} overlaps {}", a.name, b.name));
                }
            }
        }

        for location in self.locations.values() {
            for other in &location.connections {
                match self.locations.get(other) {
                    None => found.push(format!("{} connects to missing {}", location.name, other)),
                    Some(back) if !back.is_connected_to(&location.name) => {
                        found.push(format!("{} -> {} is one-way", location.name, other))
                    }
                    Some(_) => {}
                }
            }
            for id in &location.inhabitants {
                match self.npcs.get(id) {
                    Some(npc) if npc.home == location.name => {}
                    Some(npc) => found.push(format!("{} lists {} who lives in {}", location.name, id, npc.home)),
                    None => found.push(format!("{} lists missing inhabitant {}", location.name, id)),
                }
            }
        }
    }

    /// NPC names and chronicle keys are how the narrator refers to people
    fn check_names(&self, found: &mut Vec<String>) {
        let mut names = BTreeSet::new();
        for npc in self.npcs.values() {
            if !names.insert(npc.name.as_str()) {
                found.push(format!("NPC name {} is worn twice", npc.name));
            }
        }
        let mut keys = BTreeSet::new();
        for trigger in &self.chronicle {
            if !keys.insert(trigger.key.as_str()) {
                found.push(format!("Chronicle key {} is used twice", trigger.key));
            }
        }
    }

    fn check_factions(&self, found: &mut Vec<String>) {
        for faction in self.factions.values() {
            for officer in faction.leader.iter().chain(faction.right_hand.iter()) {
                if !faction.members.contains(officer) {
                    found.push(format!("{} officer {} is not a member", faction.name, officer));
                }
            }
            for id in &faction.members {
                match self.npcs.get(id) {
                    Some(npc) if npc.faction == Some(faction.kind) => {}
                    Some(npc) => found.push(format!("{} lists {} who is not in it", faction.name, npc.name)),
                    None => found.push(format!("{} lists missing member {}", faction.name, id)),
                }
            }
        }

        for npc in self.npcs.values() {
            let Some(kind) = npc.faction else { continue };
            let listed = self.factions.get(&kind).is_some_and(|f| f.members.contains(&npc.id));
            if !listed {
                found.push(format!("{} claims {} but is not on its roster", npc.name, kind));
            }
        }

        if !self.relations.is_symmetric() {
            found.push("faction relations are not symmetric".to_string());
        }
    }

    fn check_quests(&self, found: &mut Vec<String>) {
        for quest in self.quests.values() {
            if !self.npcs.contains_key(&quest.giver) {
                found.push(format!("quest '{}' has missing giver {}", quest.title, quest.giver));
            }
            if let Some(pre) = quest.prerequisite {
                match self.quests.get(&pre) {
                    Some(prior) if prior.tier > quest.tier => found.push(format!(
                        "quest '{}' (tier {}) requires harder '{}' (tier {})",
                        quest.title, quest.tier, prior.title, prior.tier
                    )),
                    Some(_) => {}
                    None => found.push(format!("quest '{}' requires missing quest {}", quest.title, pre)),
                }
            }
            if self.prerequisite_cycle(quest.id) {
                found.push(format!("quest '{}' sits on a prerequisite cycle", quest.title));
            }
        }
    }

    fn prerequisite_cycle(&self, start: QuestId) -> bool {
        let mut seen = BTreeSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            current = self.quests.get(&id).and_then(|q| q.prerequisite);
        }
        false
    }

    fn check_creatures(&self, found: &mut Vec<String>) {
        for creature in self.creatures.values() {
            let footprint = self.locations.get(&creature.dungeon).and_then(|l| l.footprint());
            match footprint {
                Some(fp) if fp.contains(creature.coordinates) => {}
                Some(_) => found.push(format!(
                    "{} {} stands outside {}",
                    creature.name, creature.id, creature.dungeon
                )),
                None => found.push(format!(
                    "{} {} lives in unplaced or missing {}",
                    creature.name, creature.id, creature.dungeon
                )),
            }
        }
    }
}
