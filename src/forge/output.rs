//! Cascade output and serialization

use serde::{Deserialize, Serialize};

use crate::core::types::FactionKind;
use crate::forge::weave;
use crate::forge::world::WorldState;

/// The forged world plus what the cascade had to give up on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgeOutput {
    pub world: WorldState,
    pub report: ForgeReport,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForgeReport {
    /// Locations that found no room on the map
    pub unplaced: Vec<String>,
    pub connections: usize,
    pub roads: usize,
    pub road_cells: usize,
    pub npcs: usize,
    pub faction_members: usize,
    pub creatures: usize,
    pub gold_distributed: u64,
    pub items_stocked: usize,
    pub generic_quests: usize,
    pub skipped_quests: usize,
    pub quest_chains: usize,
    /// Factions left without a leader, and so without a chain
    pub skipped_chains: Vec<FactionKind>,
    pub wars: usize,
    pub simulation_time_ms: u64,
}

impl ForgeOutput {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    /// The World-Weave text of the forged world
    pub fn weave(&self) -> String {
        weave::render(&self.world)
    }

    pub fn summary(&self) -> String {
        let r = &self.report;
        let mut text = format!(
            "Forged {} in {}ms\n{} locations ({} unplaced), {} roads over {} cells, {} NPCs, {} creatures\n\
             {} gold distributed, {} generic quests ({} skipped), {} faction chains, {} wars",
            self.world.realm.name,
            r.simulation_time_ms,
            self.world.locations.len(),
            r.unplaced.len(),
            r.roads,
            r.road_cells,
            r.npcs,
            r.creatures,
            r.gold_distributed,
            r.generic_quests,
            r.skipped_quests,
            r.quest_chains,
            r.wars,
        );
        if !r.skipped_chains.is_empty() {
            let names: Vec<&str> = r.skipped_chains.iter().map(|k| k.name()).collect();
            text.push_str(&format!("\nNo leader, no chain: {}", names.join(", ")));
        }
        text
    }
}
