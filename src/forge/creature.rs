//! Dungeon inhabitants

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::grid::Coord;
use crate::core::types::{CreatureId, Tier};

/// Coarse difficulty band, used for wealth and loot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreatureRank {
    Easy,
    Medium,
    Hard,
    Boss,
}

impl CreatureRank {
    pub fn for_tier(tier: Tier) -> Self {
        match tier.get() {
            1..=3 => CreatureRank::Easy,
            4..=6 => CreatureRank::Medium,
            _ => CreatureRank::Hard,
        }
    }
}

impl fmt::Display for CreatureRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub dungeon: String,
    /// Always inside the dungeon's footprint
    pub coordinates: Coord,
    pub tier: Tier,
    pub rank: CreatureRank,
    pub xp: u32,
    pub loot: Vec<String>,
    pub gold: u64,
}

impl Creature {
    pub fn is_boss(&self) -> bool {
        self.rank == CreatureRank::Boss
    }
}
