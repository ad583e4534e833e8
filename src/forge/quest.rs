//! Quests and quest chains

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{CreatureId, FactionKind, NpcId, QuestId, QuestKind, Tier};

/// What a quest points the player at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestTarget {
    Creature { id: CreatureId, name: String },
    Npc { id: NpcId, name: String },
    Location(String),
    /// An item carried by a creature
    Item { name: String, holder: CreatureId },
    /// Free-form lead with no concrete entity behind it
    Rumor(String),
}

impl fmt::Display for QuestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestTarget::Creature { name, .. } | QuestTarget::Npc { name, .. } => f.write_str(name),
            QuestTarget::Location(name) | QuestTarget::Rumor(name) => f.write_str(name),
            QuestTarget::Item { name, .. } => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub gold: u64,
    pub item: Option<String>,
}

/// Position of a quest inside its faction's chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub faction: FactionKind,
    pub step: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub kind: QuestKind,
    pub description: String,
    pub giver: NpcId,
    pub target: QuestTarget,
    pub reward: Reward,
    pub prerequisite: Option<QuestId>,
    pub required_reputation: u32,
    pub tier: Tier,
    pub chain: Option<ChainLink>,
}

impl Quest {
    pub fn is_generic(&self) -> bool {
        self.chain.is_none()
    }
}
