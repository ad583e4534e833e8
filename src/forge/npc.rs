//! Non-player characters

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::EquipSlot;
use crate::core::types::{FactionKind, NpcId, NpcStatus, Stats, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FamilyRole {
    Parent,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyLink {
    pub family_id: u32,
    pub role: FamilyRole,
}

/// Worn and wielded items, by catalog name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub head: Option<String>,
    pub chest: Option<String>,
    pub main_hand: Option<String>,
    pub off_hand: Option<String>,
    pub ring: Option<String>,
    pub neck: Option<String>,
}

impl Equipment {
    pub fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<String> {
        match slot {
            EquipSlot::Head => &mut self.head,
            EquipSlot::Chest => &mut self.chest,
            EquipSlot::MainHand => &mut self.main_hand,
            EquipSlot::OffHand => &mut self.off_hand,
            EquipSlot::Ring => &mut self.ring,
            EquipSlot::Neck => &mut self.neck,
        }
    }

    /// Put an item in a slot, returning whatever it replaced
    pub fn equip(&mut self, slot: EquipSlot, item: impl Into<String>) -> Option<String> {
        self.slot_mut(slot).replace(item.into())
    }

    pub fn worn(&self) -> impl Iterator<Item = &str> {
        [
            &self.head,
            &self.chest,
            &self.main_hand,
            &self.off_hand,
            &self.ring,
            &self.neck,
        ]
        .into_iter()
        .filter_map(|s| s.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub race: String,
    pub class: String,
    pub alignment: String,
    pub status: NpcStatus,
    pub family: Option<FamilyLink>,
    pub faction: Option<FactionKind>,
    pub level: Tier,
    pub stats: Stats,
    pub hit_points: u32,
    pub gold: u64,
    pub inventory: Vec<String>,
    pub equipment: Equipment,
    /// Ability names this NPC teaches for a fee
    pub abilities_for_sale: Vec<String>,
    /// Name of the location the NPC lives in
    pub home: String,
}

impl Npc {
    pub fn is_adult(&self) -> bool {
        self.status != NpcStatus::Child
    }

    pub fn family_role(&self) -> Option<FamilyRole> {
        self.family.map(|f| f.role)
    }

    /// Family parents are the only NPCs the faction roster draws from
    pub fn is_faction_eligible(&self) -> bool {
        self.faction.is_none() && self.family_role() == Some(FamilyRole::Parent)
    }
}
