//! The player character, supplied from outside the cascade

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{FactionKind, Stats};
use crate::forge::npc::Sex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub name: String,
    pub age: u32,
    pub sex: Sex,
    pub race: String,
    pub class: String,
    pub level: u8,
    pub stats: Stats,
    pub gold: u64,
    pub inventory: Vec<String>,
    pub reputation: BTreeMap<FactionKind, i32>,
    pub known_locations: Vec<String>,
}

impl PlayerCharacter {
    pub fn new(name: impl Into<String>, race: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: 20,
            sex: Sex::Female,
            race: race.into(),
            class: class.into(),
            level: 1,
            stats: Stats::default(),
            gold: 0,
            inventory: Vec::new(),
            reputation: BTreeMap::new(),
            known_locations: Vec::new(),
        }
    }

    pub fn learn_location(&mut self, name: &str) {
        if !self.known_locations.iter().any(|l| l == name) {
            self.known_locations.push(name.to_string());
        }
    }
}

impl Default for PlayerCharacter {
    fn default() -> Self {
        Self::new("Wanderer", "Human", "Fighter")
    }
}
