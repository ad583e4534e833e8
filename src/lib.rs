//! World Forge - procedural tabletop RPG world generation
//!
//! A seeded cascade of stages builds terrain, places locations, links them
//! with roads, then layers people, factions, creatures, gold and quests on
//! top. The result is a single consistent `WorldState`.

pub mod catalog;
pub mod core;
pub mod forge;

pub use catalog::Catalog;
pub use forge::{forge_world, ForgeConfig, ForgeOutput, PlayerCharacter, WorldState};
