//! The world model and the cascade that forges it

mod cascade;
pub mod config;
mod consistency;
pub mod creature;
pub mod faction;
pub mod location;
pub mod map;
pub mod names;
pub mod npc;
pub mod output;
pub mod player;
pub mod quest;
pub mod systems;
pub mod weave;
pub mod world;

pub use cascade::forge_world;
pub use config::ForgeConfig;
pub use output::{ForgeOutput, ForgeReport};
pub use player::PlayerCharacter;
pub use world::{GameTime, WorldState};
