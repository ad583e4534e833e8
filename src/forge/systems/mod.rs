//! Cascade stages

mod creatures;
mod details;
pub mod economy;
pub mod factions;
mod guilds;
pub mod placement;
pub mod population;
pub mod quests;
pub mod roads;
mod terrain;

pub use creatures::populate_dungeons;
pub use details::{prepare_player, prose_key, record_wars, set_clock, write_chronicle, write_prose, DayPhase, Weather};
pub use economy::{distribute_gold, equip_roles, split_gold, stock_inventories};
pub use factions::{allocate_factions, determine_relations, elect_leaders};
pub use guilds::assign_guild_abilities;
pub use placement::{place_locations, plan_locations};
pub use population::{populate_court, populate_settlements};
pub use quests::{generate_faction_chains, generate_generic_quests, QuestTally};
pub use roads::{build_roads, connect_locations};
pub use terrain::generate_terrain;
