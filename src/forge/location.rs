//! Places on the map

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::grid::{Coord, Footprint};
use crate::core::types::{NpcId, Size, Tier};
use crate::forge::map::Biome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Capital,
    Settlement,
    Dungeon,
    Island,
}

impl LocationKind {
    pub fn glyph(&self) -> char {
        match self {
            LocationKind::Capital => 'C',
            LocationKind::Settlement => 'S',
            LocationKind::Dungeon => 'D',
            LocationKind::Island => 'I',
        }
    }

    pub fn is_glyph(c: char) -> bool {
        matches!(c, 'C' | 'S' | 'D' | 'I')
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Dungeon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DungeonKind {
    Cave,
    Ruin,
    Mine,
    Crypt,
}

impl DungeonKind {
    pub const ALL: [DungeonKind; 4] = [
        DungeonKind::Cave,
        DungeonKind::Ruin,
        DungeonKind::Mine,
        DungeonKind::Crypt,
    ];

    pub fn biome(&self) -> Biome {
        match self {
            DungeonKind::Cave | DungeonKind::Mine | DungeonKind::Crypt => Biome::Underground,
            DungeonKind::Ruin => Biome::Ruins,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DungeonKind::Cave => "A dark and damp cave, filled with strange echoes.",
            DungeonKind::Ruin => "The crumbling remains of an older kingdom.",
            DungeonKind::Mine => "An abandoned mine, rumored to still be rich in ore.",
            DungeonKind::Crypt => "A sealed burial vault whose dead do not rest easily.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub kind: LocationKind,
    pub biome: Biome,
    pub size: Size,
    pub challenge: Tier,
    pub dungeon: Option<DungeonKind>,
    pub description: String,
    /// Names of directly connected locations, kept sorted
    pub connections: Vec<String>,
    pub inhabitants: Vec<NpcId>,
    pub sub_locations: Vec<String>,
    /// Top-left cell of the footprint, once placed
    pub coordinates: Option<Coord>,
}

impl Location {
    pub fn new(name: impl Into<String>, kind: LocationKind, size: Size, challenge: Tier) -> Self {
        Self {
            name: name.into(),
            kind,
            biome: Biome::Plains,
            size,
            challenge,
            dungeon: None,
            description: String::new(),
            connections: Vec::new(),
            inhabitants: Vec::new(),
            sub_locations: Vec::new(),
            coordinates: None,
        }
    }

    pub fn footprint(&self) -> Option<Footprint> {
        self.coordinates.map(|origin| Footprint::new(origin, self.size))
    }

    pub fn is_placed(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn is_connected_to(&self, other: &str) -> bool {
        self.connections.binary_search_by(|c| c.as_str().cmp(other)).is_ok()
    }

    /// Add a connection, keeping the list sorted and free of duplicates
    pub fn connect(&mut self, other: &str) -> bool {
        match self.connections.binary_search_by(|c| c.as_str().cmp(other)) {
            Ok(_) => false,
            Err(pos) => {
                self.connections.insert(pos, other.to_string());
                true
            }
        }
    }
}
