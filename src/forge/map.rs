//! Map layers: terrain, rendered icons and roads

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::grid::{Coord, Grid};

/// Terrain classification of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    DeepWater,
    Shallows,
    Beach,
    Plains,
    Forest,
    Hills,
    Mountains,
}

impl Terrain {
    pub fn is_land(&self) -> bool {
        !matches!(self, Terrain::DeepWater | Terrain::Shallows)
    }

    pub fn glyph(&self) -> char {
        match self {
            Terrain::DeepWater => '~',
            Terrain::Shallows => '-',
            Terrain::Beach => ',',
            Terrain::Plains => '.',
            Terrain::Forest => 'T',
            Terrain::Hills => 'n',
            Terrain::Mountains => '^',
        }
    }

    /// Classify a shaped height value against the land threshold
    pub fn from_height(height: f64, threshold: f64) -> Self {
        let above = height - threshold;
        if above < -0.15 {
            Terrain::DeepWater
        } else if above < 0.0 {
            Terrain::Shallows
        } else if above < 0.04 {
            Terrain::Beach
        } else if above < 0.25 {
            Terrain::Plains
        } else if above < 0.45 {
            Terrain::Forest
        } else if above < 0.65 {
            Terrain::Hills
        } else {
            Terrain::Mountains
        }
    }

    pub fn biome(&self) -> Biome {
        match self {
            Terrain::DeepWater | Terrain::Shallows | Terrain::Beach => Biome::Coast,
            Terrain::Plains => Biome::Plains,
            Terrain::Forest => Biome::Forest,
            Terrain::Hills => Biome::Hills,
            Terrain::Mountains => Biome::Mountains,
        }
    }
}

/// Biome a location sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biome {
    Coast,
    Plains,
    Forest,
    Hills,
    Mountains,
    Swamp,
    Underground,
    Ruins,
}

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::Coast,
        Biome::Plains,
        Biome::Forest,
        Biome::Hills,
        Biome::Mountains,
        Biome::Swamp,
        Biome::Underground,
        Biome::Ruins,
    ];
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub const ROAD_GLYPH: char = '+';

/// The three map layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub terrain: Grid<Terrain>,
    /// Terrain glyphs with location icons and roads stamped on top
    pub icons: Grid<char>,
    pub roads: Grid<bool>,
}

impl WorldMap {
    pub fn from_terrain(terrain: Grid<Terrain>) -> Self {
        let icons = terrain.map(|t| t.glyph());
        let roads = Grid::filled(terrain.width, terrain.height, false);
        Self { terrain, icons, roads }
    }

    pub fn width(&self) -> usize {
        self.terrain.width
    }

    pub fn height(&self) -> usize {
        self.terrain.height
    }

    pub fn is_land(&self, coord: Coord) -> bool {
        self.terrain.get(coord).is_some_and(|t| t.is_land())
    }

    pub fn land_cells(&self) -> usize {
        self.terrain.cells().filter(|(_, t)| t.is_land()).count()
    }

    pub fn road_cells(&self) -> usize {
        self.roads.cells().filter(|(_, r)| **r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_classification_is_monotonic() {
        let threshold = -0.1;
        assert!(!Terrain::from_height(-1.0, threshold).is_land());
        assert!(!Terrain::from_height(-0.11, threshold).is_land());
        assert!(Terrain::from_height(-0.09, threshold).is_land());
        assert_eq!(Terrain::from_height(1.0, threshold), Terrain::Mountains);
    }

    #[test]
    fn test_icons_mirror_terrain() {
        let mut terrain = Grid::filled(3, 1, Terrain::DeepWater);
        terrain.set(Coord::new(1, 0), Terrain::Plains);
        let map = WorldMap::from_terrain(terrain);
        assert_eq!(map.icons.rows(), vec!["~.~"]);
        assert_eq!(map.land_cells(), 1);
        assert_eq!(map.road_cells(), 0);
    }
}
