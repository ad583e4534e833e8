//! Tunables for a forge run

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ForgeError, Result};
use crate::core::types::{FactionKind, Size, Span, Tier};

/// Configuration for the whole cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub seed: u64,
    pub map: MapConfig,
    pub locations: LocationConfig,
    pub population: PopulationConfig,
    pub creatures: CreatureConfig,
    pub economy: EconomyConfig,
    pub quests: QuestConfig,
    pub time: TimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    pub noise_scale: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
    /// Cells whose shaped height exceeds this become land
    pub land_threshold: f64,
    /// Strength of the radial falloff toward the map edge
    pub falloff: f64,
    /// Radius of the guaranteed land disk at the centre
    pub core_radius: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub capital_size: Size,
    pub settlement_size: Size,
    pub island_size: Size,
    /// Side length range of (square) dungeons
    pub dungeon_side: Span,
    pub settlements: Span,
    pub dungeons: Span,
    pub islands: Span,
    pub placement_attempts: u32,
    /// Outgoing connections per mainland location
    pub connections: Span,
    /// Outgoing connections per island
    pub island_connections: Span,
    pub settlement_challenge: Span,
    pub dungeon_challenge: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub families_per_settlement: Span,
    pub garrison_size: u32,
    pub factions: Vec<FactionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    pub boss_threshold: Tier,
    /// Creatures per footprint cell
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub total_gold: u64,
    pub budget_fraction_min: f64,
    pub budget_fraction_max: f64,
    pub family_bonus: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    pub generic_per_tier: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub start_day: u32,
    pub start_hour: u32,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            map: MapConfig::default(),
            locations: LocationConfig::default(),
            population: PopulationConfig::default(),
            creatures: CreatureConfig::default(),
            economy: EconomyConfig::default(),
            quests: QuestConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            noise_scale: 50.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            land_threshold: -0.1,
            falloff: 1.2,
            core_radius: 8,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            capital_size: Size::square(8),
            settlement_size: Size::square(3),
            island_size: Size::square(5),
            dungeon_side: Span::new(3, 5),
            settlements: Span::new(2, 4),
            dungeons: Span::new(4, 6),
            islands: Span::new(0, 1),
            placement_attempts: 1000,
            connections: Span::new(1, 3),
            island_connections: Span::new(0, 1),
            settlement_challenge: Span::new(1, 3),
            dungeon_challenge: Span::new(1, 10),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            families_per_settlement: Span::new(2, 4),
            garrison_size: 4,
            factions: FactionKind::ALL.to_vec(),
        }
    }
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            boss_threshold: Tier::clamped(8),
            density: 0.2,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            total_gold: 100_000,
            budget_fraction_min: 0.2,
            budget_fraction_max: 0.5,
            family_bonus: true,
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self { generic_per_tier: 2 }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_day: 1,
            start_hour: 6,
        }
    }
}

impl ForgeConfig {
    /// A lone capital: no settlements, dungeons or islands
    pub fn minimal() -> Self {
        let mut config = Self::default();
        config.locations.settlements = Span::new(0, 0);
        config.locations.dungeons = Span::new(0, 0);
        config.locations.islands = Span::new(0, 0);
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load from a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ForgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ForgeError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let map = &self.map;
        if map.width == 0 || map.height == 0 {
            return Err(ForgeError::Config(format!(
                "map size {}x{} must be non-zero",
                map.width, map.height
            )));
        }
        if map.noise_scale <= 0.0 || map.octaves == 0 {
            return Err(ForgeError::Config("noise scale and octaves must be positive".into()));
        }

        let loc = &self.locations;
        for (label, span) in [
            ("dungeon_side", loc.dungeon_side),
            ("settlements", loc.settlements),
            ("dungeons", loc.dungeons),
            ("islands", loc.islands),
            ("connections", loc.connections),
            ("island_connections", loc.island_connections),
            ("settlement_challenge", loc.settlement_challenge),
            ("dungeon_challenge", loc.dungeon_challenge),
            ("families_per_settlement", self.population.families_per_settlement),
        ] {
            if !span.is_valid() {
                return Err(ForgeError::Config(format!(
                    "{} range {}..={} is empty",
                    label, span.min, span.max
                )));
            }
        }
        for (label, span) in [
            ("settlement_challenge", loc.settlement_challenge),
            ("dungeon_challenge", loc.dungeon_challenge),
        ] {
            if span.min < 1 || span.max > 10 {
                return Err(ForgeError::Config(format!("{} must lie within 1..=10", label)));
            }
        }
        for (label, size) in [
            ("capital_size", loc.capital_size),
            ("settlement_size", loc.settlement_size),
            ("island_size", loc.island_size),
        ] {
            if size.area() == 0 {
                return Err(ForgeError::Config(format!("{} must be non-empty", label)));
            }
        }
        if loc.dungeon_side.min == 0 {
            return Err(ForgeError::Config("dungeon_side must be at least 1".into()));
        }
        if loc.placement_attempts == 0 {
            return Err(ForgeError::Config("placement_attempts must be positive".into()));
        }

        let eco = &self.economy;
        let fraction = 0.0..=1.0;
        if !fraction.contains(&eco.budget_fraction_min)
            || !fraction.contains(&eco.budget_fraction_max)
            || eco.budget_fraction_min > eco.budget_fraction_max
        {
            return Err(ForgeError::Config(format!(
                "budget fraction {}..{} must be an ordered range within 0..=1",
                eco.budget_fraction_min, eco.budget_fraction_max
            )));
        }

        if !(self.creatures.density > 0.0) {
            return Err(ForgeError::Config("creature density must be positive".into()));
        }

        let mut seen = self.population.factions.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.population.factions.len() {
            return Err(ForgeError::Config("faction roster lists a faction twice".into()));
        }

        if self.time.start_day == 0 || self.time.start_hour > 23 {
            return Err(ForgeError::Config(format!(
                "start time day {} hour {} is not a valid clock",
                self.time.start_day, self.time.start_hour
            )));
        }

        Ok(())
    }
}
