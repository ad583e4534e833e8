//! Location planning and non-overlapping footprint placement

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::PlacementError;
use crate::core::grid::{Coord, Footprint};
use crate::core::types::{Size, Tier};
use crate::forge::config::LocationConfig;
use crate::forge::location::{DungeonKind, Location, LocationKind};
use crate::forge::map::{Biome, Terrain, WorldMap};
use crate::forge::names;
use crate::forge::world::WorldState;

/// Tracks occupied cells and finds free footprints by random retry
pub struct LocationPlacer {
    width: usize,
    height: usize,
    attempts: u32,
    occupied: AHashSet<Coord>,
}

impl LocationPlacer {
    pub fn new(width: usize, height: usize, attempts: u32) -> Self {
        Self {
            width,
            height,
            attempts,
            occupied: AHashSet::new(),
        }
    }

    pub fn occupy(&mut self, footprint: &Footprint) {
        self.occupied.extend(footprint.cells());
    }

    pub fn is_free(&self, footprint: &Footprint) -> bool {
        footprint.cells().all(|c| !self.occupied.contains(&c))
    }

    pub fn occupied_cells(&self) -> usize {
        self.occupied.len()
    }

    /// Find a free, terrain-compatible origin for `location`
    ///
    /// Islands need open water under the whole footprint; everything else
    /// needs land. Nothing is committed here.
    pub fn find_spot(
        &self,
        location: &Location,
        map: &WorldMap,
        rng: &mut ChaCha8Rng,
    ) -> Result<Coord, PlacementError> {
        let size = location.size;
        if size.width > self.width || size.height > self.height {
            return Err(PlacementError::DoesNotFit {
                name: location.name.clone(),
                width: size.width,
                height: size.height,
            });
        }

        let max_x = self.width - size.width;
        let max_y = self.height - size.height;

        for _ in 0..self.attempts {
            let origin = match location.kind {
                LocationKind::Capital => Coord::new(center_biased(rng, max_x), center_biased(rng, max_y)),
                LocationKind::Island => Coord::new(edge_biased(rng, max_x), edge_biased(rng, max_y)),
                LocationKind::Settlement | LocationKind::Dungeon => {
                    Coord::new(rng.gen_range(0..=max_x), rng.gen_range(0..=max_y))
                }
            };
            let footprint = Footprint::new(origin, size);
            if !self.is_free(&footprint) {
                continue;
            }
            let wants_land = location.kind != LocationKind::Island;
            if footprint.cells().all(|c| map.is_land(c) == wants_land) {
                return Ok(origin);
            }
        }

        Err(PlacementError::Exhausted {
            name: location.name.clone(),
            width: size.width,
            height: size.height,
            attempts: self.attempts,
        })
    }
}

fn center_biased(rng: &mut ChaCha8Rng, max: usize) -> usize {
    (rng.gen_range(0..=max) + rng.gen_range(0..=max)) / 2
}

fn edge_biased(rng: &mut ChaCha8Rng, max: usize) -> usize {
    let inset = rng.gen_range(0..=max).min(rng.gen_range(0..=max));
    if rng.gen_bool(0.5) {
        inset
    } else {
        max - inset
    }
}

/// Decide which locations the realm has, before any are placed
pub fn plan_locations(config: &LocationConfig, capital_name: &str, rng: &mut ChaCha8Rng) -> Vec<Location> {
    let mut taken = AHashSet::new();
    taken.insert(capital_name.to_string());
    let mut planned = Vec::new();

    let mut capital = Location::new(capital_name, LocationKind::Capital, config.capital_size, Tier::MIN);
    capital.description = "The bustling, walled seat of the realm.".into();
    capital.sub_locations = vec!["Throne Hall".into(), "Barracks".into(), "Market Square".into()];
    planned.push(capital);

    for _ in 0..config.settlements.sample(rng) {
        let name = names::settlement_name(rng, &mut taken);
        let challenge = Tier::clamped(config.settlement_challenge.sample(rng) as i32);
        let mut settlement = Location::new(name, LocationKind::Settlement, config.settlement_size, challenge);
        settlement.description = "A small farming settlement.".into();
        settlement.sub_locations = vec![format!("{} Inn", settlement.name), "Smithy".into()];
        planned.push(settlement);
    }

    for _ in 0..config.dungeons.sample(rng) {
        let name = names::dungeon_name(rng, &mut taken);
        let side = config.dungeon_side.sample(rng) as usize;
        let challenge = Tier::clamped(config.dungeon_challenge.sample(rng) as i32);
        let kind = *DungeonKind::ALL.choose(rng).unwrap_or(&DungeonKind::Cave);
        let mut dungeon = Location::new(name, LocationKind::Dungeon, Size::square(side), challenge);
        dungeon.dungeon = Some(kind);
        dungeon.biome = kind.biome();
        dungeon.description = kind.description().to_string();
        dungeon.sub_locations = vec!["Entrance".into(), "Inner Sanctum".into()];
        planned.push(dungeon);
    }

    for _ in 0..config.islands.sample(rng) {
        let name = names::island_name(rng, &mut taken);
        let challenge = Tier::clamped(config.settlement_challenge.sample(rng) as i32);
        let mut island = Location::new(name, LocationKind::Island, config.island_size, challenge);
        island.biome = Biome::Coast;
        island.description = "A windswept island reachable only by boat.".into();
        planned.push(island);
    }

    planned
}

/// Place every planned location, largest footprint first
///
/// Returns the placement failures. A failed location is still recorded in
/// the world, just without coordinates.
pub fn place_locations(
    world: &mut WorldState,
    planned: Vec<Location>,
    attempts: u32,
    rng: &mut ChaCha8Rng,
) -> Vec<PlacementError> {
    let mut placer = LocationPlacer::new(world.map.width(), world.map.height(), attempts);
    let mut failures = Vec::new();

    let mut planned = planned;
    planned.sort_by(|a, b| {
        b.size
            .area()
            .cmp(&a.size.area())
            .then_with(|| a.name.cmp(&b.name))
    });

    for mut location in planned {
        match placer.find_spot(&location, &world.map, rng) {
            Ok(origin) => {
                let footprint = Footprint::new(origin, location.size);
                placer.occupy(&footprint);
                commit(world, &mut location, footprint);
                tracing::debug!(
                    "Placed {} {} at ({}, {})",
                    location.kind,
                    location.name,
                    origin.x,
                    origin.y
                );
            }
            Err(err) => {
                tracing::warn!("Placement failed: {}", err);
                failures.push(err);
            }
        }
        world.locations.insert(location.name.clone(), location);
    }

    tracing::info!(
        "Placed {} of {} locations ({} cells occupied)",
        world.placed_locations().count(),
        world.locations.len(),
        placer.occupied_cells()
    );
    failures
}

/// Stamp the footprint onto the map and record it on the location
fn commit(world: &mut WorldState, location: &mut Location, footprint: Footprint) {
    let glyph = location.kind.glyph();
    for cell in footprint.cells() {
        if location.kind == LocationKind::Island {
            let edge = cell.x == footprint.origin.x
                || cell.y == footprint.origin.y
                || cell.x + 1 == footprint.right()
                || cell.y + 1 == footprint.bottom();
            let raised = if edge { Terrain::Beach } else { Terrain::Forest };
            world.map.terrain.set(cell, raised);
        }
        world.map.icons.set(cell, glyph);
    }

    location.coordinates = Some(footprint.origin);
    if location.dungeon.is_none() && location.kind != LocationKind::Island {
        if let Some(terrain) = world.map.terrain.get(footprint.center()) {
            location.biome = terrain.biome();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;
    use crate::forge::player::PlayerCharacter;
    use rand::SeedableRng;

    fn land_world(width: usize, height: usize) -> WorldState {
        let map = WorldMap::from_terrain(Grid::filled(width, height, Terrain::Plains));
        WorldState::new(42, map, PlayerCharacter::default(), 0)
    }

    #[test]
    fn test_placement_never_overlaps() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut world = land_world(40, 40);
        let config = LocationConfig {
            islands: crate::core::types::Span::new(0, 0),
            ..LocationConfig::default()
        };
        let planned = plan_locations(&config, "Eldoria City", &mut rng);
        let failures = place_locations(&mut world, planned, 1000, &mut rng);
        assert!(failures.is_empty());

        let placed: Vec<Footprint> = world.locations.values().filter_map(|l| l.footprint()).collect();
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_exhausted_budget_leaves_location_unplaced() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = land_world(10, 10);
        let mut placer = LocationPlacer::new(10, 10, 500);
        // Fill everything except (4, 4)
        for y in 0..10 {
            for x in 0..10 {
                if (x, y) != (4, 4) {
                    placer.occupy(&Footprint::new(Coord::new(x, y), Size::square(1)));
                }
            }
        }
        let dungeon = Location::new("Skull Lair", LocationKind::Dungeon, Size::square(5), Tier::MAX);
        let err = placer.find_spot(&dungeon, &world.map, &mut rng).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Exhausted {
                name: "Skull Lair".into(),
                width: 5,
                height: 5,
                attempts: 500
            }
        );
    }

    #[test]
    fn test_oversized_footprint_does_not_fit() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = land_world(6, 6);
        let placer = LocationPlacer::new(6, 6, 10);
        let capital = Location::new("Eldoria", LocationKind::Capital, Size::square(8), Tier::MIN);
        assert!(matches!(
            placer.find_spot(&capital, &world.map, &mut rng),
            Err(PlacementError::DoesNotFit { .. })
        ));
    }

    #[test]
    fn test_island_needs_water() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let world = land_world(20, 20);
        let placer = LocationPlacer::new(20, 20, 200);
        let island = Location::new("Isle of Gull", LocationKind::Island, Size::square(5), Tier::MIN);
        assert!(placer.find_spot(&island, &world.map, &mut rng).is_err());
    }

    #[test]
    fn test_commit_stamps_icons() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut world = land_world(12, 12);
        let capital = Location::new("Eldoria", LocationKind::Capital, Size::square(8), Tier::MIN);
        let failures = place_locations(&mut world, vec![capital], 100, &mut rng);
        assert!(failures.is_empty());
        let fp = world.locations["Eldoria"].footprint().unwrap();
        assert!(fp.cells().all(|c| world.map.icons.get(c) == Some(&'C')));
        assert_eq!(world.locations["Eldoria"].biome, Biome::Plains);
    }
}
