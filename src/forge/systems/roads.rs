//! Connection graph between placed locations and road rasterization

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::core::grid::Coord;
use crate::forge::config::LocationConfig;
use crate::forge::location::LocationKind;
use crate::forge::map::ROAD_GLYPH;
use crate::forge::world::WorldState;

/// Give each placed location a random set of neighbours
///
/// Edges are symmetric. Mainland locations never reach out to islands,
/// so an island is only connected when it draws an edge itself.
pub fn connect_locations(world: &mut WorldState, config: &LocationConfig, rng: &mut ChaCha8Rng) -> usize {
    let placed: Vec<(String, LocationKind)> = world
        .placed_locations()
        .map(|l| (l.name.clone(), l.kind))
        .collect();

    let mut edges = BTreeSet::new();
    for (name, kind) in &placed {
        let span = if *kind == LocationKind::Island {
            config.island_connections
        } else {
            config.connections
        };
        let degree = span.sample(rng) as usize;

        let mut candidates: Vec<&String> = placed
            .iter()
            .filter(|(other, other_kind)| {
                other != name && (*kind == LocationKind::Island || *other_kind != LocationKind::Island)
            })
            .map(|(other, _)| other)
            .collect();
        candidates.shuffle(rng);

        for other in candidates.into_iter().take(degree) {
            let edge = if name < other {
                (name.clone(), other.clone())
            } else {
                (other.clone(), name.clone())
            };
            edges.insert(edge);
        }
    }

    for (a, b) in &edges {
        if let Some(loc) = world.locations.get_mut(a) {
            loc.connect(b);
        }
        if let Some(loc) = world.locations.get_mut(b) {
            loc.connect(a);
        }
        tracing::debug!("Connected {} <-> {}", a, b);
    }

    edges.len()
}

/// Rasterize one road per unique edge between footprint centres
///
/// Roads only cover land and never overwrite a location icon.
pub fn build_roads(world: &mut WorldState) -> usize {
    let mut processed = BTreeSet::new();
    let mut segments = Vec::new();

    for location in world.placed_locations() {
        for other in &location.connections {
            let pair = if location.name < *other {
                (location.name.clone(), other.clone())
            } else {
                (other.clone(), location.name.clone())
            };
            if !processed.insert(pair) {
                continue;
            }
            let from = location.footprint().map(|f| f.center());
            let to = world.locations.get(other).and_then(|l| l.footprint()).map(|f| f.center());
            if let (Some(from), Some(to)) = (from, to) {
                segments.push((from, to));
            }
        }
    }

    for (from, to) in &segments {
        for cell in bresenham(*from, *to) {
            let on_location = world
                .map
                .icons
                .get(cell)
                .is_some_and(|c| LocationKind::is_glyph(*c));
            if on_location || !world.map.is_land(cell) {
                continue;
            }
            world.map.icons.set(cell, ROAD_GLYPH);
            world.map.roads.set(cell, true);
        }
    }

    let cells = world.map.road_cells();
    tracing::info!("Built {} roads covering {} cells", segments.len(), cells);
    segments.len()
}

/// Cells on the discrete line from `a` to `b`, endpoints included
pub fn bresenham(a: Coord, b: Coord) -> Vec<Coord> {
    let (mut x, mut y) = (a.x as i64, a.y as i64);
    let (x1, y1) = (b.x as i64, b.y as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);

    loop {
        cells.push(Coord::new(x as usize, y as usize));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}
