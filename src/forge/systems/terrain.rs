//! Height-field terrain with a central landmass

use noise::{NoiseFn, Perlin, Seedable};

use crate::core::grid::{Coord, Grid};
use crate::forge::config::MapConfig;
use crate::forge::map::{Terrain, WorldMap};

/// Build the terrain layer
///
/// Multi-octave Perlin noise is blended with a radial falloff so land
/// gathers toward the centre and the rim drowns. A disk of `core_radius`
/// cells around the centre is always land so the capital has somewhere
/// to stand.
pub fn generate_terrain(config: &MapConfig, seed: u64) -> WorldMap {
    let noise = Perlin::new(1).set_seed(seed as u32);
    let (width, height) = (config.width, config.height);
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;
    let radius = (width.min(height) as f64 / 2.0).max(1.0);

    let mut terrain = Grid::filled(width, height, Terrain::DeepWater);
    for y in 0..height {
        for x in 0..width {
            let n = fbm(
                &noise,
                x as f64 / config.noise_scale,
                y as f64 / config.noise_scale,
                config.octaves,
                config.persistence,
                config.lacunarity,
            );
            let dx = (x as f64 - cx) / radius;
            let dy = (y as f64 - cy) / radius;
            let d2 = dx * dx + dy * dy;
            let shaped = 0.5 * n + 0.5 * (1.0 - config.falloff * d2);
            terrain.set(Coord::new(x, y), Terrain::from_height(shaped, config.land_threshold));
        }
    }

    stamp_core(&mut terrain, config.core_radius);

    let map = WorldMap::from_terrain(terrain);
    let land = map.land_cells();
    let total = width * height;
    if land == 0 {
        tracing::warn!("Degenerate map: {}x{} has no land at all", width, height);
    } else if land * 20 < total {
        tracing::warn!(
            "Degenerate map: only {} of {} cells are land",
            land,
            total
        );
    }
    tracing::info!(
        "Generated {}x{} terrain ({} land cells, {:.0}%)",
        width,
        height,
        land,
        land as f64 * 100.0 / total as f64
    );
    map
}

/// Raise every water cell within `radius` of the centre to plains
fn stamp_core(terrain: &mut Grid<Terrain>, radius: usize) {
    if radius == 0 {
        return;
    }
    let cx = terrain.width / 2;
    let cy = terrain.height / 2;
    let r2 = (radius * radius) as i64;
    for y in cy.saturating_sub(radius)..=(cy + radius).min(terrain.height.saturating_sub(1)) {
        for x in cx.saturating_sub(radius)..=(cx + radius).min(terrain.width.saturating_sub(1)) {
            let dx = x as i64 - cx as i64;
            let dy = y as i64 - cy as i64;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            if let Some(cell) = terrain.get_mut(Coord::new(x, y)) {
                if !cell.is_land() {
                    *cell = Terrain::Plains;
                }
            }
        }
    }
}

/// Fractal Brownian motion normalised to [-1, 1]
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}
