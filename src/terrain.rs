//! Terrain synthesis.
//!
//! Turns settings plus a settings-derived seed into a classified tile grid:
//! five noise layers, fixed-threshold biome classification, a lake pass, a
//! set of downhill river walks, a reconciliation pass, and a start-site
//! scan. The layer pass is the only parallel stage; everything after it
//! depends on earlier results and runs sequentially, in order.

use log::{debug, info};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::noise::{octave01, Perlin};
use crate::settings::WorldGenSettings;
use crate::tilemap::{Tilemap, DIR_OFFSETS};
use crate::tiles::{Tile, TileType};

/// Default world dimensions in tiles.
pub const WORLD_W: usize = 80;
pub const WORLD_H: usize = 45;

// Seed derivation. The base folds in the two sliders that shape terrain;
// the per-layer XOR constants decorrelate the five noise fields while
// keeping them reproducible from the same settings.
const TERRAIN_SEED_BASE: u32 = 0xBEEF_1234;
const WORLD_SIZE_SEED_STEP: u32 = 133;
const VOLATILITY_SEED_STEP: u32 = 71;
const TEMPERATURE_SEED_XOR: u32 = 0x9E37_79B9;
const MOISTURE_SEED_XOR: u32 = 0x85EB_CA6B;
const MINERAL_SEED_XOR: u32 = 0xC2B2_AE35;
const VEGETATION_SEED_XOR: u32 = 0x27D4_EB2F;
const RIVER_SEED_XOR: u32 = 0xA341_316C;

// Biome thresholds. These are contract values, not tunables: tests and
// downstream consumers rely on the exact cutoffs.
const SEA_LEVEL: f32 = 0.38;
const COAST_BAND: f32 = 0.05;
const MOUNTAIN_LEVEL: f32 = 0.82;
const HILL_LEVEL: f32 = 0.68;
const TUNDRA_TEMP: f32 = 0.25;
const ARID_MOISTURE: f32 = 0.25;
const DESERT_TEMP: f32 = 0.6;
const JUNGLE_MOISTURE: f32 = 0.7;
const FOREST_MOISTURE: f32 = 0.5;

// Lake pass cutoffs.
const LAKE_MAX_ELEVATION: f32 = 0.42;
const LAKE_MIN_MOISTURE: f32 = 0.55;

// River walk tuning.
const RIVER_SEED_ATTEMPTS: u32 = 50;
const RIVER_EDGE_MARGIN: usize = 4;

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Classify a biome from the three driving scalars.
///
/// Priority order matters: elevation bands first, then temperature, then
/// moisture.
fn classify_biome(elevation: f32, temperature: f32, moisture: f32) -> TileType {
    if elevation < SEA_LEVEL {
        return TileType::Ocean;
    }
    if elevation < SEA_LEVEL + COAST_BAND {
        return TileType::Coast;
    }

    if elevation > MOUNTAIN_LEVEL {
        return TileType::Mountain;
    }
    if elevation > HILL_LEVEL {
        return TileType::Hill;
    }

    if temperature < TUNDRA_TEMP {
        return TileType::Tundra;
    }

    if moisture < ARID_MOISTURE {
        return if temperature > DESERT_TEMP {
            TileType::Desert
        } else {
            TileType::Plains
        };
    }

    if moisture > JUNGLE_MOISTURE && temperature > DESERT_TEMP {
        return TileType::Jungle;
    }

    if moisture > FOREST_MOISTURE {
        return TileType::Forest;
    }

    TileType::Plains
}

/// Produces tile grids from settings, deterministically.
pub struct TerrainSynthesizer {
    width: usize,
    height: usize,
}

impl Default for TerrainSynthesizer {
    fn default() -> Self {
        Self::new(WORLD_W, WORLD_H)
    }
}

impl TerrainSynthesizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// The terrain seed is derived from the settings, so the same sliders
    /// always rebuild the same world.
    pub fn base_seed(settings: &WorldGenSettings) -> u32 {
        TERRAIN_SEED_BASE
            .wrapping_add(u32::from(settings.world_size).wrapping_mul(WORLD_SIZE_SEED_STEP))
            .wrapping_add(u32::from(settings.world_volatility).wrapping_mul(VOLATILITY_SEED_STEP))
    }

    /// Generate the full tile grid and the starting position.
    pub fn generate(&self, settings: &WorldGenSettings) -> (Tilemap<Tile>, (usize, usize)) {
        let base = Self::base_seed(settings);
        info!(
            "synthesizing {}x{} terrain (seed base {:#010x})",
            self.width, self.height, base
        );

        let mut tiles = Tilemap::new(self.width, self.height);
        self.sample_layers(settings, base, &mut tiles);
        self.lake_pass(&mut tiles);
        self.river_pass(settings, base, &mut tiles);
        self.reconcile_pass(&mut tiles);
        let start = self.pick_start(&mut tiles);

        (tiles, start)
    }

    /// Per-cell layer sampling and first-pass classification. Cells are
    /// independent, so rows run in parallel; output is identical to the
    /// sequential loop.
    fn sample_layers(&self, settings: &WorldGenSettings, base: u32, tiles: &mut Tilemap<Tile>) {
        let elevation_noise = Perlin::new(base);
        let temperature_noise = Perlin::new(base ^ TEMPERATURE_SEED_XOR);
        let moisture_noise = Perlin::new(base ^ MOISTURE_SEED_XOR);
        let mineral_noise = Perlin::new(base ^ MINERAL_SEED_XOR);
        let vegetation_noise = Perlin::new(base ^ VEGETATION_SEED_XOR);

        let size_scale = 0.7 + f32::from(settings.world_size) * 0.15;
        let width = self.width;
        let height = self.height;

        tiles
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, tile) in row.iter_mut().enumerate() {
                    let nx = x as f32 / width as f32;
                    let ny = y as f32 / height as f32;

                    // Two elevation calls at different base frequencies: the
                    // half-frequency pass rides broad ridges under the detail.
                    let detail =
                        octave01(&elevation_noise, nx * size_scale, ny * size_scale, 5, 0.55);
                    let ridges = octave01(
                        &elevation_noise,
                        nx * size_scale * 0.5,
                        ny * size_scale * 0.5,
                        3,
                        0.65,
                    );
                    let elevation = clamp01(detail * 0.6 + ridges * 0.4);

                    // Latitude peaks at the equator row, noise breaks the bands.
                    let latitude = 1.0 - (ny * 2.0 - 1.0).abs();
                    let temperature = clamp01(
                        latitude * 0.7
                            + octave01(&temperature_noise, nx * 1.2, ny * 1.2, 4, 0.6) * 0.6,
                    );

                    let moisture = clamp01(octave01(&moisture_noise, nx * 1.8, ny * 1.8, 4, 0.55));
                    let mineral = clamp01(octave01(&mineral_noise, nx * 2.2, ny * 2.2, 3, 0.6));
                    let vegetation =
                        clamp01(octave01(&vegetation_noise, nx * 1.6, ny * 1.6, 4, 0.6));

                    *tile = Tile {
                        tile_type: classify_biome(elevation, temperature, moisture),
                        elevation,
                        temperature,
                        moisture,
                        mineral_richness: mineral,
                        vegetation_density: vegetation,
                        has_river: false,
                        is_lake: false,
                        is_starting_point: false,
                    };
                }
            });
    }

    /// Low, wet interior tiles become lakes. The one-tile border is left
    /// alone so lakes never touch the map edge.
    fn lake_pass(&self, tiles: &mut Tilemap<Tile>) {
        for y in 1..self.height.saturating_sub(1) {
            for x in 1..self.width.saturating_sub(1) {
                let tile = tiles.get_mut(x, y);
                if !tile.is_water()
                    && tile.elevation < LAKE_MAX_ELEVATION
                    && tile.moisture > LAKE_MIN_MOISTURE
                {
                    tile.tile_type = TileType::Lake;
                    tile.is_lake = true;
                }
            }
        }
    }

    /// March rivers downhill until they hit water or bottom out.
    fn river_pass(&self, settings: &WorldGenSettings, base: u32, tiles: &mut Tilemap<Tile>) {
        // No seeding band on a grid this small.
        if self.width <= 2 * RIVER_EDGE_MARGIN + 1 || self.height <= 2 * RIVER_EDGE_MARGIN + 1 {
            return;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(base ^ RIVER_SEED_XOR));
        let river_count = 2 + usize::from(settings.world_size);
        let max_river_length = self.width + self.height;

        for _ in 0..river_count {
            let mut rx = rng.gen_range(RIVER_EDGE_MARGIN..self.width - RIVER_EDGE_MARGIN);
            let mut ry = rng.gen_range(RIVER_EDGE_MARGIN..self.height - RIVER_EDGE_MARGIN);

            // Greedy headwater seeding: keep whichever random candidate sits
            // highest. Biased sampling, not a true maximum search.
            for _ in 0..RIVER_SEED_ATTEMPTS {
                let tx = rng.gen_range(RIVER_EDGE_MARGIN..self.width - RIVER_EDGE_MARGIN);
                let ty = rng.gen_range(RIVER_EDGE_MARGIN..self.height - RIVER_EDGE_MARGIN);
                if tiles.get(tx, ty).elevation > tiles.get(rx, ry).elevation {
                    rx = tx;
                    ry = ty;
                }
            }

            for _ in 0..max_river_length {
                {
                    let tile = tiles.get_mut(rx, ry);
                    if tile.is_water() && !tile.has_river {
                        break;
                    }
                    tile.tile_type = TileType::River;
                    tile.has_river = true;
                }

                // Lowest-or-equal interior neighbor; ties keep the first
                // match in clockwise-from-east order.
                let current = tiles.get(rx, ry).elevation;
                let mut best: Option<(usize, usize, f32)> = None;
                for (dx, dy) in DIR_OFFSETS {
                    let nx = rx as i32 + dx;
                    let ny = ry as i32 + dy;
                    if nx <= 0
                        || ny <= 0
                        || nx as usize >= self.width - 1
                        || ny as usize >= self.height - 1
                    {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    let neighbor = tiles.get(nx, ny).elevation;
                    if neighbor <= current {
                        let replace = match best {
                            None => true,
                            Some((_, _, b)) => neighbor < b,
                        };
                        if replace {
                            best = Some((nx, ny, neighbor));
                        }
                    }
                }

                // Local minimum reached.
                let Some((nx, ny, _)) = best else {
                    break;
                };
                rx = nx;
                ry = ny;

                if tiles.get(rx, ry).is_water() {
                    // River mouth: mark where the walk drains and stop.
                    let tile = tiles.get_mut(rx, ry);
                    tile.tile_type = TileType::River;
                    tile.has_river = true;
                    break;
                }
            }
        }
    }

    /// Water flags win over the biome classification; everything else is
    /// re-derived from the stored scalars. This pass, not the first one, is
    /// authoritative for the visible type.
    fn reconcile_pass(&self, tiles: &mut Tilemap<Tile>) {
        for (_, _, tile) in tiles.iter_mut() {
            if tile.has_river {
                tile.tile_type = TileType::River;
            } else if tile.is_lake {
                tile.tile_type = TileType::Lake;
            } else {
                tile.tile_type =
                    classify_biome(tile.elevation, tile.temperature, tile.moisture);
            }
        }
    }

    /// Score every land tile and flag the best one as the starting point.
    ///
    /// Row-major scan with strict improvement, so the first of any tied
    /// tiles wins. An all-water grid falls back to the center tile, keeping
    /// the one-start invariant on every input.
    fn pick_start(&self, tiles: &mut Tilemap<Tile>) -> (usize, usize) {
        let mut start = (self.width / 2, self.height / 2);
        let mut best_score = -1.0f32;

        for (x, y, tile) in tiles.iter() {
            if tile.is_water() {
                continue;
            }
            let temp_comfort = 1.0 - (tile.temperature - 0.55).abs();
            let score = tile.vegetation_density * 0.35
                + tile.mineral_richness * 0.35
                + temp_comfort * 0.2
                + tile.elevation * 0.1;
            if score > best_score {
                best_score = score;
                start = (x, y);
            }
        }

        if best_score < 0.0 {
            debug!("no land tile found; flagging center as start");
        }

        let tile = tiles.get_mut(start.0, start.1);
        tile.is_starting_point = true;
        tile.tile_type = TileType::Core;

        start
    }
}
