//! Applies a history package's spawn suggestions to a generated tile grid.
//!
//! Placement is best-effort: each feature gets a bounded number of random
//! draws over the interior and is silently skipped if they all land on
//! water. Later placements may overwrite earlier ones; last write wins.

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::history::WorldHistoryPackage;
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileType};

const PLACEMENT_SEED_XOR: u32 = 0xA341_316C;
const PLACEMENT_ATTEMPTS: u32 = 500;

const MAX_CITIES: usize = 6;
const MAX_RUINS: usize = 6;
const MAX_ARTIFACTS: usize = 3;
const MAX_DUNGEONS: usize = 2;

/// Stamp bounded counts of history-derived features onto land tiles.
pub fn apply_history_spawns(tiles: &mut Tilemap<Tile>, history: &WorldHistoryPackage) {
    if tiles.width < 3 || tiles.height < 3 {
        return;
    }

    let seed = if history.seed == 0 { 1 } else { history.seed };
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed ^ PLACEMENT_SEED_XOR));

    let cities = history.cities_to_place.len().min(MAX_CITIES);
    let ruins = history.ruins_to_place.len().min(MAX_RUINS);
    let artifacts = history.artifacts_to_seed.len().min(MAX_ARTIFACTS);
    // A world needs a few ruins before it earns a dungeon.
    let dungeons = (history.ruins_to_place.len() / 3).min(MAX_DUNGEONS);

    for _ in 0..cities {
        try_place(tiles, &mut rng, TileType::City);
    }
    for _ in 0..ruins {
        try_place(tiles, &mut rng, TileType::Ruin);
    }
    for _ in 0..artifacts {
        try_place(tiles, &mut rng, TileType::Artifact);
    }
    for _ in 0..dungeons {
        try_place(tiles, &mut rng, TileType::DungeonSite);
    }
}

fn try_place(tiles: &mut Tilemap<Tile>, rng: &mut ChaCha8Rng, tile_type: TileType) -> bool {
    for _ in 0..PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(1..tiles.width - 1);
        let y = rng.gen_range(1..tiles.height - 1);
        let tile = tiles.get_mut(x, y);
        if !tile.is_water() {
            tile.tile_type = tile_type;
            return true;
        }
    }
    debug!("no land tile found for {:?} within attempt budget", tile_type);
    false
}
