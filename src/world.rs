//! World container and generation entry points.
//!
//! Bundles the generated tile grid with its starting position. Both entry
//! points are pure functions of their inputs: the terrain seed derives from
//! the settings, and the spawn pass derives from the history package.

use crate::history::WorldHistoryPackage;
use crate::settings::WorldGenSettings;
use crate::spawns;
use crate::terrain::TerrainSynthesizer;
use crate::tilemap::Tilemap;
use crate::tiles::Tile;

/// A generated world: the tile grid and the chosen starting position.
pub struct World {
    pub tiles: Tilemap<Tile>,
    pub start: (usize, usize),
    pub settings: WorldGenSettings,
}

impl World {
    /// Generate terrain only, at the default world size.
    pub fn generate(settings: &WorldGenSettings) -> Self {
        Self::generate_sized(settings, TerrainSynthesizer::default())
    }

    /// Generate terrain, then stamp the history package's spawn
    /// suggestions onto it.
    pub fn generate_with_history(
        settings: &WorldGenSettings,
        history: &WorldHistoryPackage,
    ) -> Self {
        let mut world = Self::generate(settings);
        spawns::apply_history_spawns(&mut world.tiles, history);
        world
    }

    fn generate_sized(settings: &WorldGenSettings, synth: TerrainSynthesizer) -> Self {
        let (tiles, start) = synth.generate(settings);
        Self {
            tiles,
            start,
            settings: *settings,
        }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn start_tile(&self) -> &Tile {
        self.tiles.get(self.start.0, self.start.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HistoryData, HistorySynthesizer, HistoryTables, NameEntry};
    use crate::terrain::{WORLD_H, WORLD_W};
    use crate::tiles::TileType;

    #[test]
    fn test_generate_default_size() {
        let world = World::generate(&WorldGenSettings::default());
        assert_eq!(world.width(), WORLD_W);
        assert_eq!(world.height(), WORLD_H);
        assert!(world.start_tile().is_starting_point);
    }

    #[test]
    fn test_generate_with_history_stamps_features() {
        let mut data = HistoryData::new();
        data.names.push(NameEntry::new("Saltmere", &["city"]));
        data.add_template("foundings", "Founding of {city}");

        let tables = HistoryTables::default();
        let settings = WorldGenSettings::default();
        let package = HistorySynthesizer::new(42, &data, &tables).generate(&settings);
        assert!(!package.cities_to_place.is_empty());

        let world = World::generate_with_history(&settings, &package);
        let cities = world
            .tiles
            .iter()
            .filter(|(_, _, t)| t.tile_type == TileType::City)
            .count();
        assert!(cities >= 1);
        assert!(cities <= 6);

        // Terrain-only generation stays untouched by the spawn pass.
        let plain = World::generate(&settings);
        assert!(plain
            .tiles
            .iter()
            .all(|(_, _, t)| t.tile_type != TileType::City));
    }
}
