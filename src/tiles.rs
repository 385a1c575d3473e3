//! Tile types and per-tile data.
//!
//! `TileType` is a closed enum: every rendering surface matches on it
//! exhaustively, so a new variant is a compile error until each surface
//! handles it.

use serde::{Deserialize, Serialize};

/// Everything a map cell can be, from open ocean down to dungeon interiors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    // Water
    Ocean,
    Coast,
    Lake,
    River,

    // Land biomes
    Plains,
    Forest,
    Jungle,
    Desert,
    Tundra,
    Hill,
    Mountain,

    // World features stamped by history
    City,
    Ruin,
    DungeonSite,
    Artifact,

    // Dungeon interiors
    Rock,
    Floor,
    Wall,
    Core,
    Spawner,
}

impl TileType {
    /// Water tiles exclude Coast: a coast is walkable shoreline.
    pub fn is_water(self) -> bool {
        matches!(self, TileType::Ocean | TileType::Lake | TileType::River)
    }

    /// ASCII glyph for map rendering.
    pub fn glyph(self) -> char {
        match self {
            TileType::Ocean => '~',
            TileType::Coast => ',',
            TileType::Lake => 'o',
            TileType::River => '=',

            TileType::Plains => '.',
            TileType::Forest => 'Y',
            TileType::Jungle => 'J',
            TileType::Desert => ':',
            TileType::Tundra => '"',
            TileType::Hill => 'n',
            TileType::Mountain => '^',

            TileType::City => 'T',
            TileType::Ruin => 'R',
            TileType::DungeonSite => 'D',
            TileType::Artifact => 'A',

            TileType::Rock => '#',
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Core => 'C',
            TileType::Spawner => 'S',
        }
    }

    /// Base RGB color for image export.
    pub fn color(self) -> [u8; 3] {
        match self {
            TileType::Ocean => [20, 70, 150],
            TileType::Coast => [200, 190, 140],
            TileType::Lake => [40, 100, 190],
            TileType::River => [60, 130, 210],

            TileType::Plains => [90, 170, 90],
            TileType::Forest => [40, 120, 70],
            TileType::Jungle => [50, 150, 80],
            TileType::Desert => [220, 190, 100],
            TileType::Tundra => [200, 220, 230],
            TileType::Hill => [130, 150, 90],
            TileType::Mountain => [190, 190, 190],

            TileType::City => [80, 140, 220],
            TileType::Ruin => [120, 120, 120],
            TileType::DungeonSite => [180, 80, 80],
            TileType::Artifact => [240, 200, 60],

            TileType::Rock => [90, 90, 90],
            TileType::Wall => [110, 110, 110],
            TileType::Floor => [140, 140, 140],
            TileType::Core => [160, 60, 200],
            TileType::Spawner => [120, 200, 120],
        }
    }
}

/// One map cell: classified type plus the raw scalar layers it was
/// classified from. The scalars are kept so later passes (reconciliation,
/// start-site scoring) can re-derive the biome without resampling noise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,

    pub elevation: f32,
    pub temperature: f32,
    pub moisture: f32,
    pub mineral_richness: f32,
    pub vegetation_density: f32,

    pub has_river: bool,
    pub is_lake: bool,
    pub is_starting_point: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            tile_type: TileType::Ocean,
            elevation: 0.0,
            temperature: 0.0,
            moisture: 0.0,
            mineral_richness: 0.0,
            vegetation_density: 0.0,
            has_river: false,
            is_lake: false,
            is_starting_point: false,
        }
    }
}

impl Tile {
    pub fn is_water(&self) -> bool {
        self.tile_type.is_water()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_classification() {
        assert!(TileType::Ocean.is_water());
        assert!(TileType::Lake.is_water());
        assert!(TileType::River.is_water());
        assert!(!TileType::Coast.is_water());
        assert!(!TileType::Plains.is_water());
        assert!(!TileType::City.is_water());
    }

    #[test]
    fn test_default_tile_is_ocean() {
        let t = Tile::default();
        assert_eq!(t.tile_type, TileType::Ocean);
        assert!(t.is_water());
        assert!(!t.is_starting_point);
    }

    #[test]
    fn test_glyphs_distinct_for_map_surface() {
        // Overworld types players actually see should be visually distinct.
        let overworld = [
            TileType::Ocean,
            TileType::Coast,
            TileType::Lake,
            TileType::River,
            TileType::Plains,
            TileType::Forest,
            TileType::Jungle,
            TileType::Desert,
            TileType::Tundra,
            TileType::Hill,
            TileType::Mountain,
            TileType::City,
            TileType::Ruin,
            TileType::DungeonSite,
            TileType::Artifact,
        ];
        for (i, a) in overworld.iter().enumerate() {
            for b in &overworld[i + 1..] {
                assert_ne!(a.glyph(), b.glyph(), "{:?} vs {:?}", a, b);
            }
        }
    }
}
