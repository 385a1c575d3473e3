//! ASCII rendering of world maps and scalar layers.
//!
//! Thin presentation glue: a glyph per tile for the map view, and a shade
//! ramp for the debugging views of the raw scalar fields.

use crate::tiles::TileType;
use crate::world::World;

/// ASCII rendering modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Tile glyphs, with 'P' at the starting position.
    Map,
    Elevation,
    Temperature,
    Moisture,
    Mineral,
    Vegetation,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Map => "Map",
            AsciiMode::Elevation => "Elevation",
            AsciiMode::Temperature => "Temperature",
            AsciiMode::Moisture => "Moisture",
            AsciiMode::Mineral => "Mineral",
            AsciiMode::Vegetation => "Vegetation",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[
            AsciiMode::Map,
            AsciiMode::Elevation,
            AsciiMode::Temperature,
            AsciiMode::Moisture,
            AsciiMode::Mineral,
            AsciiMode::Vegetation,
        ]
    }
}

/// Shade ramp from low to high.
const SHADES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Map a [0, 1] value to a shade character.
pub fn shade_char(value: f32) -> char {
    let idx = (value.clamp(0.0, 1.0) * (SHADES.len() - 1) as f32 + 0.5) as usize;
    SHADES[idx.min(SHADES.len() - 1)]
}

/// Render a world view as one newline-terminated string per row.
pub fn render(world: &World, mode: AsciiMode) -> String {
    let mut out = String::with_capacity((world.width() + 1) * world.height());

    for y in 0..world.height() {
        for x in 0..world.width() {
            let tile = world.tiles.get(x, y);
            let c = match mode {
                AsciiMode::Map => {
                    if tile.is_starting_point {
                        'P'
                    } else {
                        tile.tile_type.glyph()
                    }
                }
                AsciiMode::Elevation => shade_char(tile.elevation),
                AsciiMode::Temperature => shade_char(tile.temperature),
                AsciiMode::Moisture => shade_char(tile.moisture),
                AsciiMode::Mineral => shade_char(tile.mineral_richness),
                AsciiMode::Vegetation => shade_char(tile.vegetation_density),
            };
            out.push(c);
        }
        out.push('\n');
    }

    out
}

/// Legend of map glyphs for the overworld tile types.
pub fn map_legend() -> String {
    let entries = [
        (TileType::Ocean, "ocean"),
        (TileType::Coast, "coast"),
        (TileType::Lake, "lake"),
        (TileType::River, "river"),
        (TileType::Plains, "plains"),
        (TileType::Forest, "forest"),
        (TileType::Jungle, "jungle"),
        (TileType::Desert, "desert"),
        (TileType::Tundra, "tundra"),
        (TileType::Hill, "hill"),
        (TileType::Mountain, "mountain"),
        (TileType::City, "city"),
        (TileType::Ruin, "ruin"),
        (TileType::DungeonSite, "dungeon site"),
        (TileType::Artifact, "artifact"),
        (TileType::Core, "start"),
    ];

    let mut out = String::new();
    for (tile_type, label) in entries {
        out.push_str(&format!("{} {}  ", tile_type.glyph(), label));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WorldGenSettings;

    #[test]
    fn test_shade_ramp_endpoints() {
        assert_eq!(shade_char(0.0), ' ');
        assert_eq!(shade_char(1.0), '@');
        assert_eq!(shade_char(-5.0), ' ');
        assert_eq!(shade_char(5.0), '@');
    }

    #[test]
    fn test_render_dimensions() {
        let world = World::generate(&WorldGenSettings::default());
        let text = render(&world, AsciiMode::Map);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), world.height());
        assert!(lines.iter().all(|l| l.chars().count() == world.width()));
    }

    #[test]
    fn test_map_marks_start() {
        let world = World::generate(&WorldGenSettings::default());
        let text = render(&world, AsciiMode::Map);
        assert_eq!(text.chars().filter(|&c| c == 'P').count(), 1);
    }
}
