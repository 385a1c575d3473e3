//! PNG and JSON export.

use std::fs::File;
use std::io;
use std::io::Write;

use image::{GrayImage, ImageBuffer, Rgb, RgbImage};
use thiserror::Error;

use crate::history::WorldHistoryPackage;
use crate::noise;
use crate::tilemap::Tilemap;
use crate::world::World;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export the world map as a PNG using the tile color table.
pub fn export_world_png(world: &World, path: &str) -> Result<(), ExportError> {
    let mut img: RgbImage = ImageBuffer::new(world.width() as u32, world.height() as u32);

    for (x, y, tile) in world.tiles.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(tile.tile_type.color()));
    }

    img.save(path)?;
    Ok(())
}

/// Export a scalar field as a grayscale PNG using min–max normalization.
pub fn export_field_png(field: &Tilemap<f32>, path: &str) -> Result<(), ExportError> {
    let gray = noise::normalize_to_u8(field);
    save_gray(field.width, field.height, gray, path)
}

/// Export a scalar field as a grayscale PNG using the robust terrain
/// normalization (percentile clip, sea-level bias, gamma).
pub fn export_terrain_png(
    field: &Tilemap<f32>,
    path: &str,
    sea_level: f32,
    gamma: f32,
) -> Result<(), ExportError> {
    let gray = noise::normalize_terrain_to_u8(field, 0.02, 0.98, sea_level, gamma);
    save_gray(field.width, field.height, gray, path)
}

fn save_gray(width: usize, height: usize, gray: Vec<u8>, path: &str) -> Result<(), ExportError> {
    let img = GrayImage::from_raw(width as u32, height as u32, gray)
        .expect("buffer length matches dimensions");
    img.save(path)?;
    Ok(())
}

/// Dump a history package as pretty-printed JSON.
pub fn export_history_json(package: &WorldHistoryPackage, path: &str) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    serde_json::to_writer_pretty(&mut file, package)?;
    file.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WorldGenSettings;

    fn temp_path(name: &str) -> String {
        let dir = std::env::temp_dir().join("worldforge_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name).display().to_string()
    }

    #[test]
    fn test_export_world_png() {
        let world = World::generate(&WorldGenSettings::default());
        let path = temp_path("world.png");
        export_world_png(&world, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_field_png_both_paths() {
        let field = noise::fbm_field(32, 16, &noise::NoiseParams::default());
        let plain = temp_path("field.png");
        let robust = temp_path("terrain.png");
        export_field_png(&field, &plain).unwrap();
        export_terrain_png(&field, &robust, 0.55, 1.45).unwrap();
        assert!(std::fs::metadata(&plain).unwrap().len() > 0);
        assert!(std::fs::metadata(&robust).unwrap().len() > 0);
    }

    #[test]
    fn test_export_history_json() {
        let package = WorldHistoryPackage::new(3, WorldGenSettings::default());
        let path = temp_path("history.json");
        export_history_json(&package, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"seed\": 3"));
    }
}
