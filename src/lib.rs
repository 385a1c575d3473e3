//! Deterministic fantasy world synthesis.
//!
//! Terrain (noise layers, biomes, lakes, rivers, a start site) and history
//! (weighted templated events, entities, spawn hints) from a seed and seven
//! settings sliders. Identical (seed, settings, data) reproduce identical
//! worlds bit-for-bit.

pub mod ascii;
pub mod export;
pub mod history;
pub mod noise;
pub mod settings;
pub mod spawns;
pub mod terrain;
pub mod tilemap;
pub mod tiles;
pub mod world;

pub use history::{
    HistoricalEvent, HistoryData, HistorySynthesizer, HistoryTables, SpawnIntent, WorldEntity,
    WorldHistoryPackage,
};
pub use settings::WorldGenSettings;
pub use terrain::TerrainSynthesizer;
pub use tiles::{Tile, TileType};
pub use world::World;
