//! World generation settings.
//!
//! Seven coarse sliders, each 0..=4 (extreme-low to extreme-high). The
//! settings are immutable once generation starts; everything downstream
//! derives from them plus a seed.

use serde::{Deserialize, Serialize};

/// Highest slider position.
pub const SLIDER_MAX: u8 = 4;

/// The seven generation sliders, each in [0, 4].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGenSettings {
    /// Landmass scale and river count.
    pub world_size: u8,
    /// Number and spread of historical events.
    pub history_length: u8,
    /// How crowded the world is with civilizations.
    pub civilization_saturation: u8,
    /// Density of placed sites.
    pub site_density: u8,
    /// Bias toward conflict-themed history and rougher terrain seeds.
    pub world_volatility: u8,
    /// Mineral and vegetation richness.
    pub resource_abundance: u8,
    /// Monster presence.
    pub monstrous_population: u8,
}

impl Default for WorldGenSettings {
    fn default() -> Self {
        Self {
            world_size: 2,
            history_length: 2,
            civilization_saturation: 2,
            site_density: 2,
            world_volatility: 2,
            resource_abundance: 2,
            monstrous_population: 2,
        }
    }
}

impl WorldGenSettings {
    /// Build settings with every slider clamped into [0, 4].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        world_size: u8,
        history_length: u8,
        civilization_saturation: u8,
        site_density: u8,
        world_volatility: u8,
        resource_abundance: u8,
        monstrous_population: u8,
    ) -> Self {
        Self {
            world_size: world_size.min(SLIDER_MAX),
            history_length: history_length.min(SLIDER_MAX),
            civilization_saturation: civilization_saturation.min(SLIDER_MAX),
            site_density: site_density.min(SLIDER_MAX),
            world_volatility: world_volatility.min(SLIDER_MAX),
            resource_abundance: resource_abundance.min(SLIDER_MAX),
            monstrous_population: monstrous_population.min(SLIDER_MAX),
        }
    }

    /// World volatility mapped to [0, 1].
    pub fn volatility01(&self) -> f32 {
        (f32::from(self.world_volatility) / f32::from(SLIDER_MAX)).clamp(0.0, 1.0)
    }
}
