//! The generated history package: entities, events, and spawn hints.

use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::settings::WorldGenSettings;

/// A named thing history produced: a city, kingdom, dungeon, artifact...
///
/// Entities are deduplicated by (type, name): the same name referenced from
/// several events maps to one id. The gameplay flags are set only after all
/// events exist, from the union of spawn intents referencing the entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldEntity {
    pub id: EntityId,
    /// "city", "kingdom", "ocean", "continent", "dungeon", "artifact",
    /// "legendarycreature", "org".
    pub entity_type: String,
    pub name: String,
    pub tags: Vec<String>,

    /// Should try to exist on the map now.
    pub spawn_candidate: bool,
    /// Can appear as a ruin or remnant.
    pub ruin_candidate: bool,
    /// Can appear in loot tables.
    pub item_spawnable: bool,
}

/// A weighted suggestion that an entity should appear as a map feature.
/// A hint, not a placement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpawnIntent {
    pub entity_id: EntityId,
    /// "place_city", "place_ruin", "represent_kingdom", "seed_artifact",
    /// "place_dungeon".
    pub spawn_type: String,
    /// Clamped to [0, 1].
    pub probability: f32,
}

/// One entry in the timeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub year: i32,
    pub category: String,
    /// Final rendered title with all placeholders resolved.
    pub title: String,
    /// Deduplicated, sorted.
    pub involved_entity_ids: Vec<EntityId>,
    pub spawn_intents: Vec<SpawnIntent>,
}

/// Everything one history run produced, plus convenience lists for the
/// map-generation consumer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldHistoryPackage {
    pub seed: u32,
    pub settings: WorldGenSettings,

    pub entities: Vec<WorldEntity>,
    pub events: Vec<HistoricalEvent>,

    /// Deduplicated unions over the events' spawn intents, in event order.
    pub cities_to_place: Vec<EntityId>,
    pub ruins_to_place: Vec<EntityId>,
    pub kingdoms_to_represent: Vec<EntityId>,
    pub artifacts_to_seed: Vec<EntityId>,
}

impl WorldHistoryPackage {
    pub fn new(seed: u32, settings: WorldGenSettings) -> Self {
        Self {
            seed,
            settings,
            entities: Vec::new(),
            events: Vec::new(),
            cities_to_place: Vec::new(),
            ruins_to_place: Vec::new(),
            kingdoms_to_represent: Vec::new(),
            artifacts_to_seed: Vec::new(),
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        // Ids are dense from 1, so this is a direct index.
        self.entities.get(id.0.checked_sub(1)? as usize)
    }

    /// Chronicle lines for UI display.
    pub fn display_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|e| format!("Year {}: {}", e.year, e.title))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_lookup_by_dense_id() {
        let mut pkg = WorldHistoryPackage::new(7, WorldGenSettings::default());
        pkg.entities.push(WorldEntity {
            id: EntityId(1),
            entity_type: "city".to_string(),
            name: "Irondelve".to_string(),
            tags: vec!["city".to_string()],
            spawn_candidate: false,
            ruin_candidate: false,
            item_spawnable: false,
        });

        assert_eq!(pkg.entity(EntityId(1)).unwrap().name, "Irondelve");
        assert!(pkg.entity(EntityId(0)).is_none());
        assert!(pkg.entity(EntityId(2)).is_none());
    }

    #[test]
    fn test_display_lines() {
        let mut pkg = WorldHistoryPackage::new(7, WorldGenSettings::default());
        pkg.events.push(HistoricalEvent {
            year: 14,
            category: "wars".to_string(),
            title: "The War of Ash".to_string(),
            involved_entity_ids: Vec::new(),
            spawn_intents: Vec::new(),
        });
        assert_eq!(pkg.display_lines(), vec!["Year 14: The War of Ash"]);
    }

    #[test]
    fn test_package_json_roundtrip() {
        let pkg = WorldHistoryPackage::new(99, WorldGenSettings::default());
        let json = serde_json::to_string(&pkg).unwrap();
        let back: WorldHistoryPackage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 99);
        assert!(back.is_empty());
    }
}
