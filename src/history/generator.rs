//! The history synthesizer.
//!
//! Walks a fixed number of event steps, each advancing the year, picking a
//! weighted category (with a deliberate second-chance reroll toward violent
//! categories), resolving a template pattern against the data store, and
//! deriving spawn intents. All randomness flows through one explicitly
//! threaded ChaCha8 stream, and category iteration follows the store's
//! BTreeMap order, so identical (seed, settings, data) reproduce the
//! package bit-for-bit.

use std::collections::HashMap;

use log::warn;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::data::HistoryData;
use super::package::{HistoricalEvent, SpawnIntent, WorldEntity, WorldHistoryPackage};
use super::tables::HistoryTables;
use super::EntityId;
use crate::settings::WorldGenSettings;

const BASE_EVENT_COUNT: u32 = 8;
const EVENTS_PER_HISTORY_STEP: u32 = 6;

/// Registry of entities created while resolving patterns. Ids follow
/// registration order; the (type, name) index only ever answers point
/// lookups, so its iteration order never reaches the output.
#[derive(Default)]
struct EntityRegistry {
    entities: Vec<WorldEntity>,
    index: HashMap<(String, String), EntityId>,
}

impl EntityRegistry {
    fn get_or_create(&mut self, entity_type: &str, name: &str, tags: &[String]) -> EntityId {
        let key = (entity_type.to_string(), name.to_string());
        if let Some(&id) = self.index.get(&key) {
            return id;
        }

        let id = EntityId(self.entities.len() as u32 + 1);
        self.entities.push(WorldEntity {
            id,
            entity_type: entity_type.to_string(),
            name: name.to_string(),
            tags: tags.to_vec(),
            spawn_candidate: false,
            ruin_candidate: false,
            item_spawnable: false,
        });
        self.index.insert(key, id);
        id
    }

    fn get(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.get(id.0.checked_sub(1)? as usize)
    }
}

/// Generates a [`WorldHistoryPackage`] from a seed, settings, and data.
pub struct HistorySynthesizer<'a> {
    seed: u32,
    data: &'a HistoryData,
    tables: &'a HistoryTables,
}

impl<'a> HistorySynthesizer<'a> {
    pub fn new(seed: u32, data: &'a HistoryData, tables: &'a HistoryTables) -> Self {
        Self {
            // Seed 0 would start some streams in a degenerate state.
            seed: if seed == 0 { 1 } else { seed },
            data,
            tables,
        }
    }

    pub fn generate(&self, settings: &WorldGenSettings) -> WorldHistoryPackage {
        let mut pkg = WorldHistoryPackage::new(self.seed, *settings);

        let categories = self.data.categories();
        if categories.is_empty() {
            warn!("no templates available; history package will be empty");
            return pkg;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(self.seed));
        let mut registry = EntityRegistry::default();
        let v01 = settings.volatility01();

        let event_count = BASE_EVENT_COUNT + u32::from(settings.history_length) * EVENTS_PER_HISTORY_STEP;
        let mut year: i32 = 1;

        for _ in 0..event_count {
            // Longer histories spread their years further apart.
            year += rng.gen_range(1..=6) + i32::from(settings.history_length);

            let mut category = self.pick_category(&mut rng, &categories, settings);

            // Second-chance reroll: a uniform draw, and only a violent
            // result overrides the weighted pick. The asymmetry is the
            // point; it biases the timeline toward conflict.
            let reroll = categories[rng.gen_range(0..categories.len())];
            if self.tables.is_violent(reroll) {
                category = reroll;
            }

            let Some(pattern) = self.pick_pattern(&mut rng, category) else {
                // Category without templates: the year has already advanced.
                continue;
            };

            let mut involved: Vec<EntityId> = Vec::new();
            let title = self.resolve_pattern(&mut rng, &pattern, &mut registry, &mut involved);

            involved.sort_unstable();
            involved.dedup();

            let spawn_intents = self.spawn_intents(category, &involved, &registry, v01);

            pkg.events.push(HistoricalEvent {
                year,
                category: category.to_string(),
                title,
                involved_entity_ids: involved,
                spawn_intents,
            });
        }

        pkg.entities = registry.entities;
        apply_entity_flags(&mut pkg);
        build_convenience_lists(&mut pkg);
        pkg
    }

    /// Weighted pick over the non-empty categories, in stable store order.
    fn pick_category(
        &self,
        rng: &mut ChaCha8Rng,
        categories: &[&'a str],
        settings: &WorldGenSettings,
    ) -> &'a str {
        let v01 = settings.volatility01();
        let weights: Vec<f32> = categories
            .iter()
            .map(|c| self.tables.event_weight(c, v01, settings.history_length))
            .collect();
        let total: f32 = weights.iter().sum();

        let roll = rng.gen::<f32>() * total;
        let mut acc = 0.0;
        for (&category, weight) in categories.iter().zip(&weights) {
            acc += weight;
            if roll <= acc {
                return category;
            }
        }
        categories[categories.len() - 1]
    }

    /// Uniform template pick from a category, if it has any.
    fn pick_pattern(&self, rng: &mut ChaCha8Rng, category: &str) -> Option<String> {
        let templates = self.data.templates.get(category)?;
        if templates.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..templates.len());
        Some(templates[idx].pattern.clone())
    }

    /// Replace every `{token}` in the pattern.
    ///
    /// Pool tokens (concept/descriptor/group) pull from the matching pool;
    /// anything else is an underscore-joined tag requirement resolved
    /// against the name store. Missing pools or names degrade to "UNKNOWN",
    /// never to an error.
    fn resolve_pattern(
        &self,
        rng: &mut ChaCha8Rng,
        pattern: &str,
        registry: &mut EntityRegistry,
        involved: &mut Vec<EntityId>,
    ) -> String {
        let mut out = String::with_capacity(pattern.len() + 32);
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);

            let Some(close) = rest[open + 1..].find('}').map(|j| open + 1 + j) else {
                // Unmatched brace stays literal.
                out.push('{');
                rest = &rest[open + 1..];
                continue;
            };

            let token = rest[open + 1..close].to_lowercase();
            rest = &rest[close + 1..];

            if let Some(pool_key) = pool_key_for(&token) {
                match self.data.pools.get(pool_key).filter(|p| !p.is_empty()) {
                    Some(pool) => out.push_str(&pool[rng.gen_range(0..pool.len())]),
                    None => out.push_str("UNKNOWN"),
                }
                continue;
            }

            let required: Vec<String> = token
                .split('_')
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect();

            let candidates: Vec<usize> = self
                .data
                .names
                .iter()
                .enumerate()
                .filter(|(_, e)| e.has_all_tags(&required))
                .map(|(idx, _)| idx)
                .collect();

            if candidates.is_empty() {
                out.push_str("UNKNOWN");
                continue;
            }

            let chosen = &self.data.names[candidates[rng.gen_range(0..candidates.len())]];

            if let Some(entity_type) = self.tables.entity_type_for_tags(&chosen.tags) {
                let id = registry.get_or_create(entity_type, &chosen.text, &chosen.tags);
                involved.push(id);
            }

            out.push_str(&chosen.text);
        }

        out.push_str(rest);
        out
    }

    fn spawn_intents(
        &self,
        category: &str,
        involved: &[EntityId],
        registry: &EntityRegistry,
        v01: f32,
    ) -> Vec<SpawnIntent> {
        let mut intents = Vec::new();
        for &id in involved {
            let Some(entity) = registry.get(id) else {
                continue;
            };
            for (spawn_type, probability) in
                self.tables.spawn_suggestions(category, &entity.entity_type, v01)
            {
                intents.push(SpawnIntent {
                    entity_id: id,
                    spawn_type: spawn_type.to_string(),
                    probability,
                });
            }
        }
        intents
    }
}

fn pool_key_for(token: &str) -> Option<&'static str> {
    match token {
        "concept" => Some("concepts"),
        "descriptor" => Some("descriptors"),
        "group" => Some("groups"),
        _ => None,
    }
}

/// Set each entity's gameplay flags from the union of spawn-intent types
/// referencing it. Runs once, after all events exist.
fn apply_entity_flags(pkg: &mut WorldHistoryPackage) {
    for event in &pkg.events {
        for intent in &event.spawn_intents {
            let Some(idx) = intent.entity_id.0.checked_sub(1) else {
                continue;
            };
            let Some(entity) = pkg.entities.get_mut(idx as usize) else {
                continue;
            };
            match intent.spawn_type.as_str() {
                "place_city" | "place_dungeon" => entity.spawn_candidate = true,
                "place_ruin" => entity.ruin_candidate = true,
                "seed_artifact" => entity.item_spawnable = true,
                _ => {}
            }
        }
    }
}

/// Build the four convenience lists as insertion-ordered deduplicated
/// unions over the events' spawn intents.
fn build_convenience_lists(pkg: &mut WorldHistoryPackage) {
    fn push_unique(list: &mut Vec<EntityId>, id: EntityId) {
        if !list.contains(&id) {
            list.push(id);
        }
    }

    let mut cities = Vec::new();
    let mut ruins = Vec::new();
    let mut kingdoms = Vec::new();
    let mut artifacts = Vec::new();

    for event in &pkg.events {
        for intent in &event.spawn_intents {
            match intent.spawn_type.as_str() {
                "place_city" => push_unique(&mut cities, intent.entity_id),
                "place_ruin" => push_unique(&mut ruins, intent.entity_id),
                "represent_kingdom" => push_unique(&mut kingdoms, intent.entity_id),
                "seed_artifact" => push_unique(&mut artifacts, intent.entity_id),
                _ => {}
            }
        }
    }

    pkg.cities_to_place = cities;
    pkg.ruins_to_place = ruins;
    pkg.kingdoms_to_represent = kingdoms;
    pkg.artifacts_to_seed = artifacts;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::data::NameEntry;

    fn fixture_data() -> HistoryData {
        let mut data = HistoryData::new();
        data.names.push(NameEntry::new("Saltmere", &["city", "coastal"]));
        data.names.push(NameEntry::new("Irondelve", &["city", "mountain"]));
        data.names.push(NameEntry::new("Vharen", &["kingdom"]));
        data.names.push(NameEntry::new("The Sunken Crown", &["legendaryitem"]));
        data.names.push(NameEntry::new("Gloomdepth", &["dungeon"]));
        data.pools.insert(
            "concepts".to_string(),
            vec!["Ash".to_string(), "Silence".to_string()],
        );
        data.add_template("foundings", "Founding of {city}");
        data.add_template("falls", "The Fall of {city}");
        data.add_template("wars", "The War of {concept}");
        data.add_template("ages", "Age of {concept}");
        data
    }

    #[test]
    fn test_event_count_law() {
        let data = fixture_data();
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(1, &data, &tables);
        for (len, expected) in [(0u8, 8), (1, 14), (2, 20), (3, 26), (4, 32)] {
            let mut settings = WorldGenSettings::default();
            settings.history_length = len;
            let pkg = synth.generate(&settings);
            assert_eq!(pkg.events.len(), expected, "history_length {}", len);
        }
    }

    #[test]
    fn test_years_strictly_increase() {
        let data = fixture_data();
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(12345, &data, &tables);
        let pkg = synth.generate(&WorldGenSettings::default());
        for pair in pkg.events.windows(2) {
            assert!(pair[1].year > pair[0].year);
        }
    }

    #[test]
    fn test_minimal_settings_example() {
        // worldSize=0, historyLength=0, everything else middle, seed 1.
        let data = fixture_data();
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(1, &data, &tables);
        let settings = WorldGenSettings::new(0, 0, 2, 2, 2, 2, 2);
        let pkg = synth.generate(&settings);
        assert_eq!(pkg.events.len(), 8);
        assert!(pkg.events[0].year >= 2);
    }

    #[test]
    fn test_generation_deterministic() {
        let data = fixture_data();
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(777, &data, &tables);
        let settings = WorldGenSettings::default();
        let a = synth.generate(&settings);
        let b = synth.generate(&settings);

        assert_eq!(a.events.len(), b.events.len());
        for (ea, eb) in a.events.iter().zip(&b.events) {
            assert_eq!(ea.year, eb.year);
            assert_eq!(ea.category, eb.category);
            assert_eq!(ea.title, eb.title);
            assert_eq!(ea.involved_entity_ids, eb.involved_entity_ids);
        }
        assert_eq!(a.entities.len(), b.entities.len());
        for (na, nb) in a.entities.iter().zip(&b.entities) {
            assert_eq!(na.id, nb.id);
            assert_eq!(na.entity_type, nb.entity_type);
            assert_eq!(na.name, nb.name);
        }
    }

    #[test]
    fn test_entity_dedup_across_events() {
        // Only one city name available, so every {city} resolves to it.
        let mut data = HistoryData::new();
        data.names.push(NameEntry::new("Saltmere", &["city"]));
        data.add_template("foundings", "Founding of {city}");
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(5, &data, &tables);

        let settings = WorldGenSettings::new(2, 4, 2, 2, 0, 2, 2);
        let pkg = synth.generate(&settings);

        let founding_events = pkg
            .events
            .iter()
            .filter(|e| !e.involved_entity_ids.is_empty())
            .count();
        assert!(founding_events >= 2, "fixture should produce repeat references");
        assert_eq!(pkg.entities.len(), 1);
        assert_eq!(pkg.entities[0].id, EntityId(1));
        assert_eq!(pkg.entities[0].name, "Saltmere");
    }

    #[test]
    fn test_tag_superset_resolution() {
        // {city} must never match an entry tagged only "coastal".
        let mut data = HistoryData::new();
        data.names.push(NameEntry::new("Seaview", &["coastal"]));
        data.names.push(NameEntry::new("Saltmere", &["city", "coastal"]));
        data.add_template("foundings", "Founding of {city}");
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(11, &data, &tables);
        let pkg = synth.generate(&WorldGenSettings::default());

        for event in &pkg.events {
            assert!(!event.title.contains("Seaview"), "{}", event.title);
        }
    }

    #[test]
    fn test_unknown_fallbacks() {
        let mut data = HistoryData::new();
        // No names and no pools at all.
        data.add_template("ages", "Age of {concept} and {city}");
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(3, &data, &tables);
        let pkg = synth.generate(&WorldGenSettings::default());

        assert!(!pkg.events.is_empty());
        for event in &pkg.events {
            assert_eq!(event.title, "Age of UNKNOWN and UNKNOWN");
            assert!(event.involved_entity_ids.is_empty());
        }
        assert!(pkg.entities.is_empty());
    }

    #[test]
    fn test_empty_store_yields_empty_package() {
        let data = HistoryData::new();
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(9, &data, &tables);
        let pkg = synth.generate(&WorldGenSettings::default());
        assert!(pkg.is_empty());
        assert!(pkg.entities.is_empty());
        assert!(pkg.cities_to_place.is_empty());
    }

    #[test]
    fn test_flags_and_convenience_lists() {
        let mut data = HistoryData::new();
        data.names.push(NameEntry::new("Saltmere", &["city"]));
        data.names.push(NameEntry::new("The Sunken Crown", &["legendaryitem"]));
        data.add_template("falls", "The Fall of {city} and the loss of {legendaryitem}");
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(21, &data, &tables);
        let pkg = synth.generate(&WorldGenSettings::default());

        assert!(!pkg.events.is_empty());
        let city = pkg
            .entities
            .iter()
            .find(|e| e.entity_type == "city")
            .expect("city entity");
        let artifact = pkg
            .entities
            .iter()
            .find(|e| e.entity_type == "artifact")
            .expect("artifact entity");

        assert!(city.ruin_candidate);
        assert!(!city.spawn_candidate);
        assert!(artifact.item_spawnable);

        assert!(pkg.ruins_to_place.contains(&city.id));
        assert!(pkg.artifacts_to_seed.contains(&artifact.id));
        assert!(pkg.cities_to_place.is_empty());
        // Convenience lists are deduplicated even across repeat events.
        let mut sorted = pkg.ruins_to_place.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), pkg.ruins_to_place.len());
    }

    #[test]
    fn test_categories_come_from_store() {
        let data = fixture_data();
        let tables = HistoryTables::default();
        let synth = HistorySynthesizer::new(424242, &data, &tables);
        let settings = WorldGenSettings::new(2, 4, 2, 2, 4, 2, 2);
        let pkg = synth.generate(&settings);

        let known = data.categories();
        for event in &pkg.events {
            assert!(known.contains(&event.category.as_str()), "{}", event.category);
            assert!(!event.title.is_empty());
        }
    }
}
