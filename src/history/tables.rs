//! Immutable tuning tables for history generation.
//!
//! Built once and passed by reference into the synthesizer; nothing in here
//! is module-level mutable state. The numbers are contract values: tests
//! and reproducibility depend on them.

/// Categories treated as violent by the second-chance reroll and by the
/// volatility surge multiplier.
const VIOLENT_CATEGORIES: [&str; 5] = ["wars", "battles", "crusades", "falls", "crises"];

/// Baseline frequency per category before settings are applied.
const BASE_WEIGHTS: [(&str, f32); 9] = [
    ("ages", 1.0),
    ("revolutions", 0.8),
    ("wars", 0.7),
    ("crusades", 0.4),
    ("battles", 0.6),
    ("falls", 0.5),
    ("foundings", 0.7),
    ("political", 0.8),
    ("crises", 0.6),
];

const DEFAULT_BASE_WEIGHT: f32 = 0.5;
const WEIGHT_FLOOR: f32 = 0.01;

/// One spawn-intent rule: in `categories` (empty = any), an involved entity
/// of `entity_type` suggests `spawn_type` with probability
/// `base_probability + volatility_scale * volatility01`.
#[derive(Clone, Copy, Debug)]
pub struct SpawnRule {
    pub categories: &'static [&'static str],
    pub entity_type: &'static str,
    pub spawn_type: &'static str,
    pub base_probability: f32,
    pub volatility_scale: f32,
}

const WARLIKE: [&str; 3] = ["wars", "battles", "crusades"];

const SPAWN_RULES: [SpawnRule; 9] = [
    SpawnRule {
        categories: &["foundings"],
        entity_type: "city",
        spawn_type: "place_city",
        base_probability: 0.90,
        volatility_scale: 0.0,
    },
    SpawnRule {
        categories: &["foundings"],
        entity_type: "kingdom",
        spawn_type: "represent_kingdom",
        base_probability: 0.85,
        volatility_scale: 0.0,
    },
    SpawnRule {
        categories: &["falls"],
        entity_type: "city",
        spawn_type: "place_ruin",
        base_probability: 0.40,
        volatility_scale: 0.40,
    },
    SpawnRule {
        categories: &["falls"],
        entity_type: "kingdom",
        spawn_type: "place_ruin",
        base_probability: 0.30,
        volatility_scale: 0.30,
    },
    SpawnRule {
        categories: &WARLIKE,
        entity_type: "city",
        spawn_type: "place_city",
        base_probability: 0.65,
        volatility_scale: 0.0,
    },
    SpawnRule {
        categories: &WARLIKE,
        entity_type: "kingdom",
        spawn_type: "represent_kingdom",
        base_probability: 0.65,
        volatility_scale: 0.0,
    },
    SpawnRule {
        categories: &["crises"],
        entity_type: "city",
        spawn_type: "place_city",
        base_probability: 0.60,
        volatility_scale: 0.0,
    },
    // Type-only rules: these fire for any category.
    SpawnRule {
        categories: &[],
        entity_type: "artifact",
        spawn_type: "seed_artifact",
        base_probability: 0.30,
        volatility_scale: 0.20,
    },
    SpawnRule {
        categories: &[],
        entity_type: "dungeon",
        spawn_type: "place_dungeon",
        base_probability: 0.55,
        volatility_scale: 0.25,
    },
];

/// Entity-type recognition in priority order: the first tag a picked name
/// carries decides its registered type.
const ENTITY_TYPE_TAGS: [(&str, &str); 9] = [
    ("city", "city"),
    ("kingdom", "kingdom"),
    ("ocean", "ocean"),
    ("continent", "continent"),
    ("dungeon", "dungeon"),
    ("legendaryitem", "artifact"),
    ("legendarycreature", "legendarycreature"),
    ("organization", "org"),
    ("org", "org"),
];

/// The full tuning-table bundle.
#[derive(Clone, Debug, Default)]
pub struct HistoryTables;

impl HistoryTables {
    pub fn base_weight(&self, category: &str) -> f32 {
        BASE_WEIGHTS
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, w)| *w)
            .unwrap_or(DEFAULT_BASE_WEIGHT)
    }

    /// Violent categories surge with volatility, calmer ones recede.
    pub fn volatility_multiplier(&self, category: &str, v01: f32) -> f32 {
        match category {
            "wars" | "battles" | "crusades" => 1.0 + 3.0 * v01,
            "falls" | "crises" => 1.0 + 2.0 * v01,
            "political" => 1.0 - 0.4 * v01,
            "ages" => 1.0 - 0.3 * v01,
            _ => 1.0,
        }
    }

    /// Final selection weight for one category under the given settings.
    pub fn event_weight(&self, category: &str, v01: f32, history_length: u8) -> f32 {
        let w = self.base_weight(category)
            * self.volatility_multiplier(category, v01)
            * (1.0 + 0.05 * f32::from(history_length));
        w.max(WEIGHT_FLOOR)
    }

    pub fn is_violent(&self, category: &str) -> bool {
        VIOLENT_CATEGORIES.contains(&category)
    }

    /// Registered entity type for a tag set, or None for plain text.
    pub fn entity_type_for_tags(&self, tags: &[String]) -> Option<&'static str> {
        for (tag, entity_type) in ENTITY_TYPE_TAGS {
            if tags.iter().any(|t| t == tag) {
                return Some(entity_type);
            }
        }
        None
    }

    /// Spawn rules matching (category, entity type), probabilities already
    /// scaled by volatility and clamped to [0, 1].
    pub fn spawn_suggestions(
        &self,
        category: &str,
        entity_type: &str,
        v01: f32,
    ) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        let category = category.to_string();
        let entity_type = entity_type.to_string();
        SPAWN_RULES.iter().filter_map(move |rule| {
            if rule.entity_type != entity_type {
                return None;
            }
            if !rule.categories.is_empty() && !rule.categories.contains(&category.as_str()) {
                return None;
            }
            let p = (rule.base_probability + rule.volatility_scale * v01).clamp(0.0, 1.0);
            Some((rule.spawn_type, p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weights() {
        let tables = HistoryTables::default();
        assert!((tables.base_weight("ages") - 1.0).abs() < 1e-6);
        assert!((tables.base_weight("crusades") - 0.4).abs() < 1e-6);
        assert!((tables.base_weight("somethingelse") - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_volatility_shifts_weights() {
        let tables = HistoryTables::default();
        assert!((tables.volatility_multiplier("wars", 1.0) - 4.0).abs() < 1e-6);
        assert!((tables.volatility_multiplier("falls", 0.5) - 2.0).abs() < 1e-6);
        assert!(tables.volatility_multiplier("political", 1.0) < 1.0);
        assert!(tables.volatility_multiplier("ages", 1.0) < 1.0);
        assert!((tables.volatility_multiplier("foundings", 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_event_weight_floor() {
        let tables = HistoryTables::default();
        // political at max volatility with history_length 0 still stays
        // above the floor; the floor only matters for degenerate inputs.
        assert!(tables.event_weight("political", 1.0, 0) >= 0.01);
    }

    #[test]
    fn test_violent_set() {
        let tables = HistoryTables::default();
        for c in ["wars", "battles", "crusades", "falls", "crises"] {
            assert!(tables.is_violent(c));
        }
        assert!(!tables.is_violent("foundings"));
        assert!(!tables.is_violent("ages"));
    }

    #[test]
    fn test_entity_type_priority() {
        let tables = HistoryTables::default();
        let tags = |v: &[&str]| v.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        // city outranks kingdom when both tags are present
        assert_eq!(
            tables.entity_type_for_tags(&tags(&["kingdom", "city"])),
            Some("city")
        );
        assert_eq!(
            tables.entity_type_for_tags(&tags(&["legendaryitem"])),
            Some("artifact")
        );
        assert_eq!(tables.entity_type_for_tags(&tags(&["org"])), Some("org"));
        assert_eq!(tables.entity_type_for_tags(&tags(&["coastal"])), None);
    }

    #[test]
    fn test_spawn_rules_scale_and_clamp() {
        let tables = HistoryTables::default();
        let falls: Vec<_> = tables.spawn_suggestions("falls", "city", 1.0).collect();
        assert_eq!(falls, vec![("place_ruin", 0.8)]);

        // artifact rule fires for any category
        let any: Vec<_> = tables.spawn_suggestions("ages", "artifact", 0.0).collect();
        assert_eq!(any, vec![("seed_artifact", 0.3)]);

        let wars: Vec<_> = tables.spawn_suggestions("battles", "kingdom", 0.5).collect();
        assert_eq!(wars, vec![("represent_kingdom", 0.65)]);

        // no rule for unrecognized combinations
        assert_eq!(tables.spawn_suggestions("ages", "ocean", 0.5).count(), 0);
    }
}
