//! The history data store: names, pools, and event templates.
//!
//! The store arrives already parsed and normalized (lowercase tags and
//! keys); the synthesizer never touches a file. `BTreeMap` keys give the
//! stable, settings-independent category order that deterministic weighted
//! selection requires.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A display name with its lowercase tag set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub text: String,
    pub tags: Vec<String>,
}

impl NameEntry {
    pub fn new(text: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            text: text.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True when this entry's tag set is a superset of `required`.
    pub fn has_all_tags(&self, required: &[String]) -> bool {
        required.iter().all(|r| self.has_tag(r))
    }
}

/// An event pattern with `{placeholder}` tokens, grouped by category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub category: String,
    pub pattern: String,
}

/// Everything the history synthesizer consumes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryData {
    pub names: Vec<NameEntry>,
    /// Pool key (lowercase) to entries.
    pub pools: BTreeMap<String, Vec<String>>,
    /// Category (lowercase) to templates.
    pub templates: BTreeMap<String, Vec<EventTemplate>>,
}

impl HistoryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories that actually hold templates, in stable order.
    pub fn categories(&self) -> Vec<&str> {
        self.templates
            .iter()
            .filter(|(_, templates)| !templates.is_empty())
            .map(|(category, _)| category.as_str())
            .collect()
    }

    pub fn has_templates(&self) -> bool {
        self.templates.values().any(|t| !t.is_empty())
    }

    /// Test/demo helper: add a template under a category.
    pub fn add_template(&mut self, category: &str, pattern: &str) {
        self.templates
            .entry(category.to_string())
            .or_default()
            .push(EventTemplate {
                category: category.to_string(),
                pattern: pattern.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_superset_matching() {
        let entry = NameEntry::new("Saltmere", &["city", "coastal"]);
        assert!(entry.has_all_tags(&["city".to_string()]));
        assert!(entry.has_all_tags(&["city".to_string(), "coastal".to_string()]));
        assert!(!entry.has_all_tags(&["city".to_string(), "ruined".to_string()]));

        let partial = NameEntry::new("Seaview", &["coastal"]);
        assert!(!partial.has_all_tags(&["city".to_string()]));
    }

    #[test]
    fn test_categories_skip_empty() {
        let mut data = HistoryData::new();
        data.add_template("wars", "The War of {concept}");
        data.templates.insert("falls".to_string(), Vec::new());
        assert_eq!(data.categories(), vec!["wars"]);
        assert!(data.has_templates());
    }

    #[test]
    fn test_categories_stable_order() {
        let mut data = HistoryData::new();
        data.add_template("wars", "a");
        data.add_template("ages", "b");
        data.add_template("foundings", "c");
        // BTreeMap order, independent of insertion order.
        assert_eq!(data.categories(), vec!["ages", "foundings", "wars"]);
    }
}
