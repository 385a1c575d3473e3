//! History synthesis module.
//!
//! Produces a weighted, templated timeline of historical events from a seed,
//! the world settings, and a data store of names, pools, and event
//! templates, plus the entities and spawn hints the events imply.

pub mod data;
pub mod generator;
pub mod loader;
pub mod package;
pub mod tables;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a world entity, dense and monotonic within one
/// generation run. Ids start at 1; 0 is never assigned, so consumers can
/// use it as an implicit "no entity".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

pub use data::{EventTemplate, HistoryData, NameEntry};
pub use generator::HistorySynthesizer;
pub use loader::{load_history_data, LoadError, LoadReport};
pub use package::{HistoricalEvent, SpawnIntent, WorldEntity, WorldHistoryPackage};
pub use tables::HistoryTables;
