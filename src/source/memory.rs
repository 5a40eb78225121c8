use std::sync::Arc;

use ahash::AHashMap;
use anyhow::{anyhow, Result};

use crate::{geom::FeatureCollection, types::BoundaryLevel};
use super::GeometrySource;

type Key = (BoundaryLevel, Vec<String>);

/// In-memory boundary sets keyed by `(level, parents)`. A key may also be set
/// to fail with a message.
#[derive(Debug, Clone, Default)]
pub struct MemoryGeometrySource {
    entries: AHashMap<Key, Result<FeatureCollection, String>>,
}

impl MemoryGeometrySource {
    pub fn new() -> Self { Self::default() }

    fn key(level: BoundaryLevel, parents: &[&str]) -> Key {
        (level, parents.iter().map(|p| p.to_string()).collect())
    }

    pub fn insert(&mut self, level: BoundaryLevel, parents: &[&str], collection: FeatureCollection) -> &mut Self {
        self.entries.insert(Self::key(level, parents), Ok(collection));
        self
    }

    pub fn fail(&mut self, level: BoundaryLevel, parents: &[&str], message: &str) -> &mut Self {
        self.entries.insert(Self::key(level, parents), Err(message.to_string()));
        self
    }
}

impl GeometrySource for MemoryGeometrySource {
    fn fetch(&self, level: BoundaryLevel, parents: &[Arc<str>]) -> Result<FeatureCollection> {
        let key = (level, parents.iter().map(|p| p.to_string()).collect());
        match self.entries.get(&key) {
            Some(Ok(collection)) => Ok(collection.clone()),
            Some(Err(message)) => Err(anyhow!("[memory_source] {message}")),
            None => Err(anyhow!("[memory_source] No {level} boundaries under {parents:?}")),
        }
    }
}
