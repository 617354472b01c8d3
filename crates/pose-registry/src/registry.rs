use crate::{loader, presets, PoseSource};
use parking_lot::RwLock;
use pose_core::{PoseDefinition, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry handle shared between a controller and a facade.
pub type SharedRegistry = Arc<RwLock<PoseRegistry>>;

pub fn shared(registry: PoseRegistry) -> SharedRegistry {
    Arc::new(RwLock::new(registry))
}

/// Lookup key for a display name: lower-cased with all whitespace removed.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Named presets keyed by [`normalize_key`]. Iteration follows first insertion;
/// overwriting a key keeps its slot, deleting and re-saving moves it to the end.
#[derive(Debug, Default, Clone)]
pub struct PoseRegistry {
    poses: HashMap<String, PoseDefinition>,
    order: Vec<String>,
}

impl PoseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the built-in presets.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        for (key, def) in presets::default_presets() {
            reg.insert_keyed(key, def);
        }
        reg
    }

    pub fn save(&mut self, def: PoseDefinition) {
        let key = normalize_key(&def.name);
        self.insert_keyed(&key, def);
    }

    /// Store under an explicit key rather than one derived from the display name.
    pub fn insert_keyed(&mut self, key: &str, def: PoseDefinition) {
        let key = normalize_key(key);
        tracing::info!(key = %key, name = %def.name, joints = def.pose.len(), "saving pose");
        if self.poses.insert(key.clone(), def).is_none() {
            self.order.push(key);
        }
    }

    pub fn delete(&mut self, name: &str) -> Option<PoseDefinition> {
        let key = normalize_key(name);
        let removed = self.poses.remove(&key);
        if removed.is_some() {
            self.order.retain(|k| *k != key);
            tracing::info!(key = %key, "deleted pose");
        }
        removed
    }

    /// Lookup by key; `name` is normalized first.
    pub fn get(&self, name: &str) -> Option<&PoseDefinition> {
        self.poses.get(&normalize_key(name))
    }

    /// First entry whose display name equals `name` exactly.
    pub fn find_by_display_name(&self, name: &str) -> Option<&PoseDefinition> {
        self.entries().map(|(_, d)| d).find(|d| d.name == name)
    }

    pub fn list_all(&self) -> Vec<PoseDefinition> {
        self.entries().map(|(_, d)| d.clone()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &PoseDefinition)> {
        self.order
            .iter()
            .filter_map(|k| self.poses.get(k).map(|d| (k.as_str(), d)))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Load every `.json` entry of a manifest and save each one. Stops at the
    /// first failure; entries saved before it stay saved.
    pub async fn load_many_from_source(
        &mut self,
        source: &dyn PoseSource,
        locator: &str,
    ) -> Result<usize> {
        loader::load_many_from_source(source, locator, |def| self.save(def)).await
    }
}
