use crate::{PoseSink, PoseSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use pose_core::{PoseError, Result};
use std::collections::HashMap;

/// In-process locator -> text map. Serves as both source and sink.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: Mutex<HashMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, locator: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(locator, text);
        self
    }

    pub fn insert(&self, locator: impl Into<String>, text: impl Into<String>) {
        self.files.lock().insert(locator.into(), text.into());
    }

    pub fn get(&self, locator: &str) -> Option<String> {
        self.files.lock().get(locator).cloned()
    }
}

#[async_trait]
impl PoseSource for MemorySource {
    async fn fetch_text(&self, locator: &str) -> Result<String> {
        self.get(locator)
            .ok_or_else(|| PoseError::source_unavailable(locator, "not found"))
    }
}

#[async_trait]
impl PoseSink for MemorySource {
    async fn store_text(&self, locator: &str, text: &str) -> Result<()> {
        self.insert(locator, text);
        Ok(())
    }
}
