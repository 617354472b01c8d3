use async_trait::async_trait;
use pose_core::{PoseError, Result};
use serde_json::Value;
use std::path::Path;

/// Where pose documents and manifests are fetched from.
#[async_trait]
pub trait PoseSource: Send + Sync {
    /// Fetch the raw text at `locator`.
    async fn fetch_text(&self, locator: &str) -> Result<String>;

    /// Fetch the list of entry names published at `locator`.
    async fn fetch_manifest(&self, locator: &str) -> Result<Vec<String>> {
        let text = self.fetch_text(locator).await?;
        decode_manifest(&text)
    }

    /// Locator of one manifest entry.
    fn entry_locator(&self, manifest: &str, entry: &str) -> String {
        join_locator(manifest, entry)
    }
}

/// Where serialized poses are handed off to (a download, a file, a remote store).
#[async_trait]
pub trait PoseSink: Send + Sync {
    async fn store_text(&self, locator: &str, text: &str) -> Result<()>;
}

/// Decode a manifest: a JSON array of file names. Non-string items are skipped.
pub fn decode_manifest(text: &str) -> Result<Vec<String>> {
    let items: Vec<Value> = serde_json::from_str(text)
        .map_err(|e| PoseError::Format(format!("manifest is not a JSON array: {e}")))?;
    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

pub fn join_locator(base: &str, entry: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), entry)
}

/// Local filesystem source and sink. A directory locator publishes its
/// `manifest.json` when present, otherwise a sorted listing of its files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

pub const MANIFEST_FILE: &str = "manifest.json";

#[async_trait]
impl PoseSource for FileSource {
    async fn fetch_text(&self, locator: &str) -> Result<String> {
        tokio::fs::read_to_string(locator)
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))
    }

    async fn fetch_manifest(&self, locator: &str) -> Result<Vec<String>> {
        let path = Path::new(locator);
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))?;
        if !meta.is_dir() {
            let text = self.fetch_text(locator).await?;
            return decode_manifest(&text);
        }

        let manifest = path.join(MANIFEST_FILE);
        if tokio::fs::try_exists(&manifest).await.unwrap_or(false) {
            let text = tokio::fs::read_to_string(&manifest)
                .await
                .map_err(|e| PoseError::source_unavailable(&manifest.to_string_lossy(), e))?;
            return decode_manifest(&text);
        }

        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Entries of a directory live inside it; entries of a manifest file live
    /// next to it, whatever the file is called.
    fn entry_locator(&self, manifest: &str, entry: &str) -> String {
        let path = Path::new(manifest);
        let base = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or_else(|| Path::new(""))
        };
        base.join(entry).to_string_lossy().into_owned()
    }
}

#[async_trait]
impl PoseSink for FileSource {
    async fn store_text(&self, locator: &str, text: &str) -> Result<()> {
        tokio::fs::write(locator, text)
            .await
            .map_err(|e| PoseError::source_unavailable(locator, e))?;
        tracing::info!(path = %locator, bytes = text.len(), "wrote pose file");
        Ok(())
    }
}
