use anyhow::{Context, Result};
use pose_control::RotationBlend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of pose files merged into the registry at startup.
    pub poses_dir: Option<String>,
    /// Manifest locator (file path, or URL with the `http` feature) loaded at startup.
    pub manifest: Option<String>,
    pub blend: RotationBlend,
    pub reset_on_upload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poses_dir: None,
            manifest: None,
            blend: RotationBlend::Linear,
            reset_on_upload: true,
        }
    }
}

impl Config {
    /// Missing file means defaults; a present but malformed file is an error.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        serde_json::from_str(&contents).with_context(|| format!("parsing {path}"))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {path}"))?;
        Ok(())
    }
}
