//! Persistent application configuration.
//!
//! Stored as JSON in a platform-appropriate config directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk configuration for the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timer interval (seconds) between automatic scan cycles.
    pub scan_interval_s: f32,

    /// Fuzzy matcher floor: candidates below this similarity are dropped
    /// before anything else looks at them.
    pub match_threshold: f32,

    /// Acceptance policy on top of the matcher: a match must score strictly
    /// above this to enter the confirmed effect list.
    pub accept_score: f32,

    /// Page segmentation hint forwarded to the OCR collaborator.
    pub psm: vision::PageSegMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_interval_s: 2.0,
            match_threshold: 0.6,
            accept_score: 0.45,
            psm: vision::PageSegMode::default(),
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("config_dir() unavailable")?;
        Ok(base.join("relicscan.json"))
    }

    /// Load configuration from disk, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config; using defaults");
                Self::default()
            }
        }
    }

    /// Try to load configuration from disk.
    pub fn try_load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(&path).with_context(|| format!("read {:?}", path))?;
        let cfg = serde_json::from_str(&json).with_context(|| format!("parse {:?}", path))?;
        Ok(cfg)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(&path, json).with_context(|| format!("write {:?}", path))?;
        Ok(())
    }
}
