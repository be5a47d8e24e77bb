// ⚙️ Settings - Validated engine settings + optional config.toml

use crate::error::DedupeError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_THRESHOLD: u8 = 85;

/// Engine settings, loadable from `~/.config/bookmark-dedupe/config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeSettings {
    /// Merge same-domain bookmarks with similar titles
    pub fuzzy_enabled: bool,

    /// Minimum similarity score (0-100) for a fuzzy merge
    pub threshold: u8,

    /// Stop fuzzy matching after this many title comparisons (None = unbounded).
    /// Remaining records are grouped by exact canonical URL only.
    pub max_fuzzy_comparisons: Option<usize>,
}

impl Default for DedupeSettings {
    fn default() -> Self {
        DedupeSettings {
            fuzzy_enabled: true,
            threshold: DEFAULT_THRESHOLD,
            max_fuzzy_comparisons: None,
        }
    }
}

impl DedupeSettings {
    /// Check the only preconditions the engine has
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.threshold > 100 {
            return Err(DedupeError::InvalidConfiguration(format!(
                "threshold must be within 0-100, got {}",
                self.threshold
            )));
        }

        if self.max_fuzzy_comparisons == Some(0) {
            return Err(DedupeError::InvalidConfiguration(
                "max_fuzzy_comparisons must be at least 1 (disable fuzzy matching instead)"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// CONFIG FILE
// ============================================================================

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bookmark-dedupe").join("config.toml"))
}

/// Load settings from an explicit path (must exist), or from the default
/// location when present, or fall back to defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<DedupeSettings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(DedupeSettings::default()),
        },
    };

    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let settings: DedupeSettings = toml::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    tracing::debug!("loaded settings from {}", path.display());
    Ok(settings)
}

// ============================================================================
// TESTS
// ============================================================================
