//! Voice configuration, loaded from an optional ~/.robovoice/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bake::{ParameterRange, RangeCatalog};
use crate::error::{VoiceError, VoiceResult};
use crate::render::wav::SUPPORTED_BITS;

/// Tunables for all three stages. Every field has a default, so a partial
/// YAML file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Lower bound of the target word count (inclusive).
    pub min_words: usize,
    /// Upper bound of the target word count (inclusive).
    pub max_words: usize,
    /// Silence duration band in milliseconds.
    pub wait_ms: ParameterRange,
    /// Boundary fade length in milliseconds.
    pub fade_ms: f64,
    /// Output PCM depth, 8 or 16.
    pub bits_per_sample: u16,
    /// Fixed seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Per-symbol overrides merged over the built-in catalog.
    #[serde(skip_serializing_if = "RangeCatalog::is_empty")]
    pub symbols: RangeCatalog,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            min_words: 5,
            max_words: 11,
            wait_ms: ParameterRange::new(50.0, 300.0),
            fade_ms: 5.0,
            bits_per_sample: 8,
            seed: None,
            symbols: RangeCatalog::empty(),
        }
    }
}

impl VoiceConfig {
    /// Reject values no stage can work with.
    pub fn validate(&self) -> VoiceResult<()> {
        if self.min_words == 0 {
            return Err(VoiceError::Config("min_words must be at least 1".into()));
        }
        if self.min_words > self.max_words {
            return Err(VoiceError::Config(format!(
                "min_words ({}) exceeds max_words ({})",
                self.min_words, self.max_words
            )));
        }
        self.wait_ms
            .validate()
            .map_err(|e| VoiceError::Config(format!("wait_ms: {e}")))?;
        if self.wait_ms.min < 0.0 {
            return Err(VoiceError::Config(format!(
                "wait_ms must not be negative, got {}",
                self.wait_ms.min
            )));
        }
        if !self.fade_ms.is_finite() || self.fade_ms < 0.0 {
            return Err(VoiceError::Config(format!(
                "fade_ms must be non-negative, got {}",
                self.fade_ms
            )));
        }
        if !SUPPORTED_BITS.contains(&self.bits_per_sample) {
            return Err(VoiceError::Config(format!(
                "bits_per_sample must be 8 or 16, got {}",
                self.bits_per_sample
            )));
        }
        self.symbols.validate()
    }
}

/// Default config path, ~/.robovoice/config.yaml.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".robovoice");
    path.push("config.yaml");
    path
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> VoiceResult<VoiceConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: VoiceConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> VoiceResult<VoiceConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "config not found, using defaults");
        return Ok(VoiceConfig::default());
    }
    load_config(path)
}

/// Save a config as YAML, creating parent directories as needed.
pub fn save_config(path: &Path, config: &VoiceConfig) -> VoiceResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}
