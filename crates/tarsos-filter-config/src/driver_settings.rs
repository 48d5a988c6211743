//! The `[driver]` section of a preset.

use serde::{Deserialize, Serialize};
use tarsos_filter_stream::{DriverConfig, GainConfig};

/// Streaming settings stored with a preset.
///
/// Every field is optional in TOML; missing ones take the driver defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Block size in samples
    pub block_size: usize,
    /// Output gain normalization
    pub gain: GainSettings,
}

/// Serializable mirror of [`GainConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainSettings {
    /// Normalize output gain at all
    pub enabled: bool,
    /// Peak above which a block is scaled down
    pub full_scale: f64,
    /// Peak below which a young stream grows its gain
    pub rise_threshold: f64,
    /// Peak a corrected block is scaled to
    pub target: f64,
    /// Samples after a filter change during which the gain may grow
    pub rise_window: usize,
    /// Upper bound for the gain
    pub max_gain: f64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        DriverConfig::default().into()
    }
}

impl Default for GainSettings {
    fn default() -> Self {
        GainConfig::default().into()
    }
}

impl From<GainConfig> for GainSettings {
    fn from(c: GainConfig) -> Self {
        Self {
            enabled: c.enabled,
            full_scale: c.full_scale,
            rise_threshold: c.rise_threshold,
            target: c.target,
            rise_window: c.rise_window,
            max_gain: c.max_gain,
        }
    }
}

impl From<GainSettings> for GainConfig {
    fn from(s: GainSettings) -> Self {
        Self {
            enabled: s.enabled,
            full_scale: s.full_scale,
            rise_threshold: s.rise_threshold,
            target: s.target,
            rise_window: s.rise_window,
            max_gain: s.max_gain,
        }
    }
}

impl From<DriverConfig> for DriverSettings {
    fn from(c: DriverConfig) -> Self {
        Self {
            block_size: c.block_size,
            gain: c.gain.into(),
        }
    }
}

impl From<DriverSettings> for DriverConfig {
    fn from(s: DriverSettings) -> Self {
        Self {
            block_size: s.block_size,
            gain: s.gain.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_driver() {
        let config: DriverConfig = DriverSettings::default().into();
        assert_eq!(config, DriverConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: DriverSettings = toml::from_str(
            r#"
block_size = 256
[gain]
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(settings.block_size, 256);
        assert!(!settings.gain.enabled);
        assert_eq!(settings.gain.target, 30_000.0);
    }
}
