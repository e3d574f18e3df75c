use serde::{Deserialize, Serialize};

use super::error::WaveError;

/// Tunables for descriptor selection and stream arbitration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Capture data ranges kept on vista-class hosts (48k, 96k, 44.1k).
    pub vista_capture_range_limit: usize,

    /// Data ranges kept on the SPDIF pin on legacy hosts (the AC-3 pair).
    pub legacy_spdif_range_count: usize,

    /// Bit-depth ceiling for the first two playback ranges on older chips.
    pub legacy_chip_max_bits: u32,

    /// Concurrent playback streams allowed per playback pin.
    pub max_playback_instances: u32,

    /// Concurrent capture streams allowed per capture pin.
    pub max_capture_instances: u32,

    /// Concurrent AC-3 passthrough streams on the SPDIF pin.
    pub max_spdif_instances: u32,
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), WaveError> {
        if self.vista_capture_range_limit == 0 {
            return Err(WaveError::InvalidParameter(
                "vista capture range limit must be at least 1".into(),
            ));
        }
        if self.legacy_spdif_range_count == 0 {
            return Err(WaveError::InvalidParameter(
                "legacy spdif range count must be at least 1".into(),
            ));
        }
        if ![8, 16, 24, 32].contains(&self.legacy_chip_max_bits) {
            return Err(WaveError::InvalidParameter(format!(
                "unsupported bit depth clamp: {}",
                self.legacy_chip_max_bits
            )));
        }
        if self.max_playback_instances == 0 || self.max_capture_instances == 0 || self.max_spdif_instances == 0 {
            return Err(WaveError::InvalidParameter(
                "pin instance limits must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Parses a JSON override document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, WaveError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| WaveError::InvalidParameter(format!("failed to parse wave config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            vista_capture_range_limit: 3,
            legacy_spdif_range_count: 2,
            legacy_chip_max_bits: 16,
            max_playback_instances: 8,
            max_capture_instances: 1,
            max_spdif_instances: 1,
        }
    }
}

/// Capability flags reported by the adapter-common object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterCapabilities {
    /// Host streaming stack is vista-class.
    pub is_vista: bool,
    /// Chip variant with 7.1 output.
    pub extended_channels: bool,
    /// Newer chip revision; older ones are limited to 16-bit multichannel.
    pub is_10k2: bool,
}
