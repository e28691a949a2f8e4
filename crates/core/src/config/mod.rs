use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Result, TunerMetronomeError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tempo: TempoConfig,
    pub hold: HoldConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections fall back to their
    /// defaults; the result is validated before it is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(?path, "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tempo.validate()?;
        self.hold.validate()?;
        if self.store.key.is_empty() {
            return Err(TunerMetronomeError::invalid_config(
                "store key must not be empty",
            ));
        }
        Ok(())
    }
}

/// Bounds and step sizes of the tempo dial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    pub default_bpm: u32,
    pub min_bpm: u32,
    pub max_bpm: u32,
    /// Step applied by a single tap.
    pub step: u32,
    /// Step applied by each repeat tick while a button is held.
    pub fast_step: u32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            default_bpm: 80,
            min_bpm: 40,
            max_bpm: 240,
            step: 1,
            fast_step: 5,
        }
    }
}

impl TempoConfig {
    fn validate(&self) -> Result<()> {
        if self.min_bpm == 0 || self.min_bpm > self.max_bpm {
            return Err(TunerMetronomeError::invalid_config(format!(
                "tempo range {}..={} is empty or starts at zero",
                self.min_bpm, self.max_bpm
            )));
        }
        if !(self.min_bpm..=self.max_bpm).contains(&self.default_bpm) {
            return Err(TunerMetronomeError::invalid_config(format!(
                "default tempo {} lies outside {}..={}",
                self.default_bpm, self.min_bpm, self.max_bpm
            )));
        }
        if self.step == 0 || self.fast_step == 0 {
            return Err(TunerMetronomeError::invalid_config(
                "tempo steps must be positive",
            ));
        }
        Ok(())
    }
}

/// Timing of the hold-to-repeat interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    pub repeat_interval_ms: u64,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            repeat_interval_ms: 200,
        }
    }
}

impl HoldConfig {
    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.repeat_interval_ms == 0 {
            return Err(TunerMetronomeError::invalid_config(
                "repeat interval must be positive",
            ));
        }
        Ok(())
    }
}

/// Where the saved tempo lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "tuner-metronome.json".to_string(),
            key: "bmp_saved_key".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tempo.default_bpm, 80);
        assert_eq!(config.hold.repeat_interval(), Duration::from_millis(200));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tempo": {{ "max_bpm": 300 }} }}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.tempo.max_bpm, 300);
        assert_eq!(config.tempo.min_bpm, 40);
        assert_eq!(config.store.key, "bmp_saved_key");
    }

    #[test]
    fn rejects_default_outside_range() {
        let mut config = AppConfig::default();
        config.tempo.default_bpm = 20;

        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("default tempo 20"));
    }

    #[test]
    fn rejects_zero_repeat_interval() {
        let mut config = AppConfig::default();
        config.hold.repeat_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(TunerMetronomeError::InvalidConfig(_))
        ));
    }
}
