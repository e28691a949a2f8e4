use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::TunerMetronomeError;

/// The two mutually exclusive faces of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Tempo controls and the click engine.
    Metronome,
    /// Pitch display and the tuner engine.
    Tuner,
}

impl Mode {
    pub fn other(self) -> Self {
        match self {
            Mode::Metronome => Mode::Tuner,
            Mode::Tuner => Mode::Metronome,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Metronome => f.write_str("metronome"),
            Mode::Tuner => f.write_str("tuner"),
        }
    }
}

impl FromStr for Mode {
    type Err = TunerMetronomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metronome" => Ok(Mode::Metronome),
            "tuner" => Ok(Mode::Tuner),
            _ => Err(TunerMetronomeError::InvalidEvent(s.to_string())),
        }
    }
}

/// Alternative click sounds offered by the metronome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundVariant {
    #[default]
    Primary,
    Secondary,
}

impl fmt::Display for SoundVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundVariant::Primary => f.write_str("primary"),
            SoundVariant::Secondary => f.write_str("secondary"),
        }
    }
}

impl FromStr for SoundVariant {
    type Err = TunerMetronomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "rod" => Ok(SoundVariant::Primary),
            "secondary" | "rock" => Ok(SoundVariant::Secondary),
            _ => Err(TunerMetronomeError::InvalidEvent(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_mode_flips() {
        assert_eq!(Mode::Tuner.other(), Mode::Metronome);
        assert_eq!(Mode::Metronome.other().other(), Mode::Metronome);
    }

    #[test]
    fn parses_sound_aliases() {
        assert_eq!("rock".parse::<SoundVariant>().unwrap(), SoundVariant::Secondary);
        assert_eq!("Primary".parse::<SoundVariant>().unwrap(), SoundVariant::Primary);
        assert!("bell".parse::<SoundVariant>().is_err());
    }
}
