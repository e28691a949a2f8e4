use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{TempoConfig, TunerMetronomeError};

/// Sign of a tempo adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => f.write_str("up"),
            Direction::Down => f.write_str("down"),
        }
    }
}

impl FromStr for Direction {
    type Err = TunerMetronomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "right" | "+" => Ok(Direction::Up),
            "down" | "left" | "-" => Ok(Direction::Down),
            _ => Err(TunerMetronomeError::InvalidEvent(s.to_string())),
        }
    }
}

/// The collaborator that owns and displays the current tempo.
pub trait TempoDisplay {
    fn current_tempo(&self) -> u32;

    /// Replaces the tempo outright. Implementations decide how to treat
    /// out-of-range values.
    fn set_tempo(&mut self, bpm: u32);

    /// Moves the tempo one step in `direction`; `fast` selects the larger
    /// step used while a button is held.
    fn change_tempo(&mut self, direction: Direction, fast: bool);

    /// Layout pass forwarded from the screen.
    fn layout(&mut self) {}
}

/// Integer tempo dial clamped to a configured range.
#[derive(Debug, Clone)]
pub struct TempoDial {
    bpm: u32,
    min_bpm: u32,
    max_bpm: u32,
    step: u32,
    fast_step: u32,
}

impl TempoDial {
    pub fn new(config: &TempoConfig) -> Self {
        Self {
            bpm: config.default_bpm.clamp(config.min_bpm, config.max_bpm),
            min_bpm: config.min_bpm,
            max_bpm: config.max_bpm,
            step: config.step,
            fast_step: config.fast_step,
        }
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min_bpm, self.max_bpm)
    }
}

impl Default for TempoDial {
    fn default() -> Self {
        Self::new(&TempoConfig::default())
    }
}

impl TempoDisplay for TempoDial {
    fn current_tempo(&self) -> u32 {
        self.bpm
    }

    fn set_tempo(&mut self, bpm: u32) {
        self.bpm = bpm.clamp(self.min_bpm, self.max_bpm);
    }

    fn change_tempo(&mut self, direction: Direction, fast: bool) {
        let step = if fast { self.fast_step } else { self.step };
        let next = match direction {
            Direction::Up => self.bpm.saturating_add(step),
            Direction::Down => self.bpm.saturating_sub(step),
        };
        self.bpm = next.clamp(self.min_bpm, self.max_bpm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_configured_default() {
        let dial = TempoDial::default();
        assert_eq!(dial.current_tempo(), 80);
        assert_eq!(dial.range(), (40, 240));
    }

    #[test]
    fn slow_and_fast_steps() {
        let mut dial = TempoDial::default();
        dial.change_tempo(Direction::Up, false);
        assert_eq!(dial.current_tempo(), 81);
        dial.change_tempo(Direction::Down, true);
        assert_eq!(dial.current_tempo(), 76);
    }

    #[test]
    fn clamps_to_range() {
        let mut dial = TempoDial::default();
        dial.set_tempo(238);
        dial.change_tempo(Direction::Up, true);
        assert_eq!(dial.current_tempo(), 240);

        dial.set_tempo(0);
        assert_eq!(dial.current_tempo(), 40);
        dial.change_tempo(Direction::Down, false);
        assert_eq!(dial.current_tempo(), 40);
    }
}
