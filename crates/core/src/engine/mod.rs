//! Audio collaborators driven by the screen controller.
//!
//! Click synthesis and pitch detection live behind these traits. The
//! simulated engines track state and log transitions so the controller can be
//! driven end-to-end from the command line and from tests.

use crate::SoundVariant;

/// Click engine and its beat animation.
pub trait MetronomeEngine {
    fn start(&mut self, bpm: u32);
    /// Stopping an engine that is not running must be a no-op.
    fn stop(&mut self);
    fn update_bpm(&mut self, bpm: u32);
    /// Flips between the two click sounds.
    fn switch_sound(&mut self);
    fn is_running(&self) -> bool;
    fn layout(&mut self) {}
}

/// Pitch detection engine and its display.
pub trait TunerEngine {
    fn start(&mut self);
    /// Stopping an engine that is not running must be a no-op.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    fn layout(&mut self) {}
}

#[derive(Debug, Default, Clone)]
pub struct SimulatedMetronome {
    running: bool,
    bpm: u32,
    sound: SoundVariant,
    sound_switches: usize,
    layouts: usize,
}

impl SimulatedMetronome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn sound(&self) -> SoundVariant {
        self.sound
    }

    /// Number of times the sound has been switched since creation.
    pub fn sound_switches(&self) -> usize {
        self.sound_switches
    }

    pub fn layouts(&self) -> usize {
        self.layouts
    }
}

impl MetronomeEngine for SimulatedMetronome {
    fn start(&mut self, bpm: u32) {
        self.bpm = bpm;
        if self.running {
            return;
        }
        self.running = true;
        tracing::info!(bpm, sound = %self.sound, "metronome started");
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::info!("metronome stopped");
    }

    fn update_bpm(&mut self, bpm: u32) {
        if self.bpm != bpm {
            tracing::debug!(from = self.bpm, to = bpm, "metronome tempo updated");
        }
        self.bpm = bpm;
    }

    fn switch_sound(&mut self) {
        self.sound = match self.sound {
            SoundVariant::Primary => SoundVariant::Secondary,
            SoundVariant::Secondary => SoundVariant::Primary,
        };
        self.sound_switches += 1;
        tracing::info!(sound = %self.sound, "metronome sound switched");
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn layout(&mut self) {
        self.layouts += 1;
    }
}

#[derive(Debug, Default, Clone)]
pub struct SimulatedTuner {
    running: bool,
    starts: usize,
    layouts: usize,
}

impl SimulatedTuner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stopped-to-running transitions.
    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn layouts(&self) -> usize {
        self.layouts
    }
}

impl TunerEngine for SimulatedTuner {
    fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.starts += 1;
        tracing::info!("tuner started");
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::info!("tuner stopped");
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn layout(&mut self) {
        self.layouts += 1;
    }
}
