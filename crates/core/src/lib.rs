//! Core library for the Tuner Metronome practice screen.
//!
//! The screen switches between a metronome and a tuner, adjusts the tempo on
//! tap or press-and-hold, and remembers one saved tempo across launches. Click
//! synthesis and pitch detection sit behind the collaborator traits in
//! [`engine`]; the crate ships simulated engines so the controller can be
//! exercised without audio hardware.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod event;
pub mod mode;
pub mod panel;
pub mod repeat;
pub mod store;
pub mod tempo;

pub use config::{AppConfig, HoldConfig, StoreConfig, TempoConfig};
pub use controller::{ScreenController, SimulatedScreen};
pub use engine::{MetronomeEngine, SimulatedMetronome, SimulatedTuner, TunerEngine};
pub use error::{Result, TunerMetronomeError};
pub use event::{parse_json_script, parse_script, InputEvent};
pub use mode::{Mode, SoundVariant};
pub use panel::PanelState;
pub use repeat::{RepeatHandle, RepeatTimer};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SavedTempo};
pub use tempo::{Direction, TempoDial, TempoDisplay};
