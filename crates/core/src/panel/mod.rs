use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SoundVariant;

/// Visibility and highlight state of the screen's controls.
///
/// The metronome group covers the tempo buttons, the tempo readout, the beat
/// animation, both sound selectors and the save button. The restore control
/// belongs to the group too but is only shown once a tempo has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    pub metronome_controls_visible: bool,
    pub tuner_visible: bool,
    pub restore_visible: bool,
    /// Caption of the restore control: the saved tempo as text.
    pub restore_label: String,
    pub highlighted_sound: SoundVariant,
    /// Display sleep is suppressed while the screen is up.
    pub keep_awake: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            metronome_controls_visible: false,
            tuner_visible: false,
            restore_visible: false,
            restore_label: "0".to_string(),
            highlighted_sound: SoundVariant::Primary,
            keep_awake: false,
        }
    }
}

impl PanelState {
    pub fn show_metronome(&mut self, has_saved_tempo: bool) {
        self.metronome_controls_visible = true;
        self.restore_visible = has_saved_tempo;
    }

    pub fn hide_metronome(&mut self) {
        self.metronome_controls_visible = false;
        self.restore_visible = false;
    }

    pub fn set_restore_label(&mut self, bpm: u32) {
        self.restore_label = bpm.to_string();
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = |visible: bool| if visible { "shown" } else { "hidden" };
        writeln!(f, "metronome controls: {}", shown(self.metronome_controls_visible))?;
        writeln!(f, "tuner:              {}", shown(self.tuner_visible))?;
        writeln!(
            f,
            "restore control:    {} ({})",
            shown(self.restore_visible),
            self.restore_label
        )?;
        writeln!(f, "highlighted sound:  {}", self.highlighted_sound)?;
        write!(f, "keep awake:         {}", self.keep_awake)
    }
}
