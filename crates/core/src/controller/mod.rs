//! The metronome/tuner screen.
//!
//! [`ScreenController`] owns which mode is active, the hold-to-repeat timer
//! and the saved tempo. Everything audible or visible beyond the
//! [`PanelState`] flags is delegated to the collaborators it is built with.

use std::time::Duration;

use crate::{
    AppConfig, Direction, InputEvent, KeyValueStore, MetronomeEngine, Mode, PanelState,
    RepeatHandle, RepeatTimer, Result, SavedTempo, SimulatedMetronome, SimulatedTuner,
    SoundVariant, TempoDial, TempoDisplay, TunerEngine,
};

/// A controller wired to the reference collaborators.
pub type SimulatedScreen<S> = ScreenController<TempoDial, SimulatedMetronome, SimulatedTuner, S>;

#[derive(Debug, Clone, Copy)]
struct Hold {
    handle: RepeatHandle,
    direction: Direction,
}

/// The metronome/tuner screen, generic over its tempo display, engines and
/// settings store.
#[derive(Debug)]
pub struct ScreenController<D, M, T, S> {
    tempo: D,
    metronome: M,
    tuner: T,
    store: S,
    saved: SavedTempo,
    panel: PanelState,
    mode: Option<Mode>,
    sound: SoundVariant,
    repeat_interval: Duration,
    timer: RepeatTimer,
    hold: Option<Hold>,
}

impl<S: KeyValueStore> SimulatedScreen<S> {
    pub fn simulated(config: &AppConfig, store: S) -> Self {
        Self::new(
            config,
            TempoDial::new(&config.tempo),
            SimulatedMetronome::new(),
            SimulatedTuner::new(),
            store,
        )
    }
}

impl<D, M, T, S> ScreenController<D, M, T, S>
where
    D: TempoDisplay,
    M: MetronomeEngine,
    T: TunerEngine,
    S: KeyValueStore,
{
    pub fn new(config: &AppConfig, tempo: D, metronome: M, tuner: T, store: S) -> Self {
        Self {
            tempo,
            metronome,
            tuner,
            store,
            saved: SavedTempo::new(config.store.key.clone()),
            panel: PanelState::default(),
            mode: None,
            sound: SoundVariant::Primary,
            repeat_interval: config.hold.repeat_interval(),
            timer: RepeatTimer::new(),
            hold: None,
        }
    }

    /// The active mode, or `None` before activation and after `on_back`.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn sound(&self) -> SoundVariant {
        self.sound
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn saved_bpm(&self) -> u32 {
        self.saved.bpm()
    }

    pub fn current_tempo(&self) -> u32 {
        self.tempo.current_tempo()
    }

    pub fn tempo(&self) -> &D {
        &self.tempo
    }

    pub fn metronome(&self) -> &M {
        &self.metronome
    }

    pub fn tuner(&self) -> &T {
        &self.tuner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    /// Number of live repeat schedules; never more than one.
    pub fn active_timers(&self) -> usize {
        self.timer.active_count()
    }

    /// Reads the persisted tempo, resets the sound selectors and keeps the
    /// display awake for as long as the screen is up.
    pub fn on_load(&mut self) -> u32 {
        let bpm = self.saved.load(&self.store);
        self.panel.set_restore_label(bpm);
        self.panel.highlighted_sound = self.sound;
        self.panel.keep_awake = true;
        tracing::info!(saved_bpm = bpm, "screen loaded");
        bpm
    }

    /// Screen appeared: the metronome is shut down and the tuner started,
    /// whatever the toggle said before.
    pub fn on_activate(&mut self) {
        self.shut_down_metronome();
        self.start_up_tuner();
        self.mode = Some(Mode::Tuner);
        self.on_layout();
        tracing::debug!("screen activated in tuner mode");
    }

    pub fn on_layout(&mut self) {
        self.tempo.layout();
        self.metronome.layout();
        self.tuner.layout();
    }

    /// Leaving the screen: both modes shut down.
    pub fn on_back(&mut self) {
        self.shut_down_tuner();
        self.shut_down_metronome();
        self.mode = None;
        self.panel.keep_awake = false;
        tracing::debug!("screen dismissed");
    }

    pub fn toggle(&mut self) {
        let next = self.mode.map_or(Mode::Metronome, Mode::other);
        self.set_mode(next);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == Some(mode) {
            return;
        }

        match mode {
            Mode::Tuner => {
                self.shut_down_metronome();
                self.start_up_tuner();
            }
            Mode::Metronome => {
                self.shut_down_tuner();
                self.start_up_metronome();
            }
        }
        self.mode = Some(mode);
        tracing::info!(%mode, "mode switched");
    }

    /// Applies one step immediately and arms the accelerated repeat. Ignored
    /// while the tempo buttons are hidden.
    pub fn on_press_start(&mut self, direction: Direction) -> Result<()> {
        if !self.panel.metronome_controls_visible {
            tracing::debug!(%direction, "press ignored outside metronome mode");
            return Ok(());
        }

        self.adjust(direction, false);
        self.cancel_hold();
        let handle = self.timer.start(self.repeat_interval)?;
        self.hold = Some(Hold { handle, direction });
        Ok(())
    }

    pub fn on_press_end(&mut self) {
        self.cancel_hold();
    }

    /// Moves the repeat clock forward, applying a fast step for every tick
    /// of the held button. Steps stop once the tempo hits the end of its
    /// range. Returns the number of steps applied.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let mut applied = 0;
        for (handle, ticks) in self.timer.advance(elapsed) {
            let Some(hold) = self.hold else { break };
            if hold.handle != handle {
                continue;
            }
            for _ in 0..ticks {
                let before = self.tempo.current_tempo();
                self.adjust(hold.direction, true);
                applied += 1;
                if self.tempo.current_tempo() == before {
                    break;
                }
            }
        }
        applied
    }

    /// Persists the current tempo. Ignored while the metronome controls are
    /// hidden, since the restore control belongs to that group.
    pub fn save(&mut self) -> Result<()> {
        if !self.panel.metronome_controls_visible {
            tracing::debug!("save ignored outside metronome mode");
            return Ok(());
        }

        let bpm = self.tempo.current_tempo();
        self.saved.save(&mut self.store, bpm)?;
        self.panel.set_restore_label(bpm);
        self.panel.restore_visible = true;
        Ok(())
    }

    /// Applies the saved tempo. Returns `false` without touching the tempo
    /// when nothing has been saved yet or the metronome controls are hidden.
    pub fn restore(&mut self) -> bool {
        if !self.panel.metronome_controls_visible {
            tracing::debug!("restore ignored outside metronome mode");
            return false;
        }
        if !self.saved.is_set() {
            tracing::warn!("restore requested before any tempo was saved");
            return false;
        }

        self.tempo.set_tempo(self.saved.bpm());
        let bpm = self.tempo.current_tempo();
        self.metronome.update_bpm(bpm);
        tracing::info!(bpm, "restored saved tempo");
        true
    }

    /// Returns `true` when the sound actually changed. The selectors only
    /// respond while the metronome controls are shown.
    pub fn select_variant(&mut self, variant: SoundVariant) -> bool {
        if !self.panel.metronome_controls_visible || self.sound == variant {
            return false;
        }

        self.metronome.switch_sound();
        self.sound = variant;
        self.panel.highlighted_sound = variant;
        true
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<()> {
        tracing::trace!(?event, "handling input");
        match event {
            InputEvent::Load => {
                self.on_load();
            }
            InputEvent::Activate => self.on_activate(),
            InputEvent::Layout => self.on_layout(),
            InputEvent::Toggle => self.toggle(),
            InputEvent::SetMode { mode } => self.set_mode(mode),
            InputEvent::PressStart { direction } => self.on_press_start(direction)?,
            InputEvent::PressEnd => self.on_press_end(),
            InputEvent::Wait { ms } => {
                self.advance(Duration::from_millis(ms));
            }
            InputEvent::Save => self.save()?,
            InputEvent::Restore => {
                self.restore();
            }
            InputEvent::SelectSound { variant } => {
                self.select_variant(variant);
            }
            InputEvent::Back => self.on_back(),
        }
        Ok(())
    }

    fn adjust(&mut self, direction: Direction, fast: bool) {
        self.tempo.change_tempo(direction, fast);
        let bpm = self.tempo.current_tempo();
        self.metronome.update_bpm(bpm);
        tracing::debug!(%direction, fast, bpm, "tempo adjusted");
    }

    fn cancel_hold(&mut self) {
        if let Some(hold) = self.hold.take() {
            self.timer.cancel(hold.handle);
        }
    }

    fn start_up_metronome(&mut self) {
        self.panel.show_metronome(self.saved.is_set());
        self.metronome.start(self.tempo.current_tempo());
    }

    fn shut_down_metronome(&mut self) {
        self.cancel_hold();
        self.panel.hide_metronome();
        self.metronome.stop();
    }

    fn start_up_tuner(&mut self) {
        self.panel.tuner_visible = true;
        self.tuner.start();
    }

    fn shut_down_tuner(&mut self) {
        self.panel.tuner_visible = false;
        self.tuner.stop();
    }
}
