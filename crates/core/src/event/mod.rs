use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Direction, Mode, Result, SoundVariant, TunerMetronomeError};

/// Every input the screen reacts to.
///
/// The text form is one event per line, e.g. `press up`, `release`,
/// `wait 450`, `sound secondary`. JSON uses an `event` tag:
/// `{"event": "press_start", "direction": "up"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// Screen loaded: read the saved tempo.
    Load,
    /// Screen appeared: reset to the tuner.
    Activate,
    Layout,
    Toggle,
    SetMode { mode: Mode },
    PressStart { direction: Direction },
    /// Button released, inside or outside the control.
    PressEnd,
    /// Let time pass so the hold-repeat timer can tick.
    Wait { ms: u64 },
    Save,
    Restore,
    SelectSound { variant: SoundVariant },
    Back,
}

impl FromStr for InputEvent {
    type Err = TunerMetronomeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || TunerMetronomeError::InvalidEvent(s.trim().to_string());
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or_else(invalid)?.to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(invalid());
        }

        let event = match (verb.as_str(), arg) {
            ("load", None) => InputEvent::Load,
            ("activate" | "appear", None) => InputEvent::Activate,
            ("layout", None) => InputEvent::Layout,
            ("toggle", None) => InputEvent::Toggle,
            ("mode", Some(mode)) => InputEvent::SetMode {
                mode: mode.parse()?,
            },
            ("press", Some(direction)) => InputEvent::PressStart {
                direction: direction.parse()?,
            },
            ("release", None) => InputEvent::PressEnd,
            ("wait", Some(ms)) => InputEvent::Wait {
                ms: ms.parse().map_err(|_| invalid())?,
            },
            ("save", None) => InputEvent::Save,
            ("restore", None) => InputEvent::Restore,
            ("sound", Some(variant)) => InputEvent::SelectSound {
                variant: variant.parse()?,
            },
            ("back", None) => InputEvent::Back,
            _ => return Err(invalid()),
        };
        Ok(event)
    }
}

/// Parses a text script: one event per line, blank lines and `#` comments
/// ignored.
pub fn parse_script(text: &str) -> Result<Vec<InputEvent>> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::parse)
        .collect()
}

/// Parses a JSON array of tagged events.
pub fn parse_json_script(text: &str) -> Result<Vec<InputEvent>> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_events() {
        assert_eq!(
            "press up".parse::<InputEvent>().unwrap(),
            InputEvent::PressStart {
                direction: Direction::Up
            }
        );
        assert_eq!(
            "wait 450".parse::<InputEvent>().unwrap(),
            InputEvent::Wait { ms: 450 }
        );
        assert_eq!(
            "mode Metronome".parse::<InputEvent>().unwrap(),
            InputEvent::SetMode {
                mode: Mode::Metronome
            }
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!("wait soon".parse::<InputEvent>().is_err());
        assert!("release now".parse::<InputEvent>().is_err());
        assert!("press".parse::<InputEvent>().is_err());

        let err = "jump".parse::<InputEvent>().unwrap_err();
        assert!(format!("{err}").contains("jump"));
    }

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let script = "# warm up\nactivate\n\ntoggle  # to metronome\nsave\n";
        let events = parse_script(script).unwrap();
        assert_eq!(
            events,
            vec![InputEvent::Activate, InputEvent::Toggle, InputEvent::Save]
        );
    }

    #[test]
    fn parses_tagged_json() {
        let json = r#"[
            {"event": "toggle"},
            {"event": "press_start", "direction": "down"},
            {"event": "wait", "ms": 600},
            {"event": "select_sound", "variant": "secondary"}
        ]"#;
        let events = parse_json_script(json).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[3],
            InputEvent::SelectSound {
                variant: SoundVariant::Secondary
            }
        );
    }
}
