use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::dispatch::Command;

/// What a key press means: a player command, or something only the UI cares about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    CursorUp,
    CursorDown,
    /// Play the track under the cursor.
    PlaySelected,
    ToggleDetails,
}

pub fn map_key(key: &KeyEvent, scrub_seconds: u64) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyAction::Command(Command::Quit)),
            _ => None,
        };
    }

    let scrub = i64::try_from(scrub_seconds).unwrap_or(i64::MAX);
    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => KeyAction::Command(Command::TogglePlay),
        KeyCode::Left | KeyCode::Char('h') => KeyAction::Command(Command::Previous),
        KeyCode::Right | KeyCode::Char('l') => KeyAction::Command(Command::Next),
        KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => {
            KeyAction::Command(Command::VolumeUp)
        }
        KeyCode::Down | KeyCode::Char('-') => KeyAction::Command(Command::VolumeDown),
        KeyCode::Char('m') | KeyCode::Char('r') => KeyAction::Command(Command::CycleMode),
        KeyCode::Char('H') => KeyAction::Command(Command::SeekBy(-scrub)),
        KeyCode::Char('L') => KeyAction::Command(Command::SeekBy(scrub)),
        KeyCode::Char('q') => KeyAction::Command(Command::Quit),
        KeyCode::Char('j') => KeyAction::CursorDown,
        KeyCode::Char('k') => KeyAction::CursorUp,
        KeyCode::Enter => KeyAction::PlaySelected,
        KeyCode::Char('c') => KeyAction::ToggleDetails,
        _ => return None,
    };
    Some(action)
}
