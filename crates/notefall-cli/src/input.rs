//! Keyboard input for live play.
//!
//! A dedicated thread polls crossterm events and turns them into driver
//! input. Lane keys are d f j k from left to right.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use notefall_core::{InputHandle, PauseGate, ShutdownSignal};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Lane keys, indexed by column
pub const LANE_KEYS: [char; 4] = ['d', 'f', 'j', 'k'];

/// What a single key event means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Press(u8),
    Release(u8),
    TogglePause,
    Quit,
}

pub fn column_for_key(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    LANE_KEYS.iter().position(|&k| k == c).map(|i| i as u8)
}

/// Map a terminal key event to a game command
///
/// Auto-repeat is ignored so a held key stays one press.
pub fn interpret(key: &KeyEvent) -> Option<KeyCommand> {
    if key.kind == KeyEventKind::Repeat {
        return None;
    }
    let pressed = key.kind == KeyEventKind::Press;

    match key.code {
        KeyCode::Esc if pressed => Some(KeyCommand::Quit),
        KeyCode::Char('c') if pressed && key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyCommand::Quit)
        }
        KeyCode::Char('q') if pressed => Some(KeyCommand::Quit),
        KeyCode::Char('p') if pressed => Some(KeyCommand::TogglePause),
        KeyCode::Char(c) => column_for_key(c).map(|column| {
            if pressed {
                KeyCommand::Press(column)
            } else {
                KeyCommand::Release(column)
            }
        }),
        _ => None,
    }
}

/// Spawn the keyboard thread; it exits once `shutdown` fires
///
/// Without release reporting the terminal only sends presses, so holds
/// are never broken early.
pub fn spawn_keyboard(
    input: InputHandle,
    pause: Arc<PauseGate>,
    shutdown: Arc<ShutdownSignal>,
    has_key_release: bool,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.is_shutdown() {
            let key = match poll_key() {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Keyboard polling failed: {}", e);
                    shutdown.trigger();
                    break;
                }
            };

            let Some(command) = interpret(&key) else {
                continue;
            };
            let sent = match command {
                KeyCommand::Press(column) => input.press(column),
                KeyCommand::Release(column) if has_key_release => input.release(column),
                KeyCommand::Release(_) => Ok(()),
                KeyCommand::TogglePause => {
                    if pause.toggle() {
                        let mut stdout = io::stdout();
                        let _ = write!(stdout, "  [PAUSED] press p to resume");
                        let _ = stdout.flush();
                    }
                    Ok(())
                }
                KeyCommand::Quit => {
                    shutdown.trigger();
                    Ok(())
                }
            };
            if sent.is_err() {
                debug!("Driver stopped accepting input");
                break;
            }
        }
        debug!("Keyboard thread stopped");
    })
}

fn poll_key() -> io::Result<Option<KeyEvent>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_lane_keys_map_left_to_right() {
        assert_eq!(column_for_key('d'), Some(0));
        assert_eq!(column_for_key('f'), Some(1));
        assert_eq!(column_for_key('j'), Some(2));
        assert_eq!(column_for_key('K'), Some(3));
        assert_eq!(column_for_key('a'), None);
    }

    #[test]
    fn test_press_and_release() {
        assert_eq!(
            interpret(&key(KeyCode::Char('j'), KeyEventKind::Press)),
            Some(KeyCommand::Press(2))
        );
        assert_eq!(
            interpret(&key(KeyCode::Char('j'), KeyEventKind::Release)),
            Some(KeyCommand::Release(2))
        );
    }

    #[test]
    fn test_repeat_is_ignored() {
        assert_eq!(interpret(&key(KeyCode::Char('d'), KeyEventKind::Repeat)), None);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(
            interpret(&key(KeyCode::Char('p'), KeyEventKind::Press)),
            Some(KeyCommand::TogglePause)
        );
        assert_eq!(
            interpret(&key(KeyCode::Esc, KeyEventKind::Press)),
            Some(KeyCommand::Quit)
        );
        assert_eq!(
            interpret(&key(KeyCode::Char('q'), KeyEventKind::Press)),
            Some(KeyCommand::Quit)
        );
        // Releasing a control key does nothing
        assert_eq!(interpret(&key(KeyCode::Char('p'), KeyEventKind::Release)), None);

        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'), KeyEventKind::Press)
        };
        assert_eq!(interpret(&ctrl_c), Some(KeyCommand::Quit));
    }
}
