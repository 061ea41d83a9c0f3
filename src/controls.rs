//! Key bindings for the demo.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pan the camera by whole cells.
    Pan(i32, i32),
    /// Move the player layer (and the torch following it).
    MovePlayer(i32, i32),
    ToggleCameraMode,
    ToggleBloom,
    ToggleLighting,
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Left => Some(Command::Pan(-2, 0)),
        KeyCode::Right => Some(Command::Pan(2, 0)),
        KeyCode::Up => Some(Command::Pan(0, -1)),
        KeyCode::Down => Some(Command::Pan(0, 1)),

        KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::MovePlayer(-1, 0)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::MovePlayer(1, 0)),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::MovePlayer(0, -1)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::MovePlayer(0, 1)),

        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::ToggleCameraMode),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::ToggleBloom),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(Command::ToggleLighting),

        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_pan_the_camera() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Left)), Some(Command::Pan(-2, 0)));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Down)), Some(Command::Pan(0, 1)));
    }

    #[test]
    fn toggles() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('p'))),
            Some(Command::ToggleCameraMode)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('B'))), Some(Command::ToggleBloom));
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('l'))),
            Some(Command::ToggleLighting)
        );
    }

    #[test]
    fn quit_keys() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('c'))), None);
    }
}
