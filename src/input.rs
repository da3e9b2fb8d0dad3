use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keyboard input reduced to what the launcher and games act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    /// Fire, flap, launch.
    Action,
    Pause,
    Restart,
    Back,
    Confirm,
    Backspace,
    Char(char),
    Quit,
}

impl Input {
    /// Raw mapping: printable keys stay as `Char` so text entry sees them untouched.
    pub fn from_key(key: KeyEvent) -> Option<Input> {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Input::Quit);
        }
        let input = match key.code {
            KeyCode::Up => Input::Up,
            KeyCode::Down => Input::Down,
            KeyCode::Left => Input::Left,
            KeyCode::Right => Input::Right,
            KeyCode::Enter => Input::Confirm,
            KeyCode::Esc => Input::Back,
            KeyCode::Backspace => Input::Backspace,
            KeyCode::Char(c) => Input::Char(c),
            _ => return None,
        };
        Some(input)
    }

    /// Gameplay mapping: WASD steer, Space acts, P pauses, R restarts.
    pub fn intent(self) -> Input {
        match self {
            Input::Char(c) => match c.to_ascii_lowercase() {
                'w' => Input::Up,
                'a' => Input::Left,
                's' => Input::Down,
                'd' => Input::Right,
                ' ' => Input::Action,
                'p' => Input::Pause,
                'r' => Input::Restart,
                _ => Input::Char(c),
            },
            other => other,
        }
    }
}
