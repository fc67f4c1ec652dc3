//! Defines the terminal side of a session: keyboard input and status rendering.

use std::fmt::Debug;
use std::time::Duration;

use crate::errors::Error;

pub use terminal::CrosstermConsole;

mod terminal;

/// Instructions shown on top of the status screen.
pub const INSTRUCTIONS: [&str; 3] = [
    "Control Servos with Arrow Keys:",
    "Servo 1: Up/Down | Servo 2: Left/Right",
    "Press 'q' to quit.",
];

/// Lists the keys a session cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    /// Ctrl-C: raw mode delivers it as a key instead of a signal.
    Interrupt,
    Other,
}

/// Content of the status screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusScreen {
    /// Current angle (in degrees) of servo 1 and servo 2.
    pub angles: [u16; 2],
}

impl StatusScreen {
    /// Returns the screen lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = INSTRUCTIONS.iter().map(|line| line.to_string()).collect();
        lines.push(String::new());
        for (index, angle) in self.angles.iter().enumerate() {
            lines.push(format!("Servo {} Angle: {}°", index + 1, angle));
        }
        lines
    }
}

/// Defines the trait a terminal must implement to host a session.
pub trait Console: Debug {
    /// Waits at most `timeout` for a key press. Returns `None` if none arrived.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>, Error>;
    /// Replaces the displayed content with `screen`.
    fn render(&mut self, screen: &StatusScreen) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_screen_lines() {
        let screen = StatusScreen { angles: [90, 12] };
        assert_eq!(
            screen.lines(),
            vec![
                "Control Servos with Arrow Keys:",
                "Servo 1: Up/Down | Servo 2: Left/Right",
                "Press 'q' to quit.",
                "",
                "Servo 1 Angle: 90°",
                "Servo 2 Angle: 12°",
            ]
        );
    }
}
