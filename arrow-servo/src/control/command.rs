use crate::console::Key;

/// Identifies which of the two servos a command targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Servo 1, driven by the up/down keys.
    Vertical,
    /// Servo 2, driven by the left/right keys.
    Horizontal,
}

impl Axis {
    /// Returns the index of the targeted servo (0 for servo 1).
    pub fn index(&self) -> usize {
        match self {
            Axis::Vertical => 0,
            Axis::Horizontal => 1,
        }
    }
}

/// What a key press asks the control loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Terminates the session.
    Quit,
    /// Moves one servo by `direction` steps (+1 or -1).
    Nudge { axis: Axis, direction: i8 },
    /// No mapping: nothing changes.
    Ignore,
}

impl From<Key> for Command {
    fn from(key: Key) -> Self {
        match key {
            Key::Char('q') | Key::Interrupt => Command::Quit,
            Key::Up => Command::Nudge {
                axis: Axis::Vertical,
                direction: 1,
            },
            Key::Down => Command::Nudge {
                axis: Axis::Vertical,
                direction: -1,
            },
            Key::Left => Command::Nudge {
                axis: Axis::Horizontal,
                direction: -1,
            },
            Key::Right => Command::Nudge {
                axis: Axis::Horizontal,
                direction: 1,
            },
            _ => Command::Ignore,
        }
    }
}
