use std::collections::VecDeque;
use std::time::Duration;

use crate::console::{Console, Key, StatusScreen};
use crate::errors::Error;
use crate::errors::TerminalError::IoException;

/// Mock implement for [`Console`]: replays a scripted sequence of polls and records every frame.
///
/// Each entry of the script is the outcome of one poll: `Some(key)` for a key press, `None` for
/// a poll that timed out. Once the script is exhausted, polling fails (so a session that never
/// quits cannot loop forever).
#[derive(Clone, Debug, Default)]
pub struct ScriptedConsole {
    script: VecDeque<Option<Key>>,
    /// Every rendered screen, in order.
    pub frames: Vec<StatusScreen>,
    /// Number of polls done so far.
    pub polls: usize,
}

impl ScriptedConsole {
    /// Creates a console replaying `script`.
    pub fn new<I: IntoIterator<Item = Option<Key>>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
            frames: vec![],
            polls: 0,
        }
    }

    /// Creates a console replaying key presses only.
    pub fn keys<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        Self::new(keys.into_iter().map(Some))
    }

    /// Returns the last rendered screen, if any.
    pub fn last_frame(&self) -> Option<&StatusScreen> {
        self.frames.last()
    }
}

impl Console for ScriptedConsole {
    fn poll_key(&mut self, _: Duration) -> Result<Option<Key>, Error> {
        self.polls += 1;
        self.script.pop_front().ok_or(
            IoException {
                info: String::from("script exhausted"),
            }
            .into(),
        )
    }

    fn render(&mut self, screen: &StatusScreen) -> Result<(), Error> {
        self.frames.push(screen.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_polls() {
        let mut console = ScriptedConsole::new([Some(Key::Up), None]);
        assert_eq!(console.poll_key(Duration::ZERO).unwrap(), Some(Key::Up));
        assert_eq!(console.poll_key(Duration::ZERO).unwrap(), None);
        assert!(console.poll_key(Duration::ZERO).is_err());
        assert_eq!(console.polls, 3);
    }

    #[test]
    fn test_records_frames() {
        let mut console = ScriptedConsole::keys([]);
        assert!(console.last_frame().is_none());
        console.render(&StatusScreen { angles: [1, 2] }).unwrap();
        assert_eq!(console.last_frame().unwrap().angles, [1, 2]);
    }
}
