use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::{debug, warn};

use crate::console::{Console, Key, StatusScreen};
use crate::errors::Error;

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// A [`Console`] on the process terminal: raw (non-canonical, non-echoing) input, alternate screen
/// and hidden cursor.
///
/// The terminal is restored when the console is dropped.
#[derive(Debug)]
pub struct CrosstermConsole {
    out: Stdout,
}

impl CrosstermConsole {
    /// Switches the terminal to raw mode and enters the alternate screen.
    pub fn new() -> Result<Self, Error> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        debug!("Terminal switched to raw mode");
        Ok(Self { out })
    }
}

impl Drop for CrosstermConsole {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.out, Show, LeaveAlternateScreen) {
            warn!("Could not leave the alternate screen: {}", err);
        }
        if let Err(err) = disable_raw_mode() {
            warn!("Could not restore the terminal mode: {}", err);
        }
    }
}

impl Console for CrosstermConsole {
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>, Error> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            // Some platforms also report releases and repeats: only presses count.
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Key::from(key))),
            _ => Ok(None),
        }
    }

    fn render(&mut self, screen: &StatusScreen) -> Result<(), Error> {
        queue!(self.out, Clear(ClearType::All))?;
        for (row, line) in screen.lines().iter().enumerate() {
            queue!(self.out, MoveTo(0, row as u16), Print(line))?;
        }
        self.out.flush()?;
        Ok(())
    }
}
