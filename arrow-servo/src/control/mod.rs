//! Defines the interactive loop turning key presses into servo moves.

use std::time::{Duration, Instant};

use log::{debug, trace};

pub use command::{Axis, Command};

use crate::config::{Config, RedrawPolicy};
use crate::console::{Console, StatusScreen};
use crate::devices::Servo;
use crate::errors::Error;

mod command;

/// The two states of a [`ControlLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal: entered on the quit key only.
    Stopped,
}

/// Single-threaded poll loop: reads keys from a [`Console`], moves the matching [`Servo`] and
/// redraws the status screen.
#[derive(Debug)]
pub struct ControlLoop<C: Console> {
    console: C,
    /// Servo 1 (up/down) and servo 2 (left/right).
    servos: [Servo; 2],
    input_timeout: Duration,
    redraw: RedrawPolicy,
    /// Degrees moved per key press.
    step: u16,
    state: LoopState,
    last_draw: Instant,
}

impl<C: Console> ControlLoop<C> {
    /// Creates a running loop over already attached (and centered) servos.
    pub fn new(console: C, servos: [Servo; 2], config: &Config) -> Self {
        Self {
            console,
            servos,
            input_timeout: config.input_timeout,
            redraw: config.redraw,
            step: config.step,
            state: LoopState::Running,
            last_draw: Instant::now(),
        }
    }

    /// Draws the status screen then polls until the quit key is pressed.
    pub fn run(&mut self) -> Result<(), Error> {
        self.draw()?;
        while self.tick()? == LoopState::Running {}
        debug!("Control loop stopped");
        Ok(())
    }

    /// Runs one iteration: a bounded poll, the matching servo move, and a redraw if the
    /// [`RedrawPolicy`] asks for one.
    pub fn tick(&mut self) -> Result<LoopState, Error> {
        if self.state == LoopState::Stopped {
            return Ok(self.state);
        }

        let command = match self.console.poll_key(self.input_timeout)? {
            Some(key) => {
                trace!("Key pressed: {:?}", key);
                Command::from(key)
            }
            None => Command::Ignore,
        };
        if command == Command::Quit {
            self.state = LoopState::Stopped;
            return Ok(self.state);
        }

        let changed = self.apply(command)?;
        if self.redraw.should_redraw(changed, self.last_draw.elapsed()) {
            self.draw()?;
        }
        Ok(self.state)
    }

    /// Applies a movement command. Returns whether a servo was written to.
    pub fn apply(&mut self, command: Command) -> Result<bool, Error> {
        match command {
            Command::Nudge { axis, direction } => {
                let delta = direction as i32 * self.step as i32;
                self.servos[axis.index()].nudge(delta)?;
                Ok(true)
            }
            Command::Quit | Command::Ignore => Ok(false),
        }
    }

    /// Returns the status screen matching the current angles.
    pub fn status(&self) -> StatusScreen {
        StatusScreen {
            angles: [self.servos[0].get_angle(), self.servos[1].get_angle()],
        }
    }

    fn draw(&mut self) -> Result<(), Error> {
        let screen = self.status();
        self.console.render(&screen)?;
        self.last_draw = Instant::now();
        Ok(())
    }

    // ########################################
    // Getters.

    /// Returns the loop state.
    pub fn get_state(&self) -> LoopState {
        self.state
    }

    /// Returns both servos.
    pub fn get_servos(&self) -> &[Servo; 2] {
        &self.servos
    }

    /// Returns the console.
    pub fn get_console(&self) -> &C {
        &self.console
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{Config, RedrawPolicy};
    use crate::console::Key;
    use crate::control::{ControlLoop, LoopState};
    use crate::devices::Servo;
    use crate::hardware::Board;
    use crate::mocks::{MockPwm, ScriptedConsole};

    fn _setup_loop(
        protocol: &MockPwm,
        console: ScriptedConsole,
        config: &Config,
    ) -> ControlLoop<ScriptedConsole> {
        let mut board = Board::new(protocol.clone());
        board.open().unwrap();
        let servos = [
            Servo::new(&board, &config.servos[0]).unwrap(),
            Servo::new(&board, &config.servos[1]).unwrap(),
        ];
        ControlLoop::new(console, servos, config)
    }

    #[test]
    fn test_initial_state() {
        let protocol = MockPwm::default();
        let control = _setup_loop(&protocol, ScriptedConsole::keys([]), &Config::default());
        assert_eq!(control.get_state(), LoopState::Running);
        assert_eq!(control.status().angles, [90, 90]);
        // Both servos are centered before any key is read.
        assert_eq!(protocol.writes(), vec![(1, 150), (0, 150)]);
        assert_eq!(control.get_console().polls, 0);
    }

    #[test]
    fn test_up_saturates() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::keys(vec![Key::Up; 200]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        for _ in 0..200 {
            assert_eq!(control.tick().unwrap(), LoopState::Running);
        }
        assert_eq!(control.status().angles, [180, 90]);
        assert_eq!(protocol.last_duty(1), Some(250));
    }

    #[test]
    fn test_down_is_idempotent_at_floor() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::keys(vec![Key::Down; 290]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        for _ in 0..90 {
            control.tick().unwrap();
        }
        assert_eq!(control.status().angles, [0, 90]);
        for _ in 0..200 {
            control.tick().unwrap();
        }
        assert_eq!(control.status().angles, [0, 90]);
        assert_eq!(protocol.last_duty(1), Some(50));
    }

    #[test]
    fn test_angles_stay_in_range() {
        let protocol = MockPwm::default();
        // A deterministic pseudo-random walk of up/down presses.
        let keys: Vec<Key> = (0..1000u32)
            .map(|i| match (i.wrapping_mul(2_654_435_761) >> 7) % 3 {
                0 => Key::Down,
                _ => Key::Up,
            })
            .collect();
        let mut control = _setup_loop(&protocol, ScriptedConsole::keys(keys), &Config::default());
        for _ in 0..1000 {
            control.tick().unwrap();
            let angle = control.status().angles[0];
            assert!(angle <= 180);
        }
        assert!(protocol.writes_on(1).iter().all(|duty| (50..=250).contains(duty)));
    }

    #[test]
    fn test_axes_are_independent() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::keys([Key::Left, Key::Left, Key::Right, Key::Left]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        for _ in 0..4 {
            control.tick().unwrap();
        }
        assert_eq!(control.status().angles, [90, 88]);
        // Servo 1 (channel 1) was only written once: when centered.
        assert_eq!(protocol.writes_on(1), vec![150]);
        assert_eq!(protocol.writes_on(0), vec![150, 149, 148, 149, 148]);

        let console = ScriptedConsole::keys([Key::Up, Key::Down, Key::Up]);
        let protocol = MockPwm::default();
        let mut control = _setup_loop(&protocol, console, &Config::default());
        for _ in 0..3 {
            control.tick().unwrap();
        }
        assert_eq!(control.status().angles, [91, 90]);
        assert_eq!(protocol.writes_on(0), vec![150]);
        assert_eq!(protocol.writes_on(1), vec![150, 151, 150, 151]);
    }

    #[test]
    fn test_unmapped_key_and_idle_poll_do_not_write() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::new([Some(Key::Char('x')), None, Some(Key::Other)]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        let before = protocol.writes();
        for _ in 0..3 {
            assert_eq!(control.tick().unwrap(), LoopState::Running);
        }
        assert_eq!(control.status().angles, [90, 90]);
        assert_eq!(protocol.writes(), before);
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::keys([Key::Up, Key::Char('q'), Key::Up]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        control.run().unwrap();
        assert_eq!(control.get_state(), LoopState::Stopped);
        assert_eq!(control.status().angles, [91, 90]);
        // The key after quit is never read.
        assert_eq!(control.get_console().polls, 2);
        // Stopped is terminal.
        assert_eq!(control.tick().unwrap(), LoopState::Stopped);
        assert_eq!(control.get_console().polls, 2);
    }

    #[test]
    fn test_interrupt_stops_the_loop() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::keys([Key::Interrupt]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        control.run().unwrap();
        assert_eq!(control.get_state(), LoopState::Stopped);
    }

    #[test]
    fn test_redraw_every_poll() {
        let protocol = MockPwm::default();
        let console = ScriptedConsole::new([None, None, Some(Key::Right), Some(Key::Char('q'))]);
        let mut control = _setup_loop(&protocol, console, &Config::default());
        control.run().unwrap();
        let frames = &control.get_console().frames;
        // Initial draw + one per poll (idle polls included), none after quit.
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].angles, [90, 90]);
        assert_eq!(frames[3].angles, [90, 91]);
    }

    #[test]
    fn test_redraw_on_change() {
        let protocol = MockPwm::default();
        let config = Config {
            redraw: RedrawPolicy::OnChange,
            ..Config::default()
        };
        let console = ScriptedConsole::new([
            None,
            None,
            Some(Key::Up),
            Some(Key::Char('x')),
            Some(Key::Char('q')),
        ]);
        let mut control = _setup_loop(&protocol, console, &config);
        control.run().unwrap();
        let frames = &control.get_console().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].angles, [91, 90]);
    }

    #[test]
    fn test_redraw_interval() {
        let protocol = MockPwm::default();
        let config = Config {
            redraw: RedrawPolicy::Interval(Duration::from_secs(3600)),
            ..Config::default()
        };
        let console = ScriptedConsole::new([None, Some(Key::Left), None, Some(Key::Char('q'))]);
        let mut control = _setup_loop(&protocol, console, &config);
        control.run().unwrap();
        assert_eq!(control.get_console().frames.len(), 2);

        let config = Config {
            redraw: RedrawPolicy::Interval(Duration::ZERO),
            ..Config::default()
        };
        let console = ScriptedConsole::new([None, None, Some(Key::Char('q'))]);
        let mut control = _setup_loop(&protocol, console, &config);
        control.run().unwrap();
        assert_eq!(control.get_console().frames.len(), 3);
    }

    #[test]
    fn test_custom_step() {
        let protocol = MockPwm::default();
        let config = Config {
            step: 5,
            ..Config::default()
        };
        let console = ScriptedConsole::keys(vec![Key::Right; 20]);
        let mut control = _setup_loop(&protocol, console, &config);
        for _ in 0..20 {
            control.tick().unwrap();
        }
        assert_eq!(control.status().angles, [90, 180]);
    }

    #[test]
    fn test_console_failure_propagates() {
        let protocol = MockPwm::default();
        let mut control = _setup_loop(&protocol, ScriptedConsole::keys([]), &Config::default());
        let result = control.run();
        assert_eq!(
            format!("{}", result.unwrap_err()),
            "Terminal error: script exhausted."
        );
    }
}
