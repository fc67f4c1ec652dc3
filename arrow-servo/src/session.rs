//! Wires a board, two servos and a console into one interactive session.

use log::debug;

use crate::config::Config;
use crate::console::Console;
use crate::control::ControlLoop;
use crate::devices::Servo;
use crate::errors::Error;
use crate::hardware::Board;
use crate::io::PwmProtocol;

/// Runs a session on the Raspberry Pi hardware PWM and the process terminal.
///
/// Returns once the quit key is pressed, or on the first error. In both cases, both servo channels
/// have been zeroed and the terminal restored when this function returns.
#[cfg(feature = "rppal")]
pub fn run(config: &Config) -> Result<(), Error> {
    run_with(
        config,
        crate::io::RaspberryPwm::default(),
        crate::console::CrosstermConsole::new,
    )
}

/// Runs a session using the given PWM `protocol`, and the console built by `console`.
///
/// The console is only built once both servos are centered, and it is dropped (restoring the
/// terminal) before the channels are zeroed.
pub fn run_with<P, C, F>(config: &Config, protocol: P, console: F) -> Result<(), Error>
where
    P: PwmProtocol + 'static,
    C: Console,
    F: FnOnce() -> Result<C, Error>,
{
    let mut board = Board::new(protocol);
    let _shutdown = board.shutdown_guard(config.channels());

    board.open()?;
    let servos = [
        Servo::new(&board, &config.servos[0])?,
        Servo::new(&board, &config.servos[1])?,
    ];
    debug!("Servos centered: {}, {}", servos[0], servos[1]);

    let mut control = ControlLoop::new(console()?, servos, config);
    control.run()
}
