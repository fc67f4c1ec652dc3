#![doc(html_root_url = "https://docs.rs/arrow-servo/0.1.0")]

//! <h1 align="center">ARROW-SERVO - Keyboard driven hobby servos</h1>
//!
//! **Arrow-Servo** drives two hobby servos (MG90S or any servo following the 0.5ms-2.5ms pulse
//! convention) from the keyboard arrow keys, through the hardware PWM of a Raspberry Pi, while a
//! status screen shows the angle of each servo.
//!
//! - Servo 1 follows the Up/Down keys, servo 2 the Left/Right keys, one degree per press.
//! - `q` (or Ctrl-C) quits: both channels are then driven to a zero duty cycle.
//!
//! # Prerequisites
//!
//! - Enable both PWM channels: add `dtoverlay=pwm-2chan` to `/boot/config.txt` and reboot.
//! - Wire servo 1 signal to BCM GPIO19 (physical pin 35) and servo 2 signal to BCM GPIO18
//!   (physical pin 12). Power the servos from a separate supply sharing the Pi ground.
//!
//! # Getting Started
//!
//! ```no_run
//! use arrow_servo::config::Config;
//!
//! fn main() {
//!     if let Err(err) = arrow_servo::run(&Config::default()) {
//!         eprintln!("{}", err);
//!     }
//! }
//! ```
//!
//! Every wiring and calibration value is part of [`Config`](config::Config): a servo with a
//! different pulse range, or another channel, only needs a different configuration.
//!
//! # Feature flags
//!
//! - **rppal** -- (enabled by default) Raspberry Pi hardware PWM through the `rppal` crate.
//! - **serde** -- Enables serialize/deserialize capabilities for the configuration.
//! - **mocks** -- Provides a mocked PWM driver and a scripted console (useful for tests mostly).

pub mod config;
pub mod console;
pub mod control;
pub mod devices;
pub mod errors;
pub mod hardware;
pub mod io;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod session;
pub mod utils;

#[cfg(feature = "rppal")]
pub use session::run;
pub use session::run_with;
