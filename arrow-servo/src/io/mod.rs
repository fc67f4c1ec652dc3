//! Defines the drivers used to output PWM signals on hardware channels.

mod data;
mod protocol;
#[cfg(feature = "rppal")]
mod raspberry;

pub use data::*;
pub use protocol::*;
#[cfg(feature = "rppal")]
pub use raspberry::RaspberryPwm;
