//! Defines the trait used to drive hardware PWM channels.

use std::any::type_name;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use dyn_clone::DynClone;
use parking_lot::RwLock;

use crate::config::PwmConfig;
use crate::errors::*;
use crate::io::PwmData;

// Makes a Box<dyn PwmProtocol> clone (used to hand the protocol to devices).
dyn_clone::clone_trait_object!(PwmProtocol);

/// Defines the trait all PWM drivers must implement.
///
/// Clones of a protocol act on the same hardware and share the same [`PwmData`].
pub trait PwmProtocol: DynClone + Send + Sync + Debug + Display {
    // ########################################
    // Inner data related functions

    fn get_data(&self) -> &Arc<RwLock<PwmData>>;

    /// Returns the protocol name (used for Display only)
    fn get_protocol_name(&self) -> &'static str {
        type_name::<Self>().split("::").last().unwrap_or("PwmProtocol")
    }

    // ########################################
    // Subsystem lifecycle.

    /// Brings up the PWM subsystem. This is a process-wide step: it must run once before any
    /// channel is initialized, and calling it again is a no-op.
    fn open(&mut self) -> Result<(), Error>;
    /// Disables and releases every configured channel.
    fn close(&mut self) -> Result<(), Error>;
    /// Checks if the subsystem has been opened.
    fn is_connected(&self) -> bool;

    // ########################################
    // Channels

    /// Configures `channel` for PWM output: mode, clock divisor and range from `config`.
    /// Must be called once per channel before any write.
    fn initialize(&mut self, channel: u8, config: &PwmConfig) -> Result<(), Error>;

    /// Writes the `duty` (in ticks) of `channel`. No bounds checking is performed at this level.
    fn write_duty(&mut self, channel: u8, duty: u16) -> Result<(), Error>;

    /// Writes a duty of 0 to `channel`: no pulse, the servo is de-energized.
    fn zero(&mut self, channel: u8) -> Result<(), Error> {
        self.write_duty(channel, 0)
    }
}
