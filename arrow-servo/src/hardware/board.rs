use std::fmt::{Display, Formatter};

use log::{trace, warn};

use crate::errors::Error;
use crate::io::PwmProtocol;

/// Represents the board hosting the PWM peripheral (a Raspberry Pi most-likely) where
/// [`Servo`](crate::devices::Servo)s are attached.
/// The board gives access to the PWM channels through a [`PwmProtocol`].
#[derive(Debug)]
pub struct Board {
    /// The inner protocol used by this Board.
    protocol: Box<dyn PwmProtocol>,
}

#[cfg(feature = "rppal")]
impl Default for Board {
    /// Creates a board using the Raspberry Pi hardware PWM ([`RaspberryPwm`](crate::io::RaspberryPwm)).
    ///
    /// **_/!\ The PWM subsystem is NOT brought up until the [`Board::open`] method is called._**
    fn default() -> Self {
        Self::new(crate::io::RaspberryPwm::default())
    }
}

impl Board {
    /// Creates a board using a given protocol.
    pub fn new<P: PwmProtocol + 'static>(protocol: P) -> Self {
        Self {
            protocol: Box::new(protocol),
        }
    }

    /// Returns the protocol used.
    ///
    /// Used in [`Servo::new()`](crate::devices::Servo::new) to clone the protocol into the device.
    pub fn get_protocol(&self) -> Box<dyn PwmProtocol> {
        self.protocol.clone()
    }

    /// Brings up the PWM subsystem. This is the one process-wide initialization step: it must happen
    /// before any channel is configured and does nothing if already done.
    pub fn open(&mut self) -> Result<&Self, Error> {
        if !self.protocol.is_connected() {
            self.protocol.open()?;
            trace!("Board is ready: {}", self.protocol);
        }
        Ok(self)
    }

    /// Releases every configured PWM channel.
    pub fn close(&mut self) -> Result<&Self, Error> {
        self.protocol.close()?;
        trace!("Board is closed");
        Ok(self)
    }

    /// Checks if the PWM subsystem has been brought up.
    pub fn is_connected(&self) -> bool {
        self.protocol.is_connected()
    }

    /// Creates a guard that zeroes the given `channels` and releases the board when dropped.
    ///
    /// Create it before anything that can fail: the channels are then driven to a safe state on
    /// every exit path (early return, error propagation or panic).
    pub fn shutdown_guard<C: Into<Vec<u8>>>(&self, channels: C) -> SafeShutdown {
        SafeShutdown {
            protocol: self.get_protocol(),
            channels: channels.into(),
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board ({})", self.protocol)
    }
}

/// Zeroes a set of PWM channels, then closes the protocol, when dropped.
///
/// Every channel is attempted even if another one fails: failures are only logged.
#[derive(Debug)]
pub struct SafeShutdown {
    protocol: Box<dyn PwmProtocol>,
    channels: Vec<u8>,
}

impl SafeShutdown {
    /// Returns the channels zeroed on drop.
    pub fn get_channels(&self) -> &[u8] {
        &self.channels
    }
}

impl Drop for SafeShutdown {
    fn drop(&mut self) {
        for channel in &self.channels {
            match self.protocol.zero(*channel) {
                Ok(()) => trace!("PWM{} zeroed", channel),
                Err(err) => warn!("Could not zero PWM{}: {}", channel, err),
            }
        }
        if let Err(err) = self.protocol.close() {
            warn!("Could not close the PWM subsystem: {}", err);
        }
    }
}
