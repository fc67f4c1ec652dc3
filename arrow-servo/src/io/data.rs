use std::fmt::{Display, Formatter};

use crate::config::PwmConfig;
use crate::errors::{Error, HardwareError};

/// Bookkeeping shared by every clone of a [`PwmProtocol`](crate::io::PwmProtocol).
#[derive(Clone, Debug, Default)]
pub struct PwmData {
    /// Name of the platform hosting the PWM peripheral (known once opened).
    pub platform: String,
    /// The configured channels.
    pub channels: Vec<PwmChannel>,
}

/// Represents a configured hardware PWM channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PwmChannel {
    /// The channel id.
    pub id: u8,
    /// The configuration the channel was initialized with.
    pub config: PwmConfig,
    /// The last duty cycle (in ticks) written.
    pub duty: u16,
    /// Whether the channel output is enabled.
    pub enabled: bool,
}

impl PwmData {
    /// Retrieves a reference to a channel by its id.
    ///
    /// # Errors
    /// * `UnknownChannel`: the channel has not been initialized.
    pub fn get_channel(&self, id: u8) -> Result<&PwmChannel, Error> {
        self.channels
            .iter()
            .find(|channel| channel.id == id)
            .ok_or(Error::from(HardwareError::UnknownChannel { channel: id }))
    }

    /// Retrieves a mutable reference to a channel by its id.
    ///
    /// # Errors
    /// * `UnknownChannel`: the channel has not been initialized.
    pub fn get_channel_mut(&mut self, id: u8) -> Result<&mut PwmChannel, Error> {
        self.channels
            .iter_mut()
            .find(|channel| channel.id == id)
            .ok_or(Error::from(HardwareError::UnknownChannel { channel: id }))
    }

    /// Registers (or re-registers) a channel with the given configuration; duty starts at 0.
    pub fn register(&mut self, id: u8, config: PwmConfig) {
        let channel = PwmChannel {
            id,
            config,
            duty: 0,
            enabled: true,
        };
        match self.get_channel_mut(id) {
            Ok(existing) => *existing = channel,
            Err(_) => self.channels.push(channel),
        }
    }
}

impl Display for PwmChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PWM{} [duty={}/{}, {}Hz, {}, enabled={}]",
            self.id,
            self.duty,
            self.config.range,
            self.config.frequency,
            self.config.mode,
            self.enabled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get_channel() {
        let mut data = PwmData::default();
        assert!(data.get_channel(0).is_err());

        data.register(0, PwmConfig::default());
        let channel = data.get_channel(0).unwrap();
        assert_eq!(channel.id, 0);
        assert_eq!(channel.duty, 0);
        assert!(channel.enabled);

        data.get_channel_mut(0).unwrap().duty = 150;
        assert_eq!(data.get_channel(0).unwrap().duty, 150);

        // Re-registering resets the channel instead of duplicating it.
        data.register(0, PwmConfig::default());
        assert_eq!(data.channels.len(), 1);
        assert_eq!(data.get_channel(0).unwrap().duty, 0);
    }

    #[test]
    fn test_unknown_channel() {
        let data = PwmData::default();
        let error = data.get_channel(3).unwrap_err();
        assert_eq!(format!("{}", error), "Hardware error: Unknown PWM channel 3.");
    }

    #[test]
    fn test_channel_display() {
        let mut data = PwmData::default();
        data.register(1, PwmConfig::default());
        data.get_channel_mut(1).unwrap().duty = 150;
        assert_eq!(
            format!("{}", data.get_channel(1).unwrap()),
            "PWM1 [duty=150/2000, 50Hz, MarkSpace, enabled=true]"
        );
    }
}
