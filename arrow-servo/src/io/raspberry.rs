use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use log::{trace, warn};
use parking_lot::{Mutex, RwLock};
use rppal::pwm::{Channel, Polarity, Pwm};
use rppal::system::DeviceInfo;

use crate::config::{PwmConfig, PwmMode};
use crate::errors::Error;
use crate::errors::HardwareError::{
    IncompatibleMode, InitFailed, NotInitialized, UnknownChannel, WriteFailed,
};
use crate::io::{PwmData, PwmProtocol};

/// Outcome of the process-wide PWM subsystem bring-up: the detected platform, or why it failed.
static SUBSYSTEM: OnceLock<Result<String, String>> = OnceLock::new();

/// Raspberry Pi hardware PWM, through the kernel `pwm` sysfs interface.
///
/// Channel 0 is PWM0 (BCM GPIO18, physical pin 12), channel 1 is PWM1 (BCM GPIO19, physical pin 35).
/// Both require the `pwm-2chan` overlay to be enabled in `/boot/config.txt`.
#[derive(Clone, Default)]
pub struct RaspberryPwm {
    connected: bool,
    data: Arc<RwLock<PwmData>>,
    outputs: Arc<Mutex<HashMap<u8, Pwm>>>,
}

impl RaspberryPwm {
    /// Maps a channel id to the matching rppal channel.
    fn hardware_channel(channel: u8) -> Result<Channel, Error> {
        match channel {
            0 => Ok(Channel::Pwm0),
            1 => Ok(Channel::Pwm1),
            _ => Err(UnknownChannel { channel }.into()),
        }
    }
}

impl Debug for RaspberryPwm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaspberryPwm")
            .field("connected", &self.connected)
            .field("data", &*self.data.read())
            .finish()
    }
}

impl Display for RaspberryPwm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = self.data.read();
        write!(
            f,
            "{} [platform={}, channels={}]",
            self.get_protocol_name(),
            data.platform,
            data.channels.len(),
        )
    }
}

impl PwmProtocol for RaspberryPwm {
    fn get_data(&self) -> &Arc<RwLock<PwmData>> {
        &self.data
    }

    fn open(&mut self) -> Result<(), Error> {
        if self.connected {
            return Ok(());
        }
        let subsystem = SUBSYSTEM.get_or_init(|| {
            DeviceInfo::new()
                .map(|info| info.model().to_string())
                .map_err(|err| err.to_string())
        });
        match subsystem {
            Ok(platform) => {
                trace!("PWM subsystem is ready on: {}", platform);
                self.data.write().platform = platform.clone();
                self.connected = true;
                Ok(())
            }
            Err(info) => Err(InitFailed { info: info.clone() }.into()),
        }
    }

    fn close(&mut self) -> Result<(), Error> {
        let mut outputs = self.outputs.lock();
        for (channel, pwm) in outputs.drain() {
            if let Err(err) = pwm.disable() {
                warn!("Could not disable PWM{}: {}", channel, err);
            }
            if let Ok(info) = self.data.write().get_channel_mut(channel) {
                info.enabled = false;
            }
        }
        self.connected = false;
        trace!("PWM subsystem is closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn initialize(&mut self, channel: u8, config: &PwmConfig) -> Result<(), Error> {
        if !self.connected {
            return Err(NotInitialized.into());
        }
        // The sysfs interface only drives fixed-frequency (mark-space) waveforms.
        if config.mode != PwmMode::MarkSpace {
            return Err(IncompatibleMode {
                channel,
                mode: config.mode,
                context: "initialize a hardware PWM channel",
            }
            .into());
        }

        let pwm = Pwm::with_period(
            Self::hardware_channel(channel)?,
            config.period(),
            Duration::ZERO,
            Polarity::Normal,
            true,
        )
        .map_err(|err| InitFailed {
            info: format!("PWM{}: {}", channel, err),
        })?;
        trace!(
            "PWM{} configured: {}Hz, range={}, clock divisor={}",
            channel,
            config.frequency,
            config.range,
            config.clock_divisor()
        );

        self.outputs.lock().insert(channel, pwm);
        self.data.write().register(channel, *config);
        Ok(())
    }

    fn write_duty(&mut self, channel: u8, duty: u16) -> Result<(), Error> {
        let config = self.data.read().get_channel(channel)?.config;
        {
            let outputs = self.outputs.lock();
            let pwm = outputs.get(&channel).ok_or(UnknownChannel { channel })?;
            pwm.set_pulse_width(config.pulse_width(duty))
                .map_err(|err| WriteFailed {
                    channel,
                    info: err.to_string(),
                })?;
        }
        self.data.write().get_channel_mut(channel)?.duty = duty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_channel() {
        assert_eq!(RaspberryPwm::hardware_channel(0).unwrap(), Channel::Pwm0);
        assert_eq!(RaspberryPwm::hardware_channel(1).unwrap(), Channel::Pwm1);
        assert!(RaspberryPwm::hardware_channel(7).is_err());
    }

    #[test]
    fn test_initialize_requires_open() {
        let mut pwm = RaspberryPwm::default();
        assert!(!pwm.is_connected());
        let result = pwm.initialize(0, &PwmConfig::default());
        assert_eq!(
            format!("{}", result.unwrap_err()),
            "Hardware error: PWM subsystem has not been initialized."
        );
    }

    #[test]
    fn test_write_unknown_channel() {
        let mut pwm = RaspberryPwm::default();
        assert!(pwm.write_duty(0, 150).is_err());
        assert!(pwm.zero(1).is_err());
    }

    #[test]
    fn test_display() {
        let pwm = RaspberryPwm::default();
        assert_eq!(format!("{}", pwm), "RaspberryPwm [platform=, channels=0]");
    }
}
