use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::PwmConfig;
use crate::errors::Error;
use crate::errors::HardwareError::{InitFailed, NotInitialized, WriteFailed};
use crate::io::{PwmData, PwmProtocol};

/// Mock implement for [`PwmProtocol`]: keeps every write in memory.
///
/// Clones share the same data and history, just like the real drivers share the hardware.
#[derive(Clone, Debug, Default)]
pub struct MockPwm {
    pub connected: bool,
    data: Arc<RwLock<PwmData>>,
    /// Every successful duty write, in order, as `(channel, duty)`.
    writes: Arc<RwLock<Vec<(u8, u16)>>>,
    /// Number of times the subsystem bring-up actually ran.
    opened: Arc<RwLock<usize>>,
    /// When set, opening the subsystem fails.
    fail_open: bool,
    /// Channels on which every write fails.
    failing_channels: Arc<RwLock<Vec<u8>>>,
}

impl MockPwm {
    /// Creates a mock whose subsystem bring-up fails.
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// Makes every subsequent write to `channel` fail.
    pub fn fail_channel(&self, channel: u8) {
        self.failing_channels.write().push(channel);
    }

    /// Returns every successful duty write, in order.
    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.writes.read().clone()
    }

    /// Returns the duty writes done on `channel`, in order.
    pub fn writes_on(&self, channel: u8) -> Vec<u16> {
        self.writes
            .read()
            .iter()
            .filter(|(id, _)| *id == channel)
            .map(|(_, duty)| *duty)
            .collect()
    }

    /// Returns the last duty written on `channel`, if any.
    pub fn last_duty(&self, channel: u8) -> Option<u16> {
        self.writes_on(channel).last().copied()
    }

    /// Returns how many times the subsystem bring-up ran.
    pub fn open_count(&self) -> usize {
        *self.opened.read()
    }
}

impl Display for MockPwm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
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

impl PwmProtocol for MockPwm {
    fn get_data(&self) -> &Arc<RwLock<PwmData>> {
        &self.data
    }

    fn open(&mut self) -> Result<(), Error> {
        if self.connected {
            return Ok(());
        }
        if self.fail_open {
            return Err(InitFailed {
                info: String::from("mocked failure"),
            }
            .into());
        }
        *self.opened.write() += 1;
        self.data.write().platform = String::from("mock");
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        for channel in self.data.write().channels.iter_mut() {
            channel.enabled = false;
        }
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn initialize(&mut self, channel: u8, config: &PwmConfig) -> Result<(), Error> {
        if !self.connected {
            return Err(NotInitialized.into());
        }
        self.data.write().register(channel, *config);
        Ok(())
    }

    fn write_duty(&mut self, channel: u8, duty: u16) -> Result<(), Error> {
        if self.failing_channels.read().contains(&channel) {
            return Err(WriteFailed {
                channel,
                info: String::from("mocked failure"),
            }
            .into());
        }
        self.data.write().get_channel_mut(channel)?.duty = duty;
        self.writes.write().push((channel, duty));
        Ok(())
    }
}
