use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;
use crate::errors::TerminalError::IoException;
use crate::config::PwmMode;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Hardware error: {source}.
    HardwareError { source: HardwareError },
    /// Terminal error: {source}.
    TerminalError { source: TerminalError },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        error!("std::io error {:?}", error);
        let info = match error.kind() {
            std::io::ErrorKind::NotFound => String::from("No terminal attached"),
            _ => error.to_string(),
        };
        Self::TerminalError {
            source: IoException { info },
        }
    }
}

impl From<HardwareError> for Error {
    fn from(value: HardwareError) -> Self {
        Self::HardwareError { source: value }
    }
}

impl From<TerminalError> for Error {
    fn from(value: TerminalError) -> Self {
        Self::TerminalError { source: value }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HardwareError {
    /// PWM subsystem could not be initialized - {info}
    InitFailed { info: String },
    /// PWM subsystem has not been initialized
    NotInitialized,
    /// Unknown PWM channel {channel}
    UnknownChannel { channel: u8 },
    /// Channel ({channel}) not compatible with mode ({mode}) - {context}
    IncompatibleMode {
        channel: u8,
        mode: PwmMode,
        context: &'static str,
    },
    /// Duty cycle write failed on channel {channel} - {info}
    WriteFailed { channel: u8, info: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TerminalError {
    /// {info}
    IoException { info: String },
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::HardwareError::{IncompatibleMode, InitFailed, UnknownChannel};

    use super::*;

    #[test]
    fn test_error_display() {
        let hardware_error = Error::from(InitFailed {
            info: "no PWM chip".to_string(),
        });
        assert_eq!(
            format!("{}", hardware_error),
            "Hardware error: PWM subsystem could not be initialized - no PWM chip."
        );

        let mode_error = Error::from(IncompatibleMode {
            channel: 1,
            mode: PwmMode::Balanced,
            context: "test context",
        });
        assert_eq!(
            format!("{}", mode_error),
            "Hardware error: Channel (1) not compatible with mode (Balanced) - test context."
        );

        let terminal_error = Error::from(IoException {
            info: "I/O error message".to_string(),
        });
        assert_eq!(
            format!("{}", terminal_error),
            "Terminal error: I/O error message."
        );

        let unknown_error = Unknown {
            info: "Some unknown error".to_string(),
        };
        assert_eq!(
            format!("{}", unknown_error),
            "Unknown error: Some unknown error."
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "no tty");
        let error: Error = io_error.into();
        assert_eq!(format!("{}", error), "Terminal error: No terminal attached.");

        let io_error = io::Error::new(io::ErrorKind::Other, "broken pipe");
        let error: Error = io_error.into();
        assert_eq!(format!("{}", error), "Terminal error: broken pipe.");
    }

    #[test]
    fn test_from_hardware_error() {
        let error: Error = UnknownChannel { channel: 42 }.into();
        assert_eq!(format!("{}", error), "Hardware error: Unknown PWM channel 42.");

        let error: Error = HardwareError::NotInitialized.into();
        assert_eq!(
            format!("{}", error),
            "Hardware error: PWM subsystem has not been initialized."
        );
    }
}
