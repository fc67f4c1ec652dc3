//! Hardware identifiers, servo calibration and session settings.
//!
//! Every value the session depends on lives here as plain data, so a different servo model or a
//! different wiring only requires a different [`Config`].

use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::utils::{Range, Scalable};

/// Base clock feeding the Raspberry Pi PWM peripheral.
pub const PWM_BASE_CLOCK_HZ: f64 = 19_200_000.0;
/// Hobby servos expect a 50Hz frame (20ms).
pub const DEFAULT_PWM_FREQUENCY: f64 = 50.0;
/// Number of ticks in one PWM period.
pub const DEFAULT_PWM_RANGE: u16 = 2000;
/// MG90S pulse widths (in microseconds) for 0° and 180°.
pub const DEFAULT_PULSE_RANGE: [u32; 2] = [500, 2500];
pub const DEFAULT_DEGREE_RANGE: [u16; 2] = [0, 180];
/// Neutral (centered) position.
pub const DEFAULT_ANGLE: u16 = 90;
/// PWM1 (BCM GPIO19, physical pin 35).
pub const SERVO1_CHANNEL: u8 = 1;
/// PWM0 (BCM GPIO18, physical pin 12).
pub const SERVO2_CHANNEL: u8 = 0;
pub const DEFAULT_INPUT_TIMEOUT: Duration = Duration::from_millis(100);

/// PWM waveform mode.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PwmMode {
    /// Fixed frequency, variable high-time: what servos expect.
    #[default]
    MarkSpace,
    /// Pulses spread evenly over the period.
    Balanced,
}

impl Display for PwmMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PwmMode::MarkSpace => "MarkSpace",
            PwmMode::Balanced => "Balanced",
        };
        write!(f, "{}", name)
    }
}

/// Configuration of one hardware PWM channel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PwmConfig {
    /// The PWM frequency in Hz (default: 50Hz).
    pub frequency: f64,
    /// The number of ticks per period (default: 2000).
    pub range: u16,
    /// The waveform mode (default: MarkSpace).
    pub mode: PwmMode,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_PWM_FREQUENCY,
            range: DEFAULT_PWM_RANGE,
            mode: PwmMode::default(),
        }
    }
}

impl PwmConfig {
    /// Returns the duration of one PWM period.
    pub fn period(&self) -> Duration {
        Duration::from_nanos((1_000_000_000.0 / self.frequency).round() as u64)
    }

    /// Returns the clock divisor giving `frequency` with `range` ticks per period.
    pub fn clock_divisor(&self) -> u32 {
        (PWM_BASE_CLOCK_HZ / (self.frequency * self.range as f64)).round() as u32
    }

    /// Returns the pulse width (high-time) of a `duty` tick count.
    pub fn pulse_width(&self, duty: u16) -> Duration {
        let period = self.period().as_nanos() as u64;
        Duration::from_nanos(period * duty as u64 / self.range as u64)
    }

    /// Converts a pulse width in microseconds to a tick count.
    pub fn ticks_for_pulse(&self, pulse_us: u32) -> u16 {
        let period_us = self.period().as_micros() as f64;
        (pulse_us as f64)
            .scale(0.0, period_us, 0.0, self.range as f64)
            .round() as u16
    }
}

/// Configuration of one servo: wiring and calibration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServoConfig {
    /// The PWM channel driving the servo.
    pub channel: u8,
    /// The PWM channel configuration.
    pub pwm: PwmConfig,
    /// Pulse widths (µs) matching both ends of `degree_range` (default: [500, 2500]).
    pub pulse_range: Range<u32>,
    /// The theoretical degrees of movement of the servo (default: [0, 180]).
    pub degree_range: Range<u16>,
    /// The motion limitation within `degree_range` (default: [0, 180]).
    pub range: Range<u16>,
    /// The position applied at startup (default: 90).
    pub default: u16,
    /// Inverts the command direction (default: false).
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
}

impl ServoConfig {
    /// Creates the default configuration for a servo on `channel`.
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            pwm: PwmConfig::default(),
            pulse_range: Range::from(DEFAULT_PULSE_RANGE),
            degree_range: Range::from(DEFAULT_DEGREE_RANGE),
            range: Range::from(DEFAULT_DEGREE_RANGE),
            default: DEFAULT_ANGLE,
            inverted: false,
        }
    }

    /// Returns the duty cycle range (in ticks) matching `pulse_range`.
    pub fn duty_range(&self) -> Range<u16> {
        Range {
            start: self.pwm.ticks_for_pulse(self.pulse_range.start),
            end: self.pwm.ticks_for_pulse(self.pulse_range.end),
        }
    }
}

/// When the status screen is redrawn.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawPolicy {
    /// After every input poll, idle or not (heartbeat redraw).
    #[default]
    EveryPoll,
    /// Only after a key press.
    OnChange,
    /// After a key press, and at least once per interval while idle.
    Interval(Duration),
}

impl RedrawPolicy {
    /// Decides whether to redraw, given if a key was handled and the time since the last draw.
    pub fn should_redraw(&self, changed: bool, since_last_draw: Duration) -> bool {
        match self {
            RedrawPolicy::EveryPoll => true,
            RedrawPolicy::OnChange => changed,
            RedrawPolicy::Interval(interval) => changed || since_last_draw >= *interval,
        }
    }
}

/// Session configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Servo 1 (up/down keys) and servo 2 (left/right keys).
    pub servos: [ServoConfig; 2],
    /// Bounded wait for a key on each poll (default: 100ms).
    pub input_timeout: Duration,
    /// When to redraw the status screen (default: every poll).
    pub redraw: RedrawPolicy,
    /// Degrees moved per key press (default: 1).
    pub step: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            servos: [
                ServoConfig::new(SERVO1_CHANNEL),
                ServoConfig::new(SERVO2_CHANNEL),
            ],
            input_timeout: DEFAULT_INPUT_TIMEOUT,
            redraw: RedrawPolicy::default(),
            step: 1,
        }
    }
}

impl Config {
    /// Returns the channel ids of both servos.
    pub fn channels(&self) -> Vec<u8> {
        self.servos.iter().map(|servo| servo.channel).collect()
    }
}
