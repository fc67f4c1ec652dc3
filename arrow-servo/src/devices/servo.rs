use std::fmt::{Display, Formatter};

use log::trace;

use crate::config::ServoConfig;
use crate::errors::Error;
use crate::hardware::Board;
use crate::io::{PwmChannel, PwmProtocol};
use crate::utils::{Range, Scalable};

/// Represents a hobby Servo controlled by a hardware PWM channel.
#[derive(Clone, Debug)]
pub struct Servo {
    // ########################################
    // # Basics
    /// The PWM channel (id) used to control the Servo.
    channel: u8,
    /// The current Servo angle (in degrees).
    state: u16,
    /// The Servo default angle (default: 90).
    default: u16,

    // ########################################
    // # Settings
    /// The servo range limitation in the physical world (default: [0, 180]).
    range: Range<u16>,
    /// The servo duty cycle range (in ticks) for control (default: [50, 250]).
    duty_range: Range<u16>,
    /// The servo theoretical degree of movement (default: [0, 180]).
    degree_range: Range<u16>,
    /// Specifies if the servo command is inverted (default: false).
    inverted: bool,

    // ########################################
    // # Volatile utility data.
    protocol: Box<dyn PwmProtocol>,
}

impl Servo {
    /// Creates an instance of a Servo attached to a given board: configures its PWM channel and
    /// moves it to its default position.
    ///
    /// # Errors
    /// * `NotInitialized`: the board has not been opened.
    /// * `UnknownChannel`: the channel does not exist on this board.
    /// * `IncompatibleMode`: the channel does not support the requested PWM mode.
    pub fn new(board: &Board, config: &ServoConfig) -> Result<Self, Error> {
        let degree_range = config.degree_range.ordered();
        let range = config.range.ordered().within(degree_range);

        let mut servo = Self {
            channel: config.channel,
            state: config.default,
            default: range.clamp(config.default),
            range,
            duty_range: config.duty_range(),
            degree_range,
            inverted: config.inverted,
            protocol: board.get_protocol(),
        };

        servo.protocol.initialize(servo.channel, &config.pwm)?;
        servo.to(servo.default)?;
        trace!("Servo attached: {}", servo);
        Ok(servo)
    }

    /// Moves the servo to the requested position (clamped in its range) at max speed.
    pub fn to(&mut self, to: u16) -> Result<&Self, Error> {
        let angle = self.range.clamp(to);
        self.protocol.write_duty(self.channel, self.duty_for(angle))?;
        self.state = angle;
        Ok(self)
    }

    /// Moves the servo by `delta` degrees, saturating at both ends of its range.
    pub fn nudge(&mut self, delta: i32) -> Result<&Self, Error> {
        let target = (self.state as i32 + delta).clamp(self.range.start as i32, self.range.end as i32);
        self.to(target as u16)
    }

    /// Resets the servo to its default position.
    pub fn reset(&mut self) -> Result<&Self, Error> {
        self.to(self.default)
    }

    /// Stops sending pulses: the servo is de-energized and its position is no longer held.
    pub fn detach(&mut self) -> Result<&Self, Error> {
        self.protocol.zero(self.channel)?;
        Ok(self)
    }

    /// Returns the duty cycle (in ticks) matching `angle`.
    ///
    /// `angle` is linearly mapped from `degree_range` onto `duty_range` (reversed when inverted)
    /// and rounded to the nearest tick.
    pub fn duty_for(&self, angle: u16) -> u16 {
        let (from, to) = match self.inverted {
            false => (self.degree_range.start, self.degree_range.end),
            true => (self.degree_range.end, self.degree_range.start),
        };
        (angle as f64)
            .scale(
                from as f64,
                to as f64,
                self.duty_range.start as f64,
                self.duty_range.end as f64,
            )
            .round() as u16
    }

    // ########################################
    // Setters and Getters.

    /// Returns the PWM channel (id) used by the device.
    pub fn get_channel(&self) -> u8 {
        self.channel
    }

    /// Returns [`PwmChannel`] information.
    pub fn get_channel_info(&self) -> Result<PwmChannel, Error> {
        let lock = self.protocol.get_data().read();
        Ok(lock.get_channel(self.channel)?.clone())
    }

    /// Returns the current angle (in degrees).
    pub fn get_angle(&self) -> u16 {
        self.state
    }

    /// Returns the default angle (in degrees).
    pub fn get_default(&self) -> u16 {
        self.default
    }

    /// Returns the duty cycle (in ticks) matching the current angle.
    pub fn duty(&self) -> u16 {
        self.duty_for(self.state)
    }

    /// Returns the servo motion range limitation in degree.
    pub fn get_range(&self) -> Range<u16> {
        self.range
    }

    /// Sets the Servo motion range limitation in degree. This guarantee the servo to stays in the given
    /// range at any time.
    ///
    /// - No matter the order given, the range will always have min <= max
    /// - No matter the values given, the range will always stay within the Servo `degree_range`.
    pub fn set_range<R: Into<Range<u16>>>(mut self, range: R) -> Self {
        self.range = range.into().ordered().within(self.degree_range);
        self.default = self.range.clamp(self.default);
        self
    }

    /// Returns the theoretical range of degrees of movement for the servo.
    pub fn get_degree_range(&self) -> Range<u16> {
        self.degree_range
    }

    /// Sets the theoretical range of degrees of movement for the servo (some servos can range from 0 to 90°, 180°, 270°, etc.).
    ///
    /// This may impact the `range` since it will always stay within the given `degree_range`.
    pub fn set_degree_range<R: Into<Range<u16>>>(mut self, degree_range: R) -> Self {
        self.degree_range = degree_range.into().ordered();
        self.range = self.range.within(self.degree_range);
        self.default = self.range.clamp(self.default);
        self
    }

    /// Returns the duty cycle range (in ticks) the servo responds to.
    pub fn get_duty_range(&self) -> Range<u16> {
        self.duty_range
    }

    /// Returns if the servo command is set to be inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Sets the servo command inversion mode.
    pub fn set_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }
}

impl Display for Servo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SERVO (channel={}) [angle={}, duty={}, range={}-{}]",
            self.channel,
            self.state,
            self.duty(),
            self.range.start,
            self.range.end
        )
    }
}
