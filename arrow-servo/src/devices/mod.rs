//! Defines the devices that can be attached to a [`Board`](crate::hardware::Board).

pub use crate::devices::servo::Servo;

mod servo;
