//! Defines the pieces of hardware the servos are attached to.

mod board;

pub use board::{Board, SafeShutdown};
