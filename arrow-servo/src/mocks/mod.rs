//! Mocked hardware and terminal (useful for tests mostly).

pub mod console;
pub mod pwm;

pub use console::ScriptedConsole;
pub use pwm::MockPwm;
