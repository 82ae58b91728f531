//! WM8731 stereo codec (Cirrus Logic / Wolfson)
//!
//! Register map and command encoding live in [`registers`]; the async
//! control-bus driver in [`driver`] is HAL-agnostic and host-testable.

pub mod registers;

mod driver;

pub use driver::Wm8731;
