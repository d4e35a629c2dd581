//! Edge-capture pulse timing for ultrasonic rangefinders.
//!
//! The measurement loop is split across three pieces: a [`CaptureUnit`]
//! wrapping whatever hardware timer latches a counter on an input edge, an
//! [`EchoTimer`] that turns pairs of edges into a pulse width, and an
//! [`Hcsr04`] sampler that fires the trigger pulse and converts the last
//! measured width into centimeters. Everything here is target-independent;
//! boards plug in by implementing [`CaptureTimer`].
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod capture;
pub mod hcsr04;
pub mod pulse;

pub use capture::{
    CaptureConfig, CaptureTimer, CaptureUnit, ClockPrescaler, EdgeCallback, EdgePolarity,
};
pub use hcsr04::Hcsr04;
pub use pulse::{EchoTimer, EdgePhase, PulseWidth};

#[cfg(test)]
mod sim;
