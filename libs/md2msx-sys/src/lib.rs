#![cfg_attr(not(test), no_std)]

//! Bindings to the ATmega328P peripherals used by the adapter, and the
//! small capability traits the rest of the firmware is written against.

pub mod delay;
pub mod interrupt;
pub mod pin;
pub mod ports;
pub mod timer;

pub use pin::{Pin, PinBank, Port};
pub use ports::{Atmega328p, Gpio};
pub use timer::{IntervalTimer, Timer1, Timer2};

/// Frequency of the system clock on the supported boards (Arduino Nano).
pub const F_CPU: u32 = 16_000_000;
