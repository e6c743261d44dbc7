#![cfg_attr(not(test), no_std)]

//! Presents a Mega Drive pad to an MSX joystick port.
//!
//! The MSX toggles pin 8 of its port to step through the cycles it wants to
//! read; the pad wants its own select line toggled at its own pace. The
//! `Bridge` answers every host cycle from the most recent pad samples while
//! sampling the pad in the gaps.

pub mod engine;
pub mod pins;

pub use engine::{Bridge, CycleOutcome, RoundEnd, CADENCE_WINDOW_US, WATCHDOG_WINDOW_US};
pub use pins::{BridgeConfig, Connector, ConnectorMap, PinError, PinRoles};
