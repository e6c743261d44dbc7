#![cfg_attr(target_arch = "avr", no_std)]

//! Firmware entry point: serve the MSX from the pad forever.

use md2msx_bridge::{BridgeConfig, PinRoles, CADENCE_WINDOW_US, WATCHDOG_WINDOW_US};
use md2msx_sys::{Timer1, Timer2, F_CPU};

#[cfg(target_arch = "avr")]
use md2msx_util as _;

#[cfg(not(feature = "pcb-1-3"))]
compile_error!("PCB version not specified, enable one of the `pcb-*` features");

#[cfg(feature = "pcb-1-3")]
const ROLES: PinRoles = PinRoles::PCB_1_3;

pub const CONFIG: BridgeConfig = BridgeConfig::new(ROLES);

pub const WATCHDOG: Timer1 = Timer1::with_window(F_CPU, WATCHDOG_WINDOW_US);
pub const CADENCE: Timer2 = Timer2::with_window(F_CPU, CADENCE_WINDOW_US);

#[cfg(target_arch = "avr")]
#[no_mangle]
pub extern "C" fn main() -> ! {
    use md2msx_bridge::Bridge;
    use md2msx_sys::{interrupt, Atmega328p};

    let mut bridge = Bridge::new(Atmega328p::new(), CONFIG, WATCHDOG, CADENCE);

    // Nothing may steal cycles from the strobe polling.
    interrupt::disable();
    bridge.init_timers();

    loop {
        let _ = bridge.run_round();
    }
}
