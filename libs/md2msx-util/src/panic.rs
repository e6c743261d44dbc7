use md2msx_sys::{interrupt, ports};

/// Let go of every pin.
///
/// All ports become inputs without pull-ups, so the MSX's own pull-ups read
/// as a pad with nothing pressed and the pad select line floats.
pub fn release_all() {
    for port in [ports::port_b(), ports::port_c(), ports::port_d()].iter() {
        port.set_pin_directions_raw(0);
        port.set_pins(0);
    }
}

/// Stop the firmware with the host lines released.
pub fn halt() -> ! {
    interrupt::disable();
    release_all();
    loop {}
}

#[cfg(all(feature = "panic_handler", target_arch = "avr"))]
#[panic_handler]
#[no_mangle]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    halt()
}
