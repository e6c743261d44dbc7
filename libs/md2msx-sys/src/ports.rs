use core::ptr::{read_volatile, write_volatile};

use crate::pin::{Pin, PinBank, Port};

/// A representation of one of the 3 I/O ports on the ATmega328P.
///
/// Each port is three consecutive registers: PINx, DDRx and PORTx.
pub struct IOPort(*mut u8);

impl IOPort {
    /// Set the directions of the pins on this I/O port.
    ///
    /// A one indicates the pin is used as output.
    pub fn set_pin_directions_raw(&self, directions: u8) {
        unsafe {
            write_volatile(self.0.offset(1), directions);
        }
    }

    /// Get the directions of the pins on this I/O port.
    pub fn pin_directions_raw(&self) -> u8 {
        unsafe {
            read_volatile(self.0.offset(1))
        }
    }

    /// Set the values of output pins.
    ///
    /// For input pins a one enables the pull-up instead.
    pub fn set_pins(&self, values: u8) {
        unsafe {
            write_volatile(self.0.offset(2), values)
        }
    }

    /// Get the values last written with `set_pins`.
    pub fn output_pins(&self) -> u8 {
        unsafe {
            read_volatile(self.0.offset(2))
        }
    }

    /// Get the value of all of the pins.
    pub fn get_pins(&self) -> u8 {
        unsafe {
            read_volatile(self.0)
        }
    }

    /// Toggle the output value of every pin set in `mask`.
    pub fn toggle_pins(&self, mask: u8) {
        unsafe {
            write_volatile(self.0, mask)
        }
    }
}

pub fn port_b() -> IOPort { IOPort(0x23 as _) }

pub fn port_c() -> IOPort { IOPort(0x26 as _) }

pub fn port_d() -> IOPort { IOPort(0x29 as _) }

/// Fetch the I/O port by name.
#[inline(always)]
pub fn port(p: Port) -> IOPort {
    match p {
        Port::B => port_b(),
        Port::C => port_c(),
        Port::D => port_d(),
    }
}

/// Digital I/O on individual pins.
///
/// The bank operations have per-pin default implementations; hardware
/// with wider registers should override them.
pub trait Gpio {
    fn set(&mut self, pin: Pin);
    fn clear(&mut self, pin: Pin);
    fn toggle(&mut self, pin: Pin);
    fn read(&self, pin: Pin) -> bool;
    fn make_output(&mut self, pin: Pin);
    fn make_input_pullup(&mut self, pin: Pin);

    fn write(&mut self, pin: Pin, high: bool) {
        if high {
            self.set(pin);
        } else {
            self.clear(pin);
        }
    }

    /// Read every pin of a bank into a packed value.
    fn read_bank<const N: usize>(&self, bank: &PinBank<N>) -> u8 {
        read_each(self, bank)
    }

    /// Drive every pin of a bank from a packed value.
    fn write_bank<const N: usize>(&mut self, bank: &PinBank<N>, value: u8) {
        write_each(self, bank, value)
    }
}

/// Read a bank one pin at a time.
pub fn read_each<G: Gpio + ?Sized, const N: usize>(gpio: &G, bank: &PinBank<N>) -> u8 {
    let mut value = 0;
    for (i, &pin) in bank.pins().iter().enumerate() {
        if gpio.read(pin) {
            value |= 1 << i;
        }
    }
    value
}

/// Write a bank one pin at a time.
pub fn write_each<G: Gpio + ?Sized, const N: usize>(gpio: &mut G, bank: &PinBank<N>, value: u8) {
    for (i, &pin) in bank.pins().iter().enumerate() {
        gpio.write(pin, value & (1 << i) != 0);
    }
}

/// The on-chip GPIO of the ATmega328P.
pub struct Atmega328p {
    _private: (),
}

impl Atmega328p {
    /// Take control of the GPIO ports.
    ///
    /// Every `Gpio` call is a read-modify-write of PORTx or DDRx, so two
    /// owners would overwrite each other's pins. Create one.
    pub fn new() -> Atmega328p {
        Atmega328p { _private: () }
    }
}

impl Gpio for Atmega328p {
    #[inline(always)]
    fn set(&mut self, pin: Pin) {
        let p = port(pin.port());
        p.set_pins(p.output_pins() | pin.mask());
    }

    #[inline(always)]
    fn clear(&mut self, pin: Pin) {
        let p = port(pin.port());
        p.set_pins(p.output_pins() & !pin.mask());
    }

    #[inline(always)]
    fn toggle(&mut self, pin: Pin) {
        port(pin.port()).toggle_pins(pin.mask());
    }

    #[inline(always)]
    fn read(&self, pin: Pin) -> bool {
        port(pin.port()).get_pins() & pin.mask() != 0
    }

    fn make_output(&mut self, pin: Pin) {
        let p = port(pin.port());
        p.set_pin_directions_raw(p.pin_directions_raw() | pin.mask());
    }

    fn make_input_pullup(&mut self, pin: Pin) {
        let p = port(pin.port());
        p.set_pin_directions_raw(p.pin_directions_raw() & !pin.mask());
        p.set_pins(p.output_pins() | pin.mask());
    }

    #[inline(always)]
    fn read_bank<const N: usize>(&self, bank: &PinBank<N>) -> u8 {
        match bank.span() {
            Some(span) => (port(span.port).get_pins() & span.mask) >> span.shift,
            None => read_each(self, bank),
        }
    }

    #[inline(always)]
    fn write_bank<const N: usize>(&mut self, bank: &PinBank<N>, value: u8) {
        match bank.span() {
            Some(span) => {
                let p = port(span.port);
                p.set_pins((p.output_pins() & !span.mask) | ((value << span.shift) & span.mask));
            }
            None => write_each(self, bank, value),
        }
    }
}
