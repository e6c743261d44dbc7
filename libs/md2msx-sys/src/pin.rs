/// One of the three 8-bit I/O ports exposed on the ATmega328P.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    B,
    C,
    D,
}

/// An Arduino-numbered digital pin.
///
/// D0-D7 live on port D, D8-D13 on port B and D14-D19 (A0-A5) on port C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pin(pub u8);

impl Pin {
    /// The highest digital pin number usable as GPIO.
    pub const MAX: u8 = 19;

    /// Returns true if this pin exists on the package.
    pub const fn is_valid(self) -> bool {
        self.0 <= Pin::MAX
    }

    /// The port this pin belongs to.
    pub const fn port(self) -> Port {
        if self.0 < 8 {
            Port::D
        } else if self.0 < 14 {
            Port::B
        } else {
            Port::C
        }
    }

    /// The bit index of this pin within its port.
    pub const fn bit(self) -> u8 {
        let base = match self.port() {
            Port::D => 0,
            Port::B => 8,
            Port::C => 14,
        };
        (self.0 - base) & 7
    }

    /// The single-bit mask of this pin within its port registers.
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// The placement of a bank that occupies consecutive bits of one port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub port: Port,
    pub shift: u8,
    pub mask: u8,
}

/// An ordered group of pins read or written as one packed value.
///
/// Bit `i` of the packed value corresponds to `pins()[i]`. When the pins
/// sit on consecutive bits of a single port, in order, the bank records a
/// `Span` so hardware can move the whole value with one register access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinBank<const N: usize> {
    pins: [Pin; N],
    span: Option<Span>,
}

impl<const N: usize> PinBank<N> {
    pub const fn new(pins: [Pin; N]) -> PinBank<N> {
        let span = Self::find_span(&pins);
        PinBank { pins, span }
    }

    const fn find_span(pins: &[Pin; N]) -> Option<Span> {
        if N == 0 || N > 8 {
            return None;
        }

        let first = pins[0];
        if !first.is_valid() || first.bit() as usize + N > 8 {
            return None;
        }

        let mut i = 1;
        while i < N {
            let pin = pins[i];
            if !pin.is_valid()
                || pin.port() as u8 != first.port() as u8
                || pin.bit() as usize != first.bit() as usize + i
            {
                return None;
            }
            i += 1;
        }

        Some(Span {
            port: first.port(),
            shift: first.bit(),
            mask: Self::value_mask() << first.bit(),
        })
    }

    // Only valid for 1 <= N <= 8, which `find_span` checks first.
    const fn value_mask() -> u8 {
        u8::MAX >> (8 - N)
    }

    pub const fn pins(&self) -> &[Pin; N] {
        &self.pins
    }

    pub const fn span(&self) -> Option<Span> {
        self.span
    }
}
