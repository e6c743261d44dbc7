use core::fmt;

use md2msx_input::PadLine;
use md2msx_sys::{Pin, PinBank};

/// The Arduino pin wired to each pin of a DE-9 connector, indexed by
/// connector pin number. Index 0 is unused.
pub type ConnectorMap = [Option<Pin>; 10];

/// Pad pin driven to step the pad through its button groups.
pub const PAD_STROBE_PIN: u8 = 7;

/// MSX pin toggled by the host to step through its cycles.
pub const HOST_STROBE_PIN: u8 = 8;

/// The MSX pin which carries a pad line. Pad pin 9 (C/Start) drives
/// trigger B on MSX pin 7.
pub const fn host_pin(line: PadLine) -> u8 {
    match line {
        PadLine::Pin9 => 7,
        _ => line.connector_pin(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connector {
    Pad,
    Host,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinError {
    /// A connector pin the bridge needs has no Arduino pin.
    Unwired { connector: Connector, pin: u8 },
    /// The Arduino pin does not exist.
    Invalid(Pin),
    /// One Arduino pin is given two roles.
    Conflict(Pin),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::Unwired { connector, pin } => {
                let name = match connector {
                    Connector::Pad => "pad",
                    Connector::Host => "MSX",
                };
                write!(f, "{} pin {} is not wired", name, pin)
            }
            PinError::Invalid(pin) => write!(f, "D{} is not a GPIO pin", pin.0),
            PinError::Conflict(pin) => write!(f, "D{} is assigned more than one role", pin.0),
        }
    }
}

/// PCB 1.3: pad lines on D2-D7, pad select on D8, MSX lines on A0-A5 and
/// MSX pin 8 on D9.
pub const PCB_1_3_PAD: ConnectorMap = [
    None,
    Some(Pin(2)),
    Some(Pin(4)),
    Some(Pin(5)),
    Some(Pin(6)),
    None,
    Some(Pin(3)),
    Some(Pin(8)),
    None,
    Some(Pin(7)),
];

pub const PCB_1_3_MSX: ConnectorMap = [
    None,
    Some(Pin(14)),
    Some(Pin(16)),
    Some(Pin(17)),
    Some(Pin(18)),
    None,
    Some(Pin(15)),
    Some(Pin(19)),
    Some(Pin(9)),
    None,
];

/// The physical pin behind every logical role of the bridge.
///
/// Both banks are ordered by `PadLine`, so bit `i` of a sample travels from
/// `pad_lines.pins()[i]` to `host_lines.pins()[i]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinRoles {
    pub pad_lines: PinBank<{ PadLine::COUNT }>,
    pub pad_strobe: Pin,
    pub host_lines: PinBank<{ PadLine::COUNT }>,
    pub host_strobe: Pin,
}

const fn wired(map: &ConnectorMap, connector: Connector, pin: u8) -> Result<Pin, PinError> {
    match map[pin as usize] {
        Some(p) if p.is_valid() => Ok(p),
        Some(p) => Err(PinError::Invalid(p)),
        None => Err(PinError::Unwired { connector, pin }),
    }
}

impl PinRoles {
    pub const PCB_1_3: PinRoles = match PinRoles::try_from_connectors(&PCB_1_3_PAD, &PCB_1_3_MSX) {
        Ok(roles) => roles,
        Err(_) => panic!("PCB 1.3 pin table is inconsistent"),
    };

    /// Build the role table from the wiring of both connectors.
    pub const fn try_from_connectors(pad: &ConnectorMap, host: &ConnectorMap) -> Result<PinRoles, PinError> {
        let mut pad_lines = [Pin(0); PadLine::COUNT];
        let mut host_lines = [Pin(0); PadLine::COUNT];

        let mut i = 0;
        while i < PadLine::COUNT {
            let line = PadLine::ALL[i];
            pad_lines[i] = match wired(pad, Connector::Pad, line.connector_pin()) {
                Ok(p) => p,
                Err(e) => return Err(e),
            };
            host_lines[i] = match wired(host, Connector::Host, host_pin(line)) {
                Ok(p) => p,
                Err(e) => return Err(e),
            };
            i += 1;
        }

        let pad_strobe = match wired(pad, Connector::Pad, PAD_STROBE_PIN) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };
        let host_strobe = match wired(host, Connector::Host, HOST_STROBE_PIN) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };

        let roles = PinRoles {
            pad_lines: PinBank::new(pad_lines),
            pad_strobe,
            host_lines: PinBank::new(host_lines),
            host_strobe,
        };

        match roles.find_conflict() {
            Some(pin) => Err(PinError::Conflict(pin)),
            None => Ok(roles),
        }
    }

    const fn find_conflict(&self) -> Option<Pin> {
        let mut all = [Pin(0); 2 * PadLine::COUNT + 2];
        let mut i = 0;
        while i < PadLine::COUNT {
            all[i] = self.pad_lines.pins()[i];
            all[PadLine::COUNT + i] = self.host_lines.pins()[i];
            i += 1;
        }
        all[2 * PadLine::COUNT] = self.pad_strobe;
        all[2 * PadLine::COUNT + 1] = self.host_strobe;

        let mut a = 0;
        while a < all.len() {
            let mut b = a + 1;
            while b < all.len() {
                if all[a].0 == all[b].0 {
                    return Some(all[a]);
                }
                b += 1;
            }
            a += 1;
        }
        None
    }
}

/// Everything the bridge needs to know about the board it runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub roles: PinRoles,
    /// Extra busy-wait iterations after each host write.
    ///
    /// The write itself spaces out the pad select toggles, which 8BitDo
    /// receivers need to be at least ~1.5us apart. Raise this if a faster
    /// board outruns the receiver.
    pub settle: u16,
}

impl BridgeConfig {
    pub const fn new(roles: PinRoles) -> BridgeConfig {
        BridgeConfig { roles, settle: 0 }
    }

    pub const fn with_settle(self, settle: u16) -> BridgeConfig {
        BridgeConfig { settle, ..self }
    }
}
