#![cfg_attr(not(test), no_std)]

//! Decoding of Mega Drive (Genesis) pad samples.
//!
//! The pad multiplexes its buttons onto six DE-9 lines and presents the next
//! group each time its select line (pin 7) is toggled. Eight consecutive
//! samples are enough to read a six-button pad, including the handshake it
//! uses to identify itself.

mod buffer;

pub use buffer::SampleBuffer;

/// The six DE-9 input lines, numbered by their bit in a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PadLine {
    Pin1 = 0,
    Pin6 = 1,
    Pin2 = 2,
    Pin3 = 3,
    Pin4 = 4,
    Pin9 = 5,
}

impl PadLine {
    pub const COUNT: usize = 6;

    /// Every line, in sample bit order.
    pub const ALL: [PadLine; PadLine::COUNT] = [
        PadLine::Pin1,
        PadLine::Pin6,
        PadLine::Pin2,
        PadLine::Pin3,
        PadLine::Pin4,
        PadLine::Pin9,
    ];

    /// The bits of a sample which carry pad lines.
    pub const MASK: u8 = 0x3f;

    /// The DE-9 pin number of this line.
    pub const fn connector_pin(self) -> u8 {
        match self {
            PadLine::Pin1 => 1,
            PadLine::Pin6 => 6,
            PadLine::Pin2 => 2,
            PadLine::Pin3 => 3,
            PadLine::Pin4 => 4,
            PadLine::Pin9 => 9,
        }
    }

    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// A logical button on the pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    C,
    Start,
    X,
    Y,
    Z,
    Mode,
    /// Only present on 8BitDo receivers.
    Home,
}

impl Button {
    pub const COUNT: usize = 13;

    pub const ALL: [Button; Button::COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::C,
        Button::Start,
        Button::X,
        Button::Y,
        Button::Z,
        Button::Mode,
        Button::Home,
    ];

    /// The line this button is multiplexed onto.
    pub const fn line(self) -> PadLine {
        match self {
            Button::Up | Button::Z | Button::Home => PadLine::Pin1,
            Button::Down | Button::Y => PadLine::Pin2,
            Button::Left | Button::X => PadLine::Pin3,
            Button::Right | Button::Mode => PadLine::Pin4,
            Button::A | Button::B => PadLine::Pin6,
            Button::C | Button::Start => PadLine::Pin9,
        }
    }

    /// The sample slot which carries this button.
    pub const fn slot(self) -> usize {
        match self {
            Button::Up | Button::Down | Button::Left | Button::Right => 0,
            Button::B | Button::C => 0,
            Button::A | Button::Start => 3,
            Button::X | Button::Y | Button::Z | Button::Mode => 6,
            Button::Home => 7,
        }
    }

    /// The bit of this button within its slot.
    pub const fn mask(self) -> u8 {
        self.line().mask()
    }

    /// The bit of this button within `PadState::get_down_raw`.
    pub const fn raw(self) -> u16 {
        1 << self as u16
    }
}

/// The kind of pad attached, as identified from the samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerType {
    /// No pad, or one caught in the middle of its handshake.
    None,
    ThreeButton,
    SixButton,
}

impl ControllerType {
    /// The raw mask of buttons this kind of pad reports.
    pub const fn buttons_raw(self) -> u16 {
        match self {
            ControllerType::None => 0,
            ControllerType::ThreeButton => (1 << 8) - 1,
            ControllerType::SixButton => (1 << Button::COUNT) - 1,
        }
    }
}

/// PadState represents the decoded state of the pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadState {
    kind: ControllerType,
    buttons: u16,
}

impl PadState {
    pub fn controller_type(&self) -> ControllerType {
        self.kind
    }

    /// Returns true if this is a 6-button controller.
    pub fn is_6button(&self) -> bool {
        self.kind == ControllerType::SixButton
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.buttons & button.raw() != 0
    }

    /// Return the mask of buttons which are currently down.
    pub fn get_down_raw(&self) -> u16 {
        self.buttons
    }

    /// Iterate over the buttons which are currently down.
    pub fn iter_down(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.iter().copied().filter(move |&b| self.is_down(b))
    }
}
