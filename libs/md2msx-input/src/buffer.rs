use crate::{Button, ControllerType, PadState};

/// The most recent eight samples of the pad lines.
///
/// Lines are active-low with pull-ups, so an all-ones slot means nothing is
/// pressed. Samples are written in a ring; `cursor` is the next slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleBuffer {
    slots: [u8; SampleBuffer::SLOTS],
    cursor: u8,
}

impl SampleBuffer {
    pub const SLOTS: usize = 8;

    pub const fn new() -> SampleBuffer {
        SampleBuffer {
            slots: [u8::MAX; SampleBuffer::SLOTS],
            cursor: 0,
        }
    }

    /// The slot the next sample will be written to.
    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor as usize
    }

    /// Store a sample and advance the cursor.
    #[inline(always)]
    pub fn push(&mut self, sample: u8) {
        self.slots[(self.cursor & 7) as usize] = sample;
        self.cursor = (self.cursor + 1) & 7;
    }

    /// Fetch a slot. The index wraps.
    #[inline(always)]
    pub fn slot(&self, index: usize) -> u8 {
        self.slots[index & 7]
    }

    pub fn slots(&self) -> &[u8; SampleBuffer::SLOTS] {
        &self.slots
    }

    /// Overwrite a slot without moving the cursor.
    pub fn set_slot(&mut self, index: usize, sample: u8) {
        self.slots[index & 7] = sample;
    }

    /// Identify the pad from its handshake slots.
    ///
    /// A six-button pad reports Left and Right released in slot 7 and
    /// pressed in slot 5. Slot 7 released with slot 5 disagreeing is a pad
    /// caught mid-handshake, reported as `None` rather than guessed at.
    pub fn classify(&self) -> ControllerType {
        let lr = Button::Left.mask() | Button::Right.mask();

        if self.slots[7] & lr == lr {
            if self.slots[5] & lr == 0 {
                ControllerType::SixButton
            } else {
                ControllerType::None
            }
        } else {
            ControllerType::ThreeButton
        }
    }

    /// Returns true if the button's bit is low in its slot.
    ///
    /// This does not check that the pad actually has the button; see
    /// `classify`.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.slots[button.slot()] & button.mask() == 0
    }

    /// Decode every button the identified pad supports.
    pub fn state(&self) -> PadState {
        let kind = self.classify();
        let buttons = Button::ALL
            .iter()
            .filter(|&&b| self.is_pressed(b))
            .fold(0, |acc, &b| acc | b.raw())
            & kind.buttons_raw();

        PadState { kind, buttons }
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        SampleBuffer::new()
    }
}
