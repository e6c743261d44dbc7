use core::ptr::{read_volatile, write_volatile};

pub mod registers {
    pub const TIFR1: u16 = 0x36;
    pub const TIFR2: u16 = 0x37;
    pub const TIMSK1: u16 = 0x6f;
    pub const TIMSK2: u16 = 0x70;

    pub const TCCR1A: u16 = 0x80;
    pub const TCCR1B: u16 = 0x81;
    pub const TCNT1: u16 = 0x84;
    pub const OCR1A: u16 = 0x88;

    pub const TCCR2A: u16 = 0xb0;
    pub const TCCR2B: u16 = 0xb1;
    pub const TCNT2: u16 = 0xb2;
    pub const OCR2A: u16 = 0xb3;

    pub const OCF1A: u8 = 1;
    pub const OCF2A: u8 = 1;
    pub const CS10: u8 = 0;
    pub const CS21: u8 = 1;
    pub const CS22: u8 = 2;
}

use registers::*;

/// A free-running counter which latches a flag once a fixed window has
/// elapsed.
pub trait IntervalTimer {
    /// Configure the counter and start it. Called once at start-up.
    fn start(&mut self);

    /// Zero the counter and clear the elapsed flag.
    fn reset(&mut self);

    /// Returns true once the window has elapsed since the last reset.
    fn is_done(&self) -> bool;
}

/// Number of counter ticks in a window of `micros` microseconds.
///
/// # Panics
///
/// Panics if the window is empty or does not fit in `max` ticks. Used from
/// a const context this is a build failure instead.
pub const fn compare_value(f_cpu: u32, micros: u32, prescale: u32, max: u32) -> u32 {
    let ticks = f_cpu as u64 * micros as u64 / 1_000_000 / prescale as u64;
    if ticks == 0 || ticks > max as u64 {
        panic!("timer window does not fit the counter");
    }
    ticks as u32
}

unsafe fn write8(addr: u16, value: u8) {
    write_volatile(addr as *mut u8, value);
}

unsafe fn read8(addr: u16) -> u8 {
    read_volatile(addr as *const u8)
}

// 16-bit registers go through the shared TEMP latch: high byte first.
unsafe fn write16(addr: u16, value: u16) {
    write8(addr + 1, (value >> 8) as u8);
    write8(addr, value as u8);
}

/// Timer/Counter1: 16 bits, no prescaler, compare match A.
pub struct Timer1 {
    compare: u16,
}

impl Timer1 {
    pub const PRESCALE: u32 = 1;

    /// A timer whose flag latches `micros` after each reset.
    pub const fn with_window(f_cpu: u32, micros: u32) -> Timer1 {
        Timer1 {
            compare: compare_value(f_cpu, micros, Timer1::PRESCALE, u16::MAX as u32) as u16,
        }
    }

    pub const fn compare(&self) -> u16 {
        self.compare
    }
}

impl IntervalTimer for Timer1 {
    fn start(&mut self) {
        unsafe {
            write8(TCCR1A, 0);
            write8(TCCR1B, 0);
            write16(TCNT1, 0);

            // Polled only, never interrupts.
            write8(TIMSK1, 0);
            write8(TIFR1, 1 << OCF1A);

            write16(OCR1A, self.compare);
            write8(TCCR1B, 1 << CS10);
        }
    }

    #[inline(always)]
    fn reset(&mut self) {
        unsafe {
            write16(TCNT1, 0);
            // Flags clear by writing a one.
            write8(TIFR1, 1 << OCF1A);
        }
    }

    #[inline(always)]
    fn is_done(&self) -> bool {
        unsafe { read8(TIFR1) & (1 << OCF1A) != 0 }
    }
}

/// Timer/Counter2: 8 bits, clock / 256, compare match A.
pub struct Timer2 {
    compare: u8,
}

impl Timer2 {
    pub const PRESCALE: u32 = 256;

    /// A timer whose flag latches `micros` after each reset.
    pub const fn with_window(f_cpu: u32, micros: u32) -> Timer2 {
        Timer2 {
            compare: compare_value(f_cpu, micros, Timer2::PRESCALE, u8::MAX as u32) as u8,
        }
    }

    pub const fn compare(&self) -> u8 {
        self.compare
    }
}

impl IntervalTimer for Timer2 {
    fn start(&mut self) {
        unsafe {
            write8(TCCR2A, 0);
            write8(TCCR2B, 0);
            write8(TCNT2, 0);

            write8(TIMSK2, 0);
            write8(TIFR2, 1 << OCF2A);

            write8(OCR2A, self.compare);
            write8(TCCR2B, (1 << CS22) | (1 << CS21));
        }
    }

    #[inline(always)]
    fn reset(&mut self) {
        unsafe {
            write8(TCNT2, 0);
            write8(TIFR2, 1 << OCF2A);
        }
    }

    #[inline(always)]
    fn is_done(&self) -> bool {
        unsafe { read8(TIFR2) & (1 << OCF2A) != 0 }
    }
}
