//! Global interrupt masking through the I flag of SREG.

use core::ptr::{read_volatile, write_volatile};

const SREG: *mut u8 = 0x5f as _;
const I: u8 = 1 << 7;

/// Mask all interrupts.
#[inline(always)]
pub fn disable() {
    unsafe {
        write_volatile(SREG, read_volatile(SREG) & !I);
    }
}
