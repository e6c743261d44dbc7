use core::ptr::read_volatile;

/// Busy-wait for `iterations` passes of an empty loop.
///
/// One pass is a volatile load, a compare and a branch: a handful of cycles,
/// roughly a quarter of a microsecond at 16 MHz. This is not calibrated;
/// tune the count on hardware.
#[inline(always)]
pub fn spin(iterations: u16) {
    let marker = 0u8;
    for _ in 0..iterations {
        unsafe {
            read_volatile(&marker);
        }
    }
}
