use md2msx_input::{PadState, SampleBuffer};
use md2msx_sys::{delay, Gpio, IntervalTimer};

use crate::pins::BridgeConfig;

/// How long cycles 2 onwards may wait on the host before the round is given
/// up.
pub const WATCHDOG_WINDOW_US: u32 = 1500;

/// Minimum time between the start of two passes over the pad's eight
/// groups. A six-button pad only restarts its group counter after sitting
/// idle for about 1.5ms, and the slots assume every pass starts at group 0.
pub const CADENCE_WINDOW_US: u32 = 3000;

/// How a single host cycle ended.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The host toggled its strobe; move on to the next cycle.
    Advanced,
    /// The round watchdog fired; the host has stopped reading.
    TimedOut,
}

/// Where a round stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// The watchdog fired during detection (cycles 2 to 7).
    Abandoned(u8),
    /// The watchdog fired in the steady state (cycles 8 and 9).
    Released(u8),
}

/// Answers the MSX from the pad.
///
/// Owns the sample buffer, the GPIO and both timers. Everything runs on one
/// thread with interrupts masked, so the order of strobe checks, host writes
/// and pad samples in `run_cycle` is what the host sees.
pub struct Bridge<G, W, C> {
    gpio: G,
    config: BridgeConfig,
    watchdog: W,
    cadence: C,
    samples: SampleBuffer,
}

impl<G: Gpio, W: IntervalTimer, C: IntervalTimer> Bridge<G, W, C> {
    /// Configure the pins and start with an idle sample buffer.
    ///
    /// Pad lines and the MSX strobe are pulled up; the pad select and all
    /// MSX lines are driven high.
    pub fn new(mut gpio: G, config: BridgeConfig, watchdog: W, cadence: C) -> Bridge<G, W, C> {
        let roles = &config.roles;

        for &pin in roles.pad_lines.pins() {
            gpio.make_input_pullup(pin);
        }

        gpio.set(roles.pad_strobe);
        gpio.make_output(roles.pad_strobe);

        for &pin in roles.host_lines.pins() {
            gpio.set(pin);
            gpio.make_output(pin);
        }

        gpio.make_input_pullup(roles.host_strobe);

        Bridge {
            gpio,
            config,
            watchdog,
            cadence,
            samples: SampleBuffer::new(),
        }
    }

    /// Start both timers. Call once before the first round.
    pub fn init_timers(&mut self) {
        self.watchdog.start();
        self.cadence.start();
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    /// Decode the pad from the current samples.
    pub fn state(&self) -> PadState {
        self.samples.state()
    }

    // The host strobe sits at the cycle's parity until the host moves on.
    #[inline(always)]
    fn host_advanced(&self, cycle: u8) -> bool {
        (cycle & 1 != 0) != self.gpio.read(self.config.roles.host_strobe)
    }

    #[inline(always)]
    fn write_host(&mut self, cycle: u8) {
        let value = self.samples.slot(cycle as usize);
        self.gpio.write_bank(&self.config.roles.host_lines, value);

        if self.config.settle != 0 {
            delay::spin(self.config.settle);
        }
    }

    #[inline(always)]
    fn sample_pad(&mut self) {
        let sample = self.gpio.read_bank(&self.config.roles.pad_lines);
        self.samples.push(sample);
        self.gpio.toggle(self.config.roles.pad_strobe);
    }

    /// Serve one host cycle.
    ///
    /// Holds the slot for `cycle` on the MSX lines until the host toggles
    /// its strobe, sampling the pad in between. A new pass over the pad only
    /// starts once the cadence timer allows; while waiting for it the host
    /// is checked first and, from cycle 2 on, the watchdog second.
    #[inline(always)]
    pub fn run_cycle(&mut self, cycle: u8) -> CycleOutcome {
        while !self.host_advanced(cycle) {
            // Also the gap between two pad select toggles.
            self.write_host(cycle);

            if self.samples.cursor() == 0 {
                while !self.cadence.is_done() {
                    if self.host_advanced(cycle) {
                        return CycleOutcome::Advanced;
                    }
                    if cycle >= 2 && self.watchdog.is_done() {
                        return CycleOutcome::TimedOut;
                    }
                }
                self.cadence.reset();
            }

            if self.host_advanced(cycle) {
                return CycleOutcome::Advanced;
            }

            self.sample_pad();
        }

        CycleOutcome::Advanced
    }

    /// Serve one host read sequence.
    ///
    /// Cycles 0 and 1 arm the round, 2 to 7 cover the pad's handshake, and
    /// the bridge then alternates 8 and 9 (slots 0 and 1) until the host goes
    /// quiet. Call again immediately to start the next round.
    pub fn run_round(&mut self) -> RoundEnd {
        // Unrolled so every cycle number is a constant in its copy of
        // `run_cycle`.
        macro_rules! detect {
            ($($cycle:literal)*) => {
                $(
                    if self.run_cycle($cycle) == CycleOutcome::TimedOut {
                        return RoundEnd::Abandoned($cycle);
                    }
                )*
            };
        }

        let _ = self.run_cycle(0);
        let _ = self.run_cycle(1);

        self.watchdog.reset();

        detect!(2 3 4 5 6 7);

        loop {
            if self.run_cycle(8) == CycleOutcome::TimedOut {
                return RoundEnd::Released(8);
            }
            if self.run_cycle(9) == CycleOutcome::TimedOut {
                return RoundEnd::Released(9);
            }
        }
    }
}
