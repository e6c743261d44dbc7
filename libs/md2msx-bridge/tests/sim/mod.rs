//! A simulated board for driving the bridge off hardware.
//!
//! Time is counted in ticks: every GPIO access and every timer poll costs
//! one. The host toggles its strobe on the given strobe-read counts, and the
//! pad answers each read with the frame selected by how many times its
//! select line has been toggled.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use md2msx_bridge::{Bridge, BridgeConfig, PinRoles};
use md2msx_sys::{Gpio, IntervalTimer, Pin};

pub const FOREVER: u64 = u64::MAX;

pub struct Setup {
    pub frames: [u8; 8],
    /// Strobe reads (1-based) on which the host toggles before answering.
    pub flips: Vec<usize>,
    pub watchdog: u64,
    pub cadence: u64,
}

impl Default for Setup {
    fn default() -> Self {
        Setup {
            frames: [0x3f; 8],
            flips: Vec::new(),
            watchdog: FOREVER,
            cadence: FOREVER,
        }
    }
}

struct Timer {
    period: u64,
    started: Option<u64>,
    resets: usize,
    /// Reads as elapsed until the next reset.
    expired: bool,
}

struct World {
    roles: PinRoles,
    now: u64,
    host_level: bool,
    strobe_reads: usize,
    flips: VecDeque<usize>,
    frames: [u8; 8],
    pad_toggles: usize,
    latches: HashMap<u8, bool>,
    timers: [Timer; 2],
}

#[derive(Clone)]
pub struct Board(Rc<RefCell<World>>);

#[derive(Clone, Copy)]
pub enum Which {
    Watchdog = 0,
    Cadence = 1,
}

pub struct SimTimer {
    board: Board,
    which: Which,
}

pub type SimBridge = Bridge<Board, SimTimer, SimTimer>;

/// Build a bridge on PCB 1.3 wiring with its timers started.
pub fn bridge(setup: Setup) -> (SimBridge, Board) {
    let roles = PinRoles::PCB_1_3;
    let timer = |period| Timer { period, started: None, resets: 0, expired: false };
    let board = Board(Rc::new(RefCell::new(World {
        roles,
        now: 0,
        host_level: false,
        strobe_reads: 0,
        flips: setup.flips.into_iter().collect(),
        frames: setup.frames,
        pad_toggles: 0,
        latches: HashMap::new(),
        timers: [timer(setup.watchdog), timer(setup.cadence)],
    })));

    let watchdog = SimTimer { board: board.clone(), which: Which::Watchdog };
    let cadence = SimTimer { board: board.clone(), which: Which::Cadence };
    let mut bridge = Bridge::new(board.clone(), BridgeConfig::new(roles), watchdog, cadence);
    bridge.init_timers();

    (bridge, board)
}

impl Board {
    pub fn pad_toggles(&self) -> usize {
        self.0.borrow().pad_toggles
    }

    pub fn strobe_reads(&self) -> usize {
        self.0.borrow().strobe_reads
    }

    pub fn resets(&self, which: Which) -> usize {
        self.0.borrow().timers[which as usize].resets
    }

    /// The value latched on the MSX lines, packed in pad line order.
    pub fn host_output(&self) -> u8 {
        let world = self.0.borrow();
        let mut value = 0;
        for (i, pin) in world.roles.host_lines.pins().iter().enumerate() {
            if world.latches.get(&pin.0).copied().unwrap_or(false) {
                value |= 1 << i;
            }
        }
        value
    }

    /// Have the host toggle its strobe on the `reads`th strobe read from
    /// now.
    pub fn flip_after(&self, reads: usize) {
        let mut world = self.0.borrow_mut();
        let at = world.strobe_reads + reads;
        world.flips.push_back(at);
    }

    /// Make a timer report its window as elapsed until it is next reset.
    pub fn expire(&self, which: Which) {
        self.0.borrow_mut().timers[which as usize].expired = true;
    }

    pub fn latch(&self, pin: Pin) -> Option<bool> {
        self.0.borrow().latches.get(&pin.0).copied()
    }
}

impl Gpio for Board {
    fn set(&mut self, pin: Pin) {
        let mut world = self.0.borrow_mut();
        world.now += 1;
        world.latches.insert(pin.0, true);
    }

    fn clear(&mut self, pin: Pin) {
        let mut world = self.0.borrow_mut();
        world.now += 1;
        world.latches.insert(pin.0, false);
    }

    fn toggle(&mut self, pin: Pin) {
        let mut world = self.0.borrow_mut();
        world.now += 1;
        if pin == world.roles.pad_strobe {
            world.pad_toggles += 1;
        }
        let level = world.latches.entry(pin.0).or_insert(false);
        *level = !*level;
    }

    fn read(&self, pin: Pin) -> bool {
        let mut world = self.0.borrow_mut();
        world.now += 1;

        if pin == world.roles.host_strobe {
            world.strobe_reads += 1;
            while world.flips.front().map_or(false, |&n| n <= world.strobe_reads) {
                world.flips.pop_front();
                world.host_level = !world.host_level;
            }
            return world.host_level;
        }

        let line = world.roles.pad_lines.pins().iter().position(|&p| p == pin);
        match line {
            Some(i) => world.frames[world.pad_toggles % 8] & (1 << i) != 0,
            None => world.latches.get(&pin.0).copied().unwrap_or(true),
        }
    }

    fn make_output(&mut self, _pin: Pin) {
        self.0.borrow_mut().now += 1;
    }

    fn make_input_pullup(&mut self, _pin: Pin) {
        self.0.borrow_mut().now += 1;
    }
}

impl IntervalTimer for SimTimer {
    fn start(&mut self) {
        let mut world = self.board.0.borrow_mut();
        let now = world.now;
        world.timers[self.which as usize].started = Some(now);
    }

    fn reset(&mut self) {
        let mut world = self.board.0.borrow_mut();
        let now = world.now;
        let timer = &mut world.timers[self.which as usize];
        timer.started = Some(now);
        timer.resets += 1;
        timer.expired = false;
    }

    fn is_done(&self) -> bool {
        let mut world = self.board.0.borrow_mut();
        world.now += 1;
        let now = world.now;
        let timer = &world.timers[self.which as usize];
        if timer.expired {
            return true;
        }
        match timer.started {
            Some(started) => now - started >= timer.period,
            None => false,
        }
    }
}
