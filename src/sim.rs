//! A simulated 1-Wire line with one device attached.
//!
//! Time only moves when the driver delays: every `delay_us(n)` advances the
//! clock by `n` plus the delay overhead of [`Timing::DEFAULT`], the way a busy
//! wait primitive on the target behaves. The device decodes the length of
//! every low pulse and answers by holding the line low for a while, so the
//! driver only reads back what it expects if its slot timing is right.

use crate::Timing;
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

const RESET_MIN_US: u64 = 480;
const WRITE1_MAX_US: u64 = 15;
const PRESENCE_DELAY_US: u64 = 15;
const PRESENCE_PULSE_US: u64 = 120;
const READ0_PULSE_US: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Role {
    /// Nothing on the bus
    Absent,
    /// Sends every received byte straight back
    Echo,
    /// Answers skip rom, convert and read scratchpad
    Thermometer { scratchpad: [u8; 2] },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    Idle,
    Receive,
    Transmit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Rom,
    Function,
}

struct Line {
    now: u64,
    driven_low: bool,
    fell_at: u64,
    pulled_from: u64,
    pulled_until: u64,
    role: Role,
    mode: Mode,
    stage: Stage,
    rx_byte: u8,
    rx_bits: u8,
    tx: VecDeque<bool>,
    received: Vec<u8>,
    conversions: u32,
    resets: u32,
    delays_us: Vec<u32>,
    delays_ms: Vec<u32>,
}

impl Line {
    fn is_low(&self) -> bool {
        self.driven_low || (self.pulled_from..self.pulled_until).contains(&self.now)
    }

    fn fall(&mut self) {
        if self.driven_low {
            return;
        }
        self.driven_low = true;
        self.fell_at = self.now;
        if self.mode == Mode::Transmit {
            let bit = self.tx.pop_front().unwrap_or(true);
            if !bit {
                self.pulled_from = self.now;
                self.pulled_until = self.now + READ0_PULSE_US;
            }
        }
    }

    fn rise(&mut self) {
        if !self.driven_low {
            return;
        }
        self.driven_low = false;
        let low_for = self.now - self.fell_at;

        if low_for >= RESET_MIN_US {
            self.resets += 1;
            if self.role != Role::Absent {
                self.pulled_from = self.now + PRESENCE_DELAY_US;
                self.pulled_until = self.pulled_from + PRESENCE_PULSE_US;
                self.mode = Mode::Receive;
                self.stage = Stage::Rom;
                self.rx_byte = 0;
                self.rx_bits = 0;
                self.tx.clear();
            }
            return;
        }

        match self.mode {
            Mode::Idle => {}
            Mode::Receive => {
                if low_for < WRITE1_MAX_US {
                    self.rx_byte |= 1 << self.rx_bits;
                }
                self.rx_bits += 1;
                if self.rx_bits == 8 {
                    let byte = self.rx_byte;
                    self.rx_byte = 0;
                    self.rx_bits = 0;
                    self.received(byte);
                }
            }
            Mode::Transmit => {
                if self.tx.is_empty() && self.role == Role::Echo {
                    self.mode = Mode::Receive;
                }
            }
        }
    }

    fn received(&mut self, byte: u8) {
        self.received.push(byte);
        match self.role {
            Role::Absent => {}
            Role::Echo => self.transmit(&[byte]),
            Role::Thermometer { scratchpad } => match (self.stage, byte) {
                (Stage::Rom, 0xCC) => self.stage = Stage::Function,
                (Stage::Function, 0x44) => self.conversions += 1,
                (Stage::Function, 0xBE) => self.transmit(&scratchpad),
                _ => self.mode = Mode::Idle,
            },
        }
    }

    fn transmit(&mut self, bytes: &[u8]) {
        for byte in bytes {
            for i in 0..8 {
                self.tx.push_back(byte & (1 << i) != 0);
            }
        }
        self.mode = Mode::Transmit;
    }
}

#[derive(Clone)]
pub(crate) struct SimBus(Rc<RefCell<Line>>);

impl SimBus {
    pub(crate) fn new(role: Role) -> Self {
        SimBus(Rc::new(RefCell::new(Line {
            now: 0,
            driven_low: false,
            fell_at: 0,
            pulled_from: 0,
            pulled_until: 0,
            role,
            mode: Mode::Idle,
            stage: Stage::Rom,
            rx_byte: 0,
            rx_bits: 0,
            tx: VecDeque::new(),
            received: Vec::new(),
            conversions: 0,
            resets: 0,
            delays_us: Vec::new(),
            delays_ms: Vec::new(),
        })))
    }

    /// `(sense, drive)` pins tied to this line
    pub(crate) fn wire(&self) -> (SimSense, SimDrive) {
        (SimSense(self.clone()), SimDrive(self.clone()))
    }

    pub(crate) fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    pub(crate) fn received(&self) -> Vec<u8> {
        self.0.borrow().received.clone()
    }

    pub(crate) fn conversions(&self) -> u32 {
        self.0.borrow().conversions
    }

    pub(crate) fn resets(&self) -> u32 {
        self.0.borrow().resets
    }

    pub(crate) fn delays_us(&self) -> Vec<u32> {
        self.0.borrow().delays_us.clone()
    }

    pub(crate) fn delays_ms(&self) -> Vec<u32> {
        self.0.borrow().delays_ms.clone()
    }

    pub(crate) fn now(&self) -> u64 {
        self.0.borrow().now
    }
}

pub(crate) struct SimSense(SimBus);

impl ErrorType for SimSense {
    type Error = Infallible;
}

impl InputPin for SimSense {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0 .0.borrow().is_low())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0 .0.borrow().is_low())
    }
}

pub(crate) struct SimDrive(SimBus);

impl ErrorType for SimDrive {
    type Error = Infallible;
}

impl OutputPin for SimDrive {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0 .0.borrow_mut().fall();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0 .0.borrow_mut().rise();
        Ok(())
    }
}

pub(crate) struct SimDelay(SimBus);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0 .0.borrow_mut().now += u64::from(ns).div_ceil(1000);
    }

    fn delay_us(&mut self, us: u32) {
        let mut line = self.0 .0.borrow_mut();
        line.delays_us.push(us);
        line.now += u64::from(us + Timing::DEFAULT.delay_overhead_us);
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut line = self.0 .0.borrow_mut();
        line.delays_ms.push(ms);
        line.now += u64::from(ms) * 1000;
    }
}

/// Delay that only records what it was asked for.
#[derive(Default)]
pub(crate) struct RecordingDelay {
    pub(crate) us: Vec<u32>,
    pub(crate) ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_us(&mut self, us: u32) {
        self.us.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}
