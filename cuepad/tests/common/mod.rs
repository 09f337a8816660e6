#![allow(dead_code)]

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use cuepad::hid::{Report, ReportTransport};
use embedded_hal::digital::{ErrorType, InputPin};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Input pin whose level is driven by the test through a shared handle
#[derive(Clone, Default)]
pub struct SharedPin {
    level: Rc<Cell<bool>>,
}

impl SharedPin {
    pub fn new(level: bool) -> Self {
        Self {
            level: Rc::new(Cell::new(level)),
        }
    }

    pub fn set(&self, level: bool) {
        self.level.set(level);
    }
}

impl ErrorType for SharedPin {
    type Error = Infallible;
}

impl InputPin for SharedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

/// Pull-up encoder contacts, driven with contact-closed levels
#[derive(Clone)]
pub struct EncoderPins {
    pub a: SharedPin,
    pub b: SharedPin,
}

impl EncoderPins {
    pub fn new() -> Self {
        Self {
            a: SharedPin::new(true),
            b: SharedPin::new(true),
        }
    }

    /// Set the contacts, `true` = closed
    pub fn set(&self, a: bool, b: bool) {
        self.a.set(!a);
        self.b.set(!b);
    }
}

/// One clockwise detent, in contact-closed levels
pub const CLOCKWISE_STEP: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];
/// One counter-clockwise detent
pub const COUNTER_CLOCKWISE_STEP: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

/// Transport that records every report it is handed
#[derive(Default)]
pub struct RecordingTransport {
    pub busy: bool,
    pub sent: Vec<Report>,
}

impl ReportTransport for RecordingTransport {
    fn is_ready(&self) -> bool {
        !self.busy
    }

    fn send_report(&mut self, report: &Report) {
        self.sent.push(*report);
    }
}
