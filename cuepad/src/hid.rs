//! HID report payloads and the transport seam.
//!
//! The device exposes two input reports in one interface:
//! - report 1, consumer control: one 16-bit usage, little endian
//! - report 2, keyboard: a modifier byte and a single key code

use cuepad_types::keycode::{ConsumerKey, HidKeyCode};
use cuepad_types::modifier::HidModifiers;

pub const CONSUMER_REPORT_ID: u8 = 1;
pub const KEYBOARD_REPORT_ID: u8 = 2;
/// Serialized size of either report, report id included
pub const REPORT_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    BufferOverflow,
    UnknownReportId(u8),
}

/// Consumer control report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    pub usage: u16,
}

impl ConsumerReport {
    pub const fn new(key: ConsumerKey) -> Self {
        Self { usage: key.as_u16() }
    }

    /// No usage active
    pub const fn neutral() -> Self {
        Self { usage: 0 }
    }
}

/// Single key keyboard report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: HidModifiers,
    pub keycode: u8,
}

impl KeyboardReport {
    pub const fn new(key: HidKeyCode) -> Self {
        Self {
            modifier: HidModifiers::new(),
            keycode: key.as_u8(),
        }
    }

    /// All keys released
    pub const fn neutral() -> Self {
        Self {
            modifier: HidModifiers::new(),
            keycode: 0,
        }
    }
}

/// A report ready to be written to the interrupt IN endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    Consumer(ConsumerReport),
    Keyboard(KeyboardReport),
}

impl Report {
    pub const fn report_id(&self) -> u8 {
        match self {
            Report::Consumer(_) => CONSUMER_REPORT_ID,
            Report::Keyboard(_) => KEYBOARD_REPORT_ID,
        }
    }

    /// Whether this report releases everything on its channel
    pub fn is_neutral(&self) -> bool {
        match self {
            Report::Consumer(r) => *r == ConsumerReport::neutral(),
            Report::Keyboard(r) => *r == KeyboardReport::neutral(),
        }
    }

    /// Wire bytes, report id first
    pub fn as_bytes(&self) -> [u8; REPORT_LEN] {
        match self {
            Report::Consumer(r) => {
                let [lo, hi] = r.usage.to_le_bytes();
                [CONSUMER_REPORT_ID, lo, hi]
            }
            Report::Keyboard(r) => [KEYBOARD_REPORT_ID, r.modifier.into_bits(), r.keycode],
        }
    }

    /// Write the wire bytes into `buf`, returns the number of bytes written
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, HidError> {
        let dst = buf.get_mut(..REPORT_LEN).ok_or(HidError::BufferOverflow)?;
        dst.copy_from_slice(&self.as_bytes());
        Ok(REPORT_LEN)
    }
}

/// Answer to a host GET_REPORT request: the neutral report of that id
pub fn get_report(report_id: u8) -> Result<Report, HidError> {
    match report_id {
        CONSUMER_REPORT_ID => Ok(Report::Consumer(ConsumerReport::neutral())),
        KEYBOARD_REPORT_ID => Ok(Report::Keyboard(KeyboardReport::neutral())),
        id => {
            warn!("GET_REPORT for unknown report id {}", id);
            Err(HidError::UnknownReportId(id))
        }
    }
}

/// Endpoint transport, implemented by the USB stack.
pub trait ReportTransport {
    /// No IN transfer is pending, a new report can be queued
    fn is_ready(&self) -> bool;

    /// Queue a report. Only called when [`ReportTransport::is_ready`] returned `true`.
    fn send_report(&mut self, report: &Report);
}
