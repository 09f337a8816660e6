//! Report dispatcher.
//!
//! Decides which single report goes out on a ready cycle. Priorities, highest
//! first:
//! 1. an encoder step sends its consumer usage
//! 2. an outstanding consumer usage is closed with a neutral consumer report
//! 3. a pending key action is sent, otherwise a neutral keyboard report
//!
//! A consumer usage is always followed by exactly one neutral consumer report
//! before any key action is looked at.

use cuepad_types::action::{EncoderAction, KeyAction};
use cuepad_types::keycode::HidKeyCode;

use crate::hid::{ConsumerReport, KeyboardReport, Report};
use crate::input_device::rotary_encoder::Direction;
use crate::key_mux::PendingActions;

/// What the last dispatched report left in flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchState {
    /// Nothing active
    #[default]
    Idle,
    /// A consumer usage is active and needs a neutral report
    ConsumerActive,
    /// The neutral consumer report has just been sent
    ConsumerClosing,
    /// A keyboard key was sent
    KeyActive,
}

pub struct ReportDispatcher {
    state: DispatchState,
    encoder_action: EncoderAction,
}

impl ReportDispatcher {
    pub const fn new(encoder_action: EncoderAction) -> Self {
        Self {
            state: DispatchState::Idle,
            encoder_action,
        }
    }

    pub const fn state(&self) -> DispatchState {
        self.state
    }

    /// A consumer usage is waiting for its neutral report
    pub const fn is_outstanding(&self) -> bool {
        matches!(self.state, DispatchState::ConsumerActive)
    }

    /// Pick the report for this ready cycle.
    ///
    /// `pending` is only consulted when neither the encoder nor a consumer
    /// close-out claims the cycle, so pending actions are never lost.
    pub fn dispatch(&mut self, direction: Direction, pending: &mut impl PendingActions) -> Report {
        let encoder_key = match direction {
            Direction::Clockwise => Some(self.encoder_action.clockwise()),
            Direction::CounterClockwise => Some(self.encoder_action.counter_clockwise()),
            Direction::None => None,
        };
        if let Some(key) = encoder_key {
            debug!("Dispatch encoder step {:?}: {:?}", direction, key);
            self.state = DispatchState::ConsumerActive;
            return Report::Consumer(ConsumerReport::new(key));
        }

        if self.is_outstanding() {
            debug!("Dispatch consumer release");
            self.state = DispatchState::ConsumerClosing;
            return Report::Consumer(ConsumerReport::neutral());
        }

        let action = pending.take_pending_action().unwrap_or_default();
        let report = match action {
            KeyAction::Consumer(key) => Report::Consumer(ConsumerReport::new(key)),
            KeyAction::Key(key) if key != HidKeyCode::No => Report::Keyboard(KeyboardReport::new(key)),
            // Unbound buttons consume their edge
            KeyAction::Key(_) | KeyAction::No => {
                self.state = DispatchState::Idle;
                return Report::Keyboard(KeyboardReport::neutral());
            }
        };
        debug!("Dispatch {:?}", action);
        self.state = if action.is_transient() {
            DispatchState::ConsumerActive
        } else {
            DispatchState::KeyActive
        };
        report
    }
}
