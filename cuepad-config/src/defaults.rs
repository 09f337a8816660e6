//! Default values of the pad configuration.
//!
//! They reproduce the shipped hardware: six push-buttons plus the encoder
//! push-button, all pulled up, sampled every 10 ms.

use cuepad_types::action::KeyAction;
use cuepad_types::keycode::{ConsumerKey, HidKeyCode};

/// Debounce threshold in ticks
pub const DEBOUNCE_THRESHOLD: u8 = 10;

/// Debounce tick period in milliseconds
pub const DEBOUNCE_TICK_MS: u16 = 10;

/// Upper bound of the tick period, longer ticks make the buttons feel dead
pub const DEBOUNCE_TICK_MS_MAX: u16 = 100;

/// Number of debounced buttons
pub const BUTTON_NUM: u8 = 7;

/// Upper bound of the button table
pub const BUTTON_NUM_MAX: u8 = 32;

/// Pause between two main loop iterations in microseconds
pub const MAIN_LOOP_INTERVAL_US: u32 = 100;

/// Clockwise encoder step
pub const ENCODER_CLOCKWISE: ConsumerKey = ConsumerKey::VolumeDecrement;

/// Counter-clockwise encoder step
pub const ENCODER_COUNTER_CLOCKWISE: ConsumerKey = ConsumerKey::VolumeIncrement;

/// Button bindings used when `pad.toml` has no `[[binding]]` entry.
/// Buttons 0 and 1 are left unbound.
pub const KEY_BINDINGS: [(u8, KeyAction); 7] = [
    (0, KeyAction::No),
    (1, KeyAction::No),
    (2, KeyAction::Key(HidKeyCode::KpAsterisk)),
    (3, KeyAction::Key(HidKeyCode::S)),
    (4, KeyAction::Key(HidKeyCode::KpSlash)),
    (5, KeyAction::Key(HidKeyCode::Space)),
    (6, KeyAction::Consumer(ConsumerKey::Mute)),
];
