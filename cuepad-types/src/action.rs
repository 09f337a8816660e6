//! Actions produced by the pad.
//!
//! - [`KeyAction`] - what a bound button emits on its press edge
//! - [`EncoderAction`] - what each rotation step of the encoder emits

use serde::{Deserialize, Serialize};

use crate::keycode::{ConsumerKey, HidKeyCode};

/// Action bound to a button.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Unbound. The press edge is consumed without emitting a key.
    #[default]
    No,
    /// A keyboard page key, sent through the keyboard report
    Key(HidKeyCode),
    /// A consumer page usage, sent through the consumer report
    Consumer(ConsumerKey),
}

impl KeyAction {
    /// Transient actions must be followed by a neutral report on the same
    /// report channel once they stop.
    pub const fn is_transient(&self) -> bool {
        matches!(self, KeyAction::Consumer(_))
    }
}

/// Consumer usages emitted for each encoder rotation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderAction {
    clockwise: ConsumerKey,
    counter_clockwise: ConsumerKey,
}

impl Default for EncoderAction {
    fn default() -> Self {
        Self {
            clockwise: ConsumerKey::VolumeDecrement,
            counter_clockwise: ConsumerKey::VolumeIncrement,
        }
    }
}

impl EncoderAction {
    /// Create a new encoder action.
    pub const fn new(clockwise: ConsumerKey, counter_clockwise: ConsumerKey) -> Self {
        Self {
            clockwise,
            counter_clockwise,
        }
    }

    /// Get the clockwise action.
    pub const fn clockwise(&self) -> ConsumerKey {
        self.clockwise
    }

    /// Get the counter clockwise action.
    pub const fn counter_clockwise(&self) -> ConsumerKey {
        self.counter_clockwise
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_transient_actions() {
        assert!(KeyAction::Consumer(ConsumerKey::Mute).is_transient());
        assert!(!KeyAction::Key(HidKeyCode::Space).is_transient());
        assert!(!KeyAction::No.is_transient());
    }

    #[test]
    fn test_key_action_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            action: KeyAction,
        }
        let w: Wrapper = toml::from_str("action = { Key = \"KpSlash\" }").unwrap();
        assert_eq!(w.action, KeyAction::Key(HidKeyCode::KpSlash));
        let w: Wrapper = toml::from_str("action = { Consumer = \"Mute\" }").unwrap();
        assert_eq!(w.action, KeyAction::Consumer(ConsumerKey::Mute));
    }
}
