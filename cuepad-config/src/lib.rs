//! Parsing and validation of `pad.toml`.
//!
//! `cuepad`'s build script loads the file through [`ConfigLoader`], runs
//! [`validate_config`] and turns the result into compile-time constants.

use cuepad_types::action::KeyAction;
use cuepad_types::keycode::{ConsumerKey, HidKeyCode};
use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

pub mod defaults;
pub mod error;
pub mod loader;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::validate_config;

/// Electrical polarity shared by the debounced buttons
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Pulled up, the contact closes to ground
    #[default]
    ActiveLow,
    /// Pulled down, the contact closes to supply
    ActiveHigh,
}

/// Encoder decode resolution
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EncoderMode {
    /// One step per detent
    #[default]
    FullStep,
    /// Two steps per detent
    HalfStep,
}

/// The whole `pad.toml`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PadTomlConfig {
    #[serde(default)]
    pub debounce: DebounceTomlConfig,
    #[serde(default)]
    pub encoder: EncoderTomlConfig,
    #[serde(default)]
    pub pad: PadSectionConfig,
    /// `[[binding]]` entries, the default table is used when empty
    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingTomlConfig>,
}

/// `[debounce]` section
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebounceTomlConfig {
    /// Stable ticks needed before a button flips
    #[serde_inline_default(defaults::DEBOUNCE_THRESHOLD)]
    pub threshold: u8,
    /// Tick period in milliseconds
    #[serde_inline_default(defaults::DEBOUNCE_TICK_MS)]
    pub tick_ms: u16,
    #[serde(default)]
    pub polarity: Polarity,
}

impl Default for DebounceTomlConfig {
    fn default() -> Self {
        Self {
            threshold: defaults::DEBOUNCE_THRESHOLD,
            tick_ms: defaults::DEBOUNCE_TICK_MS,
            polarity: Polarity::default(),
        }
    }
}

/// `[encoder]` section
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncoderTomlConfig {
    #[serde(default)]
    pub mode: EncoderMode,
    /// Encoder contacts close to ground
    #[serde_inline_default(true)]
    pub low_active: bool,
    #[serde_inline_default(defaults::ENCODER_CLOCKWISE)]
    pub clockwise: ConsumerKey,
    #[serde_inline_default(defaults::ENCODER_COUNTER_CLOCKWISE)]
    pub counter_clockwise: ConsumerKey,
}

impl Default for EncoderTomlConfig {
    fn default() -> Self {
        Self {
            mode: EncoderMode::default(),
            low_active: true,
            clockwise: defaults::ENCODER_CLOCKWISE,
            counter_clockwise: defaults::ENCODER_COUNTER_CLOCKWISE,
        }
    }
}

/// `[pad]` section
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PadSectionConfig {
    /// Number of debounced buttons
    #[serde_inline_default(defaults::BUTTON_NUM)]
    pub buttons: u8,
    /// Pause between two main loop iterations
    #[serde_inline_default(defaults::MAIN_LOOP_INTERVAL_US)]
    pub main_loop_interval_us: u32,
}

impl Default for PadSectionConfig {
    fn default() -> Self {
        Self {
            buttons: defaults::BUTTON_NUM,
            main_loop_interval_us: defaults::MAIN_LOOP_INTERVAL_US,
        }
    }
}

/// One `[[binding]]` entry. At most one of `key` and `consumer` is set,
/// none means the button is unbound.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BindingTomlConfig {
    pub button: u8,
    pub key: Option<HidKeyCode>,
    pub consumer: Option<ConsumerKey>,
}

impl BindingTomlConfig {
    /// Action of this binding. A `key` wins over `consumer`, validation
    /// rejects entries that set both.
    pub fn action(&self) -> KeyAction {
        match (self.key, self.consumer) {
            (Some(key), _) => KeyAction::Key(key),
            (None, Some(consumer)) => KeyAction::Consumer(consumer),
            (None, None) => KeyAction::No,
        }
    }
}

impl PadTomlConfig {
    /// Parse a `pad.toml` string without merging defaults
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        toml::from_str(s).map_err(|e| ConfigError::TomlParse {
            path: "<string>".to_string(),
            message: e.message().to_string(),
        })
    }

    /// Resolved binding table, `(button index, action)` in table order
    pub fn key_bindings(&self) -> Vec<(u8, KeyAction)> {
        if self.bindings.is_empty() {
            defaults::KEY_BINDINGS.to_vec()
        } else {
            self.bindings.iter().map(|b| (b.button, b.action())).collect()
        }
    }
}
