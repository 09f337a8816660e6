//! Runtime configuration of the pad.
//!
//! Defaults come from the constants generated out of `pad.toml` at build time.

use cuepad_types::action::EncoderAction;
use embassy_time::Duration;

use crate::constants::{
    BUTTON_ACTIVE_LOW, DEBOUNCE_THRESHOLD, DEBOUNCE_TICK_MS, ENCODER_CLOCKWISE, ENCODER_COUNTER_CLOCKWISE,
    ENCODER_HALF_STEP, ENCODER_LOW_ACTIVE, MAIN_LOOP_INTERVAL_US,
};

/// Errors found while building the pipeline from a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A debounce threshold of 0 ticks disables debouncing
    ZeroDebounceThreshold,
    /// A key binding refers to a button outside the button table
    ButtonOutOfRange { button: u8, buttons: usize },
    /// Two key bindings refer to the same button
    DuplicateBinding { button: u8 },
}

/// Electrical polarity of the debounced buttons.
///
/// The debouncer seeds every channel with the idle level derived from this,
/// a debounced flip is only accepted when it agrees with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pulled up, a pressed button reads low
    #[default]
    ActiveLow,
    /// Pulled down, a pressed button reads high
    ActiveHigh,
}

impl Polarity {
    /// Raw level (`true` = high) of a released button
    pub const fn idle_level(self) -> bool {
        matches!(self, Polarity::ActiveLow)
    }

    /// Whether the raw level means "pressed"
    pub const fn is_active(self, level: bool) -> bool {
        level != self.idle_level()
    }
}

/// Config for the debounce engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Stable ticks needed before a button flips
    pub threshold: u8,
    /// Period of the sampling tick
    pub tick: Duration,
    pub polarity: Polarity,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            threshold: DEBOUNCE_THRESHOLD,
            tick: Duration::from_millis(DEBOUNCE_TICK_MS),
            polarity: if BUTTON_ACTIVE_LOW {
                Polarity::ActiveLow
            } else {
                Polarity::ActiveHigh
            },
        }
    }
}

impl DebounceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold == 0 {
            return Err(ConfigError::ZeroDebounceThreshold);
        }
        Ok(())
    }
}

/// Quadrature decode resolution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderMode {
    /// One step per detent, reported at the rest position
    #[default]
    FullStep,
    /// Two steps per detent, reported at the rest and the half-way position
    HalfStep,
}

/// Config for the rotary encoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    pub mode: EncoderMode,
    /// Encoder contacts close to ground
    pub low_active: bool,
    /// Consumer usages emitted per step
    pub action: EncoderAction,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mode: if ENCODER_HALF_STEP {
                EncoderMode::HalfStep
            } else {
                EncoderMode::FullStep
            },
            low_active: ENCODER_LOW_ACTIVE,
            action: EncoderAction::new(ENCODER_CLOCKWISE, ENCODER_COUNTER_CLOCKWISE),
        }
    }
}

/// The config struct for the pad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadConfig {
    pub debounce: DebounceConfig,
    pub encoder: EncoderConfig,
    /// Pause between two main loop iterations
    pub main_loop_interval: Duration,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig::default(),
            encoder: EncoderConfig::default(),
            main_loop_interval: Duration::from_micros(MAIN_LOOP_INTERVAL_US),
        }
    }
}
