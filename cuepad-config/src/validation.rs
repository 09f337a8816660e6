//! Validation of a parsed `pad.toml`

use std::collections::HashSet;

use cuepad_types::keycode::{CONSUMER_USAGE_MAX, ConsumerKey};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::PadTomlConfig;

/// Validates the entire pad configuration
pub fn validate_config(config: &PadTomlConfig) -> ConfigResult<()> {
    validate_debounce_section(config)?;
    validate_pad_section(config)?;
    validate_encoder_section(config)?;
    validate_bindings(config)?;
    Ok(())
}

/// Validates the [debounce] section
fn validate_debounce_section(config: &PadTomlConfig) -> ConfigResult<()> {
    let debounce = &config.debounce;

    if debounce.threshold == 0 {
        return Err(ConfigError::InvalidValue {
            field: "debounce.threshold".to_string(),
            value: debounce.threshold.to_string(),
            expected: "1 to 255".to_string(),
        });
    }

    if !(1..=defaults::DEBOUNCE_TICK_MS_MAX).contains(&debounce.tick_ms) {
        return Err(ConfigError::InvalidValue {
            field: "debounce.tick_ms".to_string(),
            value: debounce.tick_ms.to_string(),
            expected: format!("1 to {}", defaults::DEBOUNCE_TICK_MS_MAX),
        });
    }

    Ok(())
}

/// Validates the [pad] section
fn validate_pad_section(config: &PadTomlConfig) -> ConfigResult<()> {
    let buttons = config.pad.buttons;
    if !(1..=defaults::BUTTON_NUM_MAX).contains(&buttons) {
        return Err(ConfigError::InvalidValue {
            field: "pad.buttons".to_string(),
            value: buttons.to_string(),
            expected: format!("1 to {}", defaults::BUTTON_NUM_MAX),
        });
    }
    Ok(())
}

/// Validates the [encoder] section
fn validate_encoder_section(config: &PadTomlConfig) -> ConfigResult<()> {
    let encoder = &config.encoder;
    for (field, key) in [
        ("encoder.clockwise", encoder.clockwise),
        ("encoder.counter_clockwise", encoder.counter_clockwise),
    ] {
        if key == ConsumerKey::No {
            return Err(ConfigError::Validation {
                field: field.to_string(),
                message: "an encoder step must emit a consumer usage".to_string(),
            });
        }
        check_consumer_usage(field, key)?;
    }
    Ok(())
}

/// The consumer report can't carry usages above its logical maximum
fn check_consumer_usage(field: &str, key: ConsumerKey) -> ConfigResult<()> {
    if !key.is_reportable() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: format!("{:?} (0x{:X})", key, key.as_u16()),
            expected: format!("a consumer usage up to 0x{:X}", CONSUMER_USAGE_MAX),
        });
    }
    Ok(())
}

/// Validates the [[binding]] entries
fn validate_bindings(config: &PadTomlConfig) -> ConfigResult<()> {
    let buttons = config.pad.buttons;
    let mut bound = HashSet::new();

    for (idx, binding) in config.bindings.iter().enumerate() {
        let field = format!("binding[{}]", idx);

        if binding.button >= buttons {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.button", field),
                value: binding.button.to_string(),
                expected: format!("0 to {}", buttons - 1),
            });
        }

        if binding.key.is_some() && binding.consumer.is_some() {
            return Err(ConfigError::Validation {
                field,
                message: "set either 'key' or 'consumer', not both".to_string(),
            });
        }

        if let Some(key) = binding.consumer {
            check_consumer_usage(&format!("{}.consumer", field), key)?;
        }

        if !bound.insert(binding.button) {
            return Err(ConfigError::Validation {
                field,
                message: format!("button {} is bound more than once", binding.button),
            });
        }
    }

    // The default table covers the default button count only
    if config.bindings.is_empty() && buttons < defaults::KEY_BINDINGS.len() as u8 {
        return Err(ConfigError::Validation {
            field: "binding".to_string(),
            message: format!(
                "the default bindings need {} buttons, add [[binding]] entries for {} buttons",
                defaults::KEY_BINDINGS.len(),
                buttons
            ),
        });
    }

    Ok(())
}
