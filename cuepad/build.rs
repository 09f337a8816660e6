use std::path::Path;
use std::{env, fs};

use const_gen::*;
use cuepad_config::{ConfigLoader, EncoderMode, PadTomlConfig, Polarity, validate_config};
use cuepad_types::action::KeyAction;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CUEPAD_TOML_PATH");

    // Read pad.toml if it's present
    let config = if let Ok(toml_path) = env::var("CUEPAD_TOML_PATH") {
        println!("cargo:rerun-if-changed={toml_path}");
        match ConfigLoader::load(&toml_path) {
            Ok(c) => c,
            Err(e) => panic!("❌ Load CUEPAD_TOML_PATH file error: {e}"),
        }
    } else {
        PadTomlConfig::default()
    };
    if let Err(e) = validate_config(&config) {
        panic!("❌ Invalid pad config: {e}");
    }

    let constants = get_constants_str(&config);

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(config: &PadTomlConfig) -> String {
    let debounce_threshold = config.debounce.threshold;
    let debounce_tick_ms = config.debounce.tick_ms as u64;
    let button_active_low = config.debounce.polarity == Polarity::ActiveLow;
    let button_num = config.pad.buttons as usize;
    let encoder_half_step = config.encoder.mode == EncoderMode::HalfStep;
    let encoder_low_active = config.encoder.low_active;
    let main_loop_interval_us = config.pad.main_loop_interval_us as u64;
    let bindings = config.key_bindings();
    let key_binding_num = bindings.len();

    let mut constant_strs = vec![
        const_declaration!(pub(crate) DEBOUNCE_THRESHOLD = debounce_threshold),
        const_declaration!(pub(crate) DEBOUNCE_TICK_MS = debounce_tick_ms),
        const_declaration!(pub(crate) BUTTON_ACTIVE_LOW = button_active_low),
        const_declaration!(pub BUTTON_NUM = button_num),
        const_declaration!(pub(crate) ENCODER_HALF_STEP = encoder_half_step),
        const_declaration!(pub(crate) ENCODER_LOW_ACTIVE = encoder_low_active),
        const_declaration!(pub(crate) MAIN_LOOP_INTERVAL_US = main_loop_interval_us),
        const_declaration!(pub KEY_BINDING_NUM = key_binding_num),
    ];

    constant_strs.push(format!(
        "pub(crate) const ENCODER_CLOCKWISE: ConsumerKey = ConsumerKey::{:?};",
        config.encoder.clockwise
    ));
    constant_strs.push(format!(
        "pub(crate) const ENCODER_COUNTER_CLOCKWISE: ConsumerKey = ConsumerKey::{:?};",
        config.encoder.counter_clockwise
    ));

    let bindings_str = bindings
        .iter()
        .map(|(button, action)| format!("    KeyBinding::on_press(ButtonId({}), {}),", button, action_expr(action)))
        .collect::<Vec<_>>()
        .join("\n");
    constant_strs.push(format!(
        "/// Button bindings generated from `pad.toml`\npub const DEFAULT_KEY_BINDINGS: [KeyBinding; KEY_BINDING_NUM] = [\n{}\n];",
        bindings_str
    ));

    constant_strs
        .into_iter()
        .map(|s| "#[allow(clippy::redundant_static_lifetimes)]\n".to_owned() + s.as_str() + "\n")
        .collect()
}

fn action_expr(action: &KeyAction) -> String {
    match action {
        KeyAction::No => "KeyAction::No".to_string(),
        KeyAction::Key(key) => format!("KeyAction::Key(HidKeyCode::{:?})", key),
        KeyAction::Consumer(key) => format!("KeyAction::Consumer(ConsumerKey::{:?})", key),
    }
}
