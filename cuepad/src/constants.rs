//! Constants generated by `build.rs` from `pad.toml`

use cuepad_types::action::KeyAction;
#[allow(unused_imports)]
use cuepad_types::keycode::{ConsumerKey, HidKeyCode};

use crate::debounce::ButtonId;
use crate::key_mux::KeyBinding;

include!(concat!(env!("OUT_DIR"), "/constants.rs"));
