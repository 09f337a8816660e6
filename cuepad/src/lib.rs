//! Input-event pipeline of a USB HID control pad.
//!
//! Six buttons and a rotary encoder with a push-button are turned into
//! consumer control and keyboard reports:
//! - [`debounce`] samples the buttons on a periodic tick
//! - [`input_device::rotary_encoder`] decodes the encoder contacts
//! - [`key_mux`] latches press edges into pending actions
//! - [`dispatcher`] picks the single report sent on each ready cycle
//! - [`pad`] runs the main loop over a [`hid::ReportTransport`]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
mod constants;
pub mod debounce;
pub mod dispatcher;
pub mod hid;
pub mod input_device;
pub mod key_mux;
pub mod pad;

pub use constants::{BUTTON_NUM, DEFAULT_KEY_BINDINGS, KEY_BINDING_NUM};
pub use cuepad_types as types;
use debounce::ButtonStates;

/// Debounced button states, written by the debounce tick and read by the main loop
pub static BUTTON_STATES: ButtonStates<BUTTON_NUM> = ButtonStates::new();
