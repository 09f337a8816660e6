//! Input devices sampled by the main loop.
//!
//! Buttons are debounced on the periodic tick (see [`crate::debounce`]), the
//! rotary encoder is decoded on every main loop iteration.

pub mod rotary_encoder;
