//! # cuepad types
//!
//! Plain data shared between the firmware core (`cuepad`) and the
//! configuration crate (`cuepad-config`).
//!
//! - [`keycode`] - keyboard page and consumer page usage codes
//! - [`modifier`] - modifier bits carried by the keyboard report
//! - [`action`] - what a button or an encoder step produces

#![no_std]

pub mod action;
pub mod keycode;
pub mod modifier;
