//! Board-agnostic core logic for the LCD1602 RGB display module
//!
//! This crate contains everything that does not need a bus handle:
//!
//! - AiP31068 command/flag encoding and pure mode-mask builders
//! - RGB backlight controller register map and color frames
//! - Shadow frame buffer used for write coalescing

#![no_std]
#![deny(unsafe_code)]

pub mod cmd;
pub mod rgb;
pub mod shadow;

pub use rgb::Rgb;
pub use shadow::{FrameShadow, Geometry};
