//! Hardware driver implementations
//!
//! This crate binds the board-agnostic logic in rgb1602-core to real
//! hardware through the blocking `embedded-hal` 1.0 traits:
//!
//! - [`lcd1602::Lcd1602Rgb`] - LCD1602 RGB module (AiP31068 character
//!   controller plus RGB backlight controller on one I2C bus)

#![no_std]
#![deny(unsafe_code)]

pub mod lcd1602;

pub use lcd1602::{Error, Lcd1602Rgb, LCD_ADDRESS, RGB_ADDRESS};
