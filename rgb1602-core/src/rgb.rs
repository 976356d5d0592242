//! RGB backlight controller register map
//!
//! The module's backlight is a small PWM LED controller on its own bus
//! address. Writes are register pokes: address byte then one or more data
//! bytes. With auto-increment enabled (MODE2) the three color channels
//! take a single transaction.

/// Register addresses
pub mod reg {
    /// Mode register 1 (sleep/normal)
    pub const MODE1: u8 = 0x00;
    /// Mode register 2 (auto-increment, output inversion)
    pub const MODE2: u8 = 0x01;
    /// Blue channel PWM duty
    pub const BLUE: u8 = 0x02;
    /// Green channel PWM duty
    pub const GREEN: u8 = 0x03;
    /// Red channel PWM duty
    pub const RED: u8 = 0x04;
    /// Breathing duty ratio
    pub const BREATH: u8 = 0x06;
    /// Blink period
    pub const BLINK: u8 = 0x07;
    /// LED output drive select
    pub const OUTPUT: u8 = 0x08;
}

/// MODE1 value for normal operation (not sleeping)
pub const MODE1_NORMAL: u8 = 0x00;
/// MODE2 value enabling register auto-increment
pub const MODE2_AUTO_INCREMENT: u8 = 0x20;
/// OUTPUT value putting every channel under full PWM drive
pub const OUTPUT_PWM_ALL: u8 = 0xFF;

/// Breathing effect register values: (BLINK, BREATH) pairs
pub const BREATHING_ON: (u8, u8) = (0x17, 0x7F);
pub const BREATHING_OFF: (u8, u8) = (0x00, 0xFF);

/// Backlight color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Power-on default of the backlight controller
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Build the single auto-increment transaction setting all three channels.
///
/// Starts at the red register; the controller steps through the remaining
/// two on its own.
pub fn color_frame(color: Rgb) -> [u8; 4] {
    [reg::RED, color.r, color.g, color.b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_frame_layout() {
        let frame = color_frame(Rgb::new(10, 20, 30));
        assert_eq!(frame, [reg::RED, 10, 20, 30]);
    }

    #[test]
    fn test_white_is_full_scale() {
        assert_eq!(color_frame(Rgb::WHITE), [reg::RED, 255, 255, 255]);
    }
}
