//! LCD1602 RGB module driver
//!
//! The module carries two chips on one I2C bus: an AiP31068-class
//! character LCD controller (16x2, HD44780 instruction set) and a small
//! PWM controller for the RGB backlight.
//!
//! # Wire protocol
//!
//! LCD transactions are framed: a control byte (`0x80` instruction,
//! `0x40` data) followed by the payload. Consecutive data bytes in one
//! transaction land in consecutive RAM cells because the controller
//! auto-increments its address counter. The backlight controller takes
//! plain register pokes: register address then one or more values, with
//! auto-increment across the three color registers.
//!
//! # Write coalescing
//!
//! The driver shadows the visible frame and the last applied backlight
//! color. Re-writing a byte the glass already shows, or re-applying the
//! current color, costs no bus traffic at all. A skipped character still
//! advances the logical cursor; the controller's address counter is
//! re-synchronized with one addressing command before the next physical
//! write. Refreshing a mostly-static status panel this way is usually a
//! zero-transaction no-op, which is what makes the fixed per-byte bus
//! cost bearable.
//!
//! # Timing
//!
//! Every LCD frame is followed by ~50us of controller cycle time per
//! byte. Clear-display and return-home re-render the whole character
//! RAM and need a dedicated 2ms settle. All delays are datasheet lower
//! bounds, not tunables. Backlight writes need no settle.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use rgb1602_core::cmd::{self, instr};
use rgb1602_core::rgb::{self, reg};
use rgb1602_core::{FrameShadow, Geometry, Rgb};

/// 7-bit address of the LCD controller (0x7C on the wire)
pub const LCD_ADDRESS: u8 = 0x7C >> 1;
/// 7-bit address of the backlight controller (0xC0 on the wire)
pub const RGB_ADDRESS: u8 = 0xC0 >> 1;

/// Stabilization time after power-up before the controller accepts
/// commands
const POWER_ON_MS: u32 = 50;
/// Settle time after each function-set during the reset sequence
const FUNCTION_SET_SETTLE_MS: u32 = 5;
/// Settle time after clear-display and return-home
const SLOW_COMMAND_SETTLE_US: u32 = 2_000;
/// Controller execution time per transmitted byte
const BYTE_CYCLE_US: u32 = 50;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The underlying bus transaction failed. The operation was aborted;
    /// driver state still reflects only what was actually transmitted.
    Bus(E),
}

/// Driver for one LCD1602 RGB module.
///
/// Owns the bus and delay handles, so multiple instances on distinct
/// buses stay independent. Not internally synchronized; a single owner
/// must serialize access.
pub struct Lcd1602Rgb<I2C, D> {
    i2c: I2C,
    delay: D,
    shadow: FrameShadow,
    /// Function-set instruction last transmitted (write-once at init,
    /// kept so the mirrored register state stays complete)
    #[allow(dead_code)]
    function: u8,
    /// Display-control flag mask last transmitted
    control: u8,
    /// Entry-mode flag mask last transmitted
    mode: u8,
    cursor_col: u8,
    cursor_row: u8,
    /// Whether the controller's address counter still matches the
    /// logical cursor. Skipped writes and glyph uploads desynchronize.
    addr_synced: bool,
    /// Last color actually transmitted; `None` before the first write
    backlight: Option<Rgb>,
}

impl<I2C, D, E> Lcd1602Rgb<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Create a driver for a `cols` x `rows` module. No bus traffic;
    /// call [`Self::init`] before anything else.
    ///
    /// Dimensions are clamped to what the controller can address
    /// (40 columns, 2 rows).
    pub fn new(i2c: I2C, delay: D, cols: u8, rows: u8) -> Self {
        Self {
            i2c,
            delay,
            shadow: FrameShadow::new(Geometry::new(cols, rows)),
            function: 0,
            control: 0,
            mode: 0,
            cursor_col: 0,
            cursor_row: 0,
            addr_synced: false,
            backlight: None,
        }
    }

    /// Power-on sequence for both chips.
    ///
    /// Brings the LCD controller out of its undefined reset state
    /// (function-set twice, 5ms settle each - the documented minimum),
    /// turns the display on with cursor and blink off, clears, sets
    /// left-to-right entry, then configures the backlight controller
    /// (normal mode, full PWM drive, register auto-increment) and
    /// lights it white.
    ///
    /// A bus failure at any step aborts the sequence and is returned to
    /// the caller; retry or halt is the caller's policy.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.delay.delay_ms(POWER_ON_MS);

        let function = cmd::function_set(self.shadow.geometry().rows() > 1);
        // The reset state machine needs the function-set twice to land
        // in a defined mode regardless of prior state. Never fewer.
        for _ in 0..2 {
            self.command(function)?;
            self.delay.delay_ms(FUNCTION_SET_SETTLE_MS);
        }
        self.function = function;

        self.apply_control(cmd::control::DISPLAY_ON)?;
        self.clear()?;
        self.apply_mode(cmd::entry::LEFT)?;

        self.set_backlight_reg(reg::MODE1, rgb::MODE1_NORMAL)?;
        self.set_backlight_reg(reg::OUTPUT, rgb::OUTPUT_PWM_ALL)?;
        self.set_backlight_reg(reg::MODE2, rgb::MODE2_AUTO_INCREMENT)?;
        self.set_color(Rgb::WHITE)
    }

    /// Blank the display. Resets the shadow to all-blank and homes the
    /// cursor, so the next write of any non-blank byte always transmits.
    pub fn clear(&mut self) -> Result<(), Error<E>> {
        self.command(instr::CLEAR_DISPLAY)?;
        self.delay.delay_us(SLOW_COMMAND_SETTLE_US);
        self.shadow.clear();
        self.cursor_col = 0;
        self.cursor_row = 0;
        self.addr_synced = true;
        Ok(())
    }

    /// Home the cursor via the dedicated return-home instruction.
    pub fn home(&mut self) -> Result<(), Error<E>> {
        self.command(instr::RETURN_HOME)?;
        self.delay.delay_us(SLOW_COMMAND_SETTLE_US);
        self.cursor_col = 0;
        self.cursor_row = 0;
        self.addr_synced = true;
        Ok(())
    }

    /// Move the write position. Out-of-range rows clamp to the last row.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error<E>> {
        let rows = self.shadow.geometry().rows();
        let row = row.min(rows - 1);
        self.command(cmd::ddram_address(col, row, rows))?;
        self.cursor_col = col;
        self.cursor_row = row;
        self.addr_synced = true;
        Ok(())
    }

    /// Write one character at the cursor, skipping the bus when the
    /// glass already shows it. The cursor advances either way. Writes
    /// past the last column are no-ops.
    pub fn write_char(&mut self, value: u8) -> Result<(), Error<E>> {
        let (col, row) = (self.cursor_col, self.cursor_row);
        if col >= self.shadow.geometry().cols() {
            return Ok(());
        }
        if self.shadow.differs(col, row, value) {
            self.sync_address()?;
            self.send_data(value)?;
            // Committed only now that the byte is on the glass
            self.shadow.commit(col, row, value);
            self.cursor_col = col + 1;
            // The controller auto-advanced along with us
        } else {
            self.cursor_col = col + 1;
            self.addr_synced = false;
        }
        Ok(())
    }

    /// Write a string starting at the cursor, one data transaction per
    /// *changed* character. Stops at the end of the row; the cursor ends
    /// at the first unwritten column. Empty strings cost nothing.
    pub fn write_str(&mut self, text: &str) -> Result<(), Error<E>> {
        if text.is_empty() {
            return Ok(());
        }
        // Reposition explicitly so the address counter starts in step
        // with the logical cursor.
        self.set_cursor(self.cursor_col, self.cursor_row)?;
        let cols = self.shadow.geometry().cols();
        for byte in text.bytes() {
            if self.cursor_col >= cols {
                break;
            }
            self.write_char(byte)?;
        }
        Ok(())
    }

    /// Program one of the eight glyph-RAM slots with an 8-row bitmap.
    /// The slot index is 3 bits wide, so 8 wraps to 0.
    pub fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), Error<E>> {
        self.command(cmd::cgram_address(slot))?;
        let mut frame = [cmd::CTRL_DATA; 9];
        frame[1..].copy_from_slice(bitmap);
        self.send_lcd(&frame)?;
        // The upload left the address counter in CGRAM
        self.addr_synced = false;
        Ok(())
    }

    /// Set the backlight color. Identical to the last applied color:
    /// no bus traffic. Otherwise one auto-increment transaction covers
    /// all three channels.
    pub fn set_color(&mut self, color: Rgb) -> Result<(), Error<E>> {
        if self.backlight == Some(color) {
            return Ok(());
        }
        self.i2c
            .write(RGB_ADDRESS, &rgb::color_frame(color))
            .map_err(Error::Bus)?;
        self.backlight = Some(color);
        Ok(())
    }

    /// [`Self::set_color`] from raw channel values.
    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<(), Error<E>> {
        self.set_color(Rgb::new(r, g, b))
    }

    pub fn set_color_white(&mut self) -> Result<(), Error<E>> {
        self.set_color(Rgb::WHITE)
    }

    /// Start the backlight breathing effect. Direct register pokes, not
    /// shadow-tracked.
    pub fn enable_breathing(&mut self) -> Result<(), Error<E>> {
        let (blink, breath) = rgb::BREATHING_ON;
        self.set_backlight_reg(reg::BLINK, blink)?;
        self.set_backlight_reg(reg::BREATH, breath)
    }

    /// Stop the backlight breathing effect.
    pub fn disable_breathing(&mut self) -> Result<(), Error<E>> {
        let (blink, breath) = rgb::BREATHING_OFF;
        self.set_backlight_reg(reg::BLINK, blink)?;
        self.set_backlight_reg(reg::BREATH, breath)
    }

    /// Turn the display output on (RAM contents are preserved either way).
    pub fn display(&mut self) -> Result<(), Error<E>> {
        self.apply_control(cmd::with_display(self.control, true))
    }

    /// Turn the display output off.
    pub fn no_display(&mut self) -> Result<(), Error<E>> {
        self.apply_control(cmd::with_display(self.control, false))
    }

    /// Show the underline cursor.
    pub fn cursor(&mut self) -> Result<(), Error<E>> {
        self.apply_control(cmd::with_cursor(self.control, true))
    }

    /// Hide the underline cursor.
    pub fn no_cursor(&mut self) -> Result<(), Error<E>> {
        self.apply_control(cmd::with_cursor(self.control, false))
    }

    /// Blink the cursor cell.
    pub fn blink(&mut self) -> Result<(), Error<E>> {
        self.apply_control(cmd::with_blink(self.control, true))
    }

    /// Stop blinking the cursor cell.
    pub fn no_blink(&mut self) -> Result<(), Error<E>> {
        self.apply_control(cmd::with_blink(self.control, false))
    }

    /// Shift the whole display window one cell left. One-shot command,
    /// no mode mask involved.
    pub fn scroll_display_left(&mut self) -> Result<(), Error<E>> {
        self.command(cmd::scroll(false))
    }

    /// Shift the whole display window one cell right.
    pub fn scroll_display_right(&mut self) -> Result<(), Error<E>> {
        self.command(cmd::scroll(true))
    }

    /// Text flows left to right (the default).
    pub fn left_to_right(&mut self) -> Result<(), Error<E>> {
        self.apply_mode(cmd::with_text_direction(self.mode, true))
    }

    /// Text flows right to left.
    pub fn right_to_left(&mut self) -> Result<(), Error<E>> {
        self.apply_mode(cmd::with_text_direction(self.mode, false))
    }

    /// Shift the display on every write so the cursor cell stays put.
    pub fn autoscroll(&mut self) -> Result<(), Error<E>> {
        self.apply_mode(cmd::with_autoscroll(self.mode, true))
    }

    /// Writes move the cursor, not the display (the default).
    pub fn no_autoscroll(&mut self) -> Result<(), Error<E>> {
        self.apply_mode(cmd::with_autoscroll(self.mode, false))
    }

    /// Logical write position (column may sit one past the row end)
    pub fn cursor_position(&self) -> (u8, u8) {
        (self.cursor_col, self.cursor_row)
    }

    pub fn geometry(&self) -> Geometry {
        self.shadow.geometry()
    }

    /// Last color actually transmitted to the backlight
    pub fn color(&self) -> Option<Rgb> {
        self.backlight
    }

    /// What the driver believes the glass currently shows
    pub fn frame(&self) -> &FrameShadow {
        &self.shadow
    }

    /// Release the bus and delay handles.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// One framed write to the LCD controller, paced by its per-byte
    /// cycle time.
    fn send_lcd(&mut self, frame: &[u8]) -> Result<(), Error<E>> {
        self.i2c.write(LCD_ADDRESS, frame).map_err(Error::Bus)?;
        self.delay.delay_us(BYTE_CYCLE_US * frame.len() as u32);
        Ok(())
    }

    fn command(&mut self, instruction: u8) -> Result<(), Error<E>> {
        self.send_lcd(&[cmd::CTRL_COMMAND, instruction])
    }

    fn send_data(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.send_lcd(&[cmd::CTRL_DATA, byte])
    }

    fn set_backlight_reg(&mut self, register: u8, value: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(RGB_ADDRESS, &[register, value])
            .map_err(Error::Bus)
    }

    /// Re-address the controller if skipped writes left its counter
    /// behind the logical cursor.
    fn sync_address(&mut self) -> Result<(), Error<E>> {
        if !self.addr_synced {
            let rows = self.shadow.geometry().rows();
            self.command(cmd::ddram_address(self.cursor_col, self.cursor_row, rows))?;
            self.addr_synced = true;
        }
        Ok(())
    }

    /// Retransmit the full display-control byte; the mask is committed
    /// only after the write succeeded.
    fn apply_control(&mut self, mask: u8) -> Result<(), Error<E>> {
        self.command(instr::DISPLAY_CONTROL | mask)?;
        self.control = mask;
        Ok(())
    }

    /// Retransmit the full entry-mode byte.
    fn apply_mode(&mut self, mask: u8) -> Result<(), Error<E>> {
        self.command(instr::ENTRY_MODE_SET | mask)?;
        self.mode = mask;
        Ok(())
    }
}
