//! AiP31068 command set
//!
//! The LCD controller speaks the HD44780 instruction set over I2C. Every
//! transaction starts with a control byte selecting the register: `0x80`
//! routes the following byte to the instruction register, `0x40` routes
//! the following bytes to data RAM (the controller auto-increments its
//! address counter between consecutive data bytes in one transaction).

/// Control byte: the next byte is an instruction
pub const CTRL_COMMAND: u8 = 0x80;
/// Control byte: the following bytes are display/glyph data
pub const CTRL_DATA: u8 = 0x40;

/// Instruction bytes
pub mod instr {
    /// Blank the DDRAM and home the address counter (slow, ~2ms)
    pub const CLEAR_DISPLAY: u8 = 0x01;
    /// Home the address counter and undo display shifts (slow, ~2ms)
    pub const RETURN_HOME: u8 = 0x02;
    /// Entry mode: cursor direction and display auto-shift
    pub const ENTRY_MODE_SET: u8 = 0x04;
    /// Display on/off, cursor visibility, cursor blink
    pub const DISPLAY_CONTROL: u8 = 0x08;
    /// One-shot cursor move / display shift
    pub const CURSOR_SHIFT: u8 = 0x10;
    /// Interface width, line count, font
    pub const FUNCTION_SET: u8 = 0x20;
    /// Set glyph RAM (CGRAM) address
    pub const SET_CGRAM_ADDR: u8 = 0x40;
    /// Set display RAM (DDRAM) address
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// Flag bits for [`instr::ENTRY_MODE_SET`]
pub mod entry {
    pub const LEFT: u8 = 0x02;
    pub const SHIFT_INCREMENT: u8 = 0x01;
}

/// Flag bits for [`instr::DISPLAY_CONTROL`]
pub mod control {
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;
}

/// Flag bits for [`instr::CURSOR_SHIFT`]
pub mod shift {
    pub const DISPLAY_MOVE: u8 = 0x08;
    pub const MOVE_RIGHT: u8 = 0x04;
}

/// Flag bits for [`instr::FUNCTION_SET`]
pub mod function {
    pub const TWO_LINE: u8 = 0x08;
    // 4-bit width (0x00) and 5x8 font (0x00) are the wired-in defaults.
    // The serial interface never switches physical bus width; the marker
    // is kept only because the controller expects to see it.
}

/// DDRAM address command for a character cell.
///
/// The 2-line memory map puts row 0 at 0x00.. and row 1 at 0x40..; with
/// the DDRAM instruction bit folded in that is `col | 0x80` and
/// `col | 0xC0`. Out-of-range rows clamp to the last line rather than
/// addressing garbage.
pub fn ddram_address(col: u8, row: u8, rows: u8) -> u8 {
    let last = rows.saturating_sub(1).min(1);
    let row = row.min(last);
    if row == 0 {
        col | instr::SET_DDRAM_ADDR
    } else {
        col | instr::SET_DDRAM_ADDR | 0x40
    }
}

/// CGRAM address command for a glyph slot.
///
/// The controller has eight 8-byte slots; the slot index is 3 bits wide,
/// so 8 wraps to 0 instead of erroring.
pub fn cgram_address(slot: u8) -> u8 {
    instr::SET_CGRAM_ADDR | ((slot & 0x07) << 3)
}

/// Function-set instruction for the power-on sequence.
pub fn function_set(two_line: bool) -> u8 {
    let mut cmd = instr::FUNCTION_SET;
    if two_line {
        cmd |= function::TWO_LINE;
    }
    cmd
}

/// One-shot display shift instruction.
pub fn scroll(right: bool) -> u8 {
    let mut cmd = instr::CURSOR_SHIFT | shift::DISPLAY_MOVE;
    if right {
        cmd |= shift::MOVE_RIGHT;
    }
    cmd
}

// Mode-mask toggles. The controller has no single-bit-set instruction;
// the driver keeps a shadow of each mode byte and retransmits the whole
// byte after every change. Keeping the flips pure keeps them testable
// without a bus.

/// Flip the display-on bit in a display-control mask.
pub fn with_display(control: u8, on: bool) -> u8 {
    if on {
        control | control::DISPLAY_ON
    } else {
        control & !control::DISPLAY_ON
    }
}

/// Flip the cursor-visible bit in a display-control mask.
pub fn with_cursor(control: u8, on: bool) -> u8 {
    if on {
        control | control::CURSOR_ON
    } else {
        control & !control::CURSOR_ON
    }
}

/// Flip the cursor-blink bit in a display-control mask.
pub fn with_blink(control: u8, on: bool) -> u8 {
    if on {
        control | control::BLINK_ON
    } else {
        control & !control::BLINK_ON
    }
}

/// Flip the entry direction bit in an entry-mode mask.
pub fn with_text_direction(mode: u8, left_to_right: bool) -> u8 {
    if left_to_right {
        mode | entry::LEFT
    } else {
        mode & !entry::LEFT
    }
}

/// Flip the auto-shift bit in an entry-mode mask.
pub fn with_autoscroll(mode: u8, on: bool) -> u8 {
    if on {
        mode | entry::SHIFT_INCREMENT
    } else {
        mode & !entry::SHIFT_INCREMENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddram_address_rows() {
        assert_eq!(ddram_address(0, 0, 2), 0x80);
        assert_eq!(ddram_address(5, 0, 2), 0x85);
        assert_eq!(ddram_address(0, 1, 2), 0xC0);
        assert_eq!(ddram_address(15, 1, 2), 0xCF);
    }

    #[test]
    fn test_ddram_address_row_clamps() {
        // Out-of-range row on a 2-row display lands on row 1
        assert_eq!(ddram_address(3, 5, 2), ddram_address(3, 1, 2));
        // Single-line geometry never addresses the second line
        assert_eq!(ddram_address(3, 5, 1), ddram_address(3, 0, 1));
    }

    #[test]
    fn test_cgram_slot_wraps() {
        assert_eq!(cgram_address(0), 0x40);
        assert_eq!(cgram_address(7), 0x40 | (7 << 3));
        // 3-bit slot index: 8 wraps to 0
        assert_eq!(cgram_address(8), cgram_address(0));
        assert_eq!(cgram_address(9), cgram_address(1));
    }

    #[test]
    fn test_function_set() {
        assert_eq!(function_set(false), 0x20);
        assert_eq!(function_set(true), 0x28);
    }

    #[test]
    fn test_scroll_command() {
        assert_eq!(scroll(false), 0x18);
        assert_eq!(scroll(true), 0x1C);
    }

    #[test]
    fn test_toggles_are_idempotent() {
        let base = control::DISPLAY_ON;
        let once = with_cursor(base, true);
        let twice = with_cursor(once, true);
        assert_eq!(once, twice);
        assert_eq!(with_cursor(twice, false), base);

        let mode = entry::LEFT;
        assert_eq!(with_autoscroll(with_autoscroll(mode, true), true), 0x03);
        assert_eq!(with_text_direction(mode, false), 0x00);
    }
}
