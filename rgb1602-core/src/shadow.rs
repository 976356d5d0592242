//! Shadow frame buffer
//!
//! Mirror of what the LCD's DDRAM is currently showing. The driver
//! consults it before every character write and skips the bus transaction
//! when the glass already shows the requested byte. Cells are committed
//! only after their transaction succeeded, so the shadow never claims
//! bytes that were not actually transmitted.

use heapless::Vec;

/// The blank cell value (ASCII space, which is also what the controller
/// fills DDRAM with on clear-display)
pub const BLANK: u8 = 0x20;

/// Total DDRAM size of the controller in 2-line mode
const DDRAM_CELLS: usize = 80;

/// DDRAM line width in 2-line mode
const MAX_COLS: u8 = 40;

/// Maximum addressable rows (the 2-line memory map has two bases)
const MAX_ROWS: u8 = 2;

/// Display dimensions, fixed at construction.
///
/// The shadow buffer is sized from this value rather than a hard-coded
/// 16x2, so wider 2-line modules share the same coalescing logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    cols: u8,
    rows: u8,
}

impl Geometry {
    /// Clamps to what the controller can address: 1-40 columns, 1-2 rows.
    pub fn new(cols: u8, rows: u8) -> Self {
        Self {
            cols: cols.clamp(1, MAX_COLS),
            rows: rows.clamp(1, MAX_ROWS),
        }
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(16, 2)
    }
}

/// Last known contents of every visible character cell.
pub struct FrameShadow {
    geometry: Geometry,
    cells: Vec<u8, DDRAM_CELLS>,
}

impl FrameShadow {
    /// All-blank shadow for the given dimensions.
    pub fn new(geometry: Geometry) -> Self {
        let mut cells = Vec::new();
        let len = geometry.cols as usize * geometry.rows as usize;
        // len <= DDRAM_CELLS by Geometry's clamping
        cells.resize(len, BLANK).ok();
        Self { geometry, cells }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn index(&self, col: u8, row: u8) -> Option<usize> {
        if col < self.geometry.cols && row < self.geometry.rows {
            Some(row as usize * self.geometry.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// Last byte known to be displayed at a cell, `None` out of bounds.
    pub fn get(&self, col: u8, row: u8) -> Option<u8> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Whether writing `value` at a cell would change what is displayed.
    ///
    /// Out-of-bounds cells never differ; the caller must not transmit
    /// for them.
    pub fn differs(&self, col: u8, row: u8, value: u8) -> bool {
        match self.get(col, row) {
            Some(current) => current != value,
            None => false,
        }
    }

    /// Record a byte as transmitted. No-op out of bounds.
    pub fn commit(&mut self, col: u8, row: u8, value: u8) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = value;
        }
    }

    /// Reset every cell to blank (the hardware state after clear-display).
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// View of one row, for diagnostics and assertions. Empty out of bounds.
    pub fn row_text(&self, row: u8) -> &[u8] {
        if row < self.geometry.rows {
            let cols = self.geometry.cols as usize;
            let start = row as usize * cols;
            &self.cells[start..start + cols]
        } else {
            &[]
        }
    }
}
