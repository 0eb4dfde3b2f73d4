use std::fmt;

/// Number of cells along each side of a marker glyph
pub const GRID_SIZE: usize = 6;

/// 6x6 cell matrix sampled from a rectified marker (true = dark, false = light)
///
/// Cells are addressed as `(row, col)` with `(0, 0)` at the top-left of the
/// rectified raster. The 36 cells are packed into the low bits of a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkerGrid {
    bits: u64,
}

impl MarkerGrid {
    /// Create a grid with every cell light
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// Build a grid from row-major booleans
    pub fn from_rows(rows: [[bool; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut grid = Self::new();
        for (row, cells) in rows.iter().enumerate() {
            for (col, &dark) in cells.iter().enumerate() {
                grid.set(row, col, dark);
            }
        }
        grid
    }

    /// Get cell at (row, col); out-of-range cells read as light
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return false;
        }
        (self.bits >> Self::index(row, col)) & 1 == 1
    }

    /// Set cell at (row, col)
    pub fn set(&mut self, row: usize, col: usize, dark: bool) {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return;
        }
        let mask = 1u64 << Self::index(row, col);
        if dark {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
    }

    /// Toggle cell at (row, col)
    pub fn toggle(&mut self, row: usize, col: usize) {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return;
        }
        self.bits ^= 1u64 << Self::index(row, col);
    }

    /// Number of dark cells
    pub fn dark_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Return this grid turned a quarter turn clockwise (as displayed, y down)
    pub fn rotated_cw(&self) -> Self {
        let mut out = Self::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                out.set(row, col, self.get(GRID_SIZE - 1 - col, row));
            }
        }
        out
    }

    /// Row-major copy of the cells
    pub fn to_rows(&self) -> [[bool; GRID_SIZE]; GRID_SIZE] {
        let mut rows = [[false; GRID_SIZE]; GRID_SIZE];
        for (row, cells) in rows.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.get(row, col);
            }
        }
        rows
    }

    fn index(row: usize, col: usize) -> usize {
        row * GRID_SIZE + col
    }
}

impl fmt::Display for MarkerGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                f.write_str(if self.get(row, col) { "#" } else { "." })?;
            }
            if row + 1 < GRID_SIZE {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
