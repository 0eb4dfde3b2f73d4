//! Marker grid decoder: validates the glyph structure and reads its ID

use crate::decoder::tables::{
    GUARD_CELLS, ID_TABLE, ORIENTATION_CELLS, PAYLOAD_BITS, PAYLOAD_CELLS, raw_payload_for_id,
};
use crate::models::grid::GRID_SIZE;
use crate::models::{DecodedMarker, MarkerGrid, Rotation};

/// Decoder for sampled marker grids
pub struct MarkerDecoder;

impl MarkerDecoder {
    /// Decode a 6x6 grid into an ID and rotation
    ///
    /// Returns `None` when the outer ring has a light cell, a guard cell is
    /// dark, or the number of dark orientation corners is not exactly one.
    pub fn decode(grid: &MarkerGrid) -> Option<DecodedMarker> {
        if !Self::has_dark_border(grid) || !Self::has_light_guard(grid) {
            return None;
        }

        let rotation = Self::detect_rotation(grid)?;
        let raw = Self::read_payload(grid, rotation);

        Some(DecodedMarker {
            id: ID_TABLE[raw as usize],
            rotation,
        })
    }

    /// Build the grid a glyph with `id` shows when turned by `rotation`
    ///
    /// Returns `None` for IDs outside 0-15.
    pub fn encode(id: u8, rotation: Rotation) -> Option<MarkerGrid> {
        let raw = raw_payload_for_id(id)?;
        let mut grid = MarkerGrid::new();

        for i in 0..GRID_SIZE {
            grid.set(i, 0, true);
            grid.set(i, GRID_SIZE - 1, true);
            grid.set(0, i, true);
            grid.set(GRID_SIZE - 1, i, true);
        }

        let (row, col) = ORIENTATION_CELLS[rotation.quarter_turns()];
        grid.set(row, col, true);

        let bits = &PAYLOAD_BITS[rotation.quarter_turns()];
        for (&(row, col), &bit) in PAYLOAD_CELLS.iter().zip(bits) {
            grid.set(row, col, (raw >> bit) & 1 == 1);
        }

        Some(grid)
    }

    fn has_dark_border(grid: &MarkerGrid) -> bool {
        let last = GRID_SIZE - 1;
        (0..GRID_SIZE)
            .all(|i| grid.get(i, 0) && grid.get(i, last) && grid.get(0, i) && grid.get(last, i))
    }

    fn has_light_guard(grid: &MarkerGrid) -> bool {
        GUARD_CELLS.iter().all(|&(row, col)| !grid.get(row, col))
    }

    fn detect_rotation(grid: &MarkerGrid) -> Option<Rotation> {
        let mut count = 0;
        let mut rotation = None;
        for (&(row, col), &candidate) in ORIENTATION_CELLS.iter().zip(Rotation::ALL.iter()) {
            if grid.get(row, col) {
                count += 1;
                rotation = Some(candidate);
            }
        }
        if count != 1 {
            return None;
        }
        rotation
    }

    fn read_payload(grid: &MarkerGrid, rotation: Rotation) -> u8 {
        let bits = &PAYLOAD_BITS[rotation.quarter_turns()];
        PAYLOAD_CELLS
            .iter()
            .zip(bits)
            .fold(0u8, |raw, (&(row, col), &bit)| {
                raw | ((grid.get(row, col) as u8) << bit)
            })
    }
}
