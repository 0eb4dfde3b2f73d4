//! Fixed cell layout and lookup tables of the marker glyph.
//!
//! These constants are part of the printed protocol. They are kept as plain
//! tables rather than derived from bit arithmetic.

/// Raw 4-bit payload -> marker ID
pub const ID_TABLE: [u8; 16] = [8, 2, 4, 15, 6, 13, 11, 1, 0, 10, 12, 7, 14, 5, 3, 9];

/// Inner corner cells, in the order that maps to `Rotation::ALL`
pub const ORIENTATION_CELLS: [(usize, usize); 4] = [(1, 1), (1, 4), (4, 4), (4, 1)];

/// Non-corner cells of the second ring; always light
pub const GUARD_CELLS: [(usize, usize); 8] = [
    (2, 1),
    (3, 1),
    (1, 2),
    (1, 3),
    (2, 4),
    (3, 4),
    (4, 2),
    (4, 3),
];

/// Payload cells as (row, col)
pub const PAYLOAD_CELLS: [(usize, usize); 4] = [(2, 2), (2, 3), (3, 2), (3, 3)];

/// Index: [rotation][payload cell] -> bit position in the raw payload
pub const PAYLOAD_BITS: [[u8; 4]; 4] = [
    [3, 2, 1, 0], // 0 deg
    [1, 3, 0, 2], // 90 deg
    [0, 1, 2, 3], // 180 deg
    [2, 0, 3, 1], // 270 deg
];

/// Marker ID -> raw payload (inverse of `ID_TABLE`)
pub fn raw_payload_for_id(id: u8) -> Option<u8> {
    ID_TABLE
        .iter()
        .position(|&v| v == id)
        .map(|raw| raw as u8)
}
