//! Linear-index ↔ (row, col) resolution for irregular grids.
//!
//! Because rows of a [`GridPreset`] may have unequal widths, a cell's
//! position cannot be derived with a plain division; the row boundaries
//! have to be scanned. Both functions here are pure and side-effect free,
//! and everything else in the crate that reasons about grid coordinates
//! goes through them.

use crate::catalog::GridPreset;

/// Decode a linear cell index into `(row, col)` under `preset`.
///
/// Scans rows in order, accumulating a running cell count; the first row
/// whose cumulative range contains `index` is the answer. Returns `None`
/// when `index` is past the last cell. Indices are produced internally by
/// [`row_col_to_cell`], so the `None` path should never fire at runtime,
/// but callers must still clamp rather than assume.
pub fn cell_to_row_col(preset: &GridPreset, index: usize) -> Option<(usize, usize)> {
    let mut acc = 0;
    for (row, cols) in preset.rows.iter().enumerate() {
        if index < acc + cols {
            return Some((row, index - acc));
        }
        acc += cols;
    }
    None
}

/// Encode `(row, col)` back into a linear cell index: the sum of the row
/// widths before `row`, plus `col`.
///
/// Deliberately unvalidated arithmetic. After a vertical move between rows
/// of unequal width, `col` may exceed the destination row's width; the
/// resulting index then resolves into a following row, exactly as the
/// transform contract specifies.
pub fn row_col_to_cell(preset: &GridPreset, row: usize, col: usize) -> usize {
    preset.rows.iter().take(row).sum::<usize>() + col
}
