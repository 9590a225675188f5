//! Directional move / expand / shrink steps over a grid preset.
//!
//! A transform takes a window's [`TilingState`], decodes the anchor cell
//! into row/column coordinates, applies one step in the requested
//! direction, and re-encodes. Steps that would leave the grid or shrink a
//! span below one cell leave the state unchanged; the caller still
//! re-applies the (possibly identical) tile, which snaps a drifted window
//! back onto it.

use crate::catalog;
use crate::command::{Action, Direction};
use crate::span;
use crate::state::TilingState;

/// Apply one move / expand / shrink step to `state`.
///
/// Move shifts the anchor by one cell. Expand grows the span by one row
/// or column toward the direction (left/up also pull the anchor along so
/// the far edge stays put). Shrink drops one row or column: shrink-left
/// gives up the rightmost column, shrink-right the leftmost (anchor
/// shifts right), and vertically alike.
///
/// An out-of-range anchor index decodes to the origin cell, and an
/// unknown preset key is resolved to the default preset before stepping;
/// the returned state carries the resolved key.
pub fn transform(state: &TilingState, action: Action, direction: Direction) -> TilingState {
    let (key, preset) = catalog::get_or_default(&state.preset_key);
    let rows = preset.rows;
    let rows_count = preset.rows_count();

    let (mut row, mut col) = span::cell_to_row_col(preset, state.index).unwrap_or((0, 0));
    let mut row_span = state.row_span;
    let mut col_span = state.col_span;

    match action {
        Action::Move => match direction {
            Direction::Left if col > 0 => col -= 1,
            Direction::Right if col + col_span < rows[row] => col += 1,
            Direction::Up if row > 0 => row -= 1,
            Direction::Down if row + row_span < rows_count => row += 1,
            _ => {}
        },
        Action::Expand => match direction {
            Direction::Left if col > 0 => {
                col -= 1;
                col_span += 1;
            }
            Direction::Right if col + col_span < rows[row] => col_span += 1,
            Direction::Up if row > 0 => {
                row -= 1;
                row_span += 1;
            }
            Direction::Down if row + row_span < rows_count => row_span += 1,
            _ => {}
        },
        Action::Shrink => match direction {
            Direction::Left if col_span > 1 => col_span -= 1,
            Direction::Right if col_span > 1 => {
                col += 1;
                col_span -= 1;
            }
            Direction::Up if row_span > 1 => row_span -= 1,
            Direction::Down if row_span > 1 => {
                row += 1;
                row_span -= 1;
            }
            _ => {}
        },
    }

    TilingState {
        preset_key: key.to_string(),
        index: span::row_col_to_cell(preset, row, col),
        row_span,
        col_span,
    }
}
