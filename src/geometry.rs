//! Mapping grid spans onto pixel rectangles.
//!
//! The work area is shrunk by the outer padding, split into rows of equal
//! height, and each row into equally wide cells, with the inner padding
//! between neighbors. All arithmetic stays in `f64` until the final rect
//! so that rounding errors do not accumulate across cells.

use crate::catalog::GridPreset;
use crate::command::Rect;
use crate::span;

/// Gaps around and between tiles, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    /// Gap between adjacent tiles.
    pub inner: i32,
    /// Gap between tiles and the work-area border.
    pub outer: i32,
}

/// Pixel rectangle for a span of `preset` cells inside `work_area`.
///
/// Cell width is derived from the anchor row's column count, so on
/// presets with unequal rows a span keeps its anchor row's cell width
/// even where it overlaps a differently divided row. An out-of-range
/// `index` maps to the origin cell.
pub fn span_rect(
    work_area: Rect,
    preset: &GridPreset,
    index: usize,
    row_span: usize,
    col_span: usize,
    padding: Padding,
) -> Rect {
    let (row, col) = span::cell_to_row_col(preset, index).unwrap_or((0, 0));

    let inner = padding.inner as f64;
    let outer = padding.outer as f64;
    let rows = preset.rows_count() as f64;
    let cols = preset.rows[row] as f64;

    let avail_w = work_area.width as f64 - 2.0 * outer;
    let avail_h = work_area.height as f64 - 2.0 * outer;
    let cell_w = (avail_w - (cols - 1.0) * inner) / cols;
    let cell_h = (avail_h - (rows - 1.0) * inner) / rows;

    let x = work_area.x as f64 + outer + col as f64 * (cell_w + inner);
    let y = work_area.y as f64 + outer + row as f64 * (cell_h + inner);
    let width = cell_w * col_span as f64 + inner * (col_span as f64 - 1.0);
    let height = cell_h * row_span as f64 + inner * (row_span as f64 - 1.0);

    Rect {
        x: x.round() as i32,
        y: y.round() as i32,
        width: width.round() as i32,
        height: height.round() as i32,
    }
}
