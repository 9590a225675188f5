//! Picking the spatially nearest window in a direction.

use crate::command::{Direction, Rect, WindowId, WindowInfo};

/// Minimum center displacement along the direction's axis for a window
/// to count as lying in that direction. Filters out windows that only
/// jitter around the current one's axis position.
const DIRECTION_THRESHOLD: f64 = 10.0;

/// The nearest window whose center lies in `direction` from the current
/// window's center, by Euclidean center distance. Equal distances keep
/// the first candidate in list order. `None` when no window qualifies.
pub fn select_neighbor<'a>(
    windows: &'a [WindowInfo],
    current: WindowId,
    current_frame: Rect,
    direction: Direction,
) -> Option<&'a WindowInfo> {
    let (cx, cy) = current_frame.center();

    windows
        .iter()
        .filter(|w| w.id != current)
        .filter_map(|w| {
            let (wx, wy) = w.frame.center();
            let (dx, dy) = (wx - cx, wy - cy);
            let valid = match direction {
                Direction::Left => dx < -DIRECTION_THRESHOLD,
                Direction::Right => dx > DIRECTION_THRESHOLD,
                Direction::Up => dy < -DIRECTION_THRESHOLD,
                Direction::Down => dy > DIRECTION_THRESHOLD,
            };
            // Squared distance orders the same as the distance itself.
            valid.then_some((w, dx * dx + dy * dy))
        })
        // A strict comparison keeps the first candidate on ties, which
        // makes the pick stable but list-order dependent.
        .fold(None::<(&WindowInfo, f64)>, |best, cand| match best {
            Some(b) if b.1 <= cand.1 => Some(b),
            _ => Some(cand),
        })
        .map(|(w, _)| w)
}
