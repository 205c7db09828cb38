//! Flat navigation: one ring over the global sequence

use sn_core::content::wrap;
use sn_core::Direction;

/// Global index after one step from `current`. Left/Up go back, Right/Down
/// go forward, both wrapping. `None` for an empty collection.
pub fn step(current: usize, count: usize, direction: Direction) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let current = current.min(count - 1) as isize;
    Some(wrap(current + direction.step(), count))
}
