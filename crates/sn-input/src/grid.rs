//! Grid navigation: rows inside a category, columns between categories

use sn_core::{ContentIndex, Direction};

/// Result of one grid step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMove {
    /// Move to this global index
    To(usize),
    /// Vertical step left the category
    Boundary,
    /// Nothing to move to
    Stay,
}

/// One grid step from `(category, item)`.
///
/// Up/Down never wrap. Left/Right wrap over categories, skip empty ones and
/// keep the item index, clamped to the destination length.
pub fn step<P>(index: &ContentIndex<P>, category: usize, item: usize, direction: Direction) -> GridMove {
    if index.is_empty() {
        return GridMove::Stay;
    }

    if direction.is_vertical() {
        let len = index.category_len(category) as isize;
        let target = item as isize + direction.step();
        if target < 0 || target >= len {
            return GridMove::Boundary;
        }
        return index
            .item_at(category, target as usize)
            .map(|i| GridMove::To(i.global_index))
            .unwrap_or(GridMove::Stay);
    }

    let Some(destination) = index.next_non_empty_category(category, direction.step()) else {
        return GridMove::Stay;
    };
    let last = index.category_len(destination).saturating_sub(1);
    index
        .item_at(destination, item.min(last))
        .map(|i| GridMove::To(i.global_index))
        .unwrap_or(GridMove::Stay)
}
