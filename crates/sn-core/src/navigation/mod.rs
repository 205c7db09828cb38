use serde::{Deserialize, Serialize};

use crate::content::{ContentIndex, ContentItem};

mod subscriber;

pub use subscriber::NavigationSubscriber;

/// How arrow-style input maps onto the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// One logical line/ring over the global sequence
    Flat,
    /// Rows within a category, columns between categories
    Grid,
}

/// Navigation direction requested by input or the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// `-1` for up/left, `+1` for down/right
    pub fn step(self) -> isize {
        match self {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        }
    }
}

/// The active item.
///
/// `active_item_id` is canonical; the index fields are denormalised copies
/// that every transition keeps consistent. The global index is always
/// derived through the content index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub active_category_index: usize,
    pub active_item_index: usize,
    pub active_item_id: Option<String>,
}

impl NavigationState {
    /// State pointing at `item`
    pub fn at<P>(item: &ContentItem<P>) -> Self {
        Self {
            active_category_index: item.category_index,
            active_item_index: item.item_index,
            active_item_id: Some(item.id.clone()),
        }
    }

    /// Nothing is active (empty collection)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.active_item_id.is_none()
    }

    /// Global index of the active item; `None` while nothing is active
    pub fn active_global_index<P>(&self, index: &ContentIndex<P>) -> Option<usize> {
        if index.is_empty() {
            return None;
        }
        self.active_item_id
            .as_deref()
            .map(|id| index.resolve_active(Some(id)))
    }

    /// Whether the denormalised indices agree with the id
    pub fn is_consistent_with<P>(&self, index: &ContentIndex<P>) -> bool {
        match self.active_item_id.as_deref() {
            None => index.is_empty(),
            Some(id) => index
                .position_of(id)
                .and_then(|global| index.get(global))
                .map(|item| {
                    item.category_index == self.active_category_index
                        && item.item_index == self.active_item_index
                })
                .unwrap_or(false),
        }
    }
}
