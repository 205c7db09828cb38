//! Section-exit confirmation: offered when grid navigation runs off the end
//! of a category

use sn_core::{
    store, ContentIndex, NeighborCategory, SectionExitState, Side, StoreReader, StoreWriter,
};
use tracing::debug;

/// The single writer of [`SectionExitState`]
pub struct SectionExitController {
    state: StoreWriter<SectionExitState>,
}

impl SectionExitController {
    pub fn new() -> Self {
        let (_, state) = store(SectionExitState::default());
        Self { state }
    }

    pub fn reader(&self) -> StoreReader<SectionExitState> {
        self.state.reader()
    }

    pub fn is_visible(&self) -> bool {
        self.state.with(|s| s.is_visible)
    }

    pub fn state(&self) -> SectionExitState {
        self.state.get()
    }

    /// Show the modal for `category`. Neighbours are the nearest non-empty
    /// categories on each side, wrapping, and absent with fewer than two
    /// categories.
    pub fn open<P>(&mut self, index: &ContentIndex<P>, category: usize) -> bool {
        let neighbor = |step: isize| {
            index.next_non_empty_category(category, step).and_then(|i| {
                index.category(i).map(|c| NeighborCategory {
                    index: i,
                    title: c.display_title().to_string(),
                })
            })
        };

        let state = SectionExitState {
            is_visible: true,
            current_category_index: category,
            current_category_title: index
                .category(category)
                .map(|c| c.display_title().to_string())
                .unwrap_or_default(),
            left_category: neighbor(-1),
            right_category: neighbor(1),
            selected_side: Side::None,
        };
        debug!(
            category,
            left = ?state.left_category.as_ref().map(|n| n.index),
            right = ?state.right_category.as_ref().map(|n| n.index),
            "Opening section exit"
        );
        self.state.set(state)
    }

    /// Highlight a side without confirming
    pub fn highlight(&mut self, side: Side) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.state.update(|s| s.selected_side = side)
    }

    /// Confirm the highlighted side. Returns the target category and hides
    /// the modal; with nothing to act on the modal stays open.
    pub fn confirm(&mut self) -> Option<usize> {
        let target = self.state.with(|s| {
            if !s.is_visible {
                return None;
            }
            s.neighbor(s.selected_side).map(|n| n.index)
        })?;

        self.hide();
        debug!(target, "Section exit confirmed");
        Some(target)
    }

    /// Highlight and confirm `side` in one go
    pub fn select(&mut self, side: Side) -> Option<usize> {
        if !self.is_visible() {
            return None;
        }
        self.highlight(side);
        self.confirm()
    }

    /// Hide without navigating
    pub fn cancel(&mut self) -> bool {
        if !self.is_visible() {
            return false;
        }
        debug!("Section exit cancelled");
        self.hide()
    }

    fn hide(&mut self) -> bool {
        self.state.update(|s| {
            s.is_visible = false;
            s.selected_side = Side::None;
        })
    }
}

impl Default for SectionExitController {
    fn default() -> Self {
        Self::new()
    }
}
