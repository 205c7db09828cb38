//! The single writer of [`NavigationState`]

use std::sync::Arc;

use sn_core::{
    store, ContentIndex, Direction, NavigationMode, NavigationState, StateSubscriber, StoreReader,
    StoreWriter,
};
use tracing::debug;

use crate::flat;
use crate::grid::{self, GridMove};

/// What a navigation request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { from: Option<usize>, to: usize },
    /// Grid vertical step hit the edge of `category`; state untouched
    Boundary { category: usize, direction: Direction },
    Unchanged,
}

/// Owns the navigation state and applies flat/grid steps and jumps
pub struct NavigationController {
    state: StoreWriter<NavigationState>,
}

impl NavigationController {
    pub fn new() -> Self {
        let (_, state) = store(NavigationState::empty());
        Self { state }
    }

    pub fn reader(&self) -> StoreReader<NavigationState> {
        self.state.reader()
    }

    pub fn subscribe(&self, subscriber: &Arc<dyn StateSubscriber<NavigationState>>) {
        self.state.reader().subscribe(subscriber);
    }

    pub fn state(&self) -> NavigationState {
        self.state.get()
    }

    /// Re-anchor after a content change, keeping `preferred` if it still
    /// exists and falling back to the first item otherwise
    pub fn reset<P>(&mut self, index: &ContentIndex<P>, preferred: Option<&str>) -> NavOutcome {
        if index.is_empty() {
            self.state.set(NavigationState::empty());
            return NavOutcome::Unchanged;
        }
        let to = index.resolve_active(preferred);
        self.jump_to(index, to)
    }

    /// Global index of the active item
    pub fn current<P>(&self, index: &ContentIndex<P>) -> Option<usize> {
        self.state.with(|s| s.active_global_index(index))
    }

    /// One step in `mode`
    pub fn step<P>(&mut self, index: &ContentIndex<P>, mode: NavigationMode, direction: Direction) -> NavOutcome {
        let Some(current) = self.current(index) else {
            return NavOutcome::Unchanged;
        };

        let target = match mode {
            NavigationMode::Flat => flat::step(current, index.len(), direction),
            NavigationMode::Grid => {
                let (category, item) = self
                    .state
                    .with(|s| (s.active_category_index, s.active_item_index));
                match grid::step(index, category, item, direction) {
                    GridMove::To(global) => Some(global),
                    GridMove::Boundary => {
                        debug!(category, ?direction, "Category boundary reached");
                        return NavOutcome::Boundary { category, direction };
                    }
                    GridMove::Stay => None,
                }
            }
        };

        match target {
            Some(to) => self.jump_to(index, to),
            None => NavOutcome::Unchanged,
        }
    }

    /// Activate the item at `global`
    pub fn jump_to<P>(&mut self, index: &ContentIndex<P>, global: usize) -> NavOutcome {
        let Some(item) = index.get(global) else {
            return NavOutcome::Unchanged;
        };
        let from = self.current(index);
        if self.state.set(NavigationState::at(item)) {
            debug!(from = ?from, to = global, id = %item.id, "Active item changed");
            NavOutcome::Moved { from, to: global }
        } else {
            NavOutcome::Unchanged
        }
    }

    /// Activate the item with `id`; unknown ids are ignored
    pub fn jump_to_id<P>(&mut self, index: &ContentIndex<P>, id: &str) -> NavOutcome {
        match index.position_of(id) {
            Some(global) => self.jump_to(index, global),
            None => {
                debug!(id, "Ignoring navigation to unknown item");
                NavOutcome::Unchanged
            }
        }
    }

    /// Activate the first item of `category`. Empty categories are a no-op.
    pub fn jump_to_category<P>(&mut self, index: &ContentIndex<P>, category: usize) -> NavOutcome {
        match index.item_at(category, 0) {
            Some(item) => self.jump_to(index, item.global_index),
            None => NavOutcome::Unchanged,
        }
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}

impl NavOutcome {
    pub fn moved_to(&self) -> Option<usize> {
        match self {
            NavOutcome::Moved { to, .. } => Some(*to),
            _ => None,
        }
    }
}
