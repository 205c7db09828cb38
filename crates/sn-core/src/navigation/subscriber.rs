//! Navigation subscriber trait

use super::NavigationState;
use crate::store::StateSubscriber;

/// Trait for components that need to respond to navigation changes
pub trait NavigationSubscriber: Send + Sync {
    /// Called when the active item changes
    fn on_navigation_change(&self, state: &NavigationState);
}

impl<S: NavigationSubscriber> StateSubscriber<NavigationState> for S {
    fn on_state_change(&self, state: &NavigationState) {
        self.on_navigation_change(state);
    }
}
