//! Shared state containers with a single writer
//!
//! A store is split once into a cloneable [`StoreReader`] handed to overlays
//! and consumers, and one non-cloneable [`StoreWriter`] owned by the only
//! component allowed to mutate that state.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// Components that react to state changes
pub trait StateSubscriber<T>: Send + Sync {
    fn on_state_change(&self, state: &T);
}

struct Shared<T> {
    state: RwLock<T>,
    subscribers: RwLock<Vec<Weak<dyn StateSubscriber<T>>>>,
}

/// Create a store and split it into its reader and writer halves
pub fn store<T>(initial: T) -> (StoreReader<T>, StoreWriter<T>)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let shared = Arc::new(Shared {
        state: RwLock::new(initial),
        subscribers: RwLock::new(Vec::new()),
    });
    (
        StoreReader {
            shared: shared.clone(),
        },
        StoreWriter { shared },
    )
}

/// Read-only handle
pub struct StoreReader<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for StoreReader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + 'static> StoreReader<T> {
    /// Snapshot of the current state
    pub fn get(&self) -> T {
        self.shared.state.read().clone()
    }

    /// Borrow the state for the duration of `f`
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.state.read())
    }

    /// Register a subscriber. Only a weak reference is kept.
    pub fn subscribe(&self, subscriber: &Arc<dyn StateSubscriber<T>>) {
        self.shared.subscribers.write().push(Arc::downgrade(subscriber));
    }
}

/// The single mutable handle
pub struct StoreWriter<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + PartialEq + 'static> StoreWriter<T> {
    pub fn reader(&self) -> StoreReader<T> {
        StoreReader {
            shared: self.shared.clone(),
        }
    }

    pub fn get(&self) -> T {
        self.shared.state.read().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.state.read())
    }

    /// Replace the state. Returns whether it changed.
    pub fn set(&mut self, state: T) -> bool {
        self.update(|current| *current = state)
    }

    /// Mutate in place; subscribers are notified after the lock is released
    /// and only when the state actually changed.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        let snapshot = {
            let mut state = self.shared.state.write();
            let before = state.clone();
            f(&mut state);
            if *state == before {
                return false;
            }
            state.clone()
        };
        self.notify(&snapshot);
        true
    }

    fn notify(&self, state: &T) {
        let mut subscribers = self.shared.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        let live: Vec<_> = subscribers.iter().filter_map(Weak::upgrade).collect();
        drop(subscribers);

        for subscriber in live {
            subscriber.on_state_change(state);
        }
    }
}
