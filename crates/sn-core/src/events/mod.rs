//! Typed publish/subscribe between the engine and its hosts

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Anything published on the bus
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Receives every event of the type it was subscribed under
pub trait EventHandler: Send {
    fn handle(&mut self, event: &dyn Event);
}

type SharedHandler = Arc<Mutex<Box<dyn EventHandler>>>;

/// Engine-wide event bus.
///
/// Handlers run with no bus lock held, so a handler may publish or
/// subscribe. Handlers added during a publish see the next event of that
/// type, not the current one. A handler reached again by its own publish is
/// skipped for the nested event.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<SharedHandler>>>>,
}

/// Events raised by the engine for overlays and hosts
pub mod events {
    use super::Event;
    use crate::browse::ControlType;

    /// Content was (re)loaded and flattened
    #[derive(Debug, Clone)]
    pub struct ContentLoaded {
        pub item_count: usize,
        pub category_count: usize,
        pub generation: u64,
    }

    /// The active item changed
    #[derive(Debug, Clone)]
    pub struct ActiveItemChanged {
        pub item_id: String,
        pub global_index: usize,
        pub category_index: usize,
        pub item_index: usize,
    }

    /// Section-exit modal opened at a category boundary
    #[derive(Debug, Clone)]
    pub struct SectionExitShown {
        pub category_index: usize,
        pub left: Option<usize>,
        pub right: Option<usize>,
    }

    /// Section-exit modal closed; `target` is set when the user confirmed
    #[derive(Debug, Clone)]
    pub struct SectionExitHidden {
        pub target: Option<usize>,
    }

    /// Browse mode entered or left
    #[derive(Debug, Clone)]
    pub struct BrowseModeChanged {
        pub active: bool,
        pub control_type: ControlType,
        pub restored: bool,
    }

    /// Active layout switched
    #[derive(Debug, Clone)]
    pub struct LayoutChanged {
        pub layout: String,
        pub previous: Option<String>,
    }

    /// Camera finished its last requested motion
    #[derive(Debug, Clone)]
    pub struct CameraSettled {
        pub focused_item: Option<usize>,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        ContentLoaded,
        ActiveItemChanged,
        SectionExitShown,
        SectionExitHidden,
        BrowseModeChanged,
        LayoutChanged,
        CameraSettled
    );
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        self.handlers
            .lock()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Arc::new(Mutex::new(handler)));
    }

    /// Subscribe with a closure receiving the concrete event
    pub fn on<E: Event, F>(&self, mut f: F)
    where
        F: FnMut(&E) + Send + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler of its type, in subscription order
    pub fn publish<E: Event>(&self, event: E) {
        let targets = match self.handlers.lock().get(&TypeId::of::<E>()) {
            Some(handlers) => handlers.clone(),
            None => return,
        };

        for handler in targets {
            match handler.try_lock() {
                Some(mut handler) => handler.handle(&event),
                None => tracing::trace!("handler busy with an outer event, skipped"),
            }
        }
    }
}

struct ClosureHandler<F> {
    f: F,
}

impl<F> EventHandler for ClosureHandler<F>
where
    F: FnMut(&dyn Event) + Send,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.f)(event);
    }
}

/// Box a closure as an untyped handler
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + 'static,
{
    Box::new(ClosureHandler { f })
}

#[cfg(test)]
mod tests {
    use super::events::{ActiveItemChanged, LayoutChanged, SectionExitHidden};
    use super::*;

    fn layout(name: &str) -> LayoutChanged {
        LayoutChanged {
            layout: name.to_string(),
            previous: None,
        }
    }

    #[test]
    fn test_typed_delivery() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.on::<LayoutChanged, _>(move |event| sink.lock().push(event.layout.clone()));

        bus.publish(LayoutChanged {
            layout: "deck".to_string(),
            previous: Some("pillar".to_string()),
        });
        bus.publish(SectionExitHidden { target: None });

        assert_eq!(*seen.lock(), vec!["deck".to_string()]);
        assert_eq!(bus.handler_count::<LayoutChanged>(), 1);
        assert_eq!(bus.handler_count::<SectionExitHidden>(), 0);
    }

    #[test]
    fn test_handlers_may_publish_and_subscribe() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.on::<LayoutChanged, _>(move |event| sink.lock().push(event.layout.clone()));

        let inner = bus.clone();
        let sink = seen.clone();
        bus.on::<ActiveItemChanged, _>(move |event| {
            inner.publish(layout(&event.item_id));
            let late = sink.clone();
            inner.on::<LayoutChanged, _>(move |_| late.lock().push("late".to_string()));
        });

        bus.publish(ActiveItemChanged {
            item_id: "a".to_string(),
            global_index: 0,
            category_index: 0,
            item_index: 0,
        });
        assert_eq!(*seen.lock(), vec!["a".to_string()]);

        bus.publish(layout("b"));
        assert_eq!(*seen.lock(), vec!["a".to_string(), "b".to_string(), "late".to_string()]);
    }

    #[test]
    fn test_recursive_publish_skips_busy_handler() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));

        let inner = bus.clone();
        let calls = count.clone();
        bus.on::<LayoutChanged, _>(move |_| {
            *calls.lock() += 1;
            inner.publish(layout("again"));
        });

        bus.publish(layout("once"));
        assert_eq!(*count.lock(), 1);
    }
}
