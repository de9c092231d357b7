//! Typed event bus
//!
//! Replaces loosely-typed listener-group broadcasts with a registry of
//! typed callback handles. Handlers are invoked synchronously, in
//! registration order; a handler subscribed to a kind only sees events of
//! that kind.

use crate::models::{EventKind, SessionEvent};

pub type Handler = Box<dyn FnMut(&SessionEvent)>;

/// Opaque subscription handle, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: Vec<(HandlerId, Option<EventKind>, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&SessionEvent) + 'static) -> HandlerId {
        self.push(Some(kind), Box::new(handler))
    }

    /// Register a handler for every event.
    pub fn subscribe_all(&mut self, handler: impl FnMut(&SessionEvent) + 'static) -> HandlerId {
        self.push(None, Box::new(handler))
    }

    fn push(&mut self, kind: Option<EventKind>, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, kind, handler));
        id
    }

    /// Remove a subscription. Returns false if the handle was already gone.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(hid, _, _)| *hid != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every matching handler, in registration order.
    pub fn emit(&mut self, event: &SessionEvent) {
        let kind = event.kind();
        for (_, filter, handler) in &mut self.handlers {
            if filter.map_or(true, |f| f == kind) {
                handler(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("handlers", &self.handlers.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn score_event(player: u32) -> SessionEvent {
        SessionEvent::ScoreChanged {
            player_score: player,
            opponent_score: 0,
        }
    }

    #[test]
    fn test_typed_subscription_filters_kinds() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));

        let seen_inner = Rc::clone(&seen);
        bus.subscribe(EventKind::ScoreChanged, move |_| {
            *seen_inner.borrow_mut() += 1;
        });

        bus.emit(&score_event(1));
        bus.emit(&SessionEvent::StateChanged {
            phase: crate::shootout::GamePhase::PlayerShooting,
        });

        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_handlers_fire_in_registration_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            bus.subscribe_all(move |_| order.borrow_mut().push(tag));
        }

        bus.emit(&score_event(0));
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));

        let seen_inner = Rc::clone(&seen);
        let id = bus.subscribe_all(move |_| {
            *seen_inner.borrow_mut() += 1;
        });

        bus.emit(&score_event(0));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&score_event(1));

        assert_eq!(*seen.borrow(), 1);
    }
}
