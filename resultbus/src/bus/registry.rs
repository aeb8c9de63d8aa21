use std::collections::HashMap;
use std::fmt;

use crate::event::{self, Event, EventType};
use crate::screen::ScreenId;
use crate::util::AsAny;

/// A one-shot callback waiting for one event type.
pub struct Listener {
    event_type: EventType,
    callback: Box<dyn FnOnce(&dyn Event)>,
}

impl Listener {
    pub fn new<E, F>(callback: F) -> Self
    where
        E: Event,
        F: FnOnce(&E) + 'static,
    {
        let event_type = EventType::of::<E>();
        Self {
            event_type,
            callback: Box::new(move |posted: &dyn Event| match event::downcast::<E>(posted) {
                Some(posted) => callback(posted),
                None => log!(ERROR, "Listener for {:?} was handed a {}", event_type, posted.type_name()),
            }),
        }
    }

    pub fn get_event_type(&self) -> EventType {
        self.event_type
    }

    pub fn invoke(self, event: &dyn Event) {
        (self.callback)(event)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event_type", &self.event_type)
            .finish()
    }
}

/// At most one listener per (screen, event type).
#[derive(Debug, Default)]
pub struct EventRegistry {
    listeners: HashMap<ScreenId, HashMap<EventType, Listener>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `listener`, returning the one it replaced.
    pub fn set(&mut self, screen: ScreenId, listener: Listener) -> Option<Listener> {
        self.listeners
            .entry(screen)
            .or_insert_with(HashMap::new)
            .insert(listener.get_event_type(), listener)
    }

    pub fn take(&mut self, screen: ScreenId, event_type: EventType) -> Option<Listener> {
        let listeners = self.listeners.get_mut(&screen)?;
        let listener = listeners.remove(&event_type);
        if listeners.is_empty() {
            self.listeners.remove(&screen);
        }
        listener
    }

    pub fn contains(&self, screen: ScreenId, event_type: EventType) -> bool {
        self.listeners
            .get(&screen)
            .map_or(false, |l| l.contains_key(&event_type))
    }

    pub fn clear(&mut self, screen: ScreenId) -> Vec<Listener> {
        self.listeners
            .remove(&screen)
            .map(|l| l.into_iter().map(|(_, listener)| listener).collect())
            .unwrap_or_default()
    }
}
