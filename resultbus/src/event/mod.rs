use std::any::{self, Any, TypeId};
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

use crate::util::AsAny;

pub use resultbus_derive::Event;

pub use self::permission::{PermissionsDeniedEvent, PermissionsGrantedEvent};

/// Anything that can be posted through the bus.
///
/// The concrete type of an event is its dispatch key. Events must be `Send`
/// so that they can be handed to the UI thread through a [`Poster`](crate::Poster).
pub trait Event: AsAny + Debug + Send + 'static { }

/// Dispatch key of an event: its concrete type.
#[derive(Clone, Copy)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    pub fn of<E: Event>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: any::type_name::<E>(),
        }
    }

    pub fn of_val(event: &dyn Event) -> Self {
        Self {
            id: event.as_any().type_id(),
            name: event.type_name(),
        }
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType { }

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn downcast<E: Any>(event: &dyn Event) -> Option<&E> {
    event.as_any().downcast_ref::<E>()
}

mod permission;
