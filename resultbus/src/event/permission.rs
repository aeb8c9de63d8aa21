use crate::event::Event;

#[derive(Clone, Debug, Event, PartialEq)]
pub struct PermissionsGrantedEvent {
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, Event, PartialEq)]
pub struct PermissionsDeniedEvent {
    pub permissions: Vec<String>,
}
