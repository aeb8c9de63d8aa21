use std::sync::mpsc;
use std::time::Duration;

use crate::event::Event;

pub(super) struct Posted {
    pub(super) event: Box<dyn Event>,
    pub(super) delay: Duration,
}

/// Posts events onto the UI thread from anywhere.
///
/// The owning [`EventBus`](super::EventBus) picks them up the next time it is
/// pumped.
#[derive(Clone, Debug)]
pub struct Poster {
    sender: mpsc::Sender<Posted>,
}

impl Poster {
    pub(super) fn new(sender: mpsc::Sender<Posted>) -> Self {
        Self { sender }
    }

    pub fn post<E: Event>(&self, event: E) {
        self.post_delayed(event, Duration::from_secs(0));
    }

    pub fn post_delayed<E: Event>(&self, event: E, delay: Duration) {
        let posted = Posted {
            event: Box::new(event),
            delay,
        };

        if let Err(mpsc::SendError(posted)) = self.sender.send(posted) {
            // The bus went away with the UI thread
            log!(INFO, "Dropping {:?}, the event bus is gone", posted.event);
        }
    }
}
