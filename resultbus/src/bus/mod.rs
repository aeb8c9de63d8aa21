//! Lifecycle-aware event delivery between screens.
//!
//! Every screen gets a foreground flag, a FIFO of deferred actions and a set
//! of one-shot listeners (one per event type). Nothing addressed to a screen
//! runs while that screen is in the background: registrations and deliveries
//! are queued and replayed, in order, when the screen comes back.
//!
//! Listeners are consumed by the delivery that fires them. Registering again
//! for the same type on the same screen replaces the pending listener.
//! Listeners are only dropped wholesale when their screen is destroyed.
//!
//! A delayed post starts its timer when the listener becomes eligible to fire,
//! not when the event was posted.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::event::{Event, EventType};
use crate::screen::{ScreenContext, ScreenId};
use crate::timer::{Clock, SystemClock, TimerQueue};

use self::poster::Posted;

pub use self::deferred::DeferredActionQueue;
pub use self::foreground::ForegroundTracker;
pub use self::poster::Poster;
pub use self::registry::{EventRegistry, Listener};

enum DeferredAction {
    Register(Listener),
    Dispatch {
        listener: Listener,
        event: Rc<dyn Event>,
        delay: Duration,
    },
    Run(Box<dyn FnOnce()>),
}

struct DelayedDispatch {
    screen: ScreenId,
    listener: Listener,
    event: Rc<dyn Event>,
}

struct BusState {
    // Order of first contact, which is also delivery order
    screens: Vec<ScreenId>,
    // Ids of destroyed screens, kept for the life of the bus so late calls stay
    // no-ops. Ids are handed out at creation, before the bus hears of them, so
    // a high-water mark can't tell "not attached yet" from "destroyed". One
    // u64 per destroyed screen; everything else about the screen is evicted.
    destroyed: HashSet<ScreenId>,
    foreground: ForegroundTracker,
    deferred: DeferredActionQueue<DeferredAction>,
    registry: EventRegistry,
    timers: TimerQueue<DelayedDispatch>,
}

impl BusState {
    fn new() -> Self {
        Self {
            screens: Vec::new(),
            destroyed: HashSet::new(),
            foreground: ForegroundTracker::new(),
            deferred: DeferredActionQueue::new(),
            registry: EventRegistry::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Lazily creates `screen`. Returns false if it was destroyed.
    fn touch(&mut self, screen: ScreenId) -> bool {
        if self.destroyed.contains(&screen) {
            return false;
        }

        if !self.screens.contains(&screen) {
            self.screens.push(screen);
            self.foreground.touch(screen);
        }
        true
    }
}

/// Handle to the event bus of one UI thread.
///
/// Clones share the same state. The handle cannot leave the thread it was
/// created on; use [`EventBus::poster`] to post from elsewhere.
///
/// No borrow of the shared state is held while user code runs, so listeners
/// and deferred tasks are free to call back into the bus.
#[derive(Clone)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
    clock: Rc<dyn Clock>,
    sender: mpsc::Sender<Posted>,
    incoming: Rc<mpsc::Receiver<Posted>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        let (sender, incoming) = mpsc::channel();

        Self {
            state: Rc::new(RefCell::new(BusState::new())),
            clock,
            sender,
            incoming: Rc::new(incoming),
        }
    }

    pub fn poster(&self) -> Poster {
        Poster::new(self.sender.clone())
    }

    /// Makes the bus aware of `screen`, fixing its place in delivery order.
    pub fn attach(&self, screen: ScreenId) {
        if !self.state.borrow_mut().touch(screen) {
            log!("Not attaching {}, it was destroyed", screen);
        }
    }

    pub fn is_foreground(&self, screen: ScreenId) -> bool {
        self.state.borrow().foreground.is_foreground(screen)
    }

    pub fn is_destroyed(&self, screen: ScreenId) -> bool {
        self.state.borrow().destroyed.contains(&screen)
    }

    pub fn has_listener<E: Event>(&self, screen: ScreenId) -> bool {
        self.state.borrow().registry.contains(screen, EventType::of::<E>())
    }

    pub fn get_pending_count(&self, screen: ScreenId) -> usize {
        self.state.borrow().deferred.len(screen)
    }

    pub fn get_next_deadline(&self) -> Option<Instant> {
        self.state.borrow().timers.get_next_deadline()
    }

    pub fn register<E, F>(&self, screen: ScreenId, listener: F)
    where
        E: Event,
        F: FnOnce(&E) + 'static,
    {
        self.install(screen, Listener::new(listener));
    }

    /// Registers on whichever screen `context` belongs to.
    ///
    /// A fragment that is not attached to a screen has nowhere to receive
    /// events, so nothing is registered. Contexts that do not belong to a
    /// screen at all are a configuration error.
    pub fn register_in<E, F>(&self, context: &ScreenContext, listener: F) -> Result<()>
    where
        E: Event,
        F: FnOnce(&E) + 'static,
    {
        match context.find_screen() {
            Ok(screen) => {
                self.register(screen, listener);
                Ok(())
            },
            Err(Error::DetachedFragment) => {
                log!("Detached fragment, not registering a {:?} listener", EventType::of::<E>());
                Ok(())
            },
            Err(error) => Err(error),
        }
    }

    /// Runs `task` now if `screen` is in the foreground, otherwise queues it
    /// behind the screen's other deferred actions.
    pub fn run_when_foreground<F: FnOnce() + 'static>(&self, screen: ScreenId, task: F) {
        {
            let mut state = self.state.borrow_mut();
            if !state.touch(screen) {
                log!("Dropping a task for destroyed {}", screen);
                return;
            }

            if !state.foreground.is_foreground(screen) {
                state.deferred.enqueue(screen, DeferredAction::Run(Box::new(task)));
                return;
            }
        }

        task();
    }

    pub fn post<E: Event>(&self, event: E) {
        self.dispatch(Rc::new(event), Duration::from_secs(0));
    }

    pub fn post_delayed<E: Event>(&self, event: E, delay: Duration) {
        self.dispatch(Rc::new(event), delay);
    }

    pub fn post_boxed(&self, event: Box<dyn Event>, delay: Duration) {
        self.dispatch(Rc::from(event), delay);
    }

    pub fn notify_foreground(&self, screen: ScreenId) {
        {
            let mut state = self.state.borrow_mut();
            if !state.touch(screen) {
                log!("Ignoring foreground notification for destroyed {}", screen);
                return;
            }
            state.foreground.set_foreground(screen);
        }

        self.drain(screen);
    }

    pub fn notify_background(&self, screen: ScreenId) {
        let mut state = self.state.borrow_mut();
        if !state.touch(screen) {
            log!("Ignoring background notification for destroyed {}", screen);
            return;
        }
        state.foreground.set_background(screen);
    }

    /// Forgets everything about `screen`. Later calls for it are no-ops.
    pub fn notify_destroyed(&self, screen: ScreenId) {
        let (actions, listeners) = {
            let mut state = self.state.borrow_mut();
            if !state.destroyed.insert(screen) {
                return;
            }

            state.screens.retain(|s| *s != screen);
            state.foreground.evict(screen);
            (state.deferred.evict(screen), state.registry.clear(screen))
        };

        log!(
            "{} destroyed, dropped {} deferred actions and {} listeners",
            screen,
            actions.len(),
            listeners.len(),
        );
    }

    /// Handles events marshalled by [`Poster`]s and fires due timers.
    /// Returns how many of those were handled.
    pub fn pump(&self) -> usize {
        let mut handled = 0;
        while let Ok(posted) = self.incoming.try_recv() {
            self.post_boxed(posted.event, posted.delay);
            handled += 1;
        }

        handled + self.fire_due_timers()
    }

    /// Blocks until a [`Poster`] delivers something, the next timer is due,
    /// or `max_wait` elapses, then pumps.
    pub fn wait(&self, max_wait: Duration) -> usize {
        let sleep_time = self.state
            .borrow()
            .timers
            .get_sleep_time(self.clock.now())
            .map_or(max_wait, |t| t.min(max_wait));

        let mut handled = 0;
        if let Ok(posted) = self.incoming.recv_timeout(sleep_time) {
            self.post_boxed(posted.event, posted.delay);
            handled += 1;
        }

        handled + self.pump()
    }

    fn install(&self, screen: ScreenId, listener: Listener) {
        let replaced = {
            let mut state = self.state.borrow_mut();
            if !state.touch(screen) {
                log!("Not registering a {:?} listener on destroyed {}", listener.get_event_type(), screen);
                return;
            }

            if !state.foreground.is_foreground(screen) {
                log!("{} is in the background, deferring a {:?} listener", screen, listener.get_event_type());
                state.deferred.enqueue(screen, DeferredAction::Register(listener));
                return;
            }

            state.registry.set(screen, listener)
        };

        if let Some(replaced) = replaced {
            log!("Replaced the {:?} listener of {}", replaced.get_event_type(), screen);
        }
    }

    fn dispatch(&self, event: Rc<dyn Event>, delay: Duration) {
        let event_type = EventType::of_val(&*event);
        let screens = self.state.borrow().screens.clone();

        let mut recipients = 0;
        for screen in screens {
            let listener = self.state.borrow_mut().registry.take(screen, event_type);
            if let Some(listener) = listener {
                recipients += 1;
                self.schedule(screen, listener, event.clone(), delay);
            }
        }

        if recipients == 0 {
            log!("Nobody is listening for {:?}", event_type);
        }
    }

    fn schedule(&self, screen: ScreenId, listener: Listener, event: Rc<dyn Event>, delay: Duration) {
        {
            let mut state = self.state.borrow_mut();
            if state.destroyed.contains(&screen) {
                return;
            }

            if !state.foreground.is_foreground(screen) {
                log!("{} is in the background, deferring {:?}", screen, event);
                state.deferred.enqueue(screen, DeferredAction::Dispatch { listener, event, delay });
                return;
            }

            if delay > Duration::from_secs(0) {
                let deadline = self.clock.now() + delay;
                state.timers.schedule(deadline, DelayedDispatch { screen, listener, event });
                return;
            }
        }

        listener.invoke(&*event);
    }

    fn drain(&self, screen: ScreenId) {
        loop {
            let action = {
                let mut state = self.state.borrow_mut();
                // An action may have sent the screen back to the background
                if !state.foreground.is_foreground(screen) {
                    break;
                }
                state.deferred.pop(screen)
            };

            match action {
                Some(DeferredAction::Register(listener)) => self.install(screen, listener),
                Some(DeferredAction::Dispatch { listener, event, delay }) => self.schedule(screen, listener, event, delay),
                Some(DeferredAction::Run(task)) => task(),
                None => break,
            }
        }
    }

    fn fire_due_timers(&self) -> usize {
        let mut fired = 0;
        loop {
            let now = self.clock.now();
            let due = self.state.borrow_mut().timers.pop_due(now);
            let DelayedDispatch { screen, listener, event } = match due {
                Some(due) => due,
                None => break,
            };
            fired += 1;

            if self.is_destroyed(screen) {
                log!("{} was destroyed before {:?} was delivered", screen, event);
                continue;
            }

            // Re-checks the foreground: a screen that went to the background
            // in the meantime gets the event as soon as it comes back.
            self.schedule(screen, listener, event, Duration::from_secs(0));
        }
        fired
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EventBus")
            .field("screens", &state.screens)
            .field("destroyed", &state.destroyed.len())
            .field("timers", &state.timers)
            .finish()
    }
}

mod deferred;
mod foreground;
mod poster;
mod registry;
