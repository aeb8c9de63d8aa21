use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::bridge::{Intent, ResultHosts};
use crate::config::Config;
use crate::context::Context;
use crate::event::Event;
use crate::log::LogLevel;
use crate::platform::{Platform, SDK_S};
use crate::screen::ScreenId;

/// Ordered log of what fired.
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: &str) {
        self.entries.borrow_mut().push(entry.to_string());
    }

    pub fn get(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn listener<E: Event>(&self, label: &str) -> impl FnOnce(&E) + 'static {
        let recorder = self.clone();
        let label = label.to_string();
        move |_: &E| recorder.record(&label)
    }

    pub fn task(&self, label: &str) -> impl FnOnce() + 'static {
        let recorder = self.clone();
        let label = label.to_string();
        move || recorder.record(&label)
    }
}

/// Platform double that grants what it is told to and records the rest.
pub struct RecordingPlatform {
    sdk_level: Cell<u32>,
    granted: RefCell<HashSet<String>>,
    rationale: RefCell<HashSet<String>>,
    started: RefCell<Vec<Intent>>,
    requests: RefCell<Vec<Vec<String>>>,
    toasts: RefCell<Vec<String>>,
    answer_to: RefCell<Option<ResultHosts>>,
}

impl RecordingPlatform {
    pub fn new(sdk_level: u32) -> Self {
        Self {
            sdk_level: Cell::new(sdk_level),
            granted: RefCell::new(HashSet::new()),
            rationale: RefCell::new(HashSet::new()),
            started: RefCell::new(Vec::new()),
            requests: RefCell::new(Vec::new()),
            toasts: RefCell::new(Vec::new()),
            answer_to: RefCell::new(None),
        }
    }

    pub fn set_sdk_level(&self, sdk_level: u32) {
        self.sdk_level.set(sdk_level);
    }

    pub fn grant(&self, permission: &str) {
        self.granted.borrow_mut().insert(permission.to_string());
    }

    pub fn show_rationale_for(&self, permission: &str) {
        self.rationale.borrow_mut().insert(permission.to_string());
    }

    /// Answers permission requests before `request_permissions` returns.
    pub fn answer_synchronously(&self, hosts: ResultHosts) {
        *self.answer_to.borrow_mut() = Some(hosts);
    }

    pub fn get_started(&self) -> Vec<Intent> {
        self.started
            .borrow()
            .iter()
            .map(|i| Intent::from_bytes(&i.to_bytes().expect("Can't encode intent")).expect("Can't decode intent"))
            .collect()
    }

    pub fn get_requests(&self) -> Vec<Vec<String>> {
        self.requests.borrow().clone()
    }

    pub fn get_toasts(&self) -> Vec<String> {
        self.toasts.borrow().clone()
    }
}

impl Platform for RecordingPlatform {
    fn get_sdk_level(&self) -> u32 {
        self.sdk_level.get()
    }

    fn start_activity(&self, _from: ScreenId, intent: &Intent) {
        // Intents aren't Clone, so store a copy that went through the codec
        let copy = Intent::from_bytes(&intent.to_bytes().expect("Can't encode intent")).expect("Can't decode intent");
        self.started.borrow_mut().push(copy);
    }

    fn check_self_permission(&self, permission: &str) -> bool {
        self.granted.borrow().contains(permission)
    }

    fn should_show_rationale(&self, _screen: ScreenId, permission: &str) -> bool {
        self.rationale.borrow().contains(permission)
    }

    fn request_permissions(&self, screen: ScreenId, permissions: &[String]) {
        self.requests.borrow_mut().push(permissions.to_vec());

        let hosts = self.answer_to.borrow().clone();
        if let Some(hosts) = hosts {
            hosts.on_request_permissions_result(screen);
        }
    }

    fn show_toast(&self, _screen: ScreenId, message: &str) {
        self.toasts.borrow_mut().push(message.to_string());
    }
}

pub fn test_context() -> (Context, Rc<RecordingPlatform>) {
    let platform = Rc::new(RecordingPlatform::new(SDK_S));
    let config = Config {
        log_level: LogLevel::VERBOSE,
        ..Config::default()
    };

    (Context::new(platform.clone(), config), platform)
}
