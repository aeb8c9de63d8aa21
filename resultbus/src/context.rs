use std::fmt;
use std::rc::Rc;

use crate::bridge::{ActivityResult, ResultHosts};
use crate::bus::EventBus;
use crate::config::Config;
use crate::error::Result;
use crate::log::set_log_level;
use crate::platform::Platform;
use crate::screen::ScreenId;

/// Everything a screen needs, and the entry points the host calls as screens
/// go through their lifecycle.
#[derive(Clone)]
pub struct Context {
    pub bus: EventBus,
    pub results: ResultHosts,
    pub platform: Rc<dyn Platform>,
    pub config: Config,
}

impl Context {
    pub fn new(platform: Rc<dyn Platform>, config: Config) -> Self {
        Self::with_bus(EventBus::new(), platform, config)
    }

    /// The log level in `config` applies to the whole process, so the most
    /// recently built context decides it.
    pub fn with_bus(bus: EventBus, platform: Rc<dyn Platform>, config: Config) -> Self {
        set_log_level(config.log_level);

        Self {
            bus,
            results: ResultHosts::new(),
            platform,
            config,
        }
    }

    pub fn on_screen_created(&self) -> ScreenId {
        let screen = ScreenId::next();
        self.bus.attach(screen);
        log!("{} created", screen);
        screen
    }

    pub fn on_screen_post_resumed(&self, screen: ScreenId) {
        self.bus.notify_foreground(screen);
    }

    pub fn on_screen_paused(&self, screen: ScreenId) {
        self.bus.notify_background(screen);
    }

    pub fn on_screen_destroyed(&self, screen: ScreenId) {
        self.results.evict(screen);
        self.bus.notify_destroyed(screen);
    }

    pub fn on_activity_result(&self, screen: ScreenId, result: ActivityResult) -> Result<()> {
        if self.bus.is_destroyed(screen) {
            log!("Dropping result {} for destroyed {}", result.code, screen);
            return Ok(());
        }
        self.results.on_activity_result(screen, &result)
    }

    pub fn on_request_permissions_result(&self, screen: ScreenId) {
        self.results.on_request_permissions_result(screen);
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("bus", &self.bus)
            .field("config", &self.config)
            .finish()
    }
}
