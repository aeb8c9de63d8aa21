use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::bridge::{ActivityResult, Intent};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::screen::ScreenContext;

type ResultMapper = Box<dyn FnOnce(Option<&Intent>) -> Option<Box<dyn Event>>>;
type Hook = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Starts a screen for a result and turns that result into an event.
///
/// ```ignore
/// ResultLauncher::new()
///     .add_result_mapper(RESULT_OK, |data: Option<&Intent>| {
///         data.and_then(|d| d.get_data()).map(|uri| OnImageChosen { uri: uri.to_string() })
///     })
///     .start(&context, &ScreenContext::from(screen), Intent::new().with_action(ACTION_GET_CONTENT))?;
/// ```
#[derive(Default)]
pub struct ResultLauncher {
    mappers: HashMap<i32, ResultMapper>,
    on_started: Option<Hook>,
    on_stopped: Option<Hook>,
}

impl ResultLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the launched screen finishes with `code`, posts whatever `mapper` returns.
    pub fn add_result_mapper<E, F>(mut self, code: i32, mapper: F) -> Self
    where
        E: Event,
        F: FnOnce(Option<&Intent>) -> Option<E> + 'static,
    {
        self.mappers.insert(code, Box::new(move |data: Option<&Intent>| {
            mapper(data).map(|event| Box::new(event) as Box<dyn Event>)
        }));
        self
    }

    /// Like [`add_result_mapper`](Self::add_result_mapper), for results that don't need an event.
    pub fn do_on_result<F>(mut self, code: i32, consumer: F) -> Self
    where
        F: FnOnce(Option<&Intent>) + 'static,
    {
        self.mappers.insert(code, Box::new(move |data: Option<&Intent>| {
            consumer(data);
            None
        }));
        self
    }

    pub fn on_started<F: FnOnce() -> anyhow::Result<()> + 'static>(mut self, hook: F) -> Self {
        self.on_started = Some(Box::new(hook));
        self
    }

    pub fn on_stopped<F: FnOnce() -> anyhow::Result<()> + 'static>(mut self, hook: F) -> Self {
        self.on_stopped = Some(Box::new(hook));
        self
    }

    pub fn start(self, context: &Context, from: &ScreenContext, intent: Intent) -> Result<()> {
        if self.mappers.is_empty() {
            return Err(Error::MissingResultMappers);
        }
        let screen = from.find_screen()?;
        if context.bus.is_destroyed(screen) {
            log!("Not launching {:?} from destroyed {}", intent, screen);
            return Ok(());
        }

        let Self { mut mappers, on_started, on_stopped } = self;
        let bus = context.bus.clone();
        context.results.expect_result(screen, Box::new(move |result: &ActivityResult| {
            match mappers.remove(&result.code) {
                Some(mapper) => {
                    if let Some(event) = mapper(result.data.as_ref()) {
                        bus.post_boxed(event, Duration::from_secs(0));
                    }
                },
                None => log!("No mapper for result code {}", result.code),
            }

            match on_stopped {
                Some(hook) => hook().map_err(Error::Hook),
                None => Ok(()),
            }
        }));

        log!("{} starting {:?}", screen, intent);
        context.platform.start_activity(screen, &intent);

        match on_started {
            Some(hook) => hook().map_err(Error::Hook),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ResultLauncher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut codes: Vec<&i32> = self.mappers.keys().collect();
        codes.sort();
        f.debug_struct("ResultLauncher")
            .field("result_codes", &codes)
            .field("on_started", &self.on_started.is_some())
            .field("on_stopped", &self.on_stopped.is_some())
            .finish()
    }
}
