use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::bridge::ActivityResult;
use crate::error::Result;
use crate::screen::ScreenId;

pub(crate) type ResultParser = Box<dyn FnOnce(&ActivityResult) -> Result<()>>;
pub(crate) type PermissionsAction = Box<dyn FnOnce()>;

#[derive(Default)]
struct HostQueues {
    result_parsers: VecDeque<ResultParser>,
    permission_actions: VecDeque<PermissionsAction>,
}

/// Work each screen is waiting to do when the platform calls it back with an
/// activity result or a permission answer.
#[derive(Clone, Default)]
pub struct ResultHosts {
    hosts: Rc<RefCell<HashMap<ScreenId, HostQueues>>>,
}

impl ResultHosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn expect_result(&self, screen: ScreenId, parser: ResultParser) {
        self.hosts.borrow_mut().entry(screen).or_default().result_parsers.push_back(parser);
    }

    pub(crate) fn expect_permissions_result(&self, screen: ScreenId, action: PermissionsAction) {
        self.hosts.borrow_mut().entry(screen).or_default().permission_actions.push_back(action);
    }

    pub fn get_pending_results(&self, screen: ScreenId) -> usize {
        self.hosts.borrow().get(&screen).map_or(0, |h| h.result_parsers.len())
    }

    pub fn get_pending_permission_requests(&self, screen: ScreenId) -> usize {
        self.hosts.borrow().get(&screen).map_or(0, |h| h.permission_actions.len())
    }

    /// Hands `result` to the oldest launch of `screen` still waiting for one.
    pub fn on_activity_result(&self, screen: ScreenId, result: &ActivityResult) -> Result<()> {
        let parser = self.hosts
            .borrow_mut()
            .get_mut(&screen)
            .and_then(|h| h.result_parsers.pop_front());

        match parser {
            Some(parser) => parser(result),
            None => {
                log!(INFO, "{} got result {} but launched nothing", screen, result.code);
                Ok(())
            },
        }
    }

    pub fn on_request_permissions_result(&self, screen: ScreenId) {
        loop {
            let action = self.hosts
                .borrow_mut()
                .get_mut(&screen)
                .and_then(|h| h.permission_actions.pop_front());

            match action {
                Some(action) => action(),
                None => break,
            }
        }
    }

    pub fn evict(&self, screen: ScreenId) {
        let evicted = self.hosts.borrow_mut().remove(&screen);
        if let Some(host) = evicted {
            log!(
                "{} destroyed with {} pending results and {} pending permission requests",
                screen,
                host.result_parsers.len(),
                host.permission_actions.len(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::bridge::RESULT_OK;
    use crate::testing::Recorder;

    #[test]
    fn test_one_result_per_launch() {
        let hosts = ResultHosts::new();
        let recorder = Recorder::new();
        let screen = ScreenId::next();

        for label in &["first launch", "second launch"] {
            let recorder = recorder.clone();
            let label = label.to_string();
            hosts.expect_result(screen, Box::new(move |result: &ActivityResult| {
                recorder.record(&format!("{} {}", label, result.code));
                Ok(())
            }));
        }
        assert_eq!(hosts.get_pending_results(screen), 2);

        hosts.on_activity_result(screen, &ActivityResult::new(RESULT_OK, None)).expect("Parser failed");
        assert_eq!(recorder.get(), vec!["first launch -1"]);

        hosts.on_activity_result(screen, &ActivityResult::canceled()).expect("Parser failed");
        hosts.on_activity_result(screen, &ActivityResult::canceled()).expect("Unexpected result should be ignored");
        assert_eq!(recorder.get(), vec!["first launch -1", "second launch 0"]);
    }

    #[test]
    fn test_parser_failure_propagates() {
        let hosts = ResultHosts::new();
        let screen = ScreenId::next();
        hosts.expect_result(screen, Box::new(|_: &ActivityResult| {
            Err(crate::error::Error::Hook(anyhow::anyhow!("gallery crashed")))
        }));

        assert!(hosts.on_activity_result(screen, &ActivityResult::canceled()).is_err());
        assert_eq!(hosts.get_pending_results(screen), 0);
    }

    #[test]
    fn test_permission_actions_drain() {
        let hosts = ResultHosts::new();
        let recorder = Recorder::new();
        let screen = ScreenId::next();
        hosts.expect_permissions_result(screen, Box::new(recorder.task("camera")));
        hosts.expect_permissions_result(screen, Box::new({
            let hosts = hosts.clone();
            let recorder = recorder.clone();
            move || {
                recorder.record("location");
                hosts.expect_permissions_result(screen, Box::new(recorder.task("nested")));
            }
        }));

        hosts.on_request_permissions_result(screen);

        assert_eq!(recorder.get(), vec!["camera", "location", "nested"]);
        assert_eq!(hosts.get_pending_permission_requests(screen), 0);
    }

    #[test]
    fn test_evict() {
        let hosts = ResultHosts::new();
        let recorder = Recorder::new();
        let screen = ScreenId::next();
        hosts.expect_permissions_result(screen, Box::new(recorder.task("never")));

        hosts.evict(screen);
        hosts.on_request_permissions_result(screen);

        assert!(recorder.get().is_empty());
    }
}
