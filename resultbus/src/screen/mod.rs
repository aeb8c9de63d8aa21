use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity of one live screen instance.
///
/// Ids are never reused within a process, so an id that was destroyed stays
/// destroyed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ScreenId(u64);

impl ScreenId {
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}

/// Whatever a caller holds when it wants to talk to "its" screen.
///
/// Views and theme wrappers wrap the context of the screen they live in;
/// fragments may or may not be attached to a host screen.
#[derive(Clone, Debug)]
pub enum ScreenContext {
    Screen(ScreenId),
    Wrapper(Box<ScreenContext>),
    Fragment(Option<ScreenId>),
    Application,
}

impl ScreenContext {
    pub fn wrap(self) -> Self {
        ScreenContext::Wrapper(Box::new(self))
    }

    /// Walks the wrapper chain down to the owning screen.
    pub fn find_screen(&self) -> Result<ScreenId> {
        let mut lookup = self;
        loop {
            match lookup {
                ScreenContext::Screen(id) => return Ok(*id),
                ScreenContext::Wrapper(base) => lookup = &**base,
                ScreenContext::Fragment(Some(host)) => return Ok(*host),
                ScreenContext::Fragment(None) => return Err(Error::DetachedFragment),
                ScreenContext::Application => return Err(Error::InvalidContext("Application".to_string())),
            }
        }
    }
}

impl From<ScreenId> for ScreenContext {
    fn from(id: ScreenId) -> Self {
        ScreenContext::Screen(id)
    }
}
