use std::collections::HashMap;

use crate::screen::ScreenId;

/// Which screens may currently run UI callbacks.
///
/// Screens are created lazily on first touch and start out in the background.
#[derive(Debug, Default)]
pub struct ForegroundTracker {
    screens: HashMap<ScreenId, bool>,
}

impl ForegroundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, screen: ScreenId) {
        self.screens.entry(screen).or_insert(false);
    }

    pub fn set_foreground(&mut self, screen: ScreenId) {
        self.screens.insert(screen, true);
    }

    pub fn set_background(&mut self, screen: ScreenId) {
        self.screens.insert(screen, false);
    }

    pub fn is_foreground(&self, screen: ScreenId) -> bool {
        self.screens.get(&screen).copied().unwrap_or(false)
    }

    pub fn evict(&mut self, screen: ScreenId) {
        self.screens.remove(&screen);
    }
}
