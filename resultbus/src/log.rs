use std::sync::Mutex;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[macro_export]
macro_rules! log {
    (ERROR, $($arg:tt)*) => { $crate::log::log_error(&format!($($arg)*)) };
    (INFO, $($arg:tt)*) => { $crate::log::log_info(&format!($($arg)*)) };
    (VERBOSE, $($arg:tt)*) => { $crate::log::log_verbose(&format!($($arg)*)) };
    ($($arg:tt)*) => { $crate::log::log_verbose(&format!($($arg)*)) };
}

#[macro_export]
macro_rules! log_level {
    ($l:ident) => { $crate::log::set_log_level($crate::log::LogLevel::$l) };
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum LogLevel {
    NONE,
    ERROR,
    INFO,
    VERBOSE,
}

impl LogLevel {
    pub fn value(&self) -> u8 {
        match *self {
            LogLevel::NONE => 3,
            LogLevel::ERROR => 2,
            LogLevel::INFO => 1,
            LogLevel::VERBOSE => 0,
        }
    }

    fn enabled(&self) -> bool {
        self.value() >= get_log_level().value()
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::INFO
    }
}

lazy_static! {
    static ref LOG_LEVEL: Mutex<LogLevel> = Mutex::new(LogLevel::VERBOSE);
}

// Records go through the `log` facade under this target so the host picks the backend.
pub const TAG: &str = "resultbus";

pub fn set_log_level(level: LogLevel) {
    match LOG_LEVEL.lock() {
        Ok(mut guard) => *guard = level,
        Err(poisoned) => *poisoned.into_inner() = level,
    }
}

pub fn get_log_level() -> LogLevel {
    match LOG_LEVEL.lock() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

pub fn log_error(string: &str) {
    if LogLevel::ERROR.enabled() {
        ::log::error!(target: TAG, "{}", string);
    }
}

pub fn log_info(string: &str) {
    if LogLevel::INFO.enabled() {
        ::log::info!(target: TAG, "{}", string);
    }
}

pub fn log_verbose(string: &str) {
    if LogLevel::VERBOSE.enabled() {
        ::log::trace!(target: TAG, "{}", string);
    }
}
