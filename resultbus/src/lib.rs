extern crate self as resultbus;

#[macro_use]
pub mod log;

pub mod bridge;
pub mod bus;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod permission;
pub mod platform;
pub mod screen;
pub mod timer;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::bus::{EventBus, Poster};
pub use crate::config::Config;
pub use crate::context::Context;
pub use crate::error::Error;
pub use crate::screen::{ScreenContext, ScreenId};
