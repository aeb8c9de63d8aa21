//! Legacy "activity result" callbacks turned into typed events.
//!
//! A screen launches another one through a [`ResultLauncher`], handing it one
//! mapper per result code it cares about. When the platform reports the
//! result back, the oldest pending launch of that screen gets it: the mapper
//! for the result code runs once, and whatever event it produces is posted on
//! the bus.

use std::fmt::Debug;

use crate::util::AsAny;

pub use resultbus_derive::Parcelable;

pub use self::host::ResultHosts;
pub use self::intent::{Extra, Intent, ACTION_APPLICATION_DETAILS_SETTINGS, ACTION_GET_CONTENT, FLAG_ACTIVITY_NEW_TASK};
pub use self::launcher::ResultLauncher;

pub const RESULT_OK: i32 = -1;
pub const RESULT_CANCELED: i32 = 0;
pub const RESULT_FIRST_USER: i32 = 1;

/// A typed object that can ride along in an [`Intent`].
#[typetag::serde(tag = "parcel")]
pub trait Parcelable: AsAny + Debug + 'static { }

#[derive(Debug)]
pub struct ActivityResult {
    pub code: i32,
    pub data: Option<Intent>,
}

impl ActivityResult {
    pub fn new(code: i32, data: Option<Intent>) -> Self {
        Self { code, data }
    }

    pub fn ok(data: Intent) -> Self {
        Self::new(RESULT_OK, Some(data))
    }

    pub fn canceled() -> Self {
        Self::new(RESULT_CANCELED, None)
    }
}

mod host;
mod intent;
mod launcher;
