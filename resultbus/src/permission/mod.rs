//! Runtime permission requests.
//!
//! The outcome is reported through the `on_granted` / `on_denied` callbacks,
//! or as a [`PermissionsGrantedEvent`] / [`PermissionsDeniedEvent`] on the bus
//! when the matching callback was not given.

use std::fmt;

use crate::bridge::Intent;
use crate::context::Context;
use crate::error::Result;
use crate::event::{PermissionsDeniedEvent, PermissionsGrantedEvent};
use crate::platform::{Platform, SDK_M, SDK_S};
use crate::screen::{ScreenContext, ScreenId};

pub const CAMERA: &str = "android.permission.CAMERA";
pub const ACCESS_COARSE_LOCATION: &str = "android.permission.ACCESS_COARSE_LOCATION";
pub const ACCESS_FINE_LOCATION: &str = "android.permission.ACCESS_FINE_LOCATION";

/// Whether every permission in `permissions` is granted.
///
/// From [`SDK_S`] on the user may downgrade fine location to approximate, so
/// when fine location is asked for it is left out of the check.
pub fn are_permissions_accepted<S: AsRef<str>>(platform: &dyn Platform, permissions: &[S]) -> bool {
    let skip_fine_location = platform.get_sdk_level() >= SDK_S
        && permissions.iter().any(|p| p.as_ref() == ACCESS_FINE_LOCATION);

    permissions
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !(skip_fine_location && *p == ACCESS_FINE_LOCATION))
        .all(|p| platform.check_self_permission(p))
}

pub struct PermissionAsker {
    permissions: Vec<String>,
    on_granted: Option<Box<dyn FnOnce()>>,
    on_denied: Option<Box<dyn FnOnce()>>,
}

impl PermissionAsker {
    pub fn new<S: AsRef<str>>(permissions: &[S]) -> Self {
        Self {
            permissions: permissions.iter().map(|p| p.as_ref().to_string()).collect(),
            on_granted: None,
            on_denied: None,
        }
    }

    pub fn on_granted<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.on_granted = Some(Box::new(callback));
        self
    }

    pub fn on_denied<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.on_denied = Some(Box::new(callback));
        self
    }

    /// Asks as soon as the screen behind `from` is in the foreground.
    pub fn ask(self, context: &Context, from: &ScreenContext) -> Result<()> {
        let screen = from.find_screen()?;
        let resolver = context.clone();
        context.bus.run_when_foreground(screen, move || self.resolve(&resolver, screen));
        Ok(())
    }

    fn resolve(self, context: &Context, screen: ScreenId) {
        let platform = &*context.platform;

        if platform.get_sdk_level() < SDK_M || are_permissions_accepted(platform, &self.permissions) {
            self.finish(context, true);
            return;
        }

        if self.permissions.iter().any(|p| platform.should_show_rationale(screen, p)) {
            log!(INFO, "{} must grant {:?} from the settings", screen, self.permissions);
            platform.show_toast(screen, &context.config.rationale_message);
            platform.start_activity(screen, &Intent::application_details_settings(&context.config.package_name));
            self.finish(context, false);
            return;
        }

        // Queued first: the platform may answer before request_permissions returns
        let permissions = self.permissions.clone();
        let checker = context.clone();
        context.results.expect_permissions_result(screen, Box::new(move || {
            let granted = are_permissions_accepted(&*checker.platform, &self.permissions);
            self.finish(&checker, granted);
        }));
        platform.request_permissions(screen, &permissions);
    }

    fn finish(self, context: &Context, granted: bool) {
        log!("{:?} granted: {}", self.permissions, granted);

        let Self { permissions, on_granted, on_denied } = self;
        if granted {
            match on_granted {
                Some(callback) => callback(),
                None => context.bus.post(PermissionsGrantedEvent { permissions }),
            }
        } else {
            match on_denied {
                Some(callback) => callback(),
                None => context.bus.post(PermissionsDeniedEvent { permissions }),
            }
        }
    }
}

impl fmt::Debug for PermissionAsker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PermissionAsker")
            .field("permissions", &self.permissions)
            .field("on_granted", &self.on_granted.is_some())
            .field("on_denied", &self.on_denied.is_some())
            .finish()
    }
}
