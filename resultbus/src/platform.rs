use crate::bridge::Intent;
use crate::screen::ScreenId;

/// First platform level with runtime permissions.
pub const SDK_M: u32 = 23;
/// First platform level where fine location can be downgraded to approximate by the user.
pub const SDK_S: u32 = 31;

/// What the library needs from the host platform.
///
/// Implementations are expected to be called on the UI thread only.
pub trait Platform {
    fn get_sdk_level(&self) -> u32;

    fn start_activity(&self, from: ScreenId, intent: &Intent);

    fn check_self_permission(&self, permission: &str) -> bool;

    fn should_show_rationale(&self, screen: ScreenId, permission: &str) -> bool;

    /// Answers through [`Context::on_request_permissions_result`](crate::Context::on_request_permissions_result).
    fn request_permissions(&self, screen: ScreenId, permissions: &[String]);

    fn show_toast(&self, screen: ScreenId, message: &str);
}
