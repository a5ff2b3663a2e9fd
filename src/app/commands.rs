//! Inbound commands to the application service.
//!
//! These represent answers and requests from the outside world (permission
//! prompt, lifecycle) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// The permission prompt answered.
    PermissionResult { request_code: u16, granted: bool },

    /// Tear down: unregister the proximity listener and stop location updates.
    Shutdown,
}
