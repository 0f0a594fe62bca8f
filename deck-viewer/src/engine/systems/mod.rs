//! Runtime systems shared across the viewer and deck.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host via RPC and updates the native overlay.
pub mod fps_tracking;

/// Forwards progress, fold, failure and slide events to the host page.
pub mod host_notifications;
