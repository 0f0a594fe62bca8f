//! JSON-RPC 2.0 bridge to the page hosting the viewer iframe.
//!
//! ```text
//! Host (parent window)  <──postMessage──>  Viewer (iframe)
//!        ├─ Request (with id) ─────────────────> │
//!        │ <──────────────── Response (same id) ─┤
//!        │ <─────────── Notification (no id) ────┤
//! ```
//!
//! ## Methods
//!
//! - `toggle_fold`: fold or unfold the live case
//! - `get_fold_state`: current fold state and button caption
//! - `get_loading_progress`: progress of the pending load
//! - `get_viewer_status`: mount state, generation and live texture
//! - `next_slide`, `previous_slide`, `go_to_slide { index }`: deck navigation
//! - `get_fps`: smoothed frame rate
//!
//! ## Notifications
//!
//! `loading_progress`, `fold_state_changed`, `asset_load_failed`,
//! `slide_changed` and `fps_update`.
//!
//! Error codes follow JSON-RPC 2.0: `-32600` invalid request, `-32601`
//! method not found, `-32602` invalid params.

/// Request handling, notification queueing and the WASM message listener.
pub mod web_rpc;
