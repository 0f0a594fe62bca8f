//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, the viewer phase
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers the graded material, the deck asset type and the RPC bridge,
/// and orders the deck, viewer and fold systems within a frame.
pub mod app_setup;

/// Viewer phase states and shared marker components.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
