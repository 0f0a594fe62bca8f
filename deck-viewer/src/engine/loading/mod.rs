//! Case asset loading with progress reporting.
//!
//! Texture and mesh load in parallel for one generation; progress and
//! failures are reported as events while the controller waits for the scene
//! to be instanced.

/// Typed load failures.
pub mod error;

/// Generation-tagged texture and mesh loads, progress measurement and
/// failure detection.
pub mod model_loader;

/// Progress resource and change event.
pub mod progress;

/// Sampler and colour-space settings for case textures.
pub mod texture_config;
