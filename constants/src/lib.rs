//! Authored constants shared by the deck viewer.
//!
//! Values here are tuned by hand against the case model and its texture set;
//! nothing is derived at runtime.

/// Asset locations relative to the asset root.
pub mod paths;

/// Camera, controls, lighting and surface sizing.
pub mod render_settings;

/// Whole-object poses and timing for the fold animation.
pub mod fold;

/// Colour-grade defaults and luma weights.
pub mod colour_grade;
