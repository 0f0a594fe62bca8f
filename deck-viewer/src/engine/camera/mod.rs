//! Scene rig for the case viewer.
//!
//! A perspective camera fitted to a 16:9 viewport, damped orbit controls
//! without panning, and the lights and ground that frame the model.

/// Damped orbit and zoom controller.
pub mod orbit;

/// Rig spawning plus the input, viewport and aiming systems.
pub mod rig;

/// Fixed-aspect viewport fitting.
pub mod viewport;
