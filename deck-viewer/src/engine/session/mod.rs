//! Viewer lifecycle: mounting, generations and the single live asset.

/// Mount/unmount handling, scene-ready gating and asset attach.
pub mod controller;

/// Generation tokens and the gate that drops late callbacks.
pub mod generation;

/// Single-occupancy slot that disposes before it attaches.
pub mod slot;

/// Session resource and host requests.
pub mod viewer_session;
