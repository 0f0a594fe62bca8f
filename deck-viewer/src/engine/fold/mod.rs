//! Folding and unfolding of the case model.
//!
//! The pure pieces (poses, tweens, the state machine) carry no ECS state so
//! they can be driven from tests; `systems` wires them into the app.

/// Per-part identifiers, current rotations and load-time snapshots.
pub mod parts;

/// Object and camera poses plus bounds-driven placement.
pub mod pose;

/// Two-state fold machine with transient animation states.
pub mod state_machine;

/// Systems applying fold requests and animation frames to the scene.
pub mod systems;

/// Eased vector tweens and the shared scheduler.
pub mod tween;
