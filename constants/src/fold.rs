use bevy::math::Vec3;

/// Length of every fold/unfold transition, in seconds.
pub const FOLD_DURATION_SECS: f32 = 2.0;

/// Whole-object placement once folded. Rotation is Euler XYZ in radians.
pub const FOLDED_POSITION: Vec3 = Vec3::new(-4.844, 0.0, 0.835);
pub const FOLDED_ROTATION: Vec3 = Vec3::ZERO;

/// Offset applied after recentring the scaled case on its bounding box.
pub const UNFOLDED_OFFSET: Vec3 = Vec3::new(-2.464, 0.0, 5.315);
pub const UNFOLDED_ROTATION: Vec3 = Vec3::new(0.0, 1.56, 0.0);
