use bevy::math::Vec3;

/// Target render-surface aspect ratio (width / height).
pub const ASPECT_WIDTH: u32 = 16;
pub const ASPECT_HEIGHT: u32 = 9;

/// Perspective camera.
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Side-on view the rig starts from.
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(4.0, 0.0, 0.0);
pub const INITIAL_CONTROLS_TARGET: Vec3 = Vec3::ZERO;

/// Orbit controls.
pub const CONTROLS_DAMPING_FACTOR: f32 = 0.05;
pub const CONTROLS_MIN_DISTANCE: f32 = 2.0;
pub const CONTROLS_MAX_DISTANCE: f32 = 10.0;
pub const CONTROLS_ROTATE_SPEED: f32 = 1.0;
pub const CONTROLS_ZOOM_SPEED: f32 = 1.0;

/// Highest anisotropic filtering level requested for case textures.
pub const MAX_ANISOTROPY: u16 = 16;

/// Lighting rig.
pub const AMBIENT_BRIGHTNESS: f32 = 400.0;
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(2.0, 2.0, 2.0);
pub const KEY_LIGHT_ILLUMINANCE: f32 = 4000.0;
pub const FILL_LIGHT_POSITION: Vec3 = Vec3::new(-2.0, 0.0, -2.0);
pub const FILL_LIGHT_ILLUMINANCE: f32 = 4000.0;

/// Shadow catcher under the case.
pub const GROUND_PLANE_SIZE: f32 = 20.0;
pub const GROUND_PLANE_HEIGHT: f32 = -2.0;
pub const GROUND_SHADOW_OPACITY: f32 = 0.2;

/// Case material surface.
pub const CASE_METALLIC: f32 = 0.1;
pub const CASE_ROUGHNESS: f32 = 0.7;

/// The case is scaled so its largest bounding box dimension matches this.
pub const MODEL_FIT_SIZE: f32 = 2.0;
