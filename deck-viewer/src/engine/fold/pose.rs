use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use constants::fold::{FOLDED_POSITION, FOLDED_ROTATION, UNFOLDED_OFFSET, UNFOLDED_ROTATION};
use constants::render_settings::{
    INITIAL_CAMERA_POSITION, INITIAL_CONTROLS_TARGET, MODEL_FIT_SIZE,
};

/// Rigid-body placement. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    pub fn to_transform(&self, scale: f32) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.quat(),
            scale: Vec3::splat(scale),
        }
    }
}

pub fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

/// Camera position plus the orbit target it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: INITIAL_CAMERA_POSITION,
            target: INITIAL_CONTROLS_TARGET,
        }
    }
}

/// Authored whole-object pose once folded.
pub const FOLDED_POSE: Pose = Pose::new(FOLDED_POSITION, FOLDED_ROTATION);

/// Axis-aligned bounds of the loaded case in its root's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for ModelBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ModelBounds {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow to cover a mesh AABB placed by `transform`.
    pub fn include_aabb(&mut self, aabb: &Aabb, transform: &GlobalTransform) {
        let center = Vec3::from(aabb.center);
        let half = Vec3::from(aabb.half_extents);
        for corner in 0..8 {
            let sign = Vec3::new(
                if corner & 1 == 0 { -1.0 } else { 1.0 },
                if corner & 2 == 0 { -1.0 } else { 1.0 },
                if corner & 4 == 0 { -1.0 } else { 1.0 },
            );
            self.include_point(transform.transform_point(center + half * sign));
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    /// Uniform scale that makes the largest dimension `MODEL_FIT_SIZE`.
    pub fn fit_scale(&self) -> f32 {
        let largest = self.size().max_element();
        if largest > f32::EPSILON {
            MODEL_FIT_SIZE / largest
        } else {
            1.0
        }
    }

    /// Pose that centres the scaled case on the authored unfolded offset.
    pub fn unfolded_pose(&self) -> Pose {
        let rotation = UNFOLDED_ROTATION;
        let centre = euler_to_quat(rotation) * (self.center() * self.fit_scale());
        Pose::new(UNFOLDED_OFFSET - centre, rotation)
    }
}

/// Root of a loaded case. The root transform is derived from `pose` and `scale`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CaseModel {
    pub pose: Pose,
    pub scale: f32,
}
