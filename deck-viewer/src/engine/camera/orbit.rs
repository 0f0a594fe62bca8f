use bevy::prelude::*;
use constants::render_settings::{
    CONTROLS_DAMPING_FACTOR, CONTROLS_MAX_DISTANCE, CONTROLS_MIN_DISTANCE, CONTROLS_ROTATE_SPEED,
    CONTROLS_ZOOM_SPEED,
};
use std::f32::consts::{PI, TAU};

/// Keeps the polar angle off the poles so `look_at` never degenerates.
const POLE_EPSILON: f32 = 1e-6;

/// Base per-step zoom ratio, raised to the zoom speed.
const ZOOM_STEP: f32 = 0.95;

/// Damped drag-to-orbit and dolly zoom around a target. Panning is not
/// supported; the target only moves when something sets it explicitly.
#[derive(Component, Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Pending (theta, phi) rotation still to be applied.
    spherical_delta: Vec2,
    /// Pending radius multiplier.
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            damping_factor: CONTROLS_DAMPING_FACTOR,
            min_distance: CONTROLS_MIN_DISTANCE,
            max_distance: CONTROLS_MAX_DISTANCE,
            rotate_speed: CONTROLS_ROTATE_SPEED,
            zoom_speed: CONTROLS_ZOOM_SPEED,
            spherical_delta: Vec2::ZERO,
            scale: 1.0,
        }
    }

    /// Queue an orbit from a pointer drag of `delta` pixels on a surface
    /// `surface_height` pixels tall. A full-height drag is one revolution.
    pub fn rotate_by_drag(&mut self, delta: Vec2, surface_height: f32) {
        if surface_height <= 0.0 {
            return;
        }
        self.spherical_delta.x -= TAU * delta.x / surface_height * self.rotate_speed;
        self.spherical_delta.y -= TAU * delta.y / surface_height * self.rotate_speed;
    }

    /// Queue a zoom. Positive steps move towards the target.
    pub fn zoom(&mut self, steps: f32) {
        if steps == 0.0 {
            return;
        }
        self.scale *= self.zoom_ratio().powf(steps);
    }

    /// Queue a pinch zoom where `ratio` is the new finger span over the old one.
    pub fn pinch(&mut self, ratio: f32) {
        if ratio > 0.0 && ratio.is_finite() {
            self.scale /= ratio;
        }
    }

    fn zoom_ratio(&self) -> f32 {
        ZOOM_STEP.powf(self.zoom_speed)
    }

    pub fn is_settled(&self) -> bool {
        self.spherical_delta == Vec2::ZERO && self.scale == 1.0
    }

    /// Drop any queued motion, used when an animation takes over the rig.
    pub fn halt(&mut self) {
        self.spherical_delta = Vec2::ZERO;
        self.scale = 1.0;
    }

    /// Advance one frame and return the new camera position.
    ///
    /// With nothing queued and the camera inside the distance bounds the
    /// position is returned untouched, so externally animated poses are
    /// never perturbed by the spherical round trip.
    pub fn update(&mut self, position: Vec3) -> Vec3 {
        let offset = position - self.target;
        let radius = offset.length();
        let in_bounds = radius >= self.min_distance && radius <= self.max_distance;
        if self.is_settled() && in_bounds {
            return position;
        }

        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI * 0.5)
        };

        theta += self.spherical_delta.x * self.damping_factor;
        phi += self.spherical_delta.y * self.damping_factor;
        phi = phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.spherical_delta *= 1.0 - self.damping_factor;
        if self.spherical_delta.length_squared() < 1e-12 {
            self.spherical_delta = Vec2::ZERO;
        }
        self.scale = 1.0;

        self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(controls: &mut OrbitControls, mut position: Vec3) -> Vec3 {
        for _ in 0..2000 {
            position = controls.update(position);
        }
        position
    }

    #[test]
    fn idle_update_keeps_position_exact() {
        let mut controls = OrbitControls::default();
        let position = Vec3::new(4.0, 0.0, 0.0);
        assert_eq!(controls.update(position), position);
    }

    #[test]
    fn zoom_respects_distance_bounds() {
        let mut controls = OrbitControls::default();
        controls.zoom(200.0);
        let near = settle(&mut controls, Vec3::new(4.0, 0.0, 0.0));
        assert!((near.length() - 2.0).abs() < 1e-4);

        controls.zoom(-200.0);
        let far = settle(&mut controls, near);
        assert!((far.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn out_of_bounds_camera_is_clamped() {
        let mut controls = OrbitControls::default();
        let position = controls.update(Vec3::new(40.0, 0.0, 0.0));
        assert!((position.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn drag_orbits_and_damps_out() {
        let mut controls = OrbitControls::default();
        let start = Vec3::new(4.0, 0.0, 0.0);
        controls.rotate_by_drag(Vec2::new(100.0, 0.0), 800.0);

        let first = controls.update(start);
        assert!(first.distance(start) > 0.0);
        assert!((first.length() - 4.0).abs() < 1e-4);

        let end = settle(&mut controls, first);
        assert!(controls.is_settled());
        // Damped motion sums to the full queued angle.
        let expected = start.x.atan2(start.z) - TAU * 100.0 / 800.0;
        let reached = end.x.atan2(end.z);
        let diff = (reached - expected).rem_euclid(TAU);
        assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "{reached} vs {expected}");
    }

    #[test]
    fn vertical_drag_stops_at_the_pole() {
        let mut controls = OrbitControls::default();
        controls.rotate_by_drag(Vec2::new(0.0, 10_000.0), 100.0);
        let end = settle(&mut controls, Vec3::new(4.0, 0.0, 0.0));
        assert!((end.y - 4.0).abs() < 1e-2);
        assert!(end.is_finite());
    }

    #[test]
    fn pinch_spread_zooms_in() {
        let mut controls = OrbitControls::default();
        controls.pinch(2.0);
        let position = controls.update(Vec3::new(6.0, 0.0, 0.0));
        assert!((position.length() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn halt_discards_queued_motion() {
        let mut controls = OrbitControls::default();
        controls.rotate_by_drag(Vec2::new(50.0, 20.0), 600.0);
        controls.zoom(3.0);
        controls.halt();
        assert!(controls.is_settled());
        let position = Vec3::new(0.0, 0.0, 5.0);
        assert_eq!(controls.update(position), position);
    }
}
