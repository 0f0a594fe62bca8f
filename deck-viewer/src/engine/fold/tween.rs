use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;
use std::collections::BTreeMap;

use super::parts::PartId;

/// Easing shared by every fold transition: cubic in/out.
pub const FOLD_EASE: EaseFunction = EaseFunction::CubicInOut;

/// Time-driven interpolation between two vectors.
///
/// Once `elapsed` reaches `duration` the value is exactly `to`, not a
/// lerp at 1.0, so restores land bit-for-bit on their targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: Vec3,
    to: Vec3,
    duration: f32,
    elapsed: f32,
    ease: EaseFunction,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, duration: f32, ease: EaseFunction) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn value(&self) -> Vec3 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.ease.sample_clamped(self.elapsed / self.duration);
        self.from.lerp(self.to, t)
    }

    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }
}

/// What a scheduled tween writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TweenTarget {
    ObjectTranslation,
    ObjectRotation,
    CameraPosition,
    ControlsTarget,
    PartRotation(PartId),
}

/// Cancellation token returned by [`AnimationScheduler::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenHandle(u64);

#[derive(Debug, Clone, PartialEq)]
struct ScheduledTween {
    target: TweenTarget,
    tween: Tween,
}

/// Shared scheduler for every interpolation the viewer runs.
///
/// Starting a tween on a target that is already animating replaces the old
/// one, so two tweens never fight over a field.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct AnimationScheduler {
    next_id: u64,
    active: BTreeMap<TweenHandle, ScheduledTween>,
}

impl AnimationScheduler {
    pub fn start(&mut self, target: TweenTarget, tween: Tween) -> TweenHandle {
        self.active.retain(|_, scheduled| scheduled.target != target);

        let handle = TweenHandle(self.next_id);
        self.next_id += 1;
        self.active.insert(handle, ScheduledTween { target, tween });
        handle
    }

    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        self.active.remove(&handle).is_some()
    }

    /// Stop everything. Returns how many tweens were still running.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.active.len();
        self.active.clear();
        cancelled
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.active.contains_key(&handle)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance every tween by `dt` seconds and return the value each target
    /// should take this frame. Finished tweens report their final value once
    /// and are then dropped.
    pub fn tick(&mut self, dt: f32) -> Vec<(TweenTarget, Vec3)> {
        let mut frame = Vec::with_capacity(self.active.len());
        for scheduled in self.active.values_mut() {
            frame.push((scheduled.target, scheduled.tween.advance(dt)));
        }
        self.active.retain(|_, scheduled| !scheduled.tween.is_finished());
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_eases_in_and_out() {
        let mut tween = Tween::new(Vec3::ZERO, Vec3::splat(10.0), 2.0, FOLD_EASE);
        let quarter = tween.advance(0.5);
        assert!(quarter.x > 0.0 && quarter.x < 2.5, "slow start: {quarter}");

        let half = tween.advance(0.5);
        assert!((half.x - 5.0).abs() < 1e-4);

        let three_quarters = tween.advance(0.5);
        assert!(three_quarters.x > 7.5 && three_quarters.x < 10.0);
    }

    #[test]
    fn tween_lands_exactly_on_target() {
        let to = Vec3::new(0.123_456_7, -1.987_654_3, 3.141_592_7);
        let mut tween = Tween::new(Vec3::new(-7.0, 2.0, 0.3), to, 2.0, FOLD_EASE);
        for _ in 0..7 {
            tween.advance(0.3);
        }
        assert!(tween.is_finished());
        assert_eq!(tween.value(), to);
    }

    #[test]
    fn zero_duration_tween_is_already_done() {
        let tween = Tween::new(Vec3::ZERO, Vec3::ONE, 0.0, FOLD_EASE);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), Vec3::ONE);
    }

    #[test]
    fn scheduler_drops_finished_tweens_after_final_value() {
        let mut scheduler = AnimationScheduler::default();
        let handle = scheduler.start(
            TweenTarget::CameraPosition,
            Tween::new(Vec3::ZERO, Vec3::X, 1.0, FOLD_EASE),
        );

        let frame = scheduler.tick(0.5);
        assert_eq!(frame.len(), 1);
        assert!(scheduler.is_active(handle));

        let frame = scheduler.tick(0.6);
        assert_eq!(frame, vec![(TweenTarget::CameraPosition, Vec3::X)]);
        assert!(!scheduler.is_active(handle));
        assert!(scheduler.tick(0.1).is_empty());
    }

    #[test]
    fn starting_on_a_busy_target_replaces_it() {
        let mut scheduler = AnimationScheduler::default();
        let first = scheduler.start(
            TweenTarget::ObjectRotation,
            Tween::new(Vec3::ZERO, Vec3::Y, 2.0, FOLD_EASE),
        );
        let second = scheduler.start(
            TweenTarget::ObjectRotation,
            Tween::new(Vec3::ZERO, Vec3::Z, 2.0, FOLD_EASE),
        );
        assert!(!scheduler.is_active(first));
        assert!(scheduler.is_active(second));
        assert_eq!(scheduler.active.len(), 1);
    }

    #[test]
    fn cancellation_stops_updates() {
        let mut scheduler = AnimationScheduler::default();
        let part = scheduler.start(
            TweenTarget::PartRotation(PartId(3)),
            Tween::new(Vec3::ZERO, Vec3::ONE, 2.0, FOLD_EASE),
        );
        scheduler.start(
            TweenTarget::ControlsTarget,
            Tween::new(Vec3::ZERO, Vec3::ONE, 2.0, FOLD_EASE),
        );

        assert!(scheduler.cancel(part));
        assert!(!scheduler.cancel(part));
        let frame = scheduler.tick(0.1);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].0, TweenTarget::ControlsTarget);

        assert_eq!(scheduler.cancel_all(), 1);
        assert!(scheduler.is_idle());
        assert!(scheduler.tick(0.1).is_empty());
    }
}
