use bevy::prelude::*;
use constants::fold::FOLD_DURATION_SECS;
use thiserror::Error;

use super::parts::{PartId, PartOrientations};
use super::pose::{CameraPose, FOLDED_POSE, Pose};
use super::tween::{AnimationScheduler, FOLD_EASE, Tween, TweenHandle, TweenTarget};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FoldState {
    #[default]
    Unfolded,
    Folding,
    Folded,
    Unfolding,
}

impl FoldState {
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Folding | Self::Unfolding)
    }

    /// State this one settles into.
    pub fn resting(self) -> Self {
        match self {
            Self::Unfolded | Self::Unfolding => Self::Unfolded,
            Self::Folded | Self::Folding => Self::Folded,
        }
    }

    /// Caption for the toggle control: what pressing it would do next.
    pub fn action_label(self) -> &'static str {
        match self.resting() {
            Self::Unfolded => "FOLD",
            _ => "UNFOLD",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unfolded => "unfolded",
            Self::Folding => "folding",
            Self::Folded => "folded",
            Self::Unfolding => "unfolding",
        }
    }
}

/// Rejected toggle. Callers drop these; they are never shown to the viewer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FoldError {
    #[error("no case model is loaded")]
    NoAsset,
    #[error("a fold transition is already running")]
    TransitionInFlight,
}

/// Everything a toggle needs to read from the scene.
#[derive(Debug, Clone, Copy)]
pub struct FoldContext<'a> {
    pub object: Pose,
    pub unfolded: Pose,
    pub camera: CameraPose,
    /// Current rotation of every part.
    pub parts: &'a [(PartId, Vec3)],
    pub orientations: &'a PartOrientations,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub target: TweenTarget,
    pub from: Vec3,
    pub to: Vec3,
}

/// Tweens making up one transition. All of them share duration and ease.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldPlan {
    pub from: FoldState,
    pub to: FoldState,
    pub duration: f32,
    pub tweens: Vec<TweenSpec>,
}

/// Two resting poses with a transient state while the animation plays.
///
/// Folding stores the rig pose and drives each part to its authored
/// rotation. Unfolding returns the object and rig and lays every part flat
/// again, which is the rotation the parts had before the first fold.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FoldStateMachine {
    state: FoldState,
    saved_camera: CameraPose,
    in_flight: Vec<TweenHandle>,
}

impl Default for FoldStateMachine {
    fn default() -> Self {
        Self::new(CameraPose::default())
    }
}

impl FoldStateMachine {
    pub fn new(initial_camera: CameraPose) -> Self {
        Self {
            state: FoldState::Unfolded,
            saved_camera: initial_camera,
            in_flight: Vec::new(),
        }
    }

    pub fn state(&self) -> FoldState {
        self.state
    }

    /// Rig pose the next unfold returns to.
    pub fn saved_camera(&self) -> CameraPose {
        self.saved_camera
    }

    /// Work out the next transition without touching any state.
    pub fn plan(&self, ctx: Option<&FoldContext>) -> Result<FoldPlan, FoldError> {
        let ctx = ctx.ok_or(FoldError::NoAsset)?;
        if self.state.is_transitioning() {
            return Err(FoldError::TransitionInFlight);
        }

        let mut tweens = Vec::with_capacity(ctx.parts.len() + 4);
        let to = match self.state {
            FoldState::Unfolded => {
                tweens.push(TweenSpec {
                    target: TweenTarget::ObjectTranslation,
                    from: ctx.object.position,
                    to: FOLDED_POSE.position,
                });
                tweens.push(TweenSpec {
                    target: TweenTarget::ObjectRotation,
                    from: ctx.object.rotation,
                    to: FOLDED_POSE.rotation,
                });
                for &(part, current) in ctx.parts {
                    let Some(orientation) = ctx.orientations.get(part) else {
                        continue;
                    };
                    tweens.push(TweenSpec {
                        target: TweenTarget::PartRotation(part),
                        from: current,
                        to: orientation.original_rotation,
                    });
                }
                FoldState::Folding
            }
            _ => {
                tweens.push(TweenSpec {
                    target: TweenTarget::ObjectTranslation,
                    from: ctx.object.position,
                    to: ctx.unfolded.position,
                });
                tweens.push(TweenSpec {
                    target: TweenTarget::ObjectRotation,
                    from: ctx.object.rotation,
                    to: ctx.unfolded.rotation,
                });
                tweens.push(TweenSpec {
                    target: TweenTarget::CameraPosition,
                    from: ctx.camera.position,
                    to: self.saved_camera.position,
                });
                tweens.push(TweenSpec {
                    target: TweenTarget::ControlsTarget,
                    from: ctx.camera.target,
                    to: self.saved_camera.target,
                });
                for &(part, current) in ctx.parts {
                    tweens.push(TweenSpec {
                        target: TweenTarget::PartRotation(part),
                        from: current,
                        to: Vec3::ZERO,
                    });
                }
                FoldState::Unfolding
            }
        };

        Ok(FoldPlan {
            from: self.state,
            to,
            duration: FOLD_DURATION_SECS,
            tweens,
        })
    }

    /// Start the next transition on `scheduler`. Returns the transient state
    /// entered.
    pub fn toggle(
        &mut self,
        ctx: Option<&FoldContext>,
        scheduler: &mut AnimationScheduler,
    ) -> Result<FoldState, FoldError> {
        let plan = self.plan(ctx)?;

        if plan.to == FoldState::Folding {
            if let Some(ctx) = ctx {
                self.saved_camera = ctx.camera;
            }
        }

        self.in_flight = plan
            .tweens
            .iter()
            .map(|spec| {
                scheduler.start(
                    spec.target,
                    Tween::new(spec.from, spec.to, plan.duration, FOLD_EASE),
                )
            })
            .collect();
        self.state = plan.to;
        Ok(self.state)
    }

    /// Finish the running transition once every one of its tweens is done.
    /// Returns the resting state when that happens this call.
    pub fn settle(&mut self, scheduler: &AnimationScheduler) -> Option<FoldState> {
        if !self.state.is_transitioning() {
            return None;
        }
        if self.in_flight.iter().any(|handle| scheduler.is_active(*handle)) {
            return None;
        }
        self.in_flight.clear();
        self.state = self.state.resting();
        Some(self.state)
    }

    /// Back to `Unfolded` for a new asset, cancelling anything in flight.
    /// The saved rig pose is kept.
    pub fn reset(&mut self, scheduler: &mut AnimationScheduler) {
        for handle in self.in_flight.drain(..) {
            scheduler.cancel(handle);
        }
        self.state = FoldState::Unfolded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fold::pose::ModelBounds;
    use std::collections::BTreeMap;

    /// Minimal stand-in for the scene: object pose, rig and part rotations,
    /// driven by the scheduler the same way the systems drive the ECS.
    struct Scene {
        object: Pose,
        unfolded: Pose,
        camera: CameraPose,
        parts: BTreeMap<PartId, Vec3>,
        orientations: PartOrientations,
    }

    impl Scene {
        fn loaded() -> Self {
            let bounds = ModelBounds {
                min: Vec3::new(-1.0, -0.2, -0.5),
                max: Vec3::new(1.0, 0.2, 0.5),
            };
            let authored = [
                Vec3::new(1.570_796_4, 0.0, 0.0),
                Vec3::new(-1.570_796_4, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.785_398_2),
                Vec3::new(0.1, 0.2, 0.3),
            ];
            let mut orientations = PartOrientations::default();
            let mut parts = BTreeMap::new();
            for (index, rotation) in authored.into_iter().enumerate() {
                let id = PartId(index as u32);
                orientations.capture(id, None, rotation).unwrap();
                // Parts are laid flat at load.
                parts.insert(id, Vec3::ZERO);
            }
            let unfolded = bounds.unfolded_pose();
            Self {
                object: unfolded,
                unfolded,
                camera: CameraPose::default(),
                parts,
                orientations,
            }
        }

        fn part_list(&self) -> Vec<(PartId, Vec3)> {
            self.parts.iter().map(|(id, r)| (*id, *r)).collect()
        }

        fn toggle(
            &self,
            machine: &mut FoldStateMachine,
            scheduler: &mut AnimationScheduler,
        ) -> Result<FoldState, FoldError> {
            let parts = self.part_list();
            let ctx = FoldContext {
                object: self.object,
                unfolded: self.unfolded,
                camera: self.camera,
                parts: &parts,
                orientations: &self.orientations,
            };
            machine.toggle(Some(&ctx), scheduler)
        }

        fn run(&mut self, scheduler: &mut AnimationScheduler, seconds: f32, step: f32) {
            let mut elapsed = 0.0;
            while elapsed < seconds {
                for (target, value) in scheduler.tick(step) {
                    match target {
                        TweenTarget::ObjectTranslation => self.object.position = value,
                        TweenTarget::ObjectRotation => self.object.rotation = value,
                        TweenTarget::CameraPosition => self.camera.position = value,
                        TweenTarget::ControlsTarget => self.camera.target = value,
                        TweenTarget::PartRotation(id) => {
                            self.parts.insert(id, value);
                        }
                    }
                }
                elapsed += step;
            }
        }
    }

    #[test]
    fn toggle_without_asset_is_ignored() {
        let mut machine = FoldStateMachine::default();
        let mut scheduler = AnimationScheduler::default();
        assert_eq!(
            machine.toggle(None, &mut scheduler),
            Err(FoldError::NoAsset)
        );
        assert_eq!(machine.state(), FoldState::Unfolded);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn fold_targets_authored_rotations_and_folded_pose() {
        let scene = Scene::loaded();
        let machine = FoldStateMachine::default();
        let parts = scene.part_list();
        let ctx = FoldContext {
            object: scene.object,
            unfolded: scene.unfolded,
            camera: scene.camera,
            parts: &parts,
            orientations: &scene.orientations,
        };
        let plan = machine.plan(Some(&ctx)).unwrap();
        assert_eq!(plan.to, FoldState::Folding);
        assert_eq!(plan.duration, 2.0);
        assert!(
            !plan
                .tweens
                .iter()
                .any(|t| matches!(t.target, TweenTarget::CameraPosition))
        );
        let part_targets: Vec<Vec3> = plan
            .tweens
            .iter()
            .filter(|t| matches!(t.target, TweenTarget::PartRotation(_)))
            .map(|t| t.to)
            .collect();
        let authored: Vec<Vec3> = (0..scene.orientations.len() as u32)
            .map(|i| scene.orientations.get(PartId(i)).unwrap().original_rotation)
            .collect();
        assert_eq!(part_targets, authored);
        assert!(plan.tweens.contains(&TweenSpec {
            target: TweenTarget::ObjectTranslation,
            from: scene.object.position,
            to: FOLDED_POSE.position,
        }));
    }

    #[test]
    fn round_trip_restores_part_rotations_bit_for_bit() {
        let mut scene = Scene::loaded();
        let before = scene.parts.clone();
        let object_before = scene.object;
        let mut machine = FoldStateMachine::default();
        let mut scheduler = AnimationScheduler::default();

        scene.toggle(&mut machine, &mut scheduler).unwrap();
        scene.run(&mut scheduler, 2.0, 1.0 / 60.0);
        assert_eq!(machine.settle(&scheduler), Some(FoldState::Folded));
        assert_ne!(scene.parts, before);

        scene.toggle(&mut machine, &mut scheduler).unwrap();
        scene.run(&mut scheduler, 2.0, 1.0 / 60.0);
        assert_eq!(machine.settle(&scheduler), Some(FoldState::Unfolded));

        for (id, rotation) in &before {
            let after = scene.parts[id];
            assert_eq!(after.x.to_bits(), rotation.x.to_bits());
            assert_eq!(after.y.to_bits(), rotation.y.to_bits());
            assert_eq!(after.z.to_bits(), rotation.z.to_bits());
        }
        assert_eq!(scene.object, object_before);
    }

    #[test]
    fn toggle_during_transition_changes_nothing() {
        let mut scene = Scene::loaded();
        let mut machine = FoldStateMachine::default();
        let mut scheduler = AnimationScheduler::default();

        scene.toggle(&mut machine, &mut scheduler).unwrap();
        scene.run(&mut scheduler, 0.5, 0.25);

        let machine_before = machine.clone();
        let scheduler_before = scheduler.clone();
        assert_eq!(
            scene.toggle(&mut machine, &mut scheduler),
            Err(FoldError::TransitionInFlight)
        );
        assert_eq!(machine, machine_before);
        assert_eq!(scheduler, scheduler_before);

        // The original transition still completes on its own schedule.
        scene.run(&mut scheduler, 1.5, 0.25);
        assert_eq!(machine.settle(&scheduler), Some(FoldState::Folded));
    }

    #[test]
    fn transition_is_not_settled_early() {
        let mut scene = Scene::loaded();
        let mut machine = FoldStateMachine::default();
        let mut scheduler = AnimationScheduler::default();

        scene.toggle(&mut machine, &mut scheduler).unwrap();
        scene.run(&mut scheduler, 1.5, 0.25);
        assert_eq!(machine.settle(&scheduler), None);
        assert_eq!(machine.state(), FoldState::Folding);
        assert_eq!(machine.state().action_label(), "UNFOLD");
    }

    #[test]
    fn camera_is_restored_on_the_next_unfold_only() {
        let mut scene = Scene::loaded();
        let mut machine = FoldStateMachine::default();
        let mut scheduler = AnimationScheduler::default();
        assert_eq!(machine.state(), FoldState::Unfolded);

        // Viewer has orbited before folding.
        scene.camera = CameraPose {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::new(0.0, 0.5, 0.0),
        };
        let at_fold = scene.camera;

        scene.toggle(&mut machine, &mut scheduler).unwrap();
        scene.run(&mut scheduler, 2.0, 1.0 / 30.0);
        assert_eq!(machine.settle(&scheduler), Some(FoldState::Folded));
        assert_eq!(machine.saved_camera(), at_fold);
        assert_eq!(scene.object.position, FOLDED_POSE.position);

        // Orbiting while folded does not touch the saved pose.
        scene.camera = CameraPose {
            position: Vec3::new(-6.0, 1.0, 0.0),
            target: Vec3::ZERO,
        };
        assert_eq!(machine.saved_camera(), at_fold);

        scene.toggle(&mut machine, &mut scheduler).unwrap();
        scene.run(&mut scheduler, 1.0, 0.25);
        assert_ne!(scene.camera, at_fold);
        scene.run(&mut scheduler, 1.0, 0.25);
        assert_eq!(machine.settle(&scheduler), Some(FoldState::Unfolded));
        assert_eq!(scene.camera, at_fold);
        assert_eq!(scene.object, scene.unfolded);
    }

    #[test]
    fn reset_cancels_and_returns_to_unfolded() {
        let scene = Scene::loaded();
        let mut machine = FoldStateMachine::default();
        let mut scheduler = AnimationScheduler::default();
        scene.toggle(&mut machine, &mut scheduler).unwrap();
        assert!(!scheduler.is_idle());

        machine.reset(&mut scheduler);
        assert!(scheduler.is_idle());
        assert_eq!(machine.state(), FoldState::Unfolded);
        assert!(machine.in_flight.is_empty());
    }
}
