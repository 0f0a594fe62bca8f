use bevy::prelude::*;
use std::collections::BTreeMap;

use super::parts::{PartId, PartOrientations, PartRotation};
use super::pose::{CameraPose, CaseModel, Pose, euler_to_quat};
use super::state_machine::{FoldContext, FoldState, FoldStateMachine};
use super::tween::{AnimationScheduler, TweenTarget};
use crate::engine::camera::orbit::OrbitControls;
use crate::engine::camera::rig::RigCamera;

/// Request to fold or unfold the live case. Sent by the fold button, the
/// keyboard shortcut and the host bridge.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleFold;

/// Emitted whenever the fold machine enters a new state.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldStateChanged {
    pub state: FoldState,
}

/// Per-asset fold data, stored on the case root when the asset attaches.
#[derive(Component, Debug, Clone)]
pub struct FoldLayout {
    pub unfolded: Pose,
    pub orientations: PartOrientations,
}

pub fn handle_toggle_requests(
    mut requests: EventReader<ToggleFold>,
    mut machine: ResMut<FoldStateMachine>,
    mut scheduler: ResMut<AnimationScheduler>,
    cases: Query<(&CaseModel, &FoldLayout)>,
    parts: Query<(&PartId, &PartRotation)>,
    mut rig: Query<(&Transform, &mut OrbitControls), With<RigCamera>>,
    mut changes: EventWriter<FoldStateChanged>,
) {
    for _ in requests.read() {
        let camera = rig.single().ok().map(|(transform, controls)| CameraPose {
            position: transform.translation,
            target: controls.target,
        });
        let part_rotations: Vec<(PartId, Vec3)> =
            parts.iter().map(|(id, rotation)| (*id, rotation.0)).collect();
        let ctx = cases
            .single()
            .ok()
            .zip(camera)
            .map(|((model, layout), camera)| FoldContext {
                object: model.pose,
                unfolded: layout.unfolded,
                camera,
                parts: &part_rotations,
                orientations: &layout.orientations,
            });

        match machine.toggle(ctx.as_ref(), &mut scheduler) {
            Ok(state) => {
                if state == FoldState::Unfolding {
                    if let Ok((_, mut controls)) = rig.single_mut() {
                        controls.halt();
                    }
                }
                info!("Fold transition started: {}", state.as_str());
                changes.write(FoldStateChanged { state });
            }
            Err(err) => debug!("Fold toggle ignored: {err}"),
        }
    }
}

/// Step the shared scheduler and write this frame's values into the case,
/// its parts and the rig.
pub fn advance_animations(
    time: Res<Time>,
    mut scheduler: ResMut<AnimationScheduler>,
    mut cases: Query<&mut CaseModel>,
    mut parts: Query<(&PartId, &mut PartRotation)>,
    mut rig: Query<(&mut Transform, &mut OrbitControls), With<RigCamera>>,
) {
    if scheduler.is_idle() {
        return;
    }

    let mut part_values = BTreeMap::new();
    for (target, value) in scheduler.tick(time.delta_secs()) {
        match target {
            TweenTarget::ObjectTranslation => {
                for mut model in &mut cases {
                    model.pose.position = value;
                }
            }
            TweenTarget::ObjectRotation => {
                for mut model in &mut cases {
                    model.pose.rotation = value;
                }
            }
            TweenTarget::CameraPosition => {
                for (mut transform, _) in &mut rig {
                    transform.translation = value;
                }
            }
            TweenTarget::ControlsTarget => {
                for (_, mut controls) in &mut rig {
                    controls.target = value;
                }
            }
            TweenTarget::PartRotation(id) => {
                part_values.insert(id, value);
            }
        }
    }

    if part_values.is_empty() {
        return;
    }
    for (id, mut rotation) in &mut parts {
        if let Some(value) = part_values.get(id) {
            rotation.0 = *value;
        }
    }
}

pub fn settle_fold(
    mut machine: ResMut<FoldStateMachine>,
    scheduler: Res<AnimationScheduler>,
    mut changes: EventWriter<FoldStateChanged>,
) {
    if !machine.state().is_transitioning() {
        return;
    }
    if let Some(state) = machine.settle(&scheduler) {
        info!("Fold transition finished: {}", state.as_str());
        changes.write(FoldStateChanged { state });
    }
}

/// Derive transforms from the Euler state held on the case and its parts.
pub fn sync_case_transforms(
    mut cases: Query<(&CaseModel, &mut Transform), Changed<CaseModel>>,
    mut parts: Query<(&PartRotation, &mut Transform), (Changed<PartRotation>, Without<CaseModel>)>,
) {
    for (model, mut transform) in &mut cases {
        *transform = model.pose.to_transform(model.scale);
    }
    for (rotation, mut transform) in &mut parts {
        transform.rotation = euler_to_quat(rotation.0);
    }
}
