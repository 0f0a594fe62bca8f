use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use bevy::scene::SceneInstanceReady;

use super::generation::LoadGeneration;
use super::viewer_session::{LiveAsset, ViewerRequest, ViewerSession};
use crate::engine::camera::orbit::OrbitControls;
use crate::engine::camera::rig::{RigCamera, spawn_rig};
use crate::engine::core::app_state::ViewerPhase;
use crate::engine::fold::parts::{PartId, PartOrientations, PartRotation};
use crate::engine::fold::pose::{CaseModel, ModelBounds, quat_to_euler};
use crate::engine::fold::state_machine::FoldStateMachine;
use crate::engine::fold::systems::FoldLayout;
use crate::engine::fold::tween::AnimationScheduler;
use crate::engine::loading::model_loader::{
    AssetLoadFailed, LOAD_UNITS, PendingLoad, start_generation_load,
};
use crate::engine::loading::progress::{LoadProgress, LoadProgressChanged};
use crate::engine::materials::graded_material::{GradedMaterial, build_material};

/// Apply mount and unmount requests in the order they arrived.
pub fn handle_viewer_requests(
    mut commands: Commands,
    mut requests: EventReader<ViewerRequest>,
    mut session: ResMut<ViewerSession>,
    asset_server: Res<AssetServer>,
    pending: Option<Res<PendingLoad>>,
    mut scheduler: ResMut<AnimationScheduler>,
    mut machine: ResMut<FoldStateMachine>,
    mut progress: ResMut<LoadProgress>,
    mut progress_events: EventWriter<LoadProgressChanged>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut graded: ResMut<Assets<GradedMaterial>>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    let mut pending_root = pending.map(|load| load.root);

    for request in requests.read() {
        match request {
            ViewerRequest::Mount(mount) => {
                if !session.wants(mount) {
                    debug!("Viewer already showing {}", mount.texture_path);
                    continue;
                }

                if session.rig.is_none() {
                    let rig = spawn_rig(&mut commands, &mut meshes, &mut standard_materials);
                    session.rig = Some(rig);
                    info!("Viewer mounted");
                }

                // A newer load supersedes one that has not attached yet.
                if let Some(root) = pending_root.take() {
                    commands.entity(root).try_despawn();
                    commands.remove_resource::<PendingLoad>();
                }

                let generation = session.gate.begin();
                let load = start_generation_load(
                    &mut commands,
                    &asset_server,
                    &mount.texture_path,
                    mount.colour_grade,
                    generation,
                );
                commands.entity(load.root).observe(on_scene_ready);
                pending_root = Some(load.root);
                commands.insert_resource(load);

                session.mounted = Some(mount.clone());
                session.last_error = None;
                progress.set(0, Some(LOAD_UNITS));
                progress_events.write(LoadProgressChanged {
                    generation: generation.0,
                    percent: progress.percent(),
                });

                if !session.asset.is_live() {
                    next_phase.set(ViewerPhase::Loading);
                }
            }
            ViewerRequest::Unmount => {
                if teardown(
                    &mut commands,
                    &mut session,
                    pending_root.take(),
                    &mut scheduler,
                    &mut machine,
                    &mut graded,
                ) {
                    *progress = LoadProgress::default();
                    next_phase.set(ViewerPhase::Idle);
                }
            }
        }
    }
}

/// Release everything the session owns. Safe to call on an unmounted
/// session; returns whether anything was torn down.
fn teardown(
    commands: &mut Commands,
    session: &mut ViewerSession,
    pending_root: Option<Entity>,
    scheduler: &mut AnimationScheduler,
    machine: &mut FoldStateMachine,
    graded: &mut Assets<GradedMaterial>,
) -> bool {
    let owns_anything = session.is_mounted()
        || session.rig.is_some()
        || session.asset.is_live()
        || pending_root.is_some();
    if !owns_anything {
        debug!("Unmount ignored: viewer is not mounted");
        return false;
    }

    // Late callbacks from this session are dropped from here on.
    session.gate.close();

    let cancelled = scheduler.cancel_all();
    *machine = FoldStateMachine::default();

    if let Some(root) = pending_root {
        commands.entity(root).try_despawn();
        commands.remove_resource::<PendingLoad>();
    }
    session
        .asset
        .dispose(|asset| dispose_asset(&mut *commands, &mut *graded, asset));
    if let Some(rig) = session.rig.take() {
        commands.entity(rig).try_despawn();
    }
    // The rig raised the ambient level when it spawned.
    commands.insert_resource(AmbientLight::default());
    session.mounted = None;

    info!("Viewer unmounted ({cancelled} animations cancelled)");
    true
}

/// Despawn an asset's entities and release its GPU-side resources. Texture
/// and mesh handles are dropped with `asset`.
fn dispose_asset(commands: &mut Commands, graded: &mut Assets<GradedMaterial>, asset: LiveAsset) {
    commands.entity(asset.root).try_despawn();
    graded.remove(&asset.material);
    info!(
        "Disposed case generation {} ({})",
        asset.generation.0, asset.texture_path
    );
}

/// Success callback for a scene instance.
pub fn on_scene_ready(
    trigger: Trigger<SceneInstanceReady>,
    generations: Query<&LoadGeneration>,
    session: Res<ViewerSession>,
    mut pending: Option<ResMut<PendingLoad>>,
    mut commands: Commands,
) {
    admit_instanced_root(
        trigger.target(),
        &generations,
        &session,
        pending.as_deref_mut(),
        &mut commands,
    );
}

/// Only the pending load of the current generation is accepted; any other
/// instanced root is despawned unseen. Returns whether `root` was accepted.
fn admit_instanced_root(
    root: Entity,
    generations: &Query<&LoadGeneration>,
    session: &ViewerSession,
    pending: Option<&mut PendingLoad>,
    commands: &mut Commands,
) -> bool {
    let Ok(generation) = generations.get(root) else {
        return false;
    };

    if let Err(stale) = session.gate.admit(*generation) {
        debug!("{stale}");
        commands.entity(root).try_despawn();
        return false;
    }

    match pending {
        Some(pending) if pending.root == root => {
            debug!("Case scene instanced for generation {}", generation.0);
            pending.scene_instanced = true;
            true
        }
        _ => {
            commands.entity(root).try_despawn();
            false
        }
    }
}

/// Once the pending load is ready, paint, snapshot and place the new asset,
/// then swap it in for the old one.
pub fn attach_ready_asset(
    mut commands: Commands,
    pending: Option<Res<PendingLoad>>,
    mut session: ResMut<ViewerSession>,
    children: Query<&Children>,
    nodes: Query<(Option<&Name>, &Transform), Without<RigCamera>>,
    primitives: Query<(&ChildOf, Option<&Aabb>, &GlobalTransform), With<Mesh3d>>,
    mut graded: ResMut<Assets<GradedMaterial>>,
    mut scheduler: ResMut<AnimationScheduler>,
    mut machine: ResMut<FoldStateMachine>,
    mut rig: Query<(&mut Transform, &mut OrbitControls), With<RigCamera>>,
    mut next_phase: ResMut<NextState<ViewerPhase>>,
) {
    let Some(pending) = pending else {
        return;
    };
    if pending.failure.is_some() || !pending.ready {
        return;
    }
    if let Err(stale) = session.gate.admit(pending.generation) {
        debug!("{stale}");
        commands.entity(pending.root).try_despawn();
        commands.remove_resource::<PendingLoad>();
        return;
    }

    let mesh_entities: Vec<Entity> = children
        .iter_descendants_depth_first(pending.root)
        .filter(|entity| primitives.contains(*entity))
        .collect();

    // Bounds are computed after the scene spawns; wait for every primitive.
    let mut bounds = ModelBounds::EMPTY;
    for entity in &mesh_entities {
        let Ok((_, Some(aabb), transform)) = primitives.get(*entity) else {
            return;
        };
        bounds.include_aabb(aabb, transform);
    }

    let material = build_material(&mut graded, pending.texture.clone(), pending.colour_grade);

    // A part is the node carrying a primitive; multi-primitive nodes count once.
    let mut part_nodes: Vec<Entity> = Vec::new();
    for entity in &mesh_entities {
        commands
            .entity(*entity)
            .remove::<MeshMaterial3d<StandardMaterial>>()
            .insert(MeshMaterial3d(material.clone()));

        let node = match primitives.get(*entity) {
            Ok((child_of, _, _)) if child_of.parent() != pending.root => child_of.parent(),
            _ => *entity,
        };
        if !part_nodes.contains(&node) {
            part_nodes.push(node);
        }
    }

    let mut orientations = PartOrientations::default();
    for (index, node) in part_nodes.iter().enumerate() {
        let part = PartId(index as u32);
        let Ok((name, transform)) = nodes.get(*node) else {
            continue;
        };
        let name = name.map(|name| name.as_str().to_owned());
        if let Err(err) = orientations.capture(part, name, quat_to_euler(transform.rotation)) {
            warn!("{err}");
            continue;
        }
        // Parts start flat; folding drives them to their authored rotation.
        commands
            .entity(*node)
            .insert((part, PartRotation(Vec3::ZERO)));
    }

    let part_count = orientations.len();
    if orientations.is_empty() {
        warn!(
            "Case generation {} has no foldable parts",
            pending.generation.0
        );
    }

    let unfolded = bounds.unfolded_pose();
    commands.entity(pending.root).insert((
        CaseModel {
            pose: unfolded,
            scale: bounds.fit_scale(),
        },
        FoldLayout {
            unfolded,
            orientations,
        },
        Visibility::Inherited,
    ));

    let live = LiveAsset {
        generation: pending.generation,
        texture_path: pending.texture_path.clone(),
        root: pending.root,
        material,
        texture: pending.texture.clone(),
        gltf: pending.gltf.clone(),
        scene: pending.scene.clone(),
        part_count,
    };
    info!(
        "Case generation {} attached: {} parts, size {}",
        live.generation.0,
        live.part_count,
        bounds.size()
    );
    session
        .asset
        .attach(live, |previous| dispose_asset(&mut commands, &mut graded, previous));
    commands.remove_resource::<PendingLoad>();

    // New asset starts unfolded, with the rig back at the saved pose.
    scheduler.cancel_all();
    machine.reset(&mut scheduler);
    let saved = machine.saved_camera();
    if let Ok((mut transform, mut controls)) = rig.single_mut() {
        *transform = Transform::from_translation(saved.position).looking_at(saved.target, Vec3::Y);
        *controls = OrbitControls::new(saved.target);
    }

    next_phase.set(ViewerPhase::Running);
}

pub fn record_load_failures(
    mut failures: EventReader<AssetLoadFailed>,
    mut session: ResMut<ViewerSession>,
) {
    for failure in failures.read() {
        if session.gate.admit(LoadGeneration(failure.generation)).is_ok() {
            session.last_error = Some(failure.error.clone());
        }
    }
}
