use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::{Gltf, GltfAssetLabel};
use bevy::prelude::*;
use constants::paths::CASE_MESH_PATH;

use super::error::AssetLoadError;
use super::progress::{LoadProgress, LoadProgressChanged};
use super::texture_config::load_case_texture;
use crate::engine::materials::colour_grade::ColourGrade;
use crate::engine::session::generation::LoadGeneration;

/// Units counted towards progress: the texture, the mesh file, the mesh's
/// buffers and images, and the instanced scene. Byte counts are not
/// available per unit, so progress moves in coarse steps of 25%.
pub const LOAD_UNITS: u32 = 4;

/// A load in flight for one generation. Exists as a resource only while a
/// load is running; the controller takes it when the asset attaches.
#[derive(Resource, Debug)]
pub struct PendingLoad {
    pub generation: LoadGeneration,
    pub texture_path: String,
    pub colour_grade: ColourGrade,
    pub texture: Handle<Image>,
    pub gltf: Handle<Gltf>,
    pub scene: Handle<Scene>,
    /// Hidden scene root the mesh is instanced under.
    pub root: Entity,
    pub scene_instanced: bool,
    /// Set once every unit is done; the controller attaches on the next run.
    pub ready: bool,
    pub failure: Option<AssetLoadError>,
}

/// Kick off the texture and mesh loads in parallel and spawn the hidden root
/// the scene will be instanced under.
pub fn start_generation_load(
    commands: &mut Commands,
    asset_server: &AssetServer,
    texture_path: &str,
    colour_grade: ColourGrade,
    generation: LoadGeneration,
) -> PendingLoad {
    info!(
        "Loading case generation {}: {} + {}",
        generation.0, CASE_MESH_PATH, texture_path
    );
    if !colour_grade.is_neutral() {
        debug!("Generation {} colour grade: {colour_grade:?}", generation.0);
    }

    let texture = load_case_texture(asset_server, texture_path);
    let gltf = asset_server.load::<Gltf>(CASE_MESH_PATH);
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(CASE_MESH_PATH));

    let root = commands
        .spawn((
            Name::new(format!("case generation {}", generation.0)),
            generation,
            SceneRoot(scene.clone()),
            Transform::default(),
            Visibility::Hidden,
        ))
        .id();

    PendingLoad {
        generation,
        texture_path: texture_path.to_owned(),
        colour_grade,
        texture,
        gltf,
        scene,
        root,
        scene_instanced: false,
        ready: false,
        failure: None,
    }
}

/// Coarse state of one progress unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    Pending,
    Done,
    Failed(String),
}

impl UnitState {
    pub fn from_load(state: &LoadState) -> Self {
        match state {
            LoadState::Loaded => Self::Done,
            LoadState::Failed(err) => Self::Failed(err.to_string()),
            _ => Self::Pending,
        }
    }

    pub fn from_dependencies(state: &RecursiveDependencyLoadState) -> Self {
        match state {
            RecursiveDependencyLoadState::Loaded => Self::Done,
            RecursiveDependencyLoadState::Failed(err) => Self::Failed(err.to_string()),
            _ => Self::Pending,
        }
    }

    fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Point-in-time view of a pending load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSnapshot {
    pub texture: UnitState,
    pub mesh_file: UnitState,
    pub mesh_dependencies: UnitState,
    pub scene_instanced: bool,
}

impl LoadSnapshot {
    pub fn capture(asset_server: &AssetServer, pending: &PendingLoad) -> Self {
        let texture = asset_server
            .get_load_state(&pending.texture)
            .map(|state| UnitState::from_load(&state))
            .unwrap_or(UnitState::Pending);
        let (mesh_file, mesh_dependencies) = asset_server
            .get_load_states(&pending.gltf)
            .map(|(state, _, recursive)| {
                (
                    UnitState::from_load(&state),
                    UnitState::from_dependencies(&recursive),
                )
            })
            .unwrap_or((UnitState::Pending, UnitState::Pending));

        Self {
            texture,
            mesh_file,
            mesh_dependencies,
            scene_instanced: pending.scene_instanced,
        }
    }

    pub fn progress(&self) -> LoadProgress {
        let loaded = [
            self.texture.is_done(),
            self.mesh_file.is_done(),
            self.mesh_dependencies.is_done(),
            self.scene_instanced,
        ]
        .into_iter()
        .filter(|done| *done)
        .count() as u32;
        LoadProgress::new(loaded, Some(LOAD_UNITS))
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// First failure, texture before mesh.
    pub fn failure(&self, texture_path: &str) -> Option<AssetLoadError> {
        if let Some(reason) = self.texture.failure() {
            return Some(AssetLoadError::Texture {
                path: texture_path.to_owned(),
                reason: reason.to_owned(),
            });
        }
        self.mesh_file
            .failure()
            .or_else(|| self.mesh_dependencies.failure())
            .map(|reason| AssetLoadError::Mesh {
                path: CASE_MESH_PATH.to_owned(),
                reason: reason.to_owned(),
            })
    }
}

/// A generation's load failed. No retry follows.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadFailed {
    pub generation: u64,
    pub error: AssetLoadError,
}

/// Report progress for the pending load and detect failures.
pub fn track_load_progress(
    asset_server: Res<AssetServer>,
    pending: Option<ResMut<PendingLoad>>,
    mut progress: ResMut<LoadProgress>,
    mut progress_events: EventWriter<LoadProgressChanged>,
    mut failures: EventWriter<AssetLoadFailed>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    if pending.failure.is_some() {
        return;
    }

    let snapshot = LoadSnapshot::capture(&asset_server, &pending);
    if let Some(error) = snapshot.failure(&pending.texture_path) {
        error!("{error}");
        pending.failure = Some(error.clone());
        failures.write(AssetLoadFailed {
            generation: pending.generation.0,
            error,
        });
        return;
    }

    if snapshot.is_complete() && !pending.ready {
        pending.ready = true;
    }
    if progress.advance_to(snapshot.progress()) {
        debug!("Case load progress: {}", progress.label());
        progress_events.write(LoadProgressChanged {
            generation: pending.generation.0,
            percent: progress.percent(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        texture: UnitState,
        mesh_file: UnitState,
        mesh_dependencies: UnitState,
        scene_instanced: bool,
    ) -> LoadSnapshot {
        LoadSnapshot {
            texture,
            mesh_file,
            mesh_dependencies,
            scene_instanced,
        }
    }

    #[test]
    fn each_finished_unit_counts() {
        use UnitState::*;
        assert_eq!(
            snapshot(Pending, Pending, Pending, false).progress(),
            LoadProgress::new(0, Some(4))
        );
        assert_eq!(
            snapshot(Done, Pending, Pending, false).progress().percent(),
            25.0
        );
        assert_eq!(
            snapshot(Done, Done, Pending, false).progress().percent(),
            50.0
        );
        let done = snapshot(Done, Done, Done, true);
        assert!(done.is_complete());
        assert_eq!(done.progress().label(), "100%");
    }

    #[test]
    fn instanced_scene_without_texture_is_not_complete() {
        use UnitState::*;
        assert!(!snapshot(Pending, Done, Done, true).is_complete());
    }

    #[test]
    fn texture_failure_is_reported_first() {
        use UnitState::*;
        let failed = snapshot(
            Failed("404".into()),
            Failed("bad json".into()),
            Pending,
            false,
        );
        assert_eq!(
            failed.failure("caseTexture_02.png"),
            Some(AssetLoadError::Texture {
                path: "caseTexture_02.png".into(),
                reason: "404".into(),
            })
        );
    }

    #[test]
    fn mesh_dependency_failure_names_the_mesh() {
        use UnitState::*;
        let failed = snapshot(Done, Done, Failed("missing buffer".into()), false);
        let error = failed.failure("caseTexture_01.png").unwrap();
        assert_eq!(error.path(), CASE_MESH_PATH);
        assert!(error.to_string().contains("missing buffer"));
    }

    #[test]
    fn healthy_load_has_no_failure() {
        use UnitState::*;
        assert_eq!(snapshot(Done, Pending, Pending, false).failure("x.png"), None);
    }
}
