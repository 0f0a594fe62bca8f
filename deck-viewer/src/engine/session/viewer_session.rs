use bevy::gltf::Gltf;
use bevy::prelude::*;

use super::generation::{GenerationGate, LoadGeneration};
use super::slot::AssetSlot;
use crate::engine::loading::error::AssetLoadError;
use crate::engine::materials::colour_grade::ColourGrade;
use crate::engine::materials::graded_material::GradedMaterial;

/// What the host asked the viewer to show.
#[derive(Debug, Clone, PartialEq)]
pub struct MountRequest {
    pub texture_path: String,
    pub colour_grade: ColourGrade,
}

/// Host-side lifecycle requests, handled in the order they were sent.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ViewerRequest {
    Mount(MountRequest),
    Unmount,
}

/// Everything owned by the asset currently on screen.
#[derive(Debug, Clone)]
pub struct LiveAsset {
    pub generation: LoadGeneration,
    pub texture_path: String,
    pub root: Entity,
    pub material: Handle<GradedMaterial>,
    pub texture: Handle<Image>,
    pub gltf: Handle<Gltf>,
    pub scene: Handle<Scene>,
    pub part_count: usize,
}

/// Lifetime of one mounted viewer.
#[derive(Resource, Debug, Default)]
pub struct ViewerSession {
    pub gate: GenerationGate,
    pub mounted: Option<MountRequest>,
    /// Camera, lights and ground.
    pub rig: Option<Entity>,
    pub asset: AssetSlot<LiveAsset>,
    pub last_error: Option<AssetLoadError>,
}

impl ViewerSession {
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Whether `request` asks for something other than what is mounted.
    pub fn wants(&self, request: &MountRequest) -> bool {
        self.mounted.as_ref() != Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str) -> MountRequest {
        MountRequest {
            texture_path: path.into(),
            colour_grade: ColourGrade::default(),
        }
    }

    #[test]
    fn remounting_the_same_request_is_not_wanted() {
        let mut session = ViewerSession::default();
        assert!(!session.is_mounted());
        assert!(session.wants(&request("caseTexture_01.png")));

        session.mounted = Some(request("caseTexture_01.png"));
        assert!(!session.wants(&request("caseTexture_01.png")));
        assert!(session.wants(&request("caseTexture_02.png")));

        let mut graded = request("caseTexture_01.png");
        graded.colour_grade.saturation = 0.0;
        assert!(session.wants(&graded));
    }
}
