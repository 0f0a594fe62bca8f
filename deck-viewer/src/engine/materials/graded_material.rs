//! Lit case material with the colour-grade patch.
use bevy::{
    pbr::{ExtendedMaterial, MaterialExtension},
    prelude::*,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::paths::COLOUR_GRADE_SHADER_PATH;
use constants::render_settings::{CASE_METALLIC, CASE_ROUGHNESS};

use super::colour_grade::ColourGrade;

/// Standard metal/roughness material extended with the grade uniform.
pub type GradedMaterial = ExtendedMaterial<StandardMaterial, ColourGradeExtension>;

/// Extension half of [`GradedMaterial`]. Binding 100 keeps clear of the base
/// material's slots.
#[derive(Asset, AsBindGroup, Reflect, Debug, Clone)]
pub struct ColourGradeExtension {
    #[uniform(100)]
    pub params: Vec4,
}

impl From<ColourGrade> for ColourGradeExtension {
    fn from(grade: ColourGrade) -> Self {
        Self {
            params: grade.to_uniform(),
        }
    }
}

impl MaterialExtension for ColourGradeExtension {
    fn fragment_shader() -> ShaderRef {
        COLOUR_GRADE_SHADER_PATH.into()
    }

    fn deferred_fragment_shader() -> ShaderRef {
        COLOUR_GRADE_SHADER_PATH.into()
    }
}

/// Describe the case material for a texture. Pure so the parameters can be
/// checked without an asset store.
pub fn describe_material(texture: Handle<Image>, grade: ColourGrade) -> GradedMaterial {
    ExtendedMaterial {
        base: StandardMaterial {
            base_color_texture: Some(texture),
            metallic: CASE_METALLIC,
            perceptual_roughness: CASE_ROUGHNESS,
            ..default()
        },
        extension: grade.into(),
    }
}

/// Register one material for the generation. Every part gets this same handle.
pub fn build_material(
    materials: &mut Assets<GradedMaterial>,
    texture: Handle<Image>,
    grade: ColourGrade,
) -> Handle<GradedMaterial> {
    materials.add(describe_material(texture, grade))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_binds_texture_and_surface() {
        let texture = Handle::<Image>::default();
        let material = describe_material(texture.clone(), ColourGrade::default());
        assert_eq!(material.base.base_color_texture, Some(texture));
        assert_eq!(material.base.metallic, 0.1);
        assert_eq!(material.base.perceptual_roughness, 0.7);
        assert_eq!(material.extension.params, Vec4::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn one_handle_backs_every_part() {
        let mut materials = Assets::<GradedMaterial>::default();
        let grade = ColourGrade {
            brightness: 1.1,
            contrast: 0.9,
            saturation: 1.2,
        };
        let handle = build_material(&mut materials, Handle::default(), grade);
        let parts = vec![handle.clone(); 4];
        assert_eq!(materials.len(), 1);
        let params: Vec<Vec4> = parts
            .iter()
            .filter_map(|h| materials.get(h))
            .map(|m| m.extension.params)
            .collect();
        assert_eq!(params.len(), 4);
        assert!(params.iter().all(|p| *p == grade.to_uniform()));
    }
}
