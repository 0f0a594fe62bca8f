use bevy::prelude::*;
use constants::colour_grade::{
    CONTRAST_MIDPOINT, DEFAULT_BRIGHTNESS, DEFAULT_CONTRAST, DEFAULT_SATURATION, LUMA_WEIGHTS,
};
use serde::{Deserialize, Serialize};

/// Post-sample colour adjustment applied to the case texture.
///
/// Order is brightness, then contrast around mid grey, then saturation
/// towards BT.601 luma. The shader in `colour_grade.wgsl` mirrors [`ColourGrade::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColourGrade {
    #[serde(default = "default_brightness")]
    pub brightness: f32,
    #[serde(default = "default_contrast")]
    pub contrast: f32,
    #[serde(default = "default_saturation")]
    pub saturation: f32,
}

fn default_brightness() -> f32 {
    DEFAULT_BRIGHTNESS
}

fn default_contrast() -> f32 {
    DEFAULT_CONTRAST
}

fn default_saturation() -> f32 {
    DEFAULT_SATURATION
}

impl Default for ColourGrade {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            contrast: DEFAULT_CONTRAST,
            saturation: DEFAULT_SATURATION,
        }
    }
}

impl ColourGrade {
    /// CPU reference of the fragment patch.
    ///
    /// Contrast and saturation are written as weighted sums so a coefficient
    /// of exactly 1.0 reproduces the input bit-for-bit.
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        let brightened = rgb * self.brightness;
        let contrasted =
            brightened * self.contrast + Vec3::splat(CONTRAST_MIDPOINT * (1.0 - self.contrast));
        let luma = contrasted.dot(Vec3::from_array(LUMA_WEIGHTS));
        Vec3::splat(luma) * (1.0 - self.saturation) + contrasted * self.saturation
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Packed uniform layout: `(brightness, contrast, saturation, unused)`.
    pub fn to_uniform(&self) -> Vec4 {
        Vec4::new(self.brightness, self.contrast, self.saturation, 0.0)
    }
}
