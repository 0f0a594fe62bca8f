/// Neutral grade. Texture sets can override these per slide.
pub const DEFAULT_BRIGHTNESS: f32 = 1.0;
pub const DEFAULT_CONTRAST: f32 = 1.0;
pub const DEFAULT_SATURATION: f32 = 1.0;

/// ITU-R BT.601 luma weights.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Contrast pivots around mid grey.
pub const CONTRAST_MIDPOINT: f32 = 0.5;
