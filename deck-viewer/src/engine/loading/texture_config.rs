use bevy::image::{
    ImageFilterMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor,
};
use bevy::prelude::*;
use constants::render_settings::MAX_ANISOTROPY;

/// Sampler for the printed case artwork: trilinear with full anisotropy.
pub fn case_texture_sampler() -> ImageSamplerDescriptor {
    ImageSamplerDescriptor {
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        anisotropy_clamp: MAX_ANISOTROPY,
        ..default()
    }
}

/// Loader settings for case textures. Rows are used as stored, matching the
/// glTF UV origin, and colours are decoded as sRGB.
pub fn configure_case_texture(settings: &mut ImageLoaderSettings) {
    settings.is_srgb = true;
    settings.sampler = ImageSampler::Descriptor(case_texture_sampler());
}

pub fn load_case_texture(asset_server: &AssetServer, path: &str) -> Handle<Image> {
    asset_server.load_with_settings(path.to_owned(), configure_case_texture)
}
