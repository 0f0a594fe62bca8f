use bevy::prelude::*;
use constants::render_settings::{ASPECT_HEIGHT, ASPECT_WIDTH};

/// Largest fixed-aspect rectangle that fits inside `width × height`.
///
/// Sizes are floored so the result never exceeds the viewport; the aspect
/// error is therefore under one pixel on the rounded side.
pub fn fit_aspect(width: u32, height: u32) -> UVec2 {
    if width == 0 || height == 0 {
        return UVec2::ZERO;
    }

    let (w, h) = (width as u64, height as u64);
    let (aw, ah) = (ASPECT_WIDTH as u64, ASPECT_HEIGHT as u64);

    if w * ah <= h * aw {
        // Width-limited: full width, derived height.
        UVec2::new(width, (w * ah / aw) as u32)
    } else {
        UVec2::new((h * aw / ah) as u32, height)
    }
}

/// Centre a fitted surface inside the window. Returns `(offset, size)`.
pub fn letterbox(window: UVec2) -> (UVec2, UVec2) {
    let size = fit_aspect(window.x, window.y);
    let offset = (window - size) / 2;
    (offset, size)
}
