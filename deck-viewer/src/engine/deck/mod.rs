//! The slide deck around the viewer: manifest, navigation and slide UI.

/// Deck manifest loaded from JSON, and per-slide content.
pub mod manifest;

/// Bounded slide index and keyboard navigation.
pub mod navigation;

/// Slide UI, fold button and loading overlay.
///
/// Model slides mount the viewer; every other slide unmounts it.
pub mod presenter;
