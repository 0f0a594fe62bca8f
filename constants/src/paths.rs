/// Fixed case mesh. Every model slide bakes a different texture onto it.
pub const CASE_MESH_PATH: &str = "case.gltf";

/// Texture used when a model slide does not name one.
pub const DEFAULT_CASE_TEXTURE: &str = "caseTexture_01.png";

/// Deck manifest listing the slides.
pub const DECK_MANIFEST_PATH: &str = "deck.json";

/// Colour-grade fragment patch applied on top of the standard PBR shader.
pub const COLOUR_GRADE_SHADER_PATH: &str = "shaders/colour_grade.wgsl";
