//! Case material: standard PBR surface with a post-sample colour grade.

/// Brightness, contrast and saturation coefficients with a CPU reference.
pub mod colour_grade;

/// `ExtendedMaterial` wiring and material construction.
pub mod graded_material;
