//! Matrix convention helpers.
//!
//! The crate works in glam's column-vector convention: a point is transformed
//! as `M * p`, so composed transforms apply right to left. Importers that hand
//! out row-major storage of column-vector matrices (the assimp layout) go
//! through [`mat4_from_row_major`] once at load time.

use glam::{Mat4, Quat, Vec3};

/// Builds a matrix from 16 floats stored row by row.
///
/// Equivalent to reading the array as columns and transposing.
#[inline]
#[must_use]
pub fn mat4_from_row_major(m: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(m).transpose()
}

/// Local transform of an animated node: scale first, then rotate, then translate.
#[inline]
#[must_use]
pub fn compose_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, rotation, translation)
}

/// Approximate matrix equality, used by tests and debug assertions.
#[inline]
#[must_use]
pub fn mat4_approx_eq(a: &Mat4, b: &Mat4, epsilon: f32) -> bool {
    a.abs_diff_eq(*b, epsilon)
}
