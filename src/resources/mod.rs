//! GPU-Facing Buffers
//!
//! CPU-side data laid out for direct upload, without depending on any
//! graphics API:
//! - [`MeshGeometry`]: interleaved static vertices and indices
//! - [`SkinBindings`]: four (bone, weight) slots per vertex
//! - [`SkinningPalette`]: fixed-capacity bone matrix array

pub mod geometry;
pub mod palette;
pub mod skin;

pub use geometry::{MeshGeometry, StaticVertex, SubMesh};
pub use palette::SkinningPalette;
pub use skin::{InfluenceOutcome, MAX_BONE_INFLUENCES, SkinBindings, VertexBoneBinding};
