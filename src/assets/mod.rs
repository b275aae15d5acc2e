//! Asset Import
//!
//! Parsing model files is delegated to an importer. This module defines the
//! data an importer hands over ([`ImportedScene`]) and ships a glTF importer
//! behind the `gltf` feature.

pub mod importer;
pub mod loaders;

pub use importer::{
    ImportedAnimation, ImportedBone, ImportedMesh, ImportedNode, ImportedScene, SceneImporter,
    VertexWeight,
};
#[cfg(feature = "gltf")]
pub use loaders::GltfImporter;
