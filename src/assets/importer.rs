//! Importer Boundary
//!
//! In-memory scene data handed over by an asset importer, and the
//! [`SceneImporter`] trait that produces it.
//!
//! All matrices use glam's column-vector convention. Importers that store
//! matrices row by row convert with [`mat4_from_row_major`](crate::math::mat4_from_row_major).

use std::path::Path;

use glam::{Mat4, Vec2, Vec3};

use crate::animation::NodeTrack;
use crate::errors::Result;

/// One node of the imported transform tree.
#[derive(Debug, Clone)]
pub struct ImportedNode {
    pub name: String,
    pub local_transform: Mat4,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    #[must_use]
    pub fn new(name: impl Into<String>, local_transform: Mat4) -> Self {
        Self {
            name: name.into(),
            local_transform,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: ImportedNode) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ImportedNode::count).sum::<usize>()
    }
}

/// Influence of one bone on one vertex of the owning mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    /// Vertex index local to the mesh.
    pub vertex_id: u32,
    pub weight: f32,
}

/// A bone as referenced by one mesh.
#[derive(Debug, Clone)]
pub struct ImportedBone {
    pub name: String,
    /// Bind-pose inverse: maps mesh space into bone space.
    pub offset_matrix: Mat4,
    pub weights: Vec<VertexWeight>,
}

impl ImportedBone {
    #[must_use]
    pub fn new(name: impl Into<String>, offset_matrix: Mat4) -> Self {
        Self {
            name: name.into(),
            offset_matrix,
            weights: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, vertex_id: u32, weight: f32) -> Self {
        self.weights.push(VertexWeight { vertex_id, weight });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    /// Either empty or one per position.
    pub normals: Vec<Vec3>,
    /// Either empty or one per position.
    pub tex_coords: Vec<Vec2>,
    /// Flat triangle list, local to this mesh.
    pub indices: Vec<u32>,
    pub material_index: u32,
    pub bones: Vec<ImportedBone>,
}

impl ImportedMesh {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone)]
pub struct ImportedAnimation {
    pub name: String,
    /// Zero or negative when the source does not say.
    pub duration_ticks: f32,
    /// Zero when the source does not say.
    pub ticks_per_second: f32,
    pub channels: Vec<NodeTrack>,
}

/// Everything the skinning core consumes from an import.
#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub root: ImportedNode,
    pub meshes: Vec<ImportedMesh>,
    pub animations: Vec<ImportedAnimation>,
}

/// Produces an [`ImportedScene`] from a file.
///
/// Implementations are expected to be cheap to construct and to keep no state
/// between calls; a model load receives its importer as an argument.
pub trait SceneImporter {
    fn import(&self, path: &Path) -> Result<ImportedScene>;
}

impl<F> SceneImporter for F
where
    F: Fn(&Path) -> Result<ImportedScene>,
{
    fn import(&self, path: &Path) -> Result<ImportedScene> {
        self(path)
    }
}
