//! Static Mesh Buffers
//!
//! All meshes of a model are concatenated into one interleaved vertex buffer
//! and one index buffer. Each mesh keeps its own index numbering; the
//! [`SubMesh`] records where its vertices start so a draw call can pass
//! `base_vertex` instead of rewriting the indices.

use glam::{Vec2, Vec3};

use crate::assets::ImportedMesh;
use crate::errors::{ArmatureError, Result};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StaticVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// One mesh's slice of the shared buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMesh {
    pub base_vertex: u32,
    pub base_index: u32,
    pub index_count: u32,
    pub material_index: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<StaticVertex>,
    pub indices: Vec<u32>,
    pub sub_meshes: Vec<SubMesh>,
}

impl MeshGeometry {
    /// Concatenates `meshes` in order. Missing normals or texture coordinates
    /// are filled with zeros.
    ///
    /// # Errors
    /// Returns [`ArmatureError::InvalidMesh`] for index lists that are not a
    /// triangle list, and [`ArmatureError::VertexIndexOutOfBounds`] for indices
    /// past the end of their mesh.
    pub fn from_meshes(meshes: &[ImportedMesh]) -> Result<Self> {
        let vertex_total = meshes.iter().map(ImportedMesh::vertex_count).sum();
        let index_total = meshes.iter().map(|m| m.indices.len()).sum();

        let mut geometry = Self {
            vertices: Vec::with_capacity(vertex_total),
            indices: Vec::with_capacity(index_total),
            sub_meshes: Vec::with_capacity(meshes.len()),
        };

        for mesh in meshes {
            geometry.append(mesh)?;
        }

        Ok(geometry)
    }

    fn append(&mut self, mesh: &ImportedMesh) -> Result<()> {
        let vertex_count = mesh.vertex_count();

        if mesh.indices.len() % 3 != 0 {
            return Err(ArmatureError::InvalidMesh {
                mesh: mesh.name.clone(),
                reason: format!(
                    "index count {} is not a multiple of 3",
                    mesh.indices.len()
                ),
            });
        }
        if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ArmatureError::VertexIndexOutOfBounds {
                context: format!("index buffer of mesh '{}'", mesh.name),
                index: bad as usize,
                count: vertex_count,
            });
        }

        self.sub_meshes.push(SubMesh {
            base_vertex: self.vertices.len() as u32,
            base_index: self.indices.len() as u32,
            index_count: mesh.indices.len() as u32,
            material_index: mesh.material_index,
        });

        self.vertices.extend(mesh.positions.iter().enumerate().map(|(i, p)| {
            let normal = mesh.normals.get(i).copied().unwrap_or(Vec3::ZERO);
            let uv = mesh.tex_coords.get(i).copied().unwrap_or(Vec2::ZERO);
            StaticVertex {
                position: p.to_array(),
                normal: normal.to_array(),
                tex_coord: uv.to_array(),
            }
        }));
        self.indices.extend_from_slice(&mesh.indices);

        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(name: &str, material_index: u32) -> ImportedMesh {
        ImportedMesh {
            name: name.to_string(),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            material_index,
            ..Default::default()
        }
    }

    #[test]
    fn test_sub_meshes_record_offsets() {
        let geometry = MeshGeometry::from_meshes(&[triangle("a", 0), triangle("b", 2)]).unwrap();

        assert_eq!(geometry.vertex_count(), 6);
        assert_eq!(geometry.indices, [0, 1, 2, 0, 1, 2]);
        assert_eq!(
            geometry.sub_meshes[1],
            SubMesh {
                base_vertex: 3,
                base_index: 3,
                index_count: 3,
                material_index: 2,
            }
        );
        // Missing texture coordinates default to zero.
        assert_eq!(geometry.vertices[4].tex_coord, [0.0, 0.0]);
        assert_eq!(geometry.vertices[4].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let mut mesh = triangle("broken", 0);
        mesh.indices.push(0);
        assert!(matches!(
            MeshGeometry::from_meshes(&[mesh]),
            Err(ArmatureError::InvalidMesh { .. })
        ));
    }

    #[test]
    fn test_rejects_index_past_mesh_end() {
        let mut mesh = triangle("broken", 0);
        mesh.indices[2] = 3;
        assert!(matches!(
            MeshGeometry::from_meshes(&[mesh]),
            Err(ArmatureError::VertexIndexOutOfBounds { index: 3, count: 3, .. })
        ));
    }
}
