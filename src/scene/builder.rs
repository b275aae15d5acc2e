use crate::assets::ImportedMesh;
use crate::errors::{ArmatureError, Result};
use crate::resources::skin::{MAX_BONE_INFLUENCES, SkinBindings};
use crate::scene::skeleton::Skeleton;
use crate::settings::SkinningSettings;

/// Builds the model-wide skeleton and vertex bindings from imported meshes.
pub struct SkeletonBuilder;

impl SkeletonBuilder {
    /// Scans `meshes` in order. Bone indices are handed out in order of first
    /// reference across all meshes; a mesh's vertices start right after the
    /// previous mesh's.
    ///
    /// # Errors
    /// Fails if the bone count exceeds `settings.max_bones`, if a weight
    /// names a vertex outside its mesh, or if a vertex overflows under
    /// [`InfluenceOverflow::Reject`](crate::settings::InfluenceOverflow::Reject).
    pub fn build(
        meshes: &[ImportedMesh],
        settings: &SkinningSettings,
    ) -> Result<(Skeleton, SkinBindings)> {
        let vertex_total = meshes.iter().map(ImportedMesh::vertex_count).sum();
        let mut skeleton = Skeleton::new(settings.max_bones);
        let mut bindings = SkinBindings::new(vertex_total, settings.influence_overflow);

        let mut base_vertex = 0usize;
        for mesh in meshes {
            let vertex_count = mesh.vertex_count();

            for bone in &mesh.bones {
                let bone_index = skeleton.get_or_assign_bone_index(&bone.name, bone.offset_matrix)?;

                for w in &bone.weights {
                    let local = w.vertex_id as usize;
                    if local >= vertex_count {
                        return Err(ArmatureError::VertexIndexOutOfBounds {
                            context: format!("weight of bone '{}' in mesh '{}'", bone.name, mesh.name),
                            index: local,
                            count: vertex_count,
                        });
                    }
                    bindings.accumulate_vertex_weight(base_vertex + local, bone_index, w.weight)?;
                }
            }

            base_vertex += vertex_count;
        }

        if bindings.dropped_influences() > 0 {
            log::warn!(
                "{} bone influences did not fit into {} slots per vertex and were discarded",
                bindings.dropped_influences(),
                MAX_BONE_INFLUENCES
            );
        }
        log::debug!(
            "Skeleton built: {} bones over {} vertices",
            skeleton.len(),
            vertex_total
        );

        Ok((skeleton, bindings))
    }
}
