//! Per-Vertex Bone Bindings
//!
//! Every vertex carries up to [`MAX_BONE_INFLUENCES`] (bone index, weight)
//! pairs. A slot whose weight is exactly zero is free; slots fill in arrival
//! order. The vertex shader reads the buffer as two four-wide attributes
//! (`uvec4` indices, `vec4` weights).

use crate::errors::{ArmatureError, Result};
use crate::settings::InfluenceOverflow;

/// Influence slots per vertex.
pub const MAX_BONE_INFLUENCES: usize = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexBoneBinding {
    pub bone_indices: [u32; MAX_BONE_INFLUENCES],
    pub weights: [f32; MAX_BONE_INFLUENCES],
}

impl VertexBoneBinding {
    /// Number of occupied slots.
    #[must_use]
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    /// Sum of stored weights. Not normalized; authored weights normally sum to 1.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }

    fn free_slot(&self) -> Option<usize> {
        self.weights.iter().position(|&w| w == 0.0)
    }

    fn smallest_slot(&self) -> usize {
        let mut smallest = 0;
        for (slot, &w) in self.weights.iter().enumerate().skip(1) {
            if w < self.weights[smallest] {
                smallest = slot;
            }
        }
        smallest
    }
}

/// What [`SkinBindings::accumulate_vertex_weight`] did with an influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluenceOutcome {
    /// Written into a free slot.
    Stored(usize),
    /// Overwrote a smaller weight in the given slot.
    Replaced(usize),
    /// All slots were taken; the influence was discarded.
    Dropped,
    /// Zero weight, nothing to store.
    Ignored,
}

/// Bone bindings for every vertex of a model.
#[derive(Debug, Clone)]
pub struct SkinBindings {
    vertices: Vec<VertexBoneBinding>,
    overflow: InfluenceOverflow,
    dropped: usize,
}

impl SkinBindings {
    #[must_use]
    pub fn new(vertex_count: usize, overflow: InfluenceOverflow) -> Self {
        Self {
            vertices: vec![VertexBoneBinding::default(); vertex_count],
            overflow,
            dropped: 0,
        }
    }

    /// Records that `bone` influences `vertex` with `weight`.
    ///
    /// # Errors
    /// - [`ArmatureError::VertexIndexOutOfBounds`] if `vertex` does not exist.
    /// - [`ArmatureError::TooManyInfluences`] if the vertex is full and the
    ///   overflow policy is [`InfluenceOverflow::Reject`].
    pub fn accumulate_vertex_weight(
        &mut self,
        vertex: usize,
        bone: u32,
        weight: f32,
    ) -> Result<InfluenceOutcome> {
        let count = self.vertices.len();
        let Some(binding) = self.vertices.get_mut(vertex) else {
            return Err(ArmatureError::VertexIndexOutOfBounds {
                context: format!("influence of bone {bone}"),
                index: vertex,
                count,
            });
        };

        if weight == 0.0 {
            return Ok(InfluenceOutcome::Ignored);
        }

        if let Some(slot) = binding.free_slot() {
            binding.bone_indices[slot] = bone;
            binding.weights[slot] = weight;
            return Ok(InfluenceOutcome::Stored(slot));
        }

        match self.overflow {
            InfluenceOverflow::Drop => {}
            InfluenceOverflow::ReplaceSmallest => {
                let slot = binding.smallest_slot();
                if weight > binding.weights[slot] {
                    binding.bone_indices[slot] = bone;
                    binding.weights[slot] = weight;
                    self.dropped += 1;
                    return Ok(InfluenceOutcome::Replaced(slot));
                }
            }
            InfluenceOverflow::Reject => {
                return Err(ArmatureError::TooManyInfluences {
                    vertex,
                    bone,
                    max: MAX_BONE_INFLUENCES,
                });
            }
        }

        self.dropped += 1;
        Ok(InfluenceOutcome::Dropped)
    }

    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[VertexBoneBinding] {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn get(&self, vertex: usize) -> Option<&VertexBoneBinding> {
        self.vertices.get(vertex)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Influences lost to full vertices, replaced ones included.
    #[inline]
    #[must_use]
    pub fn dropped_influences(&self) -> usize {
        self.dropped
    }

    /// Raw bytes for a vertex buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_vertex(overflow: InfluenceOverflow) -> SkinBindings {
        let mut skin = SkinBindings::new(1, overflow);
        for (bone, weight) in [(0, 0.4), (1, 0.3), (2, 0.2), (3, 0.1)] {
            skin.accumulate_vertex_weight(0, bone, weight).unwrap();
        }
        skin
    }

    #[test]
    fn test_slots_fill_in_arrival_order() {
        let mut skin = SkinBindings::new(2, InfluenceOverflow::Drop);
        assert_eq!(
            skin.accumulate_vertex_weight(1, 7, 0.75).unwrap(),
            InfluenceOutcome::Stored(0)
        );
        assert_eq!(
            skin.accumulate_vertex_weight(1, 3, 0.25).unwrap(),
            InfluenceOutcome::Stored(1)
        );
        let v = skin.get(1).unwrap();
        assert_eq!(v.bone_indices, [7, 3, 0, 0]);
        assert_eq!(v.weights, [0.75, 0.25, 0.0, 0.0]);
        assert_eq!(skin.get(0).unwrap().influence_count(), 0);
    }

    #[test]
    fn test_zero_weight_takes_no_slot() {
        let mut skin = SkinBindings::new(1, InfluenceOverflow::Drop);
        assert_eq!(
            skin.accumulate_vertex_weight(0, 5, 0.0).unwrap(),
            InfluenceOutcome::Ignored
        );
        assert_eq!(
            skin.accumulate_vertex_weight(0, 6, 1.0).unwrap(),
            InfluenceOutcome::Stored(0)
        );
    }

    #[test]
    fn test_replace_smallest_keeps_largest_four() {
        let mut skin = full_vertex(InfluenceOverflow::ReplaceSmallest);
        assert_eq!(
            skin.accumulate_vertex_weight(0, 9, 0.05).unwrap(),
            InfluenceOutcome::Dropped
        );
        assert_eq!(
            skin.accumulate_vertex_weight(0, 8, 0.15).unwrap(),
            InfluenceOutcome::Replaced(3)
        );
        let v = skin.get(0).unwrap();
        assert_eq!(v.bone_indices, [0, 1, 2, 8]);
        assert_eq!(skin.dropped_influences(), 2);
    }

    #[test]
    fn test_reject_leaves_vertex_untouched() {
        let mut skin = full_vertex(InfluenceOverflow::Reject);
        let before = *skin.get(0).unwrap();
        let err = skin.accumulate_vertex_weight(0, 4, 0.9).unwrap_err();
        assert!(matches!(
            err,
            ArmatureError::TooManyInfluences { vertex: 0, bone: 4, max: 4 }
        ));
        assert_eq!(*skin.get(0).unwrap(), before);
    }

    #[test]
    fn test_out_of_range_vertex() {
        let mut skin = SkinBindings::new(3, InfluenceOverflow::Drop);
        assert!(matches!(
            skin.accumulate_vertex_weight(3, 0, 1.0),
            Err(ArmatureError::VertexIndexOutOfBounds { index: 3, count: 3, .. })
        ));
    }

    #[test]
    fn test_byte_layout_matches_shader_attributes() {
        let skin = SkinBindings::new(2, InfluenceOverflow::Drop);
        assert_eq!(std::mem::size_of::<VertexBoneBinding>(), 32);
        assert_eq!(skin.as_bytes().len(), 64);
    }
}
