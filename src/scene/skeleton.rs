use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::errors::{ArmatureError, Result};

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,

    // Inverse bind matrix: transforms vertices from mesh space to bone local space.
    // Recorded from the first mesh that references the bone.
    pub offset_matrix: Mat4,

    // Rewritten by every pose update.
    pub final_transform: Mat4,
}

/// Model-wide bone table.
///
/// Bones get dense indices `0..len()` in order of first reference; the index is
/// what vertex bindings and the skinning palette refer to. A bone keeps its
/// index for the lifetime of the model.
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    name_to_index: FxHashMap<String, u32>,
    max_bones: usize,
}

impl Skeleton {
    #[must_use]
    pub fn new(max_bones: usize) -> Self {
        Self {
            bones: Vec::new(),
            name_to_index: FxHashMap::default(),
            max_bones,
        }
    }

    /// Returns the index of `name`, assigning the next free index on first
    /// sight.
    ///
    /// Re-registering a known bone leaves its offset matrix untouched.
    ///
    /// # Errors
    /// Returns [`ArmatureError::BoneCapacityExceeded`] if a new bone would not
    /// fit into `max_bones`. The skeleton is left unchanged in that case.
    pub fn get_or_assign_bone_index(&mut self, name: &str, offset_matrix: Mat4) -> Result<u32> {
        if let Some(&index) = self.name_to_index.get(name) {
            return Ok(index);
        }

        let index = self.bones.len();
        if index >= self.max_bones {
            return Err(ArmatureError::BoneCapacityExceeded {
                name: name.to_string(),
                index,
                max: self.max_bones,
            });
        }

        let index = index as u32;
        self.bones.push(Bone {
            name: name.to_string(),
            offset_matrix,
            final_transform: Mat4::IDENTITY,
        });
        self.name_to_index.insert(name.to_string(), index);
        Ok(index)
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<u32> {
        self.name_to_index.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: u32) -> Option<&Bone> {
        self.bones.get(index as usize)
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn max_bones(&self) -> usize {
        self.max_bones
    }

    pub(crate) fn set_final_transform(&mut self, index: u32, transform: Mat4) {
        if let Some(bone) = self.bones.get_mut(index as usize) {
            bone.final_transform = transform;
        }
    }

    /// Final transforms in bone index order.
    pub fn final_transforms(&self) -> impl ExactSizeIterator<Item = Mat4> + '_ {
        self.bones.iter().map(|b| b.final_transform)
    }
}
