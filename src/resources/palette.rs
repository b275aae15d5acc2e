use glam::Mat4;

use crate::errors::{ArmatureError, Result};

/// Fixed-capacity array of bone matrices, laid out for a uniform or storage
/// buffer upload.
///
/// Slots `0..len()` hold the final transforms of bones `0..len()`. The
/// remaining slots stay at identity so a shader indexing past the live bones
/// sees a harmless transform. Neither length nor capacity change after
/// construction.
#[derive(Debug, Clone)]
pub struct SkinningPalette {
    matrices: Vec<Mat4>,
    len: usize,
}

impl SkinningPalette {
    /// # Errors
    /// Returns [`ArmatureError::BoneCapacityExceeded`] if `len > capacity`.
    pub fn new(len: usize, capacity: usize) -> Result<Self> {
        if len > capacity {
            return Err(ArmatureError::BoneCapacityExceeded {
                name: "<palette>".to_string(),
                index: len - 1,
                max: capacity,
            });
        }
        Ok(Self {
            matrices: vec![Mat4::IDENTITY; capacity],
            len,
        })
    }

    /// Copies `transforms` into the live slots, in order. Extra transforms are
    /// ignored and missing ones leave their slot as it was.
    pub fn write(&mut self, transforms: impl IntoIterator<Item = Mat4>) {
        for (slot, m) in self.matrices[..self.len].iter_mut().zip(transforms) {
            *slot = m;
        }
    }

    /// Live bone matrices.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices[..self.len]
    }

    /// The whole palette, identity padding included.
    #[inline]
    #[must_use]
    pub fn as_padded_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Raw bytes of the whole palette.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone: u32) -> Option<&Mat4> {
        self.as_slice().get(bone as usize)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.matrices.len()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_write_keeps_padding_at_identity() {
        let mut palette = SkinningPalette::new(2, 4).unwrap();
        let m = Mat4::from_translation(Vec3::X);
        palette.write([m, m, m]);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.capacity(), 4);
        assert_eq!(palette.as_slice(), &[m, m]);
        assert_eq!(palette.as_padded_slice()[2], Mat4::IDENTITY);
        assert_eq!(palette.as_bytes().len(), 4 * 64);
        assert!(palette.get(2).is_none());
    }

    #[test]
    fn test_length_beyond_capacity_fails() {
        assert!(matches!(
            SkinningPalette::new(5, 4),
            Err(ArmatureError::BoneCapacityExceeded { max: 4, .. })
        ));
    }
}
