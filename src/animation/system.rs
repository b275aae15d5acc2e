use slotmap::{SlotMap, new_key_type};

use crate::model::SkinnedModel;

new_key_type! {
    pub struct ModelKey;
}

/// Animation system.
///
/// Owns any number of skinned models and advances each of them once per
/// frame. Models share no mutable state, so each one's palette depends only
/// on its own clip and elapsed time.
#[derive(Default)]
pub struct AnimationSystem {
    models: SlotMap<ModelKey, SkinnedModel>,
}

impl AnimationSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: SkinnedModel) -> ModelKey {
        self.models.insert(model)
    }

    pub fn remove(&mut self, key: ModelKey) -> Option<SkinnedModel> {
        self.models.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: ModelKey) -> Option<&SkinnedModel> {
        self.models.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: ModelKey) -> Option<&mut SkinnedModel> {
        self.models.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelKey, &SkinnedModel)> {
        self.models.iter()
    }

    /// Advances every model by `dt` seconds.
    #[inline]
    pub fn update(&mut self, dt: f32) {
        for (_key, model) in &mut self.models {
            model.update(dt);
        }
    }
}
