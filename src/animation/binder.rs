use crate::animation::clip::AnimationClip;
use crate::scene::{Hierarchy, NodeIndex, Skeleton};

/// Per-node lookups resolved once, so pose evaluation does no name matching.
///
/// Indexed by [`NodeIndex`]. A binding is tied to the hierarchy, skeleton and
/// clip it was built from.
#[derive(Debug, Clone, Default)]
pub struct PoseBinding {
    node_bones: Vec<Option<u32>>,
    node_tracks: Vec<Option<usize>>,
}

impl PoseBinding {
    /// Resolves each node's bone and, when a clip is given, its track.
    #[must_use]
    pub fn bind(hierarchy: &Hierarchy, skeleton: &Skeleton, clip: Option<&AnimationClip>) -> Self {
        let node_bones: Vec<Option<u32>> = hierarchy
            .nodes()
            .iter()
            .map(|node| skeleton.bone_index(node.name()))
            .collect();

        let node_tracks = hierarchy
            .nodes()
            .iter()
            .map(|node| clip.and_then(|c| c.track_index(node.name())))
            .collect();

        for bone in skeleton.bones() {
            if hierarchy.find(&bone.name).is_none() {
                log::warn!(
                    "Bone '{}' has no node in the hierarchy and keeps an identity transform",
                    bone.name
                );
            }
        }

        if let Some(clip) = clip {
            let unbound = clip
                .tracks()
                .iter()
                .filter(|t| hierarchy.find(&t.node_name).is_none())
                .count();
            if unbound > 0 {
                log::debug!(
                    "Clip '{}': {} of {} tracks target no node",
                    clip.name(),
                    unbound,
                    clip.tracks().len()
                );
            }
        }

        Self {
            node_bones,
            node_tracks,
        }
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, node: NodeIndex) -> Option<u32> {
        self.node_bones.get(node.index()).copied().flatten()
    }

    #[inline]
    #[must_use]
    pub fn track(&self, node: NodeIndex) -> Option<usize> {
        self.node_tracks.get(node.index()).copied().flatten()
    }

    /// Same binding with every track dropped, for evaluating the bind pose.
    #[must_use]
    pub fn without_tracks(&self) -> Self {
        Self {
            node_bones: self.node_bones.clone(),
            node_tracks: vec![None; self.node_tracks.len()],
        }
    }
}
