use glam::Mat4;
use smallvec::SmallVec;

use crate::animation::binder::PoseBinding;
use crate::animation::clip::{AnimationClip, NodeTrack};
use crate::math::compose_trs;
use crate::resources::SkinningPalette;
use crate::scene::{Hierarchy, HierarchyNode, NodeIndex, Skeleton};

/// Walks the hierarchy and writes every bone's final transform.
///
/// Holds the traversal stack so repeated updates do not allocate. Trees whose
/// open branches stay under 32 nodes never touch the heap.
#[derive(Debug, Default)]
pub struct PoseEvaluator {
    // (node, parent global transform)
    stack: SmallVec<[(NodeIndex, Mat4); 32]>,
}

impl PoseEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the pose at `time_ticks`.
    ///
    /// For each node, in pre-order:
    /// - local: the clip track sampled at `time_ticks` (scale, then rotation,
    ///   then translation), or the static transform if the node has no track
    /// - global: `parent_global * local`
    /// - for bones: `final = global_inverse * global * offset`
    ///
    /// Bones never reached keep their previous final transform. The palette
    /// receives the skeleton's final transforms in bone order.
    pub fn update_pose(
        &mut self,
        hierarchy: &Hierarchy,
        skeleton: &mut Skeleton,
        binding: &PoseBinding,
        clip: Option<&AnimationClip>,
        time_ticks: f32,
        global_inverse: &Mat4,
        palette: &mut SkinningPalette,
    ) {
        self.stack.clear();
        if !hierarchy.is_empty() {
            self.stack.push((hierarchy.root(), Mat4::IDENTITY));
        }

        while let Some((index, parent_global)) = self.stack.pop() {
            let node = hierarchy.node(index);

            let track = binding
                .track(index)
                .and_then(|t| clip.and_then(|c| c.track_at(t)));
            let node_transform = match track {
                Some(track) => sample_local(track, node, time_ticks),
                None => *node.local_transform(),
            };

            let global = parent_global * node_transform;

            if let Some(bone) = binding.bone(index) {
                let offset = skeleton
                    .bone(bone)
                    .map_or(Mat4::IDENTITY, |b| b.offset_matrix);
                skeleton.set_final_transform(bone, *global_inverse * global * offset);
            }

            // Reverse push so children pop in import order.
            for child in hierarchy.children(index).rev() {
                self.stack.push((child, global));
            }
        }

        palette.write(skeleton.final_transforms());
    }
}

/// Samples a node track; channels the track leaves out keep the node's static
/// component.
fn sample_local(track: &NodeTrack, node: &HierarchyNode, time_ticks: f32) -> Mat4 {
    let (scale, rotation, translation) = node.static_components();

    let translation = track
        .translation
        .as_ref()
        .map_or(translation, |t| t.sample(time_ticks));
    let rotation = track
        .rotation
        .as_ref()
        .map_or(rotation, |t| t.sample(time_ticks));
    let scale = track.scale.as_ref().map_or(scale, |t| t.sample(time_ticks));

    compose_trs(translation, rotation, scale)
}
