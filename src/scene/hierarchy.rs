//! Node Hierarchy
//!
//! An owned, read-only copy of the imported transform tree.
//!
//! Nodes live in a flat arena laid out breadth-first, so the children of any
//! node occupy one contiguous index range. The root is always index 0. Nothing
//! in here points back into importer memory; the imported tree can be dropped
//! as soon as [`Hierarchy::from_imported`] returns.

use std::collections::VecDeque;
use std::ops::Range;

use glam::{Mat4, Quat, Vec3};

use crate::assets::ImportedNode;

/// Index of a node in a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(0);

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) first_child: u32,
    pub(crate) child_count: u32,

    /// Static local transform, used when no animation drives the node.
    pub(crate) local_transform: Mat4,

    // Decomposed static transform, used for channels a track leaves out.
    pub(crate) scale: Vec3,
    pub(crate) rotation: Quat,
    pub(crate) translation: Vec3,
}

impl HierarchyNode {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> &Mat4 {
        &self.local_transform
    }

    /// The static transform as (scale, rotation, translation).
    ///
    /// Shear in the source matrix is lost by the decomposition.
    #[inline]
    #[must_use]
    pub fn static_components(&self) -> (Vec3, Quat, Vec3) {
        (self.scale, self.rotation, self.translation)
    }

    #[inline]
    fn child_range(&self) -> Range<u32> {
        self.first_child..self.first_child + self.child_count
    }
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Copies an imported tree into a breadth-first arena.
    #[must_use]
    pub fn from_imported(root: &ImportedNode) -> Self {
        let mut nodes: Vec<HierarchyNode> = Vec::new();
        // (source node, parent index)
        let mut queue: VecDeque<(&ImportedNode, Option<NodeIndex>)> = VecDeque::new();
        queue.push_back((root, None));

        while let Some((source, parent)) = queue.pop_front() {
            let index = NodeIndex(nodes.len() as u32);
            let (scale, rotation, translation) =
                source.local_transform.to_scale_rotation_translation();

            nodes.push(HierarchyNode {
                name: source.name.clone(),
                parent,
                first_child: 0,
                child_count: source.children.len() as u32,
                local_transform: source.local_transform,
                scale,
                rotation,
                translation,
            });

            // Children are enqueued consecutively, so their final indices are
            // consecutive too: they start after everything already queued.
            let first_child = (nodes.len() + queue.len()) as u32;
            nodes[index.index()].first_child = first_child;

            for child in &source.children {
                queue.push_back((child, Some(index)));
            }
        }

        Self { nodes }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex::ROOT
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&HierarchyNode> {
        self.nodes.get(index.index())
    }

    /// # Panics
    /// Panics if `index` does not belong to this hierarchy.
    #[inline]
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &HierarchyNode {
        &self.nodes[index.index()]
    }

    #[must_use]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Children of `index` in import order.
    pub fn children(&self, index: NodeIndex) -> impl DoubleEndedIterator<Item = NodeIndex> + '_ {
        self.get(index)
            .map_or(0..0, HierarchyNode::child_range)
            .map(NodeIndex)
    }

    /// First node with the given name, in breadth-first order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeIndex(i as u32))
    }

    /// Inverse of the root's local transform, mapping results back into model space.
    #[must_use]
    pub fn global_inverse_transform(&self) -> Mat4 {
        self.nodes
            .first()
            .map_or(Mat4::IDENTITY, |root| root.local_transform.inverse())
    }

    /// Static world transform of every node, indexed like [`nodes`](Self::nodes).
    #[must_use]
    pub fn static_global_transforms(&self) -> Vec<Mat4> {
        let mut globals = vec![Mat4::IDENTITY; self.nodes.len()];
        // Breadth-first layout: a parent is always stored before its children.
        for (i, node) in self.nodes.iter().enumerate() {
            let parent_global = node.parent.map_or(Mat4::IDENTITY, |p| globals[p.index()]);
            globals[i] = parent_global * node.local_transform;
        }
        globals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ImportedNode {
        // root
        // ├── a
        // │   ├── a1
        // │   └── a2
        // └── b
        //     └── b1
        ImportedNode::new("root", Mat4::IDENTITY)
            .with_child(
                ImportedNode::new("a", Mat4::from_translation(Vec3::X))
                    .with_child(ImportedNode::new("a1", Mat4::IDENTITY))
                    .with_child(ImportedNode::new("a2", Mat4::IDENTITY)),
            )
            .with_child(
                ImportedNode::new("b", Mat4::from_translation(Vec3::Y))
                    .with_child(ImportedNode::new("b1", Mat4::from_translation(Vec3::Z))),
            )
    }

    #[test]
    fn test_breadth_first_layout_keeps_children_contiguous() {
        let h = Hierarchy::from_imported(&tree());
        assert_eq!(h.len(), 6);

        let names: Vec<&str> = h.nodes().iter().map(HierarchyNode::name).collect();
        assert_eq!(names, ["root", "a", "b", "a1", "a2", "b1"]);

        let a = h.find("a").unwrap();
        let children: Vec<&str> = h.children(a).map(|c| h.node(c).name()).collect();
        assert_eq!(children, ["a1", "a2"]);
        assert_eq!(h.node(NodeIndex(5)).parent(), h.find("b"));
    }

    #[test]
    fn test_static_globals_chain_parents() {
        let h = Hierarchy::from_imported(&tree());
        let globals = h.static_global_transforms();
        let b1 = h.find("b1").unwrap();
        let p = globals[b1.index()].transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 1.0, 1.0)).length() < 1e-6);
    }
}
