//! Scene Structure
//!
//! Owned copies of everything a loaded model needs at runtime:
//! - [`Hierarchy`]: the transform tree, as a breadth-first node arena
//! - [`Skeleton`]: the bone table with stable, dense indices
//! - [`SkeletonBuilder`]: fills the skeleton and vertex bindings from imported meshes

pub mod builder;
pub mod hierarchy;
pub mod skeleton;

pub use builder::SkeletonBuilder;
pub use hierarchy::{Hierarchy, HierarchyNode, NodeIndex};
pub use skeleton::{Bone, Skeleton};
