//! Animation
//!
//! Keyframe data and pose evaluation:
//! - [`KeyframeTrack`]: sorted keys of one channel, sampled with linear or step interpolation
//! - [`NodeTrack`] / [`AnimationClip`]: validated per-node channels sharing a time base
//! - [`PoseBinding`]: per-node bone and track lookups resolved at bind time
//! - [`PoseEvaluator`]: the per-frame hierarchy walk that fills the skinning palette
//! - [`AnimationSystem`]: drives many independent models

pub mod action;
pub mod binder;
pub mod clip;
pub mod evaluator;
pub mod system;
pub mod tracks;
pub mod values;

pub use action::LoopMode;
pub use binder::PoseBinding;
pub use clip::{AnimationClip, Channel, NodeTrack};
pub use evaluator::PoseEvaluator;
pub use system::{AnimationSystem, ModelKey};
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use values::Interpolatable;
