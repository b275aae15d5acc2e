#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Skeletal animation evaluation.
//!
//! Loads a skinned model through a [`SceneImporter`], assigns every bone a
//! stable index, packs up to four bone influences per vertex, and evaluates
//! keyframe animation into a fixed-capacity [`SkinningPalette`] ready for GPU
//! upload.

pub mod animation;
pub mod assets;
pub mod errors;
pub mod math;
pub mod model;
pub mod resources;
pub mod scene;
pub mod settings;

pub use animation::{
    AnimationClip, AnimationSystem, InterpolationMode, KeyframeTrack, LoopMode, ModelKey,
    NodeTrack, PoseBinding, PoseEvaluator,
};
#[cfg(feature = "gltf")]
pub use assets::GltfImporter;
pub use assets::{ImportedScene, SceneImporter};
pub use errors::{ArmatureError, Result};
pub use model::SkinnedModel;
pub use resources::{SkinningPalette, VertexBoneBinding};
pub use scene::{Hierarchy, NodeIndex, Skeleton};
pub use settings::{ClipSelector, InfluenceOverflow, SkinningSettings};
