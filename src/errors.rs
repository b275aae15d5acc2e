//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`ArmatureError`] covers every load-time failure:
//! - Capacity violations (too many bones, too many influences under a strict policy)
//! - Malformed keyframe data (empty, mismatched or unsorted tracks)
//! - Malformed mesh data (bad vertex references, non-triangle index lists)
//! - Importer failures (I/O, glTF parsing)
//!
//! Per-frame evaluation never produces errors: everything that could go wrong
//! there is rejected while the model is being built.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ArmatureError>`.
//!
//! ```rust,ignore
//! use armature::errors::{ArmatureError, Result};
//!
//! fn load_model() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::Channel;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum ArmatureError {
    // ========================================================================
    // Capacity Errors
    // ========================================================================
    /// A new bone would not fit into the skinning palette.
    #[error("Bone capacity exceeded: '{name}' would be bone #{index}, but at most {max} bones are supported")]
    BoneCapacityExceeded {
        /// Name of the bone that did not fit
        name: String,
        /// Index it would have received
        index: usize,
        /// Configured palette capacity
        max: usize,
    },

    /// A vertex received more influences than it has slots, under
    /// [`InfluenceOverflow::Reject`](crate::settings::InfluenceOverflow::Reject).
    #[error("Vertex {vertex} already has {max} bone influences; influence of bone {bone} rejected")]
    TooManyInfluences {
        /// Global vertex index
        vertex: usize,
        /// Bone whose influence was rejected
        bone: u32,
        /// Number of influence slots per vertex
        max: usize,
    },

    // ========================================================================
    // Mesh Errors
    // ========================================================================
    /// A bone weight references a vertex outside its mesh.
    #[error("Vertex index out of bounds: {context} (index: {index}, vertex count: {count})")]
    VertexIndexOutOfBounds {
        /// Description of what was being accessed
        context: String,
        /// The invalid index
        index: usize,
        /// Number of vertices available
        count: usize,
    },

    /// Mesh data that cannot be turned into GPU buffers.
    #[error("Invalid mesh '{mesh}': {reason}")]
    InvalidMesh {
        /// Mesh name
        mesh: String,
        /// What is wrong with it
        reason: String,
    },

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// A node track with no keys, or a present channel with zero keys.
    #[error("Empty keyframe track for node '{node}' ({channel})")]
    EmptyTrack {
        /// Animated node
        node: String,
        /// Offending channel, `None` when the track has no channel at all
        channel: ChannelName,
    },

    /// Key times decrease somewhere in a channel.
    #[error("Keyframe times out of order for node '{node}' ({channel}) at key {index}")]
    UnsortedKeyframes {
        /// Animated node
        node: String,
        /// Offending channel
        channel: ChannelName,
        /// First key whose time is smaller than its predecessor's
        index: usize,
    },

    /// Time and value arrays of a channel have different lengths.
    #[error("Keyframe count mismatch for node '{node}' ({channel}): {times} times, {values} values")]
    KeyframeCountMismatch {
        /// Animated node
        node: String,
        /// Offending channel
        channel: ChannelName,
        /// Number of key times
        times: usize,
        /// Number of key values
        values: usize,
    },

    /// Two tracks in one clip target the same node.
    #[error("Duplicate track for node '{node}' in clip '{clip}'")]
    DuplicateTrack {
        /// Clip name
        clip: String,
        /// Node targeted twice
        node: String,
    },

    /// Clip lookup by name failed.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    /// Clip lookup by index failed.
    #[error("Animation clip index out of bounds (index: {index}, clip count: {count})")]
    ClipIndexOutOfBounds {
        /// The invalid index
        index: usize,
        /// Number of clips in the model
        count: usize,
    },

    // ========================================================================
    // Import & Configuration Errors
    // ========================================================================
    /// The importer could not produce a scene.
    #[error("Asset import failed: {0}")]
    ImportFailed(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[cfg(feature = "gltf")]
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Invalid [`SkinningSettings`](crate::settings::SkinningSettings).
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Display helper naming the channel an animation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelName(pub Option<Channel>);

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(Channel::Translation) => f.write_str("translation"),
            Some(Channel::Rotation) => f.write_str("rotation"),
            Some(Channel::Scale) => f.write_str("scale"),
            None => f.write_str("no channels"),
        }
    }
}

#[cfg(feature = "gltf")]
impl From<gltf::Error> for ArmatureError {
    fn from(err: gltf::Error) -> Self {
        ArmatureError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, ArmatureError>`.
pub type Result<T> = std::result::Result<T, ArmatureError>;
