//! Skinning Settings
//!
//! Load-time configuration for [`SkinnedModel`](crate::model::SkinnedModel).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use armature::settings::{InfluenceOverflow, SkinningSettings};
//!
//! // Default: 100 bones, overflowing influences dropped, looping playback
//! let settings = SkinningSettings::default();
//!
//! // Strict import validation for an asset pipeline
//! let settings = SkinningSettings {
//!     influence_overflow: InfluenceOverflow::Reject,
//!     max_bones: 256,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::LoopMode;
use crate::errors::{ArmatureError, Result};

/// Palette capacity matching the shader-side `BoneTransforms[100]` array.
pub const DEFAULT_MAX_BONES: usize = 100;

/// Tick rate assumed for clips whose importer reports zero ticks per second.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

// ---------------------------------------------------------------------------
// InfluenceOverflow
// ---------------------------------------------------------------------------

/// What happens when a vertex receives a fifth (or later) bone influence.
///
/// | Policy            | Effect on the vertex                      | Load result |
/// |-------------------|-------------------------------------------|-------------|
/// | `Drop`            | first four influences kept, in order      | Ok          |
/// | `ReplaceSmallest` | four largest influences kept              | Ok          |
/// | `Reject`          | untouched                                 | Err         |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InfluenceOverflow {
    /// Keep the first four influences in arrival order and drop the rest.
    #[default]
    Drop,
    /// Overwrite the smallest stored weight when the new one is larger.
    ReplaceSmallest,
    /// Fail the load with [`ArmatureError::TooManyInfluences`].
    Reject,
}

// ---------------------------------------------------------------------------
// ClipSelector
// ---------------------------------------------------------------------------

/// Picks an animation clip out of a model's clip list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipSelector {
    Index(usize),
    Name(String),
}

// ---------------------------------------------------------------------------
// SkinningSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinningSettings {
    /// Maximum number of bones, i.e. the fixed skinning palette capacity.
    pub max_bones: usize,
    /// Policy for vertices referenced by more than four bones.
    pub influence_overflow: InfluenceOverflow,
    /// Fallback tick rate for clips that do not declare one.
    pub default_ticks_per_second: f32,
    /// How elapsed time maps onto clip time in [`SkinnedModel::update`](crate::model::SkinnedModel::update).
    pub loop_mode: LoopMode,
    /// Clip activated right after loading. `None` starts in bind pose.
    pub initial_clip: Option<ClipSelector>,
}

impl Default for SkinningSettings {
    fn default() -> Self {
        Self {
            max_bones: DEFAULT_MAX_BONES,
            influence_overflow: InfluenceOverflow::Drop,
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            loop_mode: LoopMode::Loop,
            initial_clip: Some(ClipSelector::Index(0)),
        }
    }
}

impl SkinningSettings {
    /// Checks the settings for values no model could be loaded with.
    pub fn validate(&self) -> Result<()> {
        if self.max_bones == 0 {
            return Err(ArmatureError::ConfigError(
                "max_bones must be at least 1".to_string(),
            ));
        }
        if !(self.default_ticks_per_second.is_finite() && self.default_ticks_per_second > 0.0) {
            return Err(ArmatureError::ConfigError(format!(
                "default_ticks_per_second must be positive, got {}",
                self.default_ticks_per_second
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = SkinningSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_bones, DEFAULT_MAX_BONES);
        assert_eq!(settings.influence_overflow, InfluenceOverflow::Drop);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let settings = SkinningSettings {
            max_bones: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ArmatureError::ConfigError(_))
        ));
    }

    #[test]
    fn test_rejects_bad_tick_rate() {
        let settings = SkinningSettings {
            default_ticks_per_second: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
