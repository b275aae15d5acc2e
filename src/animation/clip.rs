use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::action::LoopMode;
use crate::animation::tracks::{KeyframeTrack, TrackDefect};
use crate::errors::{ArmatureError, ChannelName, Result};

/// The transform component a keyframe channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Translation,
    Rotation,
    Scale,
}

/// Keyframes for one hierarchy node within one clip.
///
/// Each channel is optional. A channel that is `None` keeps the node's static
/// value for that component; a channel that is present must hold keys.
#[derive(Debug, Clone)]
pub struct NodeTrack {
    pub node_name: String,
    pub translation: Option<KeyframeTrack<Vec3>>,
    pub rotation: Option<KeyframeTrack<Quat>>,
    pub scale: Option<KeyframeTrack<Vec3>>,
}

impl NodeTrack {
    #[must_use]
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            translation: None,
            rotation: None,
            scale: None,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.translation = Some(track);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, track: KeyframeTrack<Quat>) -> Self {
        self.rotation = Some(track);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, track: KeyframeTrack<Vec3>) -> Self {
        self.scale = Some(track);
        self
    }

    /// Time of the latest key across all channels.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        let t = self.translation.as_ref().map_or(0.0, KeyframeTrack::end_time);
        let r = self.rotation.as_ref().map_or(0.0, KeyframeTrack::end_time);
        let s = self.scale.as_ref().map_or(0.0, KeyframeTrack::end_time);
        t.max(r).max(s)
    }

    fn validate(&self) -> Result<()> {
        if self.translation.is_none() && self.rotation.is_none() && self.scale.is_none() {
            return Err(ArmatureError::EmptyTrack {
                node: self.node_name.clone(),
                channel: ChannelName(None),
            });
        }

        let checks = [
            (Channel::Translation, self.translation.as_ref().map(KeyframeTrack::validate)),
            (Channel::Rotation, self.rotation.as_ref().map(KeyframeTrack::validate)),
            (Channel::Scale, self.scale.as_ref().map(KeyframeTrack::validate)),
        ];

        for (channel, check) in checks {
            let Some(Err(defect)) = check else {
                continue;
            };
            let node = self.node_name.clone();
            let channel = ChannelName(Some(channel));
            return Err(match defect {
                TrackDefect::Empty => ArmatureError::EmptyTrack { node, channel },
                TrackDefect::CountMismatch { times, values } => {
                    ArmatureError::KeyframeCountMismatch {
                        node,
                        channel,
                        times,
                        values,
                    }
                }
                TrackDefect::Unsorted { index } => ArmatureError::UnsortedKeyframes {
                    node,
                    channel,
                    index,
                },
            });
        }

        Ok(())
    }
}

/// One named animation: a set of node tracks sharing a time base.
///
/// Immutable after construction; every track it holds has been validated.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration_ticks: f32,
    ticks_per_second: f32,
    tracks: Vec<NodeTrack>,
    track_lookup: FxHashMap<String, usize>,
}

impl AnimationClip {
    /// Validates `tracks` and builds the clip.
    ///
    /// A non-positive `duration_ticks` is replaced by the latest key time. The
    /// tick rate is stored as given; see [`with_default_rate`](Self::with_default_rate).
    pub fn new(
        name: impl Into<String>,
        duration_ticks: f32,
        ticks_per_second: f32,
        tracks: Vec<NodeTrack>,
    ) -> Result<Self> {
        let name = name.into();
        let mut track_lookup = FxHashMap::default();
        track_lookup.reserve(tracks.len());

        for (index, track) in tracks.iter().enumerate() {
            track.validate()?;
            if track_lookup.insert(track.node_name.clone(), index).is_some() {
                return Err(ArmatureError::DuplicateTrack {
                    clip: name,
                    node: track.node_name.clone(),
                });
            }
        }

        let duration_ticks = if duration_ticks > 0.0 {
            duration_ticks
        } else {
            tracks
                .iter()
                .map(NodeTrack::end_time)
                .fold(0.0_f32, f32::max)
        };

        Ok(Self {
            name,
            duration_ticks,
            ticks_per_second,
            tracks,
            track_lookup,
        })
    }

    /// Replaces a missing (non-positive or non-finite) tick rate with `fallback`.
    #[must_use]
    pub fn with_default_rate(mut self, fallback: f32) -> Self {
        if !(self.ticks_per_second.is_finite() && self.ticks_per_second > 0.0) {
            log::debug!(
                "Clip '{}' declares no tick rate, assuming {} ticks/s",
                self.name,
                fallback
            );
            self.ticks_per_second = fallback;
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn duration_ticks(&self) -> f32 {
        self.duration_ticks
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[NodeTrack] {
        &self.tracks
    }

    #[inline]
    #[must_use]
    pub fn track(&self, node_name: &str) -> Option<&NodeTrack> {
        self.track_lookup.get(node_name).map(|&i| &self.tracks[i])
    }

    #[inline]
    #[must_use]
    pub fn track_index(&self, node_name: &str) -> Option<usize> {
        self.track_lookup.get(node_name).copied()
    }

    #[inline]
    #[must_use]
    pub fn track_at(&self, index: usize) -> Option<&NodeTrack> {
        self.tracks.get(index)
    }

    /// Converts elapsed seconds into a tick time inside the clip.
    ///
    /// Clips with zero duration always map to tick 0.
    #[must_use]
    pub fn ticks_at(&self, seconds: f32, mode: LoopMode) -> f32 {
        let ticks = seconds * self.ticks_per_second;
        mode.wrap(ticks, self.duration_ticks)
    }
}
