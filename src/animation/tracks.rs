use std::cmp::Ordering;

use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
}

/// Ways a channel's key arrays can be malformed. Mapped to
/// [`ArmatureError`](crate::errors::ArmatureError) with node context by the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackDefect {
    Empty,
    CountMismatch { times: usize, values: usize },
    Unsorted { index: usize },
}

/// Time-stamped samples of one channel (translation, rotation or scale).
///
/// Times are in animation ticks and must be non-decreasing. Tracks reachable
/// from an [`AnimationClip`](super::clip::AnimationClip) are validated to hold
/// at least one key, so sampling them never fails.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// A track holding one constant value.
    #[must_use]
    pub fn constant(time: f32, value: T) -> Self {
        Self::new(vec![time], vec![value], InterpolationMode::Linear)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last key, or 0 for an empty track.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    pub(crate) fn validate(&self) -> Result<(), TrackDefect> {
        if self.times.is_empty() {
            return Err(TrackDefect::Empty);
        }
        if self.times.len() != self.values.len() {
            return Err(TrackDefect::CountMismatch {
                times: self.times.len(),
                values: self.values.len(),
            });
        }
        let out_of_order = |w: &[f32]| w[1].partial_cmp(&w[0]).is_none_or(Ordering::is_lt);
        if let Some(index) = self.times.windows(2).position(out_of_order) {
            return Err(TrackDefect::Unsorted { index: index + 1 });
        }
        Ok(())
    }

    /// Index `i` of the interval `[times[i], times[i + 1])` containing `time`.
    ///
    /// Linear scan from the start. Returns 0 for tracks with fewer than two keys
    /// and for times before the second key; returns the last interval
    /// (`len - 2`) for times at or past the last key, so `i + 1` is always a
    /// valid key when the track has two or more keys.
    #[must_use]
    pub fn find_key_index(&self, time: f32) -> usize {
        let len = self.times.len();
        if len < 2 {
            return 0;
        }

        for i in 0..len - 1 {
            if time < self.times[i + 1] {
                return i;
            }
        }

        len - 2
    }

    /// Blend factor of `time` within the interval starting at `index`.
    ///
    /// Clamped to `[0, 1]`: queries outside the track's time range hold the
    /// boundary key. Zero-length intervals (repeated key times) and indices
    /// with no following key yield 0.
    #[must_use]
    pub fn interpolation_factor(&self, index: usize, time: f32) -> f32 {
        let (Some(&t0), Some(&t1)) = (self.times.get(index), self.times.get(index + 1)) else {
            return 0.0;
        };
        let dt = t1 - t0;

        if dt <= f32::EPSILON {
            return 0.0;
        }

        ((time - t0) / dt).clamp(0.0, 1.0)
    }

    /// Value of the track at `time`.
    ///
    /// A single-key track returns its key for any time. At an exact key time
    /// the key value is returned unchanged.
    ///
    /// # Panics
    /// Panics if the track is empty. Clip construction rejects empty tracks.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        assert!(!self.times.is_empty(), "Track is empty");

        if self.times.len() == 1 {
            return self.values[0];
        }

        let index = self.find_key_index(time);
        let factor = self.interpolation_factor(index, time);

        let v0 = self.values[index];
        let v1 = self.values[index + 1];

        // Exact endpoints skip the blend so key values come back bit-identical.
        if factor <= 0.0 {
            return v0;
        }
        if factor >= 1.0 {
            return v1;
        }

        match self.interpolation {
            InterpolationMode::Step => v0,
            InterpolationMode::Linear => T::interpolate_linear(v0, v1, factor),
        }
    }
}
