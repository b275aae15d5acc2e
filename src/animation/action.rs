use serde::{Deserialize, Serialize};

/// How a time cursor that runs past a clip's end maps back into the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Play once and hold the last frame.
    Once,
    /// Restart from the beginning.
    #[default]
    Loop,
    /// Alternate forward and backward playback.
    PingPong,
}

impl LoopMode {
    /// Maps an unbounded tick time into `[0, duration]`.
    #[must_use]
    pub fn wrap(self, time: f32, duration: f32) -> f32 {
        if duration.is_nan() || duration <= 0.0 || !time.is_finite() {
            return 0.0;
        }

        match self {
            LoopMode::Once => time.clamp(0.0, duration),
            LoopMode::Loop => {
                // Reverse playback lands at the tail of the previous cycle.
                time.rem_euclid(duration)
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let t = time.rem_euclid(double_duration);
                // In the second half of the cycle, reverse direction
                if t > duration {
                    double_duration - t
                } else {
                    t
                }
            }
        }
    }
}
