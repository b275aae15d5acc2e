use glam::{Quat, Vec3};

/// Values a [`KeyframeTrack`](super::tracks::KeyframeTrack) can blend between.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for Vec3 {
    #[inline]
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Spherical interpolation along the shortest arc.
    ///
    /// `q` and `-q` encode the same rotation; the end key is flipped into the
    /// start key's hemisphere before blending so the path never exceeds 180°.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let end = if start.dot(end) < 0.0 { -end } else { end };
        start.slerp(end, t).normalize()
    }
}
