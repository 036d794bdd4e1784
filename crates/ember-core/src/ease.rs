//! Easing curves for time interpolation

use serde::{Deserialize, Serialize};

/// Maps a normalized time value in [0, 1] to an eased position.
///
/// All curves pass through (0, 0) and (1, 1); `Overshoot` exceeds 1.0 on the
/// way in, so consumers that need a bounded value clamp the result themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    /// Accelerating from zero velocity
    QuadIn,
    /// Decelerating to zero velocity
    QuadOut,
    /// Accelerating until halfway, then decelerating
    QuadInOut,
    /// Overshoots the target, then settles back
    Overshoot,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => t * (2.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Ease::Overshoot => {
                let s = 1.70158;
                let u = t - 1.0;
                u * u * ((s + 1.0) * u + s) + 1.0
            }
        }
    }
}
