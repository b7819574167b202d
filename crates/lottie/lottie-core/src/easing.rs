//! Keyframe easing: bezier handles and the usual presets.

use crate::error::Result;
use crate::fields::{FieldReader, FieldSpec, FieldWriter, LottieObject};
use crate::properties::Keyframe;

/// Bezier handle for keyframe interpolation.
///
/// Both coordinates live in the unit square spanning the keyframe: `x` is
/// the change in time, `y` the change in value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyframeBezierHandle {
    pub x: f32,
    pub y: f32,
}

const X: FieldSpec = FieldSpec::pseudo_list("x", "x");
const Y: FieldSpec = FieldSpec::pseudo_list("y", "y");

impl KeyframeBezierHandle {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl LottieObject for KeyframeBezierHandle {
    const NAME: &'static str = "KeyframeBezierHandle";
    const FIELDS: &'static [FieldSpec] = &[X, Y];

    fn write_fields(&self, out: &mut FieldWriter) {
        out.put(&X, &self.x).put(&Y, &self.y);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        input.read(&X, &mut self.x)?;
        input.read(&Y, &mut self.y)
    }
}

crate::lottie_object!(KeyframeBezierHandle);

/// Default handle offset for the eased presets.
pub const DEFAULT_DELAY: f32 = 1.0 / 3.0;

/// Ways to shape the transition out of a keyframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    /// Straight line from start to end
    Linear,
    /// Lingers near the start, then accelerates
    EaseIn(f32),
    /// Starts fast, then decelerates
    EaseOut(f32),
    /// Ease in and out
    Sigmoid(f32),
    /// Hold the start value, jump to the end value at the next keyframe
    Jump,
}

impl Easing {
    pub fn ease_in() -> Self {
        Easing::EaseIn(DEFAULT_DELAY)
    }

    pub fn ease_out() -> Self {
        Easing::EaseOut(DEFAULT_DELAY)
    }

    pub fn sigmoid() -> Self {
        Easing::Sigmoid(DEFAULT_DELAY)
    }

    /// Set the handles (or hold flag) of `keyframe`.
    pub fn apply(self, keyframe: &mut Keyframe) {
        let (out_value, in_value) = match self {
            Easing::Linear => ((0.0, 0.0), (1.0, 1.0)),
            Easing::EaseIn(delay) => ((delay, 0.0), (1.0, 1.0)),
            Easing::EaseOut(delay) => ((0.0, 0.0), (1.0 - delay, 1.0)),
            Easing::Sigmoid(delay) => ((delay, 0.0), (1.0 - delay, 1.0)),
            Easing::Jump => {
                keyframe.jump = Some(true);
                return;
            }
        };
        keyframe.out_value = Some(KeyframeBezierHandle::new(out_value.0, out_value.1));
        keyframe.in_value = Some(KeyframeBezierHandle::new(in_value.0, in_value.1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FromLottie, ToLottie};
    use serde_json::json;

    #[test]
    fn handle_uses_pseudo_lists() {
        let h = KeyframeBezierHandle::new(0.5, 1.0);
        assert_eq!(h.to_lottie(), json!({"x": [0.5], "y": [1.0]}));
        let back = KeyframeBezierHandle::from_lottie(&json!({"x": [0.25], "y": 0.75})).unwrap();
        assert_eq!(back, KeyframeBezierHandle::new(0.25, 0.75));
    }

    #[test]
    fn presets_set_handles() {
        let mut kf = Keyframe::default();
        Easing::sigmoid().apply(&mut kf);
        assert_eq!(kf.out_value, Some(KeyframeBezierHandle::new(DEFAULT_DELAY, 0.0)));
        assert_eq!(kf.in_value, Some(KeyframeBezierHandle::new(1.0 - DEFAULT_DELAY, 1.0)));
        assert_eq!(kf.jump, None);

        Easing::Linear.apply(&mut kf);
        assert_eq!(kf.out_value, Some(KeyframeBezierHandle::new(0.0, 0.0)));
    }

    #[test]
    fn jump_only_sets_hold() {
        let mut kf = Keyframe::default();
        Easing::Jump.apply(&mut kf);
        assert_eq!(kf.jump, Some(true));
        assert!(kf.in_value.is_none());
    }
}
