//! Animatable properties and their keyframes.
//!
//! An animatable property stores either a static value or a list of
//! keyframes under the same wire key `"k"`; the `"a"` flag says which.

use std::fmt;

use crate::bezier::Bezier;
use crate::codec::{FromLottie, ToLottie};
use crate::easing::{Easing, KeyframeBezierHandle};
use crate::error::Result;
use crate::fields::{FieldReader, FieldSpec, FieldWriter, LottieObject};
use crate::vector::{NVector, Vec3};
use crate::JsonValue;

// ---------- keyframes ----------

const TIME: FieldSpec = FieldSpec::scalar("time", "t");
const IN_VALUE: FieldSpec = FieldSpec::scalar("in_value", "i");
const OUT_VALUE: FieldSpec = FieldSpec::scalar("out_value", "o");
const JUMP: FieldSpec = FieldSpec::pseudo_bool("jump", "h");

/// Timing and easing shared by every keyframe kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    /// Frame the keyframe starts at
    pub time: f32,
    /// Easing handle entering the next keyframe
    pub in_value: Option<KeyframeBezierHandle>,
    /// Easing handle leaving this keyframe
    pub out_value: Option<KeyframeBezierHandle>,
    /// Hold the value until the next keyframe
    pub jump: Option<bool>,
}

impl Keyframe {
    pub fn new(time: f32) -> Self {
        Keyframe {
            time,
            ..Default::default()
        }
    }

    fn write_timing(&self, out: &mut FieldWriter) {
        out.put(&TIME, &self.time)
            .put(&IN_VALUE, &self.in_value)
            .put(&OUT_VALUE, &self.out_value)
            .put(&JUMP, &self.jump);
    }

    fn read_timing(&mut self, input: &FieldReader<'_>) -> Result<()> {
        input.read(&TIME, &mut self.time)?;
        input.read(&IN_VALUE, &mut self.in_value)?;
        input.read(&OUT_VALUE, &mut self.out_value)?;
        input.read(&JUMP, &mut self.jump)
    }
}

impl LottieObject for Keyframe {
    const NAME: &'static str = "Keyframe";
    const FIELDS: &'static [FieldSpec] = &[TIME, IN_VALUE, OUT_VALUE, JUMP];

    fn write_fields(&self, out: &mut FieldWriter) {
        self.write_timing(out);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        self.read_timing(input)
    }
}

/// Access to the timing part of any keyframe kind.
pub trait AsKeyframe {
    fn as_keyframe(&self) -> &Keyframe;
    fn as_keyframe_mut(&mut self) -> &mut Keyframe;
}

impl AsKeyframe for Keyframe {
    fn as_keyframe(&self) -> &Keyframe {
        self
    }

    fn as_keyframe_mut(&mut self) -> &mut Keyframe {
        self
    }
}

const START: FieldSpec = FieldSpec::scalar("start", "s");
const END: FieldSpec = FieldSpec::scalar("end", "e");
const IN_TAN: FieldSpec = FieldSpec::scalar("in_tan", "ti");
const OUT_TAN: FieldSpec = FieldSpec::scalar("out_tan", "to");

/// Keyframe for scalar and multi-dimensional values.
///
/// `in_tan` / `out_tan` are spatial tangents, only meaningful for positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetKeyframe {
    pub keyframe: Keyframe,
    pub start: Option<NVector>,
    pub end: Option<NVector>,
    pub in_tan: Option<NVector>,
    pub out_tan: Option<NVector>,
}

impl LottieObject for OffsetKeyframe {
    const NAME: &'static str = "OffsetKeyframe";
    const FIELDS: &'static [FieldSpec] = &[
        TIME, IN_VALUE, OUT_VALUE, JUMP, START, END, IN_TAN, OUT_TAN,
    ];

    fn write_fields(&self, out: &mut FieldWriter) {
        self.keyframe.write_timing(out);
        out.put(&START, &self.start)
            .put(&END, &self.end)
            .put(&IN_TAN, &self.in_tan)
            .put(&OUT_TAN, &self.out_tan);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        self.keyframe.read_timing(input)?;
        input.read(&START, &mut self.start)?;
        input.read(&END, &mut self.end)?;
        input.read(&IN_TAN, &mut self.in_tan)?;
        input.read(&OUT_TAN, &mut self.out_tan)
    }
}

impl AsKeyframe for OffsetKeyframe {
    fn as_keyframe(&self) -> &Keyframe {
        &self.keyframe
    }

    fn as_keyframe_mut(&mut self) -> &mut Keyframe {
        &mut self.keyframe
    }
}

const START_SHAPE: FieldSpec = FieldSpec::pseudo_list("start", "s");
const END_SHAPE: FieldSpec = FieldSpec::pseudo_list("end", "e");

/// Keyframe holding bezier shapes; each shape is wrapped in a one-element
/// array on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapePropKeyframe {
    pub keyframe: Keyframe,
    pub start: Option<Bezier>,
    pub end: Option<Bezier>,
}

impl LottieObject for ShapePropKeyframe {
    const NAME: &'static str = "ShapePropKeyframe";
    const FIELDS: &'static [FieldSpec] = &[
        TIME,
        IN_VALUE,
        OUT_VALUE,
        JUMP,
        START_SHAPE,
        END_SHAPE,
    ];

    fn write_fields(&self, out: &mut FieldWriter) {
        self.keyframe.write_timing(out);
        out.put(&START_SHAPE, &self.start)
            .put(&END_SHAPE, &self.end);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        self.keyframe.read_timing(input)?;
        input.read(&START_SHAPE, &mut self.start)?;
        input.read(&END_SHAPE, &mut self.end)
    }
}

impl AsKeyframe for ShapePropKeyframe {
    fn as_keyframe(&self) -> &Keyframe {
        &self.keyframe
    }

    fn as_keyframe_mut(&mut self) -> &mut Keyframe {
        &mut self.keyframe
    }
}

crate::lottie_object!(Keyframe, OffsetKeyframe, ShapePropKeyframe);

// ---------- animatable properties ----------

/// A value type that can be animated, together with its keyframe kind.
pub trait Animatable: ToLottie + FromLottie + Clone + fmt::Debug + PartialEq {
    type Keyframe: LottieObject
        + AsKeyframe
        + ToLottie
        + FromLottie
        + Clone
        + fmt::Debug
        + PartialEq;

    /// Name of the property type holding this value.
    const PROPERTY_NAME: &'static str;

    /// Keyframe starting at `time` with `value`.
    fn keyframe(time: f32, value: &Self) -> Self::Keyframe;

    fn start(keyframe: &Self::Keyframe) -> Option<Self>;

    fn set_start(keyframe: &mut Self::Keyframe, value: &Self);

    fn end(keyframe: &Self::Keyframe) -> Option<Self>;

    /// Record `value` as the end of `keyframe`'s segment.
    fn set_end(keyframe: &mut Self::Keyframe, value: &Self);

    /// `start * (1 - factor) + end * factor`. Values that cannot be blended
    /// hold `start`.
    fn blend(start: &Self, end: &Self, factor: f32) -> Self;
}

fn first_component(vector: &Option<NVector>) -> Option<f32> {
    vector.as_ref().and_then(|v| v.as_slice().first().copied())
}

impl Animatable for f32 {
    type Keyframe = OffsetKeyframe;
    const PROPERTY_NAME: &'static str = "Value";

    fn keyframe(time: f32, value: &Self) -> OffsetKeyframe {
        OffsetKeyframe {
            keyframe: Keyframe::new(time),
            start: Some(NVector::new(vec![*value])),
            ..Default::default()
        }
    }

    fn start(keyframe: &OffsetKeyframe) -> Option<Self> {
        first_component(&keyframe.start)
    }

    fn set_start(keyframe: &mut OffsetKeyframe, value: &Self) {
        keyframe.start = Some(NVector::new(vec![*value]));
    }

    fn end(keyframe: &OffsetKeyframe) -> Option<Self> {
        first_component(&keyframe.end)
    }

    fn set_end(keyframe: &mut OffsetKeyframe, value: &Self) {
        keyframe.end = Some(NVector::new(vec![*value]));
    }

    fn blend(start: &Self, end: &Self, factor: f32) -> Self {
        start * (1.0 - factor) + end * factor
    }
}

impl Animatable for NVector {
    type Keyframe = OffsetKeyframe;
    const PROPERTY_NAME: &'static str = "MultiDimensional";

    fn keyframe(time: f32, value: &Self) -> OffsetKeyframe {
        OffsetKeyframe {
            keyframe: Keyframe::new(time),
            start: Some(value.clone()),
            ..Default::default()
        }
    }

    fn start(keyframe: &OffsetKeyframe) -> Option<Self> {
        keyframe.start.clone()
    }

    fn set_start(keyframe: &mut OffsetKeyframe, value: &Self) {
        keyframe.start = Some(value.clone());
    }

    fn end(keyframe: &OffsetKeyframe) -> Option<Self> {
        keyframe.end.clone()
    }

    fn set_end(keyframe: &mut OffsetKeyframe, value: &Self) {
        keyframe.end = Some(value.clone());
    }

    fn blend(start: &Self, end: &Self, factor: f32) -> Self {
        start.lerp(end, factor).unwrap_or_else(|err| {
            log::debug!("holding keyframe start: {err}");
            start.clone()
        })
    }
}

impl Animatable for Bezier {
    type Keyframe = ShapePropKeyframe;
    const PROPERTY_NAME: &'static str = "ShapeProperty";

    fn keyframe(time: f32, value: &Self) -> ShapePropKeyframe {
        ShapePropKeyframe {
            keyframe: Keyframe::new(time),
            start: Some(value.clone()),
            end: None,
        }
    }

    fn start(keyframe: &ShapePropKeyframe) -> Option<Self> {
        keyframe.start.clone()
    }

    fn set_start(keyframe: &mut ShapePropKeyframe, value: &Self) {
        keyframe.start = Some(value.clone());
    }

    fn end(keyframe: &ShapePropKeyframe) -> Option<Self> {
        keyframe.end.clone()
    }

    fn set_end(keyframe: &mut ShapePropKeyframe, value: &Self) {
        keyframe.end = Some(value.clone());
    }

    fn blend(start: &Self, end: &Self, factor: f32) -> Self {
        start.lerp(end, factor).unwrap_or_else(|| {
            log::debug!("holding keyframe start: bezier shapes differ");
            start.clone()
        })
    }
}

const VALUE: FieldSpec = FieldSpec::scalar("value", "k");
const KEYFRAMES: FieldSpec = FieldSpec::scalar("keyframes", "k");
const PROPERTY_INDEX: FieldSpec = FieldSpec::scalar("property_index", "ix");
const ANIMATED: FieldSpec = FieldSpec::pseudo_bool("animated", "a");

/// Property holding either a static value or keyframes.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatableProperty<V: Animatable> {
    /// Static value, used when not animated
    pub value: Option<V>,
    /// Index used by expressions
    pub property_index: Option<i32>,
    pub animated: bool,
    /// Keyframes, used when animated
    pub keyframes: Option<Vec<V::Keyframe>>,
}

/// Animatable scalar
pub type Value = AnimatableProperty<f32>;
/// Animatable multi-dimensional value (position, scale, colour)
pub type MultiDimensional = AnimatableProperty<NVector>;
/// Animatable bezier shape
pub type ShapeProperty = AnimatableProperty<Bezier>;

impl<V: Animatable> Default for AnimatableProperty<V> {
    fn default() -> Self {
        AnimatableProperty {
            value: None,
            property_index: None,
            animated: false,
            keyframes: None,
        }
    }
}

impl<V: Animatable> AnimatableProperty<V> {
    /// Static property holding `value`.
    pub fn new(value: V) -> Self {
        AnimatableProperty {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Drop all keyframes and go back to a static `value`.
    pub fn clear_animation(&mut self, value: V) {
        self.value = Some(value);
        self.animated = false;
        self.keyframes = None;
    }

    /// Append a linear keyframe, see [`add_keyframe_with`](Self::add_keyframe_with).
    pub fn add_keyframe(&mut self, time: f32, value: V) -> &mut V::Keyframe {
        self.add_keyframe_with(time, value, Easing::Linear)
    }

    /// Append a keyframe at `time`. The first call switches the property to
    /// animated mode and discards the static value; later calls also close
    /// the previous keyframe's segment at `value`.
    ///
    /// Times must increase. A keyframe at the same time as the last one
    /// replaces its start value instead of adding a zero-length segment.
    pub fn add_keyframe_with(&mut self, time: f32, value: V, easing: Easing) -> &mut V::Keyframe {
        if !self.animated {
            self.value = None;
            self.animated = true;
            self.keyframes = Some(Vec::new());
        }
        let keyframes = self.keyframes.get_or_insert_with(Vec::new);
        if let Some(previous) = keyframes.last_mut() {
            if previous.as_keyframe().time == time {
                V::set_start(previous, &value);
                let last = keyframes.len() - 1;
                return &mut keyframes[last];
            }
            V::set_end(previous, &value);
        }
        let mut keyframe = V::keyframe(time, &value);
        easing.apply(keyframe.as_keyframe_mut());
        keyframes.push(keyframe);
        let last = keyframes.len() - 1;
        &mut keyframes[last]
    }

    /// Value at `time`.
    ///
    /// Static properties return their value. Animated ones blend the active
    /// segment from its start to its end by the elapsed time fraction; the
    /// start is held on `jump` keyframes and when an easing handle is
    /// missing. Before the first keyframe its start applies, after the last
    /// one the last known value. `None` when there is nothing to evaluate.
    pub fn get_value(&self, time: f32) -> Option<V> {
        if !self.animated {
            return self.value.clone();
        }
        let keyframes = self.keyframes.as_deref()?;
        let mut value = V::start(keyframes.first()?);
        for (index, keyframe) in keyframes.iter().enumerate() {
            let at = keyframe.as_keyframe().time;
            if time <= at {
                if let Some(start) = V::start(keyframe) {
                    value = Some(start);
                }
                return match index.checked_sub(1) {
                    Some(previous) => segment_value(&keyframes[previous], at, time, value),
                    None => value,
                };
            }
            if let Some(end) = V::end(keyframe) {
                value = Some(end);
            }
        }
        value
    }
}

/// Value inside the segment leaving `keyframe`, which ends at `next_time`
/// where the next keyframe starts with `next_start`.
fn segment_value<V: Animatable>(
    keyframe: &V::Keyframe,
    next_time: f32,
    time: f32,
    next_start: Option<V>,
) -> Option<V> {
    let Some(end) = V::end(keyframe).or(next_start) else {
        return V::start(keyframe);
    };
    let Some(start) = V::start(keyframe) else {
        return Some(end);
    };
    let timing = keyframe.as_keyframe();
    let span = next_time - timing.time;
    let held = timing.jump == Some(true)
        || timing.in_value.is_none()
        || timing.out_value.is_none();
    if held || span <= 0.0 {
        return Some(start);
    }
    Some(V::blend(&start, &end, (time - timing.time) / span))
}

impl<V: Animatable> LottieObject for AnimatableProperty<V> {
    const NAME: &'static str = V::PROPERTY_NAME;
    const FIELDS: &'static [FieldSpec] = &[VALUE, KEYFRAMES, PROPERTY_INDEX, ANIMATED];

    fn write_fields(&self, out: &mut FieldWriter) {
        if self.animated {
            out.put(&KEYFRAMES, &self.keyframes);
        } else {
            out.put(&VALUE, &self.value);
        }
        out.put(&PROPERTY_INDEX, &self.property_index)
            .put(&ANIMATED, &self.animated);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        input.read(&PROPERTY_INDEX, &mut self.property_index)?;
        input.read(&ANIMATED, &mut self.animated)?;
        if self.animated {
            input.read(&KEYFRAMES, &mut self.keyframes)
        } else {
            input.read(&VALUE, &mut self.value)
        }
    }
}

impl<V: Animatable> ToLottie for AnimatableProperty<V> {
    fn to_lottie(&self) -> JsonValue {
        crate::fields::encode_object(self)
    }
}

impl<V: Animatable> FromLottie for AnimatableProperty<V> {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        crate::fields::decode_object(value)
    }
}

// ---------- gradients ----------

const COLORS: FieldSpec = FieldSpec::scalar("colors", "k");
const COUNT: FieldSpec = FieldSpec::scalar("count", "p");

/// Gradient stops packed as `[offset, r, g, b, offset, r, g, b, ...]`.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientColors {
    pub colors: MultiDimensional,
    /// Number of colour stops
    pub count: i32,
}

impl Default for GradientColors {
    fn default() -> Self {
        GradientColors {
            colors: MultiDimensional::new(NVector::default()),
            count: 0,
        }
    }
}

impl GradientColors {
    /// Replace the colours with static stops.
    pub fn set_stops(&mut self, stops: &[(f32, Vec3)]) {
        let packed = stops
            .iter()
            .flat_map(|(offset, color)| std::iter::once(*offset).chain(color.to_array()))
            .collect();
        self.colors.clear_animation(packed);
        self.count = i32::try_from(stops.len()).unwrap_or(i32::MAX);
    }
}

impl LottieObject for GradientColors {
    const NAME: &'static str = "GradientColors";
    const FIELDS: &'static [FieldSpec] = &[COLORS, COUNT];

    fn write_fields(&self, out: &mut FieldWriter) {
        out.put(&COLORS, &self.colors).put(&COUNT, &self.count);
    }

    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
        input.read(&COLORS, &mut self.colors)?;
        input.read(&COUNT, &mut self.count)
    }
}

crate::lottie_object!(GradientColors);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn static_value_uses_k() {
        let mut v = Value::new(50.0);
        v.property_index = Some(3);
        assert_eq!(v.to_lottie(), json!({"k": 50.0, "ix": 3, "a": 0}));
    }

    #[test]
    fn keyframes_replace_static_value() {
        let mut pos = MultiDimensional::new(NVector::from([0.0, 0.0]));
        pos.add_keyframe(0.0, NVector::from([0.0, 0.0]));
        pos.add_keyframe_with(30.0, NVector::from([100.0, 50.0]), Easing::Jump);

        assert!(pos.animated);
        assert!(pos.value.is_none());
        let keyframes = pos.keyframes.as_ref().unwrap();
        assert_eq!(keyframes.len(), 2);
        assert_eq!(keyframes[0].end, Some(NVector::from([100.0, 50.0])));
        assert_eq!(keyframes[1].keyframe.jump, Some(true));

        assert_eq!(
            pos.to_lottie(),
            json!({
                "a": 1,
                "k": [
                    {
                        "t": 0.0,
                        "i": {"x": [1.0], "y": [1.0]},
                        "o": {"x": [0.0], "y": [0.0]},
                        "s": [0.0, 0.0],
                        "e": [100.0, 50.0]
                    },
                    {"t": 30.0, "h": 1, "s": [100.0, 50.0]}
                ]
            })
        );
    }

    #[test]
    fn animated_flag_selects_k_interpretation() {
        let static_wire = json!({"a": 0, "k": [1.0, 2.0]});
        let md = MultiDimensional::from_lottie(&static_wire).unwrap();
        assert_eq!(md.value, Some(NVector::from([1.0, 2.0])));
        assert!(md.keyframes.is_none());

        let animated_wire = json!({"a": 1, "k": [{"t": 0, "s": [1.0, 2.0]}]});
        let md = MultiDimensional::from_lottie(&animated_wire).unwrap();
        assert!(md.value.is_none());
        assert_eq!(md.keyframes.unwrap()[0].start, Some(NVector::from([1.0, 2.0])));
    }

    #[test]
    fn keyframe_at_same_time_replaces_start() {
        let mut v = Value::default();
        v.add_keyframe(0.0, 1.0);
        v.add_keyframe(0.0, 2.0);
        let keyframes = v.keyframes.as_ref().unwrap();
        assert_eq!(keyframes.len(), 1);
        assert_eq!(keyframes[0].start, Some(NVector::from([2.0])));
        assert_eq!(keyframes[0].end, None);

        v.add_keyframe(10.0, 3.0);
        let keyframes = v.keyframes.as_ref().unwrap();
        assert_eq!(keyframes.len(), 2);
        assert_eq!(keyframes[0].end, Some(NVector::from([3.0])));
    }

    #[test]
    fn get_value_blends_and_holds() {
        let mut v = Value::new(7.0);
        assert_eq!(v.get_value(100.0), Some(7.0));

        v.add_keyframe(0.0, 0.0);
        v.add_keyframe_with(10.0, 10.0, Easing::Jump);
        v.add_keyframe(20.0, 30.0);

        assert_eq!(v.get_value(-5.0), Some(0.0));
        assert_eq!(v.get_value(0.0), Some(0.0));
        assert_eq!(v.get_value(5.0), Some(5.0));
        assert_eq!(v.get_value(10.0), Some(10.0));
        assert_eq!(v.get_value(15.0), Some(10.0));
        assert_eq!(v.get_value(20.0), Some(10.0));
        assert_eq!(v.get_value(21.0), Some(30.0));
        assert_eq!(v.get_value(50.0), Some(30.0));

        v.keyframes = Some(Vec::new());
        assert_eq!(v.get_value(5.0), None);
    }

    #[test]
    fn get_value_blends_vectors() {
        let mut pos = MultiDimensional::default();
        pos.add_keyframe(0.0, NVector::from([0.0, 0.0]));
        pos.add_keyframe(4.0, NVector::from([100.0, 40.0]));
        assert_eq!(pos.get_value(1.0), Some(NVector::from([25.0, 10.0])));
    }

    #[test]
    fn clear_animation_goes_static() {
        let mut v = Value::default();
        v.add_keyframe(0.0, 1.0);
        v.clear_animation(5.0);
        assert_eq!(v.to_lottie(), json!({"k": 5.0, "a": 0}));
    }

    #[test]
    fn shape_keyframes_wrap_bezier() {
        let mut shape = ShapeProperty::default();
        shape.add_keyframe(0.0, Bezier::new());
        let wire = shape.to_lottie();
        assert_eq!(wire["k"][0]["s"], json!([{"c": false, "i": [], "o": [], "v": []}]));
        let back = ShapeProperty::from_lottie(&wire).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn gradient_stops_pack_components() {
        let mut g = GradientColors::default();
        g.set_stops(&[
            (0.0, Vec3::new([1.0, 0.0, 0.0])),
            (1.0, Vec3::new([0.0, 0.0, 1.0])),
        ]);
        assert_eq!(
            g.to_lottie(),
            json!({
                "k": {"k": [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0], "a": 0},
                "p": 2
            })
        );
    }

    #[test]
    fn empty_gradient_keeps_empty_value() {
        let g = GradientColors::default();
        assert_eq!(g.to_lottie(), json!({"k": {"k": [], "a": 0}, "p": 0}));
    }
}
