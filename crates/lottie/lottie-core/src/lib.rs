//! lottie-core: value codec, vector math and property models for the
//! Lottie/TGS animation JSON format.
//!
//! The wire format is a JSON object keyed by short schema names (`"k"`,
//! `"a"`, `"ix"`, ...). [`encode`] turns any [`ToLottie`] value into that
//! form; each model's [`FromLottie`] impl rebuilds it.

pub mod bezier;
pub mod codec;
pub mod config;
pub mod easing;
pub mod error;
pub mod fields;
pub mod json;
pub mod properties;
pub mod vector;

pub use bezier::Bezier;
pub use codec::{decode, encode, FromLottie, ToLottie};
pub use config::ExportOptions;
pub use easing::{Easing, KeyframeBezierHandle};
pub use error::{LottieError, Result};
pub use fields::{FieldSpec, LottieObject};
pub use json::{from_json_str, to_json_string};
pub use properties::{
    AnimatableProperty, GradientColors, Keyframe, MultiDimensional, OffsetKeyframe,
    ShapePropKeyframe, ShapeProperty, Value,
};
pub use vector::{Color, NVector, Vec2, Vec3, Vec4, Vector, VectorOps};

/// The wire value type.
pub use serde_json::Value as JsonValue;
