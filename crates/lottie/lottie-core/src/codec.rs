//! Value codec: maps in-memory values to the Lottie wire mapping and back.
//!
//! [`encode`] is total. Models produce their own mapping, sequences encode
//! element-wise, vectors become plain number arrays and primitives pass
//! through. [`decode`] is the identity; choosing which concrete type to build
//! from a wire value is the job of each type's [`FromLottie`] impl, which
//! knows the field layout.

use serde_json::{Number, Value as JsonValue};

use crate::error::{LottieError, Result};
use crate::vector::{NVector, Vector};

/// Capability of producing a wire value.
pub trait ToLottie {
    fn to_lottie(&self) -> JsonValue;
}

/// Reconstruct a value of a known type from its wire form.
pub trait FromLottie: Sized {
    fn from_lottie(value: &JsonValue) -> Result<Self>;
}

/// Convert any encodable value into its wire representation.
pub fn encode<T: ToLottie + ?Sized>(value: &T) -> JsonValue {
    value.to_lottie()
}

/// Hand a wire value back unchanged.
///
/// Kept symmetric with [`encode`] for call sites. No shape detection happens
/// here: use [`FromLottie`] on the target type for structured decoding.
pub fn decode(value: JsonValue) -> JsonValue {
    value
}

/// `f32` as a JSON number, using the shortest decimal that reads back to the
/// same `f32` (so `0.1f32` is written `0.1`, not its widened `f64` digits).
/// Non-finite values have no JSON form and become `null`.
pub fn f32_number(value: f32) -> JsonValue {
    let widened = value
        .to_string()
        .parse::<f64>()
        .unwrap_or(f64::from(value));
    Number::from_f64(widened).map_or(JsonValue::Null, JsonValue::Number)
}

fn expect_f64(value: &JsonValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| LottieError::unexpected("number", value))
}

fn expect_array(value: &JsonValue) -> Result<&Vec<JsonValue>> {
    value
        .as_array()
        .ok_or_else(|| LottieError::unexpected("array", value))
}

fn number_components(value: &JsonValue) -> Result<Vec<f32>> {
    expect_array(value)?
        .iter()
        .map(|c| expect_f64(c).map(|f| f as f32))
        .collect()
}

// ---------- passthrough ----------

impl ToLottie for JsonValue {
    fn to_lottie(&self) -> JsonValue {
        self.clone()
    }
}

impl FromLottie for JsonValue {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl ToLottie for bool {
    fn to_lottie(&self) -> JsonValue {
        JsonValue::Bool(*self)
    }
}

impl FromLottie for bool {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| LottieError::unexpected("boolean", value))
    }
}

impl ToLottie for f32 {
    fn to_lottie(&self) -> JsonValue {
        f32_number(*self)
    }
}

impl FromLottie for f32 {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        expect_f64(value).map(|f| f as f32)
    }
}

impl ToLottie for f64 {
    fn to_lottie(&self) -> JsonValue {
        Number::from_f64(*self).map_or(JsonValue::Null, JsonValue::Number)
    }
}

impl FromLottie for f64 {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        expect_f64(value)
    }
}

macro_rules! integer_codec {
    ($($ty:ty),+) => {$(
        impl ToLottie for $ty {
            fn to_lottie(&self) -> JsonValue {
                JsonValue::from(*self)
            }
        }

        impl FromLottie for $ty {
            fn from_lottie(value: &JsonValue) -> Result<Self> {
                // exported files sometimes write integers as `3.0`
                let wide = match value.as_i64() {
                    Some(i) => Some(i),
                    None => value
                        .as_f64()
                        .filter(|f| f.fract() == 0.0)
                        // `as` saturates, so out-of-range floats must not reach it
                        .filter(|f| (i64::MIN as f64..i64::MAX as f64).contains(f))
                        .map(|f| f as i64),
                };
                wide.and_then(|i| <$ty>::try_from(i).ok())
                    .ok_or_else(|| LottieError::unexpected("integer", value))
            }
        }
    )+};
}

integer_codec!(i32, i64, u32, usize);

impl ToLottie for str {
    fn to_lottie(&self) -> JsonValue {
        JsonValue::String(self.to_owned())
    }
}

impl ToLottie for String {
    fn to_lottie(&self) -> JsonValue {
        JsonValue::String(self.clone())
    }
}

impl FromLottie for String {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| LottieError::unexpected("string", value))
    }
}

// ---------- containers ----------

impl<T: ToLottie> ToLottie for Option<T> {
    fn to_lottie(&self) -> JsonValue {
        match self {
            Some(inner) => inner.to_lottie(),
            None => JsonValue::Null,
        }
    }
}

impl<T: FromLottie> FromLottie for Option<T> {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(None),
            other => T::from_lottie(other).map(Some),
        }
    }
}

impl<T: ToLottie + ?Sized> ToLottie for &T {
    fn to_lottie(&self) -> JsonValue {
        (**self).to_lottie()
    }
}

impl<T: ToLottie + ?Sized> ToLottie for Box<T> {
    fn to_lottie(&self) -> JsonValue {
        (**self).to_lottie()
    }
}

impl<T: FromLottie> FromLottie for Box<T> {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        T::from_lottie(value).map(Box::new)
    }
}

impl<T: ToLottie> ToLottie for [T] {
    fn to_lottie(&self) -> JsonValue {
        JsonValue::Array(self.iter().map(ToLottie::to_lottie).collect())
    }
}

impl<T: ToLottie> ToLottie for Vec<T> {
    fn to_lottie(&self) -> JsonValue {
        self.as_slice().to_lottie()
    }
}

impl<T: FromLottie> FromLottie for Vec<T> {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        expect_array(value)?.iter().map(T::from_lottie).collect()
    }
}

// ---------- vectors ----------

impl<const N: usize> ToLottie for Vector<N> {
    fn to_lottie(&self) -> JsonValue {
        self.as_slice().to_lottie()
    }
}

impl<const N: usize> FromLottie for Vector<N> {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        Vector::try_from(NVector::new(number_components(value)?))
    }
}

impl ToLottie for NVector {
    fn to_lottie(&self) -> JsonValue {
        self.as_slice().to_lottie()
    }
}

impl FromLottie for NVector {
    fn from_lottie(value: &JsonValue) -> Result<Self> {
        number_components(value).map(NVector::new)
    }
}
