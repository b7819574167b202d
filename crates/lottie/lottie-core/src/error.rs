//! Error types for lottie-core

use serde_json::Value as JsonValue;

/// Errors raised while reconstructing values from the wire mapping or when
/// combining variable-size vectors.
///
/// Encoding never fails; every variant here comes from decoding, from
/// [`NVector`](crate::vector::NVector) arithmetic, or from JSON text I/O.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LottieError {
    /// Two vectors combined element-wise have different component counts
    #[error("vector size mismatch: expected {expected} components, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A wire value does not have the shape the target type needs
    #[error("unexpected wire value: expected {expected}, got {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    /// Decoding a named field of an object failed
    #[error("field `{key}` of {object}: {source}")]
    Field {
        object: &'static str,
        key: &'static str,
        #[source]
        source: Box<LottieError>,
    },

    /// JSON text could not be parsed or written
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LottieError {
    /// Build an [`LottieError::UnexpectedType`] describing `found`.
    pub fn unexpected(expected: &'static str, found: &JsonValue) -> Self {
        LottieError::UnexpectedType {
            expected,
            found: json_kind(found),
        }
    }

    pub(crate) fn in_field(self, object: &'static str, key: &'static str) -> Self {
        LottieError::Field {
            object,
            key,
            source: Box::new(self),
        }
    }
}

/// Short name of a JSON value's kind, used in error messages.
pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

pub type Result<T, E = LottieError> = std::result::Result<T, E>;
