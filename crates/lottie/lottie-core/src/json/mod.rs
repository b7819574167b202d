//! JSON text helpers on top of the value codec.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::codec::{FromLottie, ToLottie};
use crate::config::ExportOptions;
use crate::error::Result;

/// Encode `value` and write it as JSON text.
///
/// Pretty output lists object keys in sorted order (serde_json's default map
/// ordering) and indents by `options.indent` spaces.
pub fn to_json_string<T: ToLottie + ?Sized>(value: &T, options: &ExportOptions) -> Result<String> {
    let wire = value.to_lottie();
    if !options.pretty {
        return Ok(serde_json::to_string(&wire)?);
    }

    let indent = vec![b' '; options.indent];
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    wire.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse JSON text and reconstruct a `T` from it.
pub fn from_json_str<T: FromLottie>(text: &str) -> Result<T> {
    let wire: serde_json::Value = serde_json::from_str(text)?;
    T::from_lottie(&wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Value;
    use crate::LottieError;

    #[test]
    fn compact_by_default() {
        let v = Value::new(1.5);
        let text = to_json_string(&v, &ExportOptions::default()).unwrap();
        assert_eq!(text, r#"{"a":0,"k":1.5}"#);
    }

    #[test]
    fn pretty_sorts_and_indents() {
        let mut v = Value::new(1.5);
        v.property_index = Some(2);
        let opts = ExportOptions {
            pretty: true,
            indent: 2,
        };
        let text = to_json_string(&v, &opts).unwrap();
        assert_eq!(text, "{\n  \"a\": 0,\n  \"ix\": 2,\n  \"k\": 1.5\n}");
    }

    #[test]
    fn parse_errors_surface_as_json() {
        let err = from_json_str::<Value>("{ not json").unwrap_err();
        assert!(matches!(err, LottieError::Json(_)));

        let v: Value = from_json_str(r#"{"a": 0, "k": 3}"#).unwrap();
        assert_eq!(v.value, Some(3.0));
    }
}
