//! Declarative field tables for Lottie objects.
//!
//! Each object type lists its fields once as [`FieldSpec`] constants: the
//! Rust-side name, the short wire key and how the value is laid out on the
//! wire. [`encode_object`] and [`decode_object`] are the only routines that
//! turn objects into wire mappings and back; a model only says which of its
//! members goes with which spec.
//!
//! Decoding follows "default-construct, copy-field-if-present": the object
//! starts from `Default` and each field is overwritten only when its key is
//! in the input. Encoding omits fields whose value encodes to `null`.

use std::borrow::Cow;

use serde_json::{Map, Value as JsonValue};

use crate::codec::{FromLottie, ToLottie};
use crate::error::{LottieError, Result};

/// How a field's value sits under its key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Stored as-is.
    Scalar,
    /// A scalar wrapped in a one-element array, e.g. `"x": [0.5]`.
    /// Bare scalars are accepted when reading.
    PseudoList,
}

/// Value conversion applied on top of the arity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Convert {
    None,
    /// `bool` stored as the integer `0` or `1`.
    PseudoBool,
}

/// One row of an object's field table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust-side field name
    pub name: &'static str,
    /// Wire key
    pub key: &'static str,
    pub arity: Arity,
    pub convert: Convert,
}

impl FieldSpec {
    pub const fn scalar(name: &'static str, key: &'static str) -> Self {
        FieldSpec {
            name,
            key,
            arity: Arity::Scalar,
            convert: Convert::None,
        }
    }

    pub const fn pseudo_list(name: &'static str, key: &'static str) -> Self {
        FieldSpec {
            name,
            key,
            arity: Arity::PseudoList,
            convert: Convert::None,
        }
    }

    pub const fn pseudo_bool(name: &'static str, key: &'static str) -> Self {
        FieldSpec {
            name,
            key,
            arity: Arity::Scalar,
            convert: Convert::PseudoBool,
        }
    }

    /// Apply conversion and arity to an already-encoded value.
    pub fn wrap(&self, value: JsonValue) -> JsonValue {
        let value = match (self.convert, value) {
            (Convert::PseudoBool, JsonValue::Bool(b)) => JsonValue::from(u8::from(b)),
            (_, other) => other,
        };
        match self.arity {
            Arity::Scalar => value,
            Arity::PseudoList => JsonValue::Array(vec![value]),
        }
    }

    /// Undo [`wrap`](Self::wrap) on a raw wire value.
    pub fn unwrap<'a>(&self, raw: &'a JsonValue) -> Cow<'a, JsonValue> {
        let inner = match (self.arity, raw) {
            (Arity::PseudoList, JsonValue::Array(items)) => {
                items.first().unwrap_or(&JsonValue::Null)
            }
            _ => raw,
        };
        match (self.convert, inner) {
            (Convert::PseudoBool, JsonValue::Number(n)) => {
                Cow::Owned(JsonValue::Bool(n.as_f64().is_some_and(|f| f != 0.0)))
            }
            _ => Cow::Borrowed(inner),
        }
    }
}

/// An object with a fixed field table.
pub trait LottieObject: Default {
    /// Type name used in error messages.
    const NAME: &'static str;
    /// Every field this object reads or writes.
    const FIELDS: &'static [FieldSpec];

    fn write_fields(&self, out: &mut FieldWriter);
    fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()>;
}

/// Look a field up by its Rust-side name.
pub fn field_named<T: LottieObject>(name: &str) -> Option<&'static FieldSpec> {
    T::FIELDS.iter().find(|f| f.name == name)
}

/// Collects an object's fields into a wire mapping.
pub struct FieldWriter {
    object: &'static str,
    fields: &'static [FieldSpec],
    map: Map<String, JsonValue>,
}

impl FieldWriter {
    pub fn new<T: LottieObject>() -> Self {
        FieldWriter {
            object: T::NAME,
            fields: T::FIELDS,
            map: Map::new(),
        }
    }

    /// Encode `value` under `spec.key`, skipping it when it encodes to null.
    pub fn put<V: ToLottie + ?Sized>(&mut self, spec: &FieldSpec, value: &V) -> &mut Self {
        debug_assert!(
            self.fields.contains(spec),
            "{} writes undeclared field `{}`",
            self.object,
            spec.key
        );
        let encoded = value.to_lottie();
        if !encoded.is_null() {
            self.map.insert(spec.key.to_string(), spec.wrap(encoded));
        }
        self
    }

    pub fn into_map(self) -> Map<String, JsonValue> {
        self.map
    }
}

/// Read access to a wire mapping through an object's field table.
pub struct FieldReader<'a> {
    object: &'static str,
    fields: &'static [FieldSpec],
    map: &'a Map<String, JsonValue>,
}

impl<'a> FieldReader<'a> {
    pub fn new<T: LottieObject>(map: &'a Map<String, JsonValue>) -> Self {
        FieldReader {
            object: T::NAME,
            fields: T::FIELDS,
            map,
        }
    }

    pub fn contains(&self, spec: &FieldSpec) -> bool {
        self.map.contains_key(spec.key)
    }

    /// Decode the field if its key is present.
    pub fn get<V: FromLottie>(&self, spec: &FieldSpec) -> Result<Option<V>> {
        let Some(raw) = self.map.get(spec.key) else {
            return Ok(None);
        };
        V::from_lottie(&spec.unwrap(raw))
            .map(Some)
            .map_err(|e| e.in_field(self.object, spec.key))
    }

    /// Overwrite `slot` with the decoded field if its key is present.
    pub fn read<V: FromLottie>(&self, spec: &FieldSpec, slot: &mut V) -> Result<()> {
        if let Some(value) = self.get(spec)? {
            *slot = value;
        }
        Ok(())
    }

    /// Keys in the input that no field of this object claims.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &'a str> {
        let fields = self.fields;
        self.map
            .keys()
            .map(String::as_str)
            .filter(move |key| !fields.iter().any(|f| f.key == *key))
    }
}

/// Encode an object through its field table.
pub fn encode_object<T: LottieObject>(object: &T) -> JsonValue {
    let mut out = FieldWriter::new::<T>();
    object.write_fields(&mut out);
    JsonValue::Object(out.into_map())
}

/// Decode an object through its field table.
pub fn decode_object<T: LottieObject>(value: &JsonValue) -> Result<T> {
    let map = value
        .as_object()
        .ok_or_else(|| LottieError::unexpected("object", value))?;
    let input = FieldReader::new::<T>(map);
    for key in input.unknown_keys() {
        log::trace!("{}: ignoring unknown key `{key}`", T::NAME);
    }
    let mut object = T::default();
    object.read_fields(&input)?;
    Ok(object)
}

/// Implement [`ToLottie`] and [`FromLottie`] for [`LottieObject`] types by
/// routing through [`encode_object`] and [`decode_object`].
#[macro_export]
macro_rules! lottie_object {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::codec::ToLottie for $ty {
            fn to_lottie(&self) -> $crate::JsonValue {
                $crate::fields::encode_object(self)
            }
        }

        impl $crate::codec::FromLottie for $ty {
            fn from_lottie(value: &$crate::JsonValue) -> $crate::Result<Self> {
                $crate::fields::decode_object(value)
            }
        }
    )+};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Marker {
        label: Option<String>,
        weight: f32,
        visible: bool,
    }

    const LABEL: FieldSpec = FieldSpec::scalar("label", "nm");
    const WEIGHT: FieldSpec = FieldSpec::pseudo_list("weight", "w");
    const VISIBLE: FieldSpec = FieldSpec::pseudo_bool("visible", "v");

    impl LottieObject for Marker {
        const NAME: &'static str = "Marker";
        const FIELDS: &'static [FieldSpec] = &[LABEL, WEIGHT, VISIBLE];

        fn write_fields(&self, out: &mut FieldWriter) {
            out.put(&LABEL, &self.label)
                .put(&WEIGHT, &self.weight)
                .put(&VISIBLE, &self.visible);
        }

        fn read_fields(&mut self, input: &FieldReader<'_>) -> Result<()> {
            input.read(&LABEL, &mut self.label)?;
            input.read(&WEIGHT, &mut self.weight)?;
            input.read(&VISIBLE, &mut self.visible)?;
            Ok(())
        }
    }

    crate::lottie_object!(Marker);

    #[test]
    fn wrap_applies_arity_and_conversion() {
        assert_eq!(WEIGHT.wrap(json!(0.5)), json!([0.5]));
        assert_eq!(VISIBLE.wrap(json!(true)), json!(1));
        assert_eq!(LABEL.wrap(json!("a")), json!("a"));
    }

    #[test]
    fn unwrap_accepts_bare_scalars() {
        assert_eq!(*WEIGHT.unwrap(&json!([0.5])), json!(0.5));
        assert_eq!(*WEIGHT.unwrap(&json!(0.5)), json!(0.5));
        assert_eq!(*VISIBLE.unwrap(&json!(0)), json!(false));
        assert_eq!(*VISIBLE.unwrap(&json!(true)), json!(true));
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let m = Marker {
            label: None,
            weight: 2.0,
            visible: true,
        };
        assert_eq!(encode_object(&m), json!({"w": [2.0], "v": 1}));
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let m: Marker = decode_object(&json!({"nm": "pin", "extra": 3})).unwrap();
        assert_eq!(
            m,
            Marker {
                label: Some("pin".into()),
                weight: 0.0,
                visible: false,
            }
        );
    }

    #[test]
    fn decode_errors_carry_the_key() {
        let err = decode_object::<Marker>(&json!({"w": ["heavy"]})).unwrap_err();
        assert!(matches!(
            err,
            LottieError::Field { object: "Marker", key: "w", .. }
        ));
        assert!(decode_object::<Marker>(&json!([1, 2])).is_err());
    }

    #[test]
    fn table_lookup_by_name() {
        assert_eq!(field_named::<Marker>("visible").map(|f| f.key), Some("v"));
        assert!(field_named::<Marker>("colour").is_none());
    }

    #[test]
    fn macro_routes_through_table() {
        let m = Marker {
            label: Some("x".into()),
            weight: 1.5,
            visible: false,
        };
        let wire = m.to_lottie();
        assert_eq!(wire, json!({"nm": "x", "w": [1.5], "v": 0}));
        assert_eq!(Marker::from_lottie(&wire).unwrap(), m);
    }
}
