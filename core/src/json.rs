//! Type-checked, default-falling-back access to server JSON objects.
//!
//! # Design
//! `SafeJson` wraps a `serde_json::Map` by composition and exposes reads
//! only. Two families of readers exist:
//!
//! - `get` / `get_opt` never fail. A field that is absent, or whose JSON
//!   type does not match the requested Rust type, yields the caller's
//!   default (or `None`). The default therefore doubles as a type filter.
//! - `require_*` are for fields the entity cannot exist without and turn
//!   absence or a type mismatch into a `ParseError`.
//!
//! Integers and floats are distinct types for `get`: an `f64` default is
//! not satisfied by `10`, and an `i64` default is not satisfied by `10.5`.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::ParseError;

/// A Rust type that can be read out of a single JSON value when, and only
/// when, the value has the matching JSON type.
pub trait FieldValue: Sized {
    fn from_json(value: &Value) -> Option<Self>;
}

impl FieldValue for String {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FieldValue for i64 {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FieldValue for f64 {
    fn from_json(value: &Value) -> Option<Self> {
        if value.is_f64() {
            value.as_f64()
        } else {
            None
        }
    }
}

impl FieldValue for bool {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FieldValue for Vec<Value> {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_array().cloned()
    }
}

impl FieldValue for SafeJson {
    fn from_json(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(SafeJson::from)
    }
}

/// A JSON object with safe, read-only field access.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SafeJson {
    inner: Map<String, Value>,
}

impl SafeJson {
    /// Read `name`, falling back to `default` when the field is absent or of
    /// another JSON type.
    pub fn get<T: FieldValue>(&self, name: &str, default: T) -> T {
        self.get_opt(name).unwrap_or(default)
    }

    /// Read `name` with the same matching rule as [`SafeJson::get`].
    pub fn get_opt<T: FieldValue>(&self, name: &str) -> Option<T> {
        let Some(value) = self.inner.get(name) else {
            tracing::trace!(field = name, "field absent, using default");
            return None;
        };
        let read = T::from_json(value);
        if read.is_none() {
            tracing::trace!(field = name, found = json_type(value), "field mistyped, using default");
        }
        read
    }

    pub fn require_str(&self, name: &str) -> Result<&str, ParseError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| wrong_type(name, "a string"))
    }

    pub fn require_i64(&self, name: &str) -> Result<i64, ParseError> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| wrong_type(name, "an integer"))
    }

    /// Any JSON number is accepted, so a price of `25` reads as `25.0`.
    pub fn require_f64(&self, name: &str) -> Result<f64, ParseError> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| wrong_type(name, "a number"))
    }

    pub fn require_bool(&self, name: &str) -> Result<bool, ParseError> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| wrong_type(name, "a boolean"))
    }

    pub fn require_object(&self, name: &str) -> Result<SafeJson, ParseError> {
        SafeJson::from_json(self.require(name)?).ok_or_else(|| wrong_type(name, "an object"))
    }

    pub fn require_array(&self, name: &str) -> Result<&[Value], ParseError> {
        self.require(name)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| wrong_type(name, "an array"))
    }

    fn require(&self, name: &str) -> Result<&Value, ParseError> {
        self.inner
            .get(name)
            .ok_or_else(|| ParseError::MissingField(name.to_string()))
    }
}

/// Split a JSON array response into its objects.
pub fn parse_objects(text: &str) -> Result<Vec<SafeJson>, ParseError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items.into_iter().map(SafeJson::try_from).collect(),
        _ => Err(ParseError::WrongType {
            field: "<root>".to_string(),
            expected: "an array",
        }),
    }
}

fn wrong_type(field: &str, expected: &'static str) -> ParseError {
    ParseError::WrongType {
        field: field.to_string(),
        expected,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FromStr for SafeJson {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        SafeJson::try_from(serde_json::from_str::<Value>(text)?)
    }
}

impl TryFrom<Value> for SafeJson {
    type Error = ParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            _ => Err(ParseError::NotAnObject),
        }
    }
}

impl From<Map<String, Value>> for SafeJson {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

impl From<SafeJson> for Value {
    fn from(json: SafeJson) -> Self {
        Value::Object(json.inner)
    }
}

impl fmt::Display for SafeJson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.inner).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "id": 12,
            "name": "Speed dating in Lausanne",
            "base_price": 25.5,
            "locked": false,
            "location": {"id": 3, "name": "Lausanne"},
            "tags": ["a", "b"],
            "nothing": null
        })
    }

    #[test]
    fn identity_through_both_constructors() {
        let value = sample();
        let from_text: SafeJson = value.to_string().parse().unwrap();
        let from_value = SafeJson::try_from(value.clone()).unwrap();
        assert_eq!(from_text.to_string(), value.to_string());
        assert_eq!(from_value.to_string(), value.to_string());
    }

    #[test]
    fn get_reads_matching_types() {
        let json = SafeJson::try_from(sample()).unwrap();
        assert_eq!(json.get("id", 0_i64), 12);
        assert_eq!(json.get("name", String::new()), "Speed dating in Lausanne");
        assert_eq!(json.get("base_price", 0.0), 25.5);
        assert!(!json.get("locked", true));
        assert_eq!(json.get("tags", Vec::<Value>::new()).len(), 2);
        let location = json.get("location", SafeJson::default());
        assert_eq!(location.get("name", String::new()), "Lausanne");
    }

    #[test]
    fn get_falls_back_on_type_mismatch() {
        let json = SafeJson::try_from(sample()).unwrap();
        assert_eq!(json.get("id", 1.5), 1.5);
        assert_eq!(json.get("base_price", 7_i64), 7);
        assert_eq!(json.get("name", 3_i64), 3);
        assert_eq!(json.get("nothing", "x".to_string()), "x");
        assert!(json.get_opt::<String>("me").is_none());
        assert!(json.get_opt::<SafeJson>("him").is_none());
    }

    #[test]
    fn required_readers_report_missing_and_mistyped() {
        let json = SafeJson::try_from(sample()).unwrap();
        assert_eq!(json.require_str("name").unwrap(), "Speed dating in Lausanne");
        assert_eq!(json.require_f64("id").unwrap(), 12.0);
        assert!(matches!(
            json.require_i64("missing"),
            Err(ParseError::MissingField(f)) if f == "missing"
        ));
        assert!(matches!(
            json.require_bool("name"),
            Err(ParseError::WrongType { expected: "a boolean", .. })
        ));
        assert!(matches!(json.require_object("tags"), Err(ParseError::WrongType { .. })));
    }

    #[test]
    fn non_object_text_is_rejected() {
        assert!(matches!("[1,2]".parse::<SafeJson>(), Err(ParseError::NotAnObject)));
        assert!(matches!("{oops".parse::<SafeJson>(), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn parse_objects_splits_arrays() {
        let objects = parse_objects(r#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].get("id", 0_i64), 2);
        assert!(parse_objects(r#"{"id":1}"#).is_err());
        assert!(matches!(parse_objects("[1]"), Err(ParseError::NotAnObject)));
    }

    fn other_typed_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
            Just(json!([1, 2])),
            Just(json!({"k": 1})),
        ]
    }

    proptest! {
        #[test]
        fn absent_field_yields_default(field in "[a-z_]{1,12}", default in any::<i64>()) {
            let json = SafeJson::default();
            prop_assert_eq!(json.get(&field, default), default);
        }

        #[test]
        fn mistyped_field_yields_integer_default(value in other_typed_value(), default in any::<i64>()) {
            let json = SafeJson::try_from(json!({ "field": value })).unwrap();
            prop_assert_eq!(json.get("field", default), default);
        }

        #[test]
        fn float_field_never_satisfies_integer_default(stored in -1.0e6f64..1.0e6, default in any::<i64>()) {
            let stored = if stored.fract() == 0.0 { stored + 0.5 } else { stored };
            let json = SafeJson::try_from(json!({ "field": stored })).unwrap();
            prop_assert_eq!(json.get("field", default), default);
        }

        #[test]
        fn integer_field_never_satisfies_string_default(stored in any::<i64>(), default in "[a-z]{0,8}") {
            let json = SafeJson::try_from(json!({ "field": stored })).unwrap();
            prop_assert_eq!(json.get("field", default.clone()), default);
        }
    }
}
