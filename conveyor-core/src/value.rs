//! Tagged value union for opaque configuration payloads (`source`, job
//! steps, and any other key the typed structs do not model).
//!
//! Equality is structural with two normalisations:
//! - an integer and a [`Value::Float`] are equal when the float is integral
//!   and denotes exactly the same number, so `5` and `5.0` never show up as
//!   a change;
//! - `NaN` equals `NaN`, so `diff(d, d)` stays empty for any document.
//!
//! Integers above `i64::MAX` are kept exactly as [`Value::UInteger`].
//! Mapping keys may be any YAML scalar; non-string keys are stored in their
//! display form (`1`, `true`, `2.5`, `null`).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    UInteger(u64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

// 2^63 and 2^64 are exact in f64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn int_float_eq(i: i64, f: f64) -> bool {
    f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) && f as i64 == i
}

fn uint_float_eq(u: u64, f: f64) -> bool {
    f.fract() == 0.0 && (0.0..U64_BOUND).contains(&f) && f as u64 == u
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::UInteger(a), Value::UInteger(b)) => a == b,
            (Value::Integer(i), Value::UInteger(u)) | (Value::UInteger(u), Value::Integer(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                int_float_eq(*i, *f)
            }
            (Value::UInteger(u), Value::Float(f)) | (Value::Float(f), Value::UInteger(u)) => {
                uint_float_eq(*u, *f)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Deserialize
// ---------------------------------------------------------------------------

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML or JSON value")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Integer(n))
    }

    fn visit_u64<E>(self, n: u64) -> Result<Value, E> {
        Ok(match i64::try_from(n) {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::UInteger(n),
        })
    }

    fn visit_f64<E>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Float(n))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_owned()))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((MapKey(key), value)) = map.next_entry()? {
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}

/// A scalar mapping key in display form.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_unit<E>(self) -> Result<MapKey, E> {
        Ok(MapKey("null".to_owned()))
    }

    fn visit_bool<E>(self, b: bool) -> Result<MapKey, E> {
        Ok(MapKey(b.to_string()))
    }

    fn visit_i64<E>(self, n: i64) -> Result<MapKey, E> {
        Ok(MapKey(n.to_string()))
    }

    fn visit_u64<E>(self, n: u64) -> Result<MapKey, E> {
        Ok(MapKey(n.to_string()))
    }

    fn visit_f64<E>(self, n: f64) -> Result<MapKey, E> {
        Ok(MapKey(n.to_string()))
    }

    fn visit_str<E>(self, s: &str) -> Result<MapKey, E> {
        Ok(MapKey(s.to_owned()))
    }

    fn visit_string<E>(self, s: String) -> Result<MapKey, E> {
        Ok(MapKey(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _: A) -> Result<MapKey, A::Error> {
        Err(de::Error::custom("mapping keys must be scalars, found a sequence"))
    }

    fn visit_map<A: MapAccess<'de>>(self, _: A) -> Result<MapKey, A::Error> {
        Err(de::Error::custom("mapping keys must be scalars, found a mapping"))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInteger(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_of_same_magnitude_are_equal() {
        assert_eq!(Value::Integer(5), Value::Float(5.0));
        assert_eq!(Value::Float(5.0), Value::Integer(5));
        assert_ne!(Value::Integer(5), Value::Float(5.5));
    }

    #[test]
    fn integer_float_comparison_is_exact() {
        let two_53 = 1_i64 << 53;
        assert_ne!(Value::Integer(two_53 + 1), Value::Float(two_53 as f64));
        assert_eq!(Value::Integer(two_53), Value::Float(two_53 as f64));
        assert_ne!(Value::Integer(i64::MAX), Value::Float(I64_BOUND));
        assert_ne!(Value::UInteger(u64::MAX), Value::Float(U64_BOUND));
        assert_ne!(Value::Integer(5), Value::Float(f64::NAN));
    }

    #[test]
    fn nan_equals_nan() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        let v: Value = serde_yaml::from_str("{x: .nan}").expect("yaml");
        assert_eq!(v, v.clone());
    }

    #[test]
    fn integers_beyond_i64_keep_full_precision() {
        let a: Value = serde_yaml::from_str("18446744073709551615").expect("yaml");
        let b: Value = serde_yaml::from_str("18446744073709551614").expect("yaml");
        assert!(matches!(a, Value::UInteger(u64::MAX)));
        assert_ne!(a, b);

        let small: Value = serde_json::from_str("7").expect("json");
        assert!(matches!(small, Value::Integer(7)));
        assert_eq!(Value::UInteger(7), small);
    }

    #[test]
    fn scalar_mapping_keys_are_stringified() {
        let v: Value = serde_yaml::from_str("{1: one, true: yes-ish, 2.5: x, plain: p}").expect("yaml");
        let Value::Mapping(map) = v else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2.5", "plain", "true"]);
    }

    #[test]
    fn collection_keys_are_rejected() {
        let err = serde_yaml::from_str::<Value>("{[a, b]: x}").expect_err("sequence key");
        assert!(err.to_string().contains("mapping keys must be scalars"), "{err}");
    }

    #[test]
    fn mixed_kinds_are_never_equal() {
        assert_ne!(Value::from("5"), Value::Integer(5));
        assert_ne!(Value::Bool(false), Value::Null);
        assert_ne!(Value::Sequence(vec![]), Value::Mapping(BTreeMap::new()));
    }

    #[test]
    fn json_and_yaml_decode_to_same_variants() {
        let from_json: Value =
            serde_json::from_str(r#"{"a": 1, "b": 2.5, "c": [true, null, "x"]}"#).expect("json");
        let from_yaml: Value = serde_yaml::from_str("a: 1\nb: 2.5\nc: [true, ~, x]\n").expect("yaml");
        assert_eq!(from_json, from_yaml);

        let Value::Mapping(map) = from_json else {
            panic!("expected mapping");
        };
        assert!(matches!(map["a"], Value::Integer(1)));
        assert!(matches!(map["b"], Value::Float(_)));
    }

    #[test]
    fn json_float_with_zero_fraction_stays_float() {
        let v: Value = serde_json::from_str("5.0").expect("json");
        assert!(matches!(v, Value::Float(_)));
        assert_eq!(v, Value::Integer(5));
    }
}
