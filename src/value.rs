//! Decoded values.
//!
//! [`Value`] is what the decoder writes into target slots. Its shape follows the
//! [`Target`](crate::Target) that produced it: a `Target::Int(U64)` slot holds
//! `Value::UInt`, a record target holds `Value::Record`, and a dynamic target
//! holds whatever the scalar resolved to.

use std::fmt;

use ahash::HashMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::resolve::{canonical_float, Resolved};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Only produced by unsigned integer targets.
    UInt(u64),
    Float(f64),
    String(String),
    /// Payload of a `!!binary` scalar.
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Map(Mapping),
    Record(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(i) => u64::try_from(*i).ok(),
            Value::UInt(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Bytes(_) => "binary",
            Value::Seq(_) => "seq",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
        }
    }

    /// Index into a mapping by string key, or into a record by field name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(&Value::String(key.to_owned())),
            Value::Record(r) => r.get(key),
            _ => None,
        }
    }
}

impl From<Resolved> for Value {
    fn from(r: Resolved) -> Self {
        match r {
            Resolved::Null => Value::Null,
            Resolved::Bool(b) => Value::Bool(b),
            Resolved::Int(i) => Value::Int(i),
            Resolved::Float(f) => Value::Float(f),
            Resolved::String(s) => Value::String(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
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

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Map(m)
    }
}

impl fmt::Display for Value {
    /// Flow-style rendering; scalars use their canonical YAML form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => f.write_str(&canonical_float(*x)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "!!binary <{} bytes>", b.len()),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Record(r) => {
                write!(f, "{} {{", r.name())?;
                for (i, (k, v)) in r.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Canonical fingerprint of a value for key lookup.
///
/// Signed and unsigned integers with the same numeric value share a fingerprint;
/// floats compare by bit pattern with `-0.0` folded into `0.0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum KeyFingerprint {
    Null,
    Bool(bool),
    Int(i128),
    Float(u64),
    String(String),
    Bytes(Vec<u8>),
    Seq(Vec<KeyFingerprint>),
    Map(Vec<(KeyFingerprint, KeyFingerprint)>),
    Record(String, Vec<(String, KeyFingerprint)>),
}

impl KeyFingerprint {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => KeyFingerprint::Null,
            Value::Bool(b) => KeyFingerprint::Bool(*b),
            Value::Int(i) => KeyFingerprint::Int(*i as i128),
            Value::UInt(u) => KeyFingerprint::Int(*u as i128),
            Value::Float(x) => {
                let x = if *x == 0.0 { 0.0 } else { *x };
                KeyFingerprint::Float(x.to_bits())
            }
            Value::String(s) => KeyFingerprint::String(s.clone()),
            Value::Bytes(b) => KeyFingerprint::Bytes(b.clone()),
            Value::Seq(items) => KeyFingerprint::Seq(items.iter().map(Self::of).collect()),
            Value::Map(m) => {
                KeyFingerprint::Map(m.iter().map(|(k, v)| (Self::of(k), Self::of(v))).collect())
            }
            Value::Record(r) => KeyFingerprint::Record(
                r.name().to_owned(),
                r.iter().map(|(k, v)| (k.to_owned(), Self::of(v))).collect(),
            ),
        }
    }
}

/// Insertion-ordered mapping with arbitrary [`Value`] keys.
///
/// Inserting an existing key replaces its value in place (last wins) and keeps
/// the original position.
#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
    index: HashMap<KeyFingerprint, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the previous value stored under an equal key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let fp = KeyFingerprint::of(&key);
        match self.index.get(&fp) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(fp, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(&KeyFingerprint::of(key))
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index
            .get(&KeyFingerprint::of(key))
            .map(|&pos| &self.entries[pos].1)
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        match self.index.get(&KeyFingerprint::of(key)) {
            Some(&pos) => Some(&mut self.entries[pos].1),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

impl PartialEq for Mapping {
    /// Order-insensitive: two mappings are equal when they hold equal pairs.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Mapping::new();
        for (k, v) in iter {
            m.insert(k.into(), v.into());
        }
        m
    }
}

/// Instance of a [`RecordType`](crate::RecordType): named fields in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Name of the record type this instance belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == field)
            .map(|(_, v)| v)
    }

    /// Overwrite a declared field. Returns `false` if the record has no such field.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> bool {
        match self.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub(crate) fn field_at_mut(&mut self, idx: usize) -> Option<&mut Value> {
        self.fields.get_mut(idx).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn into_fields(self) -> Vec<(String, Value)> {
        self.fields
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Record(r) => {
                let mut map = serializer.serialize_map(Some(r.fields.len()))?;
                for (k, v) in r.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_last_wins_and_keeps_position() {
        let mut m = Mapping::new();
        assert!(m.insert("a".into(), 1i64.into()).is_none());
        m.insert("b".into(), 2i64.into());
        assert_eq!(m.insert("a".into(), 3i64.into()), Some(Value::Int(1)));
        let keys: Vec<_> = m.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
        assert_eq!(m.get(&"a".into()), Some(&Value::Int(3)));
    }

    #[test]
    fn null_and_numeric_keys() {
        let mut m = Mapping::new();
        m.insert(Value::Null, "null key".into());
        m.insert(Value::Int(1), "one".into());
        assert_eq!(m.get(&Value::Null), Some(&Value::from("null key")));
        assert_eq!(m.get(&Value::UInt(1)), Some(&Value::from("one")));
        assert!(!m.contains_key(&Value::from("1")));
    }

    #[test]
    fn mapping_equality_ignores_order() {
        let a: Mapping = [("x", 1i64), ("y", 2)].into_iter().collect();
        let b: Mapping = [("y", 2i64), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn record_field_access() {
        let mut r = Record::new("Point", vec![("x".into(), Value::Int(0))]);
        assert!(r.set("x", 5i64));
        assert!(!r.set("z", 1i64));
        assert_eq!(r.get("x"), Some(&Value::Int(5)));
        assert_eq!(Value::Record(r).to_string(), "Point {x: 5}");
    }
}
