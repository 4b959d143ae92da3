//! Target descriptors: the shapes the decoder knows how to populate.
//!
//! A [`Target`] is a closed description of a destination type. Record types are
//! built once through [`RecordBuilder`], which precomputes the lookup tables used
//! to match mapping keys to fields, and are then shared behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use ahash::{HashMap, HashMapExt};

use crate::hook::DecodeHook;
use crate::value::{Mapping, Record, Value};

/// Width and signedness of an integer slot. Only the associated constants exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntKind {
    bits: u8,
    signed: bool,
}

impl IntKind {
    pub const I8: Self = Self::new(8, true);
    pub const I16: Self = Self::new(16, true);
    pub const I32: Self = Self::new(32, true);
    pub const I64: Self = Self::new(64, true);
    pub const U8: Self = Self::new(8, false);
    pub const U16: Self = Self::new(16, false);
    pub const U32: Self = Self::new(32, false);
    pub const U64: Self = Self::new(64, false);

    const fn new(bits: u8, signed: bool) -> Self {
        Self { bits, signed }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn name(&self) -> &'static str {
        match (self.bits, self.signed) {
            (8, true) => "i8",
            (16, true) => "i16",
            (32, true) => "i32",
            (_, true) => "i64",
            (8, false) => "u8",
            (16, false) => "u16",
            (32, false) => "u32",
            (_, false) => "u64",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatKind {
    F32,
    F64,
}

impl FloatKind {
    pub fn name(&self) -> &'static str {
        match self {
            FloatKind::F32 => "f32",
            FloatKind::F64 => "f64",
        }
    }
}

/// Description of a slot to decode into.
#[derive(Clone, Debug)]
pub enum Target {
    /// No static shape: keep whatever the node resolves to.
    Dynamic,
    Bool,
    Int(IntKind),
    Float(FloatKind),
    Str,
    /// Optional slot: empty on null, allocated lazily otherwise.
    Nullable(Box<Target>),
    Seq(Box<Target>),
    Map(Box<Target>, Box<Target>),
    Record(Arc<RecordType>),
}

impl Target {
    pub const I8: Target = Target::Int(IntKind::I8);
    pub const I16: Target = Target::Int(IntKind::I16);
    pub const I32: Target = Target::Int(IntKind::I32);
    pub const I64: Target = Target::Int(IntKind::I64);
    pub const U8: Target = Target::Int(IntKind::U8);
    pub const U16: Target = Target::Int(IntKind::U16);
    pub const U32: Target = Target::Int(IntKind::U32);
    pub const U64: Target = Target::Int(IntKind::U64);
    pub const F32: Target = Target::Float(FloatKind::F32);
    pub const F64: Target = Target::Float(FloatKind::F64);

    pub fn nullable(inner: Target) -> Self {
        Target::Nullable(Box::new(inner))
    }

    pub fn seq(elem: Target) -> Self {
        Target::Seq(Box::new(elem))
    }

    pub fn map(key: Target, value: Target) -> Self {
        Target::Map(Box::new(key), Box::new(value))
    }

    pub fn record(rt: Arc<RecordType>) -> Self {
        Target::Record(rt)
    }

    /// Human-readable name used in error messages.
    pub fn name(&self) -> String {
        match self {
            Target::Dynamic => "dynamic value".to_owned(),
            Target::Bool => "bool".to_owned(),
            Target::Int(k) => k.name().to_owned(),
            Target::Float(k) => k.name().to_owned(),
            Target::Str => "string".to_owned(),
            Target::Nullable(inner) => format!("optional {}", inner.name()),
            Target::Seq(elem) => format!("sequence of {}", elem.name()),
            Target::Map(k, v) => format!("mapping of {} to {}", k.name(), v.name()),
            Target::Record(rt) => rt.name().to_owned(),
        }
    }

    /// Hook declared by this target, if it is a hooked record type.
    pub fn hook(&self) -> Option<&Arc<dyn DecodeHook>> {
        match self {
            Target::Record(rt) => rt.hook.as_ref(),
            _ => None,
        }
    }

    /// The value an untouched slot of this shape holds.
    pub fn zero_value(&self) -> Value {
        match self {
            Target::Dynamic | Target::Nullable(_) => Value::Null,
            Target::Bool => Value::Bool(false),
            Target::Int(k) if k.signed => Value::Int(0),
            Target::Int(_) => Value::UInt(0),
            Target::Float(_) => Value::Float(0.0),
            Target::Str => Value::String(String::new()),
            Target::Seq(_) => Value::Seq(Vec::new()),
            Target::Map(_, _) => Value::Map(Mapping::new()),
            Target::Record(rt) => Value::Record(rt.zero_record()),
        }
    }
}

/// One declared field of a record type.
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    external: String,
    target: Target,
}

impl Field {
    /// Field name inside the decoded [`Record`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key the field is matched against in the document.
    pub fn external_name(&self) -> &str {
        &self.external
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// A record (struct-like) target: named fields plus an optional [`DecodeHook`].
pub struct RecordType {
    name: String,
    fields: Vec<Field>,
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
    hook: Option<Arc<dyn DecodeHook>>,
}

impl RecordType {
    pub fn builder(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            name: name.into(),
            fields: Vec::new(),
            hook: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Find the field a document key refers to.
    ///
    /// Exact external-name matches are tried first, then a case-insensitive match.
    /// When several fields share a name the first declared one wins.
    pub fn lookup(&self, key: &str) -> Option<(usize, &Field)> {
        let idx = match self.exact.get(key) {
            Some(&idx) => idx,
            None => *self.folded.get(&key.to_lowercase())?,
        };
        Some((idx, &self.fields[idx]))
    }

    /// Fresh instance with every field at its zero value.
    pub fn zero_record(&self) -> Record {
        Record::new(
            self.name.clone(),
            self.fields
                .iter()
                .map(|f| (f.name.clone(), f.target.zero_value()))
                .collect(),
        )
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Builder for [`RecordType`].
///
/// ```rust
/// use saphyr_decode::{RecordType, Target};
///
/// let point = RecordType::builder("Point")
///     .field("x", Target::I32)
///     .field("y", Target::I32)
///     .renamed("label", "name", Target::Str)
///     .build();
/// assert_eq!(point.lookup("X").map(|(_, f)| f.name()), Some("x"));
/// assert_eq!(point.lookup("name").map(|(_, f)| f.name()), Some("label"));
/// ```
#[must_use]
pub struct RecordBuilder {
    name: String,
    fields: Vec<Field>,
    hook: Option<Arc<dyn DecodeHook>>,
}

impl RecordBuilder {
    /// Declare a field matched by its own name.
    pub fn field(self, name: impl Into<String>, target: Target) -> Self {
        let name = name.into();
        let external = name.clone();
        self.push(name, external, target)
    }

    /// Declare a field matched by an explicit external name.
    pub fn renamed(self, name: impl Into<String>, external: impl Into<String>, target: Target) -> Self {
        self.push(name.into(), external.into(), target)
    }

    fn push(mut self, name: String, external: String, target: Target) -> Self {
        self.fields.push(Field {
            name,
            external,
            target,
        });
        self
    }

    /// Attach a custom decoder hook. Field matching is bypassed for this type.
    pub fn hook<H: DecodeHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Arc<RecordType> {
        let mut exact = HashMap::with_capacity(self.fields.len());
        let mut folded = HashMap::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            exact.entry(field.external.clone()).or_insert(idx);
            folded.entry(field.external.to_lowercase()).or_insert(idx);
        }
        Arc::new(RecordType {
            name: self.name,
            fields: self.fields,
            exact,
            folded,
            hook: self.hook,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_declared_field_wins_on_name_clash() {
        let rt = RecordType::builder("Clash")
            .field("Value", Target::I32)
            .field("value", Target::Str)
            .renamed("other", "VALUE", Target::Bool)
            .build();
        assert_eq!(rt.lookup("Value").map(|(i, _)| i), Some(0));
        assert_eq!(rt.lookup("value").map(|(i, _)| i), Some(1));
        assert_eq!(rt.lookup("VALUE").map(|(i, _)| i), Some(2));
        assert_eq!(rt.lookup("vAlUe").map(|(i, _)| i), Some(0));
        assert!(rt.lookup("missing").is_none());
    }

    #[test]
    fn zero_values_follow_shape() {
        let rt = RecordType::builder("Z")
            .field("n", Target::U8)
            .field("s", Target::Str)
            .field("o", Target::nullable(Target::Bool))
            .build();
        let zero = Target::record(rt).zero_value();
        let rec = zero.as_record().expect("record");
        assert_eq!(rec.get("n"), Some(&Value::UInt(0)));
        assert_eq!(rec.get("s"), Some(&Value::String(String::new())));
        assert_eq!(rec.get("o"), Some(&Value::Null));
    }

    #[test]
    fn target_names() {
        assert_eq!(Target::map(Target::Str, Target::seq(Target::I64)).name(), "mapping of string to sequence of i64");
        assert_eq!(Target::nullable(Target::F32).name(), "optional f32");
    }
}
