//! Type-directed decoder: walks a [`Node`] tree and populates a slot described by a [`Target`].
//!
//! Dispatch is on the target shape:
//! - Hooked record types receive the node decoded generically, with its effective tag.
//! - Nullable slots are cleared on null and allocated lazily otherwise.
//! - Dynamic slots keep whatever the node resolves to.
//! - Scalar targets check the resolved kind and narrow numbers with overflow detection.
//! - Sequences drop elements that do not narrow to the element type.
//! - Maps and records require a mapping node; records ignore unknown keys.
//!
//! Null into any other static target resets the slot to the target's zero value.

use std::borrow::Cow;
use std::sync::Arc;

use base64::Engine as _;
use log::{debug, trace};
use num_traits::ToPrimitive;
use smallvec::SmallVec;

use crate::error::Error;
use crate::hook::DecodeHook;
use crate::location::Location;
use crate::node::{Node, ScalarStyle};
use crate::options::{DuplicateKeyPolicy, Options};
use crate::parse_scalars::{
    is_yaml11_null, parse_yaml11_bool, parse_yaml11_float, parse_yaml11_int, IntError,
};
use crate::resolve::{implicit_kind, resolve_tagged, resolve_untagged, ScalarKind};
use crate::tags::{CoreTag, TAG_MAP, TAG_SEQ};
use crate::target::{FloatKind, IntKind, RecordType, Target};
use crate::value::{Mapping, Value};

/// Whether a slot received a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Set,
    /// A hook rejected the value: the slot is to be treated as absent.
    Omitted,
}

enum PathSegment {
    Key(String),
    Index(usize),
}

/// Scalar text as a scalar target sees it, after tag validation.
struct ScalarInput<'n> {
    text: Cow<'n, str>,
    /// Kind forced by an explicit tag or a non-plain style. `None` means "infer".
    forced: Option<ScalarKind>,
}

impl ScalarInput<'_> {
    /// Tag reported in kind mismatches.
    fn found(&self) -> &'static str {
        self.forced
            .unwrap_or_else(|| implicit_kind(&self.text, ScalarStyle::Plain))
            .tag()
    }
}

pub(crate) struct Decoder<'o> {
    options: &'o Options,
    depth: usize,
    path: SmallVec<[PathSegment; 16]>,
}

impl<'o> Decoder<'o> {
    pub(crate) fn new(options: &'o Options) -> Self {
        Self {
            options,
            depth: 0,
            path: SmallVec::new(),
        }
    }

    /// Decode `node` into `slot`, which must hold a value of `target`'s shape (or its zero value).
    pub(crate) fn decode(
        &mut self,
        node: &Node,
        target: &Target,
        slot: &mut Value,
    ) -> Result<Outcome, Error> {
        trace!(
            "decoding {} into {} at `{}`",
            node.shape(),
            target.name(),
            self.path_string()
        );

        if let Some(hook) = target.hook() {
            return self.decode_hooked(node, target, hook, slot);
        }

        match target {
            Target::Nullable(inner) => self.decode_nullable(node, inner, slot),
            Target::Dynamic => {
                *slot = self.generic(node)?;
                Ok(Outcome::Set)
            }
            _ if is_null(node) => {
                *slot = target.zero_value();
                Ok(Outcome::Set)
            }
            Target::Bool => {
                *slot = self.decode_bool(node, target)?;
                Ok(Outcome::Set)
            }
            Target::Int(kind) => {
                *slot = self.decode_int(node, target, *kind)?;
                Ok(Outcome::Set)
            }
            Target::Float(kind) => {
                *slot = self.decode_float(node, target, *kind)?;
                Ok(Outcome::Set)
            }
            Target::Str => {
                let input = self.scalar_input(node, target)?;
                *slot = Value::String(input.text.into_owned());
                Ok(Outcome::Set)
            }
            Target::Seq(elem) => self.decode_seq(node, elem, slot),
            Target::Map(key, value) => self.decode_map(node, key, value, slot),
            Target::Record(rt) => self.decode_record(node, rt, slot),
        }
    }

    fn decode_hooked(
        &mut self,
        node: &Node,
        target: &Target,
        hook: &Arc<dyn DecodeHook>,
        slot: &mut Value,
    ) -> Result<Outcome, Error> {
        let tag = effective_tag(node);
        let value = self.generic(node)?;
        let mut working = match (&*slot, target) {
            (Value::Record(current), Target::Record(rt)) if current.name() == rt.name() => {
                slot.clone()
            }
            _ => target.zero_value(),
        };
        if hook.accepts_decoded(&mut working, &tag, value) {
            *slot = working;
            Ok(Outcome::Set)
        } else {
            debug!(
                "{} hook rejected {tag} value at `{}`",
                target.name(),
                self.path_string()
            );
            Ok(Outcome::Omitted)
        }
    }

    fn decode_nullable(
        &mut self,
        node: &Node,
        inner: &Target,
        slot: &mut Value,
    ) -> Result<Outcome, Error> {
        if inner.hook().is_none() && is_null(node) {
            *slot = Value::Null;
            return Ok(Outcome::Set);
        }
        let mut value = match &*slot {
            Value::Null => inner.zero_value(),
            current => current.clone(),
        };
        match self.decode(node, inner, &mut value) {
            Ok(Outcome::Set) => {
                *slot = value;
                Ok(Outcome::Set)
            }
            Ok(Outcome::Omitted) => Ok(Outcome::Omitted),
            Err(err) => {
                *slot = value;
                Err(err)
            }
        }
    }

    fn decode_bool(&self, node: &Node, target: &Target) -> Result<Value, Error> {
        let input = self.scalar_input(node, target)?;
        match (input.forced, parse_yaml11_bool(&input.text)) {
            (None | Some(ScalarKind::Bool), Some(b)) => Ok(Value::Bool(b)),
            _ => Err(self.kind_mismatch(node, &input, target)),
        }
    }

    fn decode_int(&self, node: &Node, target: &Target, kind: IntKind) -> Result<Value, Error> {
        let input = self.scalar_input(node, target)?;
        if matches!(input.forced, None | Some(ScalarKind::Int)) {
            match parse_yaml11_int(&input.text) {
                Ok(v) => {
                    return narrow_int(v, kind)
                        .ok_or_else(|| self.overflow(node, &input.text, target));
                }
                Err(IntError::TooLarge) => return Err(self.overflow(node, &input.text, target)),
                Err(IntError::Syntax) => {}
            }
        }
        Err(self.kind_mismatch(node, &input, target))
    }

    fn decode_float(&self, node: &Node, target: &Target, kind: FloatKind) -> Result<Value, Error> {
        let input = self.scalar_input(node, target)?;
        let as_int = || parse_yaml11_int(&input.text).ok().map(|v| v as f64);
        let parsed = match input.forced {
            None | Some(ScalarKind::Float) => as_int().or_else(|| parse_yaml11_float(&input.text)),
            Some(ScalarKind::Int) => as_int(),
            Some(_) => None,
        };
        let Some(f) = parsed else {
            return Err(self.kind_mismatch(node, &input, target));
        };
        match kind {
            FloatKind::F64 => Ok(Value::Float(f)),
            FloatKind::F32 if f.is_finite() && f.abs() > f64::from(f32::MAX) => {
                Err(self.overflow(node, &input.text, target))
            }
            FloatKind::F32 => Ok(Value::Float(f64::from(f as f32))),
        }
    }

    /// Validate a scalar node for a scalar target and work out which kind it is forced to.
    fn scalar_input<'n>(&self, node: &'n Node, target: &Target) -> Result<ScalarInput<'n>, Error> {
        let Node::Scalar {
            text, style, tag, ..
        } = node
        else {
            return Err(self.shape_mismatch(node, target));
        };
        let Some(tag) = tag.as_deref() else {
            let forced = (!style.is_plain()).then_some(ScalarKind::Str);
            return Ok(ScalarInput {
                text: Cow::Borrowed(text.as_str()),
                forced,
            });
        };

        let core = CoreTag::classify(tag);
        let forced = match core {
            CoreTag::Null => ScalarKind::Null,
            CoreTag::Bool => ScalarKind::Bool,
            CoreTag::Int => ScalarKind::Int,
            CoreTag::Float => ScalarKind::Float,
            CoreTag::Str => ScalarKind::Str,
            CoreTag::Binary => return self.binary_input(node, text, target),
            CoreTag::Custom(tag) => {
                return Err(Error::UnknownTag {
                    tag: tag.to_owned(),
                    target: target.name(),
                    path: self.path_string(),
                    location: node.location(),
                });
            }
            CoreTag::Seq | CoreTag::Map => {
                return Err(self.tag_rejected(node, core, text, target.name()));
            }
        };

        let accepted = match forced {
            ScalarKind::Int => !matches!(parse_yaml11_int(text), Err(IntError::Syntax)),
            _ => resolve_tagged(text, core).is_some(),
        };
        if !accepted {
            return Err(self.tag_rejected(node, core, text, target.name()));
        }
        Ok(ScalarInput {
            text: Cow::Borrowed(text.as_str()),
            forced: Some(forced),
        })
    }

    /// `!!binary` reaches scalar targets only as text.
    fn binary_input<'n>(
        &self,
        node: &Node,
        text: &str,
        target: &Target,
    ) -> Result<ScalarInput<'n>, Error> {
        if !matches!(target, Target::Str) {
            return Err(Error::KindMismatch {
                found: CoreTag::Binary.as_str().to_owned(),
                text: text.to_owned(),
                expected: target.name(),
                path: self.path_string(),
                location: node.location(),
            });
        }
        let bytes = self.binary(node, text)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::InvalidBinary {
            msg: "!!binary payload is not valid UTF-8 text".to_owned(),
            path: self.path_string(),
            location: node.location(),
        })?;
        Ok(ScalarInput {
            text: Cow::Owned(text),
            forced: Some(ScalarKind::Str),
        })
    }

    fn binary(&self, node: &Node, text: &str) -> Result<Vec<u8>, Error> {
        let cleaned: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .map_err(|err| Error::InvalidBinary {
                msg: format!("invalid !!binary base64: {err}"),
                path: self.path_string(),
                location: node.location(),
            })
    }

    fn decode_seq(&mut self, node: &Node, elem: &Target, slot: &mut Value) -> Result<Outcome, Error> {
        let Node::Sequence {
            items, location, ..
        } = node
        else {
            return Err(self.shape_mismatch(node, &Target::Seq(Box::new(elem.clone()))));
        };

        let mut out = Vec::with_capacity(items.len());
        self.nested(*location, |d| {
            for (idx, item) in items.iter().enumerate() {
                let mut value = elem.zero_value();
                let outcome = d.child(PathSegment::Index(idx), |d| {
                    match d.decode(item, elem, &mut value) {
                        // Only the element itself may be dropped; errors below it are fatal.
                        Err(err)
                            if err.is_narrowing()
                                && err.path() == Some(d.path_string().as_str()) =>
                        {
                            debug!("dropping sequence element: {err}");
                            Ok(Outcome::Omitted)
                        }
                        other => other,
                    }
                })?;
                if outcome == Outcome::Set {
                    out.push(value);
                }
            }
            Ok(())
        })?;
        *slot = Value::Seq(out);
        Ok(Outcome::Set)
    }

    fn decode_map(
        &mut self,
        node: &Node,
        key_target: &Target,
        value_target: &Target,
        slot: &mut Value,
    ) -> Result<Outcome, Error> {
        let Node::Mapping {
            entries, location, ..
        } = node
        else {
            let target = Target::Map(
                Box::new(key_target.clone()),
                Box::new(value_target.clone()),
            );
            return Err(self.shape_mismatch(node, &target));
        };

        let mut map = match std::mem::take(slot) {
            Value::Map(existing) => existing,
            _ => Mapping::new(),
        };
        let result = self.nested(*location, |d| {
            let mut seen = Mapping::new();
            for (k, v) in entries {
                d.child(key_segment(k), |d| {
                    let mut key = key_target.zero_value();
                    if d.decode(k, key_target, &mut key)? == Outcome::Omitted {
                        return Ok(());
                    }
                    let mut value = value_target.zero_value();
                    if d.decode(v, value_target, &mut value)? == Outcome::Omitted {
                        return Ok(());
                    }
                    if d.admit(&mut seen, &key, k)? {
                        map.insert(key, value);
                    }
                    Ok(())
                })?;
            }
            Ok(())
        });
        *slot = Value::Map(map);
        result.map(|()| Outcome::Set)
    }

    fn decode_record(
        &mut self,
        node: &Node,
        rt: &Arc<RecordType>,
        slot: &mut Value,
    ) -> Result<Outcome, Error> {
        let Node::Mapping {
            entries, location, ..
        } = node
        else {
            return Err(self.shape_mismatch(node, &Target::Record(Arc::clone(rt))));
        };

        let mut record = match std::mem::take(slot) {
            Value::Record(existing) if existing.name() == rt.name() => existing,
            _ => rt.zero_record(),
        };
        let result = self.nested(*location, |d| {
            for (k, v) in entries {
                let Some(name) = k.as_scalar_text() else {
                    trace!("skipping non-scalar key in {}", rt.name());
                    continue;
                };
                let Some((idx, field)) = rt.lookup(name) else {
                    trace!("ignoring unknown key `{name}` in {}", rt.name());
                    continue;
                };
                let Some(field_slot) = record.field_at_mut(idx) else {
                    continue;
                };
                d.child(PathSegment::Key(name.to_owned()), |d| {
                    d.decode(v, field.target(), field_slot)
                })?;
            }
            Ok(())
        });
        *slot = Value::Record(record);
        result.map(|()| Outcome::Set)
    }

    /// Decode without a static shape: scalars resolve, collections become `Seq`/`Map`.
    fn generic(&mut self, node: &Node) -> Result<Value, Error> {
        match node {
            Node::Scalar {
                text, style, tag, ..
            } => self.generic_scalar(node, text, *style, tag.as_deref()),
            Node::Sequence {
                items, location, ..
            } => self.nested(*location, |d| {
                let mut out = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    out.push(d.child(PathSegment::Index(idx), |d| d.generic(item))?);
                }
                Ok(Value::Seq(out))
            }),
            Node::Mapping {
                entries, location, ..
            } => self.nested(*location, |d| {
                let mut map = Mapping::new();
                let mut seen = Mapping::new();
                for (k, v) in entries {
                    d.child(key_segment(k), |d| {
                        let key = d.generic(k)?;
                        let value = d.generic(v)?;
                        if d.admit(&mut seen, &key, k)? {
                            map.insert(key, value);
                        }
                        Ok(())
                    })?;
                }
                Ok(Value::Map(map))
            }),
        }
    }

    fn generic_scalar(
        &self,
        node: &Node,
        text: &str,
        style: ScalarStyle,
        tag: Option<&str>,
    ) -> Result<Value, Error> {
        let Some(tag) = tag else {
            return Ok(resolve_untagged(text, style).into());
        };
        match CoreTag::classify(tag) {
            CoreTag::Binary => Ok(Value::Bytes(self.binary(node, text)?)),
            CoreTag::Custom(_) => Ok(Value::String(text.to_owned())),
            CoreTag::Int => match parse_yaml11_int(text) {
                Ok(v) => i64::try_from(v)
                    .map(Value::Int)
                    .or_else(|_| u64::try_from(v).map(Value::UInt))
                    .map_err(|_| self.overflow(node, text, &Target::Dynamic)),
                Err(IntError::TooLarge) => Err(self.overflow(node, text, &Target::Dynamic)),
                Err(IntError::Syntax) => {
                    Err(self.tag_rejected(node, CoreTag::Int, text, CoreTag::Int.as_str().to_owned()))
                }
            },
            core => resolve_tagged(text, core)
                .map(Value::from)
                .ok_or_else(|| self.tag_rejected(node, core, text, core.as_str().to_owned())),
        }
    }

    /// Apply the duplicate-key policy. Returns whether the entry is to be inserted.
    fn admit(&self, seen: &mut Mapping, key: &Value, key_node: &Node) -> Result<bool, Error> {
        let policy = self.options.duplicate_keys;
        if policy == DuplicateKeyPolicy::LastWins || seen.insert(key.clone(), Value::Null).is_none() {
            return Ok(true);
        }
        if policy == DuplicateKeyPolicy::FirstWins {
            trace!("skipping duplicate key {key}");
            return Ok(false);
        }
        Err(Error::DuplicateKey {
            key: key_node
                .as_scalar_text()
                .map_or_else(|| key.to_string(), str::to_owned),
            path: self.path_string(),
            location: key_node.location(),
        })
    }

    fn nested<R>(
        &mut self,
        location: Location,
        f: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimit {
                max_depth: self.options.max_depth,
                path: self.path_string(),
                location,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn child<R>(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(idx) => out.push_str(&format!("[{idx}]")),
            }
        }
        out
    }

    fn shape_mismatch(&self, node: &Node, target: &Target) -> Error {
        Error::ShapeMismatch {
            found: node.shape(),
            expected: target.name(),
            path: self.path_string(),
            location: node.location(),
        }
    }

    fn kind_mismatch(&self, node: &Node, input: &ScalarInput<'_>, target: &Target) -> Error {
        Error::KindMismatch {
            found: input.found().to_owned(),
            text: input.text.clone().into_owned(),
            expected: target.name(),
            path: self.path_string(),
            location: node.location(),
        }
    }

    fn overflow(&self, node: &Node, text: &str, target: &Target) -> Error {
        Error::Overflow {
            value: text.to_owned(),
            target: target.name(),
            path: self.path_string(),
            location: node.location(),
        }
    }

    fn tag_rejected(&self, node: &Node, tag: CoreTag<'_>, text: &str, target: String) -> Error {
        Error::ExplicitTagRejected {
            tag: tag.as_str().to_owned(),
            text: text.to_owned(),
            target,
            path: self.path_string(),
            location: node.location(),
        }
    }
}

/// Null by explicit `!!null` tag or by the plain-scalar null vocabulary.
fn is_null(node: &Node) -> bool {
    match node {
        Node::Scalar {
            text,
            style,
            tag: None,
            ..
        } => style.is_plain() && is_yaml11_null(text),
        Node::Scalar {
            text,
            tag: Some(tag),
            ..
        } => CoreTag::classify(tag) == CoreTag::Null && is_yaml11_null(text),
        _ => false,
    }
}

/// Tag handed to hooks: the explicit one, or the one the node implicitly carries.
fn effective_tag(node: &Node) -> String {
    match node {
        Node::Scalar { tag: Some(tag), .. } => CoreTag::classify(tag).as_str().to_owned(),
        Node::Scalar { text, style, .. } => implicit_kind(text, *style).tag().to_owned(),
        Node::Sequence { tag, .. } => tag.clone().unwrap_or_else(|| TAG_SEQ.to_owned()),
        Node::Mapping { tag, .. } => tag.clone().unwrap_or_else(|| TAG_MAP.to_owned()),
    }
}

fn key_segment(key: &Node) -> PathSegment {
    PathSegment::Key(key.as_scalar_text().unwrap_or("<key>").to_owned())
}

fn narrow_int(v: i128, kind: IntKind) -> Option<Value> {
    match (kind.bits(), kind.is_signed()) {
        (8, true) => v.to_i8().map(|x| Value::Int(x.into())),
        (16, true) => v.to_i16().map(|x| Value::Int(x.into())),
        (32, true) => v.to_i32().map(|x| Value::Int(x.into())),
        (_, true) => v.to_i64().map(Value::Int),
        (8, false) => v.to_u8().map(|x| Value::UInt(x.into())),
        (16, false) => v.to_u16().map(|x| Value::UInt(x.into())),
        (32, false) => v.to_u32().map(|x| Value::UInt(x.into())),
        (_, false) => v.to_u64().map(Value::UInt),
    }
}

/// Decode a node tree into a fresh value of `target`'s shape.
///
/// ```rust
/// use saphyr_decode::{decode, Node, Target, Value};
///
/// let node = Node::mapping(vec![(Node::scalar("seq"), Node::sequence(vec![
///     Node::scalar("A"), Node::scalar("1"), Node::scalar("C"),
/// ]))]);
/// let ints = decode(&node, &Target::map(Target::Str, Target::seq(Target::I64))).unwrap();
/// assert_eq!(ints.get("seq"), Some(&Value::Seq(vec![Value::Int(1)])));
/// ```
pub fn decode(node: &Node, target: &Target) -> Result<Value, Error> {
    decode_with_options(node, target, &Options::default())
}

pub fn decode_with_options(node: &Node, target: &Target, options: &Options) -> Result<Value, Error> {
    let mut value = target.zero_value();
    decode_into_with_options(node, target, &mut value, options)?;
    Ok(value)
}

/// Decode into an existing value. Record fields and map entries the document does not
/// mention keep what `slot` already holds.
pub fn decode_into(node: &Node, target: &Target, slot: &mut Value) -> Result<(), Error> {
    decode_into_with_options(node, target, slot, &Options::default())
}

pub fn decode_into_with_options(
    node: &Node,
    target: &Target,
    slot: &mut Value,
    options: &Options,
) -> Result<(), Error> {
    let mut decoder = Decoder::new(options);
    if decoder.decode(node, target, slot)? == Outcome::Omitted {
        debug!("top-level value omitted by hook");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(entries: &[(&str, Node)]) -> Node {
        Node::mapping(
            entries
                .iter()
                .map(|(k, v)| (Node::scalar(*k), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn string_target_keeps_text_dynamic_keeps_kind() {
        let node = map_of(&[("hello", Node::scalar("true"))]);
        let as_str = decode(&node, &Target::map(Target::Str, Target::Str)).unwrap();
        assert_eq!(as_str.get("hello"), Some(&Value::from("true")));
        let dynamic = decode(&node, &Target::map(Target::Str, Target::Dynamic)).unwrap();
        assert_eq!(dynamic.get("hello"), Some(&Value::Bool(true)));
    }

    #[test]
    fn overflow_reports_path() {
        let node = map_of(&[("v", Node::scalar("128"))]);
        let err = decode(&node, &Target::map(Target::Str, Target::I8)).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
        assert_eq!(err.path(), Some("v"));
    }

    #[test]
    fn sequence_path_uses_index() {
        let node = map_of(&[(
            "items",
            Node::sequence(vec![Node::scalar("1"), Node::scalar("x").with_tag("!!int")]),
        )]);
        let err = decode(&node, &Target::map(Target::Str, Target::seq(Target::I64))).unwrap_err();
        assert!(matches!(err, Error::ExplicitTagRejected { .. }));
        assert_eq!(err.path(), Some("items[1]"));
    }

    #[test]
    fn depth_is_bounded() {
        let mut node = Node::scalar("leaf");
        for _ in 0..10 {
            node = Node::sequence(vec![node]);
        }
        let options = Options {
            max_depth: 4,
            ..Options::default()
        };
        let err = decode_with_options(&node, &Target::Dynamic, &options).unwrap_err();
        assert!(matches!(err, Error::DepthLimit { max_depth: 4, .. }));
    }

    #[test]
    fn f32_overflow() {
        let node = Node::scalar("1e39");
        assert!(matches!(
            decode(&node, &Target::F32),
            Err(Error::Overflow { .. })
        ));
        assert_eq!(decode(&node, &Target::F64).unwrap(), Value::Float(1e39));
    }

    #[test]
    fn nullable_slot_is_reused_then_cleared() {
        let target = Target::nullable(Target::U8);
        let mut slot = Value::UInt(7);
        decode_into(&Node::scalar("9"), &target, &mut slot).unwrap();
        assert_eq!(slot, Value::UInt(9));
        assert!(decode_into(&Node::scalar("300"), &target, &mut slot).is_err());
        decode_into(&Node::scalar("~"), &target, &mut slot).unwrap();
        assert_eq!(slot, Value::Null);
    }

    #[test]
    fn every_int_kind_has_its_own_range() {
        let cases = [
            (IntKind::I8, "-128", "128"),
            (IntKind::I16, "-32768", "32768"),
            (IntKind::I32, "-2147483648", "2147483648"),
            (IntKind::I64, "-9223372036854775808", "9223372036854775808"),
            (IntKind::U8, "255", "256"),
            (IntKind::U16, "65535", "65536"),
            (IntKind::U32, "4294967295", "4294967296"),
            (IntKind::U64, "18446744073709551615", "18446744073709551616"),
        ];
        for (kind, fits, overflows) in cases {
            let target = Target::Int(kind);
            assert!(decode(&Node::scalar(fits), &target).is_ok(), "{} {fits}", kind.name());
            assert!(
                matches!(decode(&Node::scalar(overflows), &target), Err(Error::Overflow { .. })),
                "{} {overflows}",
                kind.name()
            );
        }
    }

    #[test]
    fn u64_full_range() {
        let node = Node::scalar("18446744073709551615");
        assert_eq!(decode(&node, &Target::U64).unwrap(), Value::UInt(u64::MAX));
        assert!(matches!(
            decode(&node, &Target::I64),
            Err(Error::Overflow { .. })
        ));
    }
}
