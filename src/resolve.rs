//! Scalar resolution: text (plus optional tag) to a typed [`Resolved`] value.
//!
//! Untagged plain scalars go through the YAML 1.1 core schema in a fixed order:
//! null, bool, int, float, and finally string. Quoted and block scalars are
//! always strings. An explicit tag skips inference and forces its own grammar.

use std::fmt;

use crate::node::ScalarStyle;
use crate::parse_scalars::{
    is_yaml11_null, parse_yaml11_bool, parse_yaml11_float, parse_yaml11_int, IntError,
};
use crate::tags::{CoreTag, TAG_BOOL, TAG_FLOAT, TAG_INT, TAG_NULL, TAG_STR};

/// Canonical result of resolving a scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Kind of a resolved scalar, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

impl ScalarKind {
    /// The `!!tag` a value of this kind implicitly carries.
    pub fn tag(self) -> &'static str {
        match self {
            ScalarKind::Null => TAG_NULL,
            ScalarKind::Bool => TAG_BOOL,
            ScalarKind::Int => TAG_INT,
            ScalarKind::Float => TAG_FLOAT,
            ScalarKind::Str => TAG_STR,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Resolved {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Resolved::Null => ScalarKind::Null,
            Resolved::Bool(_) => ScalarKind::Bool,
            Resolved::Int(_) => ScalarKind::Int,
            Resolved::Float(_) => ScalarKind::Float,
            Resolved::String(_) => ScalarKind::Str,
        }
    }

    /// Render the value the way YAML writes it canonically.
    ///
    /// Re-resolving the rendering of a null, bool, int or float yields the same kind.
    pub fn canonical(&self) -> String {
        match self {
            Resolved::Null => "null".to_owned(),
            Resolved::Bool(b) => b.to_string(),
            Resolved::Int(i) => i.to_string(),
            Resolved::Float(f) => canonical_float(*f),
            Resolved::String(s) => s.clone(),
        }
    }
}

/// Format as float string, make changes to be sure it is a valid YAML float
/// (zmij may render `4e-6` and not `4.0e-6`).
pub fn canonical_float(f: f64) -> String {
    if f.is_nan() {
        return ".nan".to_owned();
    }
    if f.is_infinite() {
        return if f.is_sign_positive() { ".inf" } else { "-.inf" }.to_owned();
    }
    let mut buf = zmij::Buffer::new();
    let s = buf.format_finite(f);
    if s.as_bytes().contains(&b'.') {
        return s.to_owned();
    }
    match s.find(['e', 'E']) {
        Some(exp_pos) => format!("{}.0{}", &s[..exp_pos], &s[exp_pos..]),
        None => format!("{s}.0"),
    }
}

/// Resolve an untagged plain scalar.
///
/// Integers outside the `i64` range resolve to their nearest float; integer
/// literals wider than 128 bits stay strings.
pub fn resolve_plain(text: &str) -> Resolved {
    if is_yaml11_null(text) {
        return Resolved::Null;
    }
    if let Some(b) = parse_yaml11_bool(text) {
        return Resolved::Bool(b);
    }
    match parse_yaml11_int(text) {
        Ok(v) => {
            return match i64::try_from(v) {
                Ok(i) => Resolved::Int(i),
                Err(_) => Resolved::Float(v as f64),
            };
        }
        Err(IntError::TooLarge) => return Resolved::String(text.to_owned()),
        Err(IntError::Syntax) => {}
    }
    if let Some(f) = parse_yaml11_float(text) {
        return Resolved::Float(f);
    }
    Resolved::String(text.to_owned())
}

/// Resolve a scalar without an explicit tag, honoring its style.
pub fn resolve_untagged(text: &str, style: ScalarStyle) -> Resolved {
    if style.is_plain() {
        resolve_plain(text)
    } else {
        Resolved::String(text.to_owned())
    }
}

/// Interpret `text` under an explicit core tag.
///
/// Returns `None` when the text does not fit the tag's grammar, or when the tag
/// does not name a scalar kind (`!!seq`, `!!map`, `!!binary`, custom tags).
pub fn resolve_tagged(text: &str, tag: CoreTag<'_>) -> Option<Resolved> {
    match tag {
        CoreTag::Null => is_yaml11_null(text).then_some(Resolved::Null),
        CoreTag::Bool => parse_yaml11_bool(text).map(Resolved::Bool),
        CoreTag::Int => parse_yaml11_int(text)
            .ok()
            .and_then(|v| i64::try_from(v).ok())
            .map(Resolved::Int),
        CoreTag::Float => parse_yaml11_float(text)
            .or_else(|| parse_yaml11_int(text).ok().map(|v| v as f64))
            .map(Resolved::Float),
        CoreTag::Str => Some(Resolved::String(text.to_owned())),
        CoreTag::Seq | CoreTag::Map | CoreTag::Binary | CoreTag::Custom(_) => None,
    }
}

/// Resolve a scalar as written: untagged scalars are inferred, tagged ones forced.
///
/// `tag` is expected in short form. Returns `None` when an explicit tag rejects
/// the text or names something other than a scalar kind.
pub fn resolve_scalar(text: &str, style: ScalarStyle, tag: Option<&str>) -> Option<Resolved> {
    match tag {
        None => Some(resolve_untagged(text, style)),
        Some(tag) => resolve_tagged(text, CoreTag::classify(tag)),
    }
}

/// Kind a scalar would resolve to, used by the decoder to pick a conversion
/// before looking at the value.
pub(crate) fn implicit_kind(text: &str, style: ScalarStyle) -> ScalarKind {
    resolve_untagged(text, style).kind()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_null_bool_int_float_string() {
        assert_eq!(resolve_plain(""), Resolved::Null);
        assert_eq!(resolve_plain("~"), Resolved::Null);
        assert_eq!(resolve_plain("y"), Resolved::Bool(true));
        assert_eq!(resolve_plain("NO"), Resolved::Bool(false));
        assert_eq!(resolve_plain("True"), Resolved::Bool(true));
        assert_eq!(resolve_plain("02472256"), Resolved::Int(685230));
        assert_eq!(resolve_plain("0.1"), Resolved::Float(0.1));
        assert_eq!(resolve_plain(".1"), Resolved::Float(0.1));
        assert_eq!(resolve_plain("hello"), Resolved::String("hello".into()));
    }

    #[test]
    fn wide_integers() {
        assert_eq!(resolve_plain("4294967296"), Resolved::Int(4294967296));
        assert_eq!(
            resolve_plain("18446744073709551616"),
            Resolved::Float(18446744073709551616.0)
        );
        let huge = "1".repeat(50);
        assert_eq!(resolve_plain(&huge), Resolved::String(huge.clone()));
    }

    #[test]
    fn quoted_text_is_never_inferred() {
        assert_eq!(
            resolve_untagged("1", ScalarStyle::SingleQuoted),
            Resolved::String("1".into())
        );
        assert_eq!(
            resolve_untagged("true", ScalarStyle::DoubleQuoted),
            Resolved::String("true".into())
        );
    }

    #[test]
    fn explicit_tags_force_their_grammar() {
        assert_eq!(resolve_tagged("1.1", CoreTag::Float), Some(Resolved::Float(1.1)));
        assert_eq!(resolve_tagged("1", CoreTag::Float), Some(Resolved::Float(1.0)));
        assert_eq!(resolve_tagged("error", CoreTag::Float), None);
        assert_eq!(resolve_tagged("", CoreTag::Null), Some(Resolved::Null));
        assert_eq!(resolve_tagged("12", CoreTag::Str), Some(Resolved::String("12".into())));
        assert_eq!(resolve_tagged("x", CoreTag::Custom("!!foo")), None);
    }

    #[test]
    fn resolve_scalar_dispatches_on_tag() {
        assert_eq!(
            resolve_scalar("12", ScalarStyle::Plain, None),
            Some(Resolved::Int(12))
        );
        assert_eq!(
            resolve_scalar("12", ScalarStyle::Plain, Some("!")),
            Some(Resolved::String("12".into()))
        );
        assert_eq!(resolve_scalar("~", ScalarStyle::Plain, Some("!!int")), None);
    }

    #[test]
    fn canonical_rendering_round_trips_kind() {
        for text in ["~", "y", "off", "0x1F", "-0b11", "02472256", "1e5", "685_230.15", ".inf", ".NaN"] {
            let first = resolve_plain(text);
            let again = resolve_plain(&first.canonical());
            assert_eq!(first.kind(), again.kind(), "{text} -> {}", first.canonical());
        }
        assert_eq!(Resolved::Float(3.0).canonical(), "3.0");
        assert_eq!(Resolved::Float(f64::NEG_INFINITY).canonical(), "-.inf");
    }
}
