//! Tag vocabulary of the YAML 1.1 core schema.
//!
//! The loader hands tags over in whatever spelling the parser produced
//! (`!!int`, `tag:yaml.org,2002:int`, `tag:yaml.org,2002:!int` after handle
//! expansion). [`normalize_tag`] folds every `tag:yaml.org,2002:` spelling
//! into the short `!!name` form, and [`CoreTag::classify`] maps the short
//! form onto the closed set the decoder understands.

use std::fmt;

pub(crate) const YAML_ORG_PREFIX: &str = "tag:yaml.org,2002:";

pub const TAG_NULL: &str = "!!null";
pub const TAG_BOOL: &str = "!!bool";
pub const TAG_INT: &str = "!!int";
pub const TAG_FLOAT: &str = "!!float";
pub const TAG_STR: &str = "!!str";
pub const TAG_SEQ: &str = "!!seq";
pub const TAG_MAP: &str = "!!map";
pub const TAG_BINARY: &str = "!!binary";

/// The non-specific tag `!`: forces string interpretation of a plain scalar.
pub const TAG_NON_SPECIFIC: &str = "!";

/// Rewrite a tag into its short form.
///
/// `tag:yaml.org,2002:int` and `tag:yaml.org,2002:!int` both become `!!int`;
/// local (`!foo`) and foreign URI tags are returned unchanged.
pub fn normalize_tag(raw: &str) -> String {
    match raw.strip_prefix(YAML_ORG_PREFIX) {
        Some(rest) => {
            let rest = rest.strip_prefix('!').unwrap_or(rest);
            format!("!!{rest}")
        }
        None => match raw
            .strip_prefix("!<")
            .and_then(|verbatim| verbatim.strip_suffix('>'))
        {
            Some(verbatim) => normalize_tag(verbatim),
            None => raw.to_owned(),
        },
    }
}

/// Tags the decoder assigns a meaning to. Everything else is [`CoreTag::Custom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreTag<'a> {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Seq,
    Map,
    Binary,
    Custom(&'a str),
}

impl<'a> CoreTag<'a> {
    /// Classify a tag already in short form (see [`normalize_tag`]).
    pub fn classify(tag: &'a str) -> Self {
        match tag {
            TAG_NULL | "!null" => CoreTag::Null,
            TAG_BOOL | "!bool" => CoreTag::Bool,
            TAG_INT | "!int" => CoreTag::Int,
            TAG_FLOAT | "!float" => CoreTag::Float,
            TAG_STR | TAG_NON_SPECIFIC => CoreTag::Str,
            TAG_SEQ => CoreTag::Seq,
            TAG_MAP => CoreTag::Map,
            TAG_BINARY => CoreTag::Binary,
            other => CoreTag::Custom(other),
        }
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            CoreTag::Null => TAG_NULL,
            CoreTag::Bool => TAG_BOOL,
            CoreTag::Int => TAG_INT,
            CoreTag::Float => TAG_FLOAT,
            CoreTag::Str => TAG_STR,
            CoreTag::Seq => TAG_SEQ,
            CoreTag::Map => TAG_MAP,
            CoreTag::Binary => TAG_BINARY,
            CoreTag::Custom(t) => t,
        }
    }
}

impl fmt::Display for CoreTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_org_spellings_fold_to_short_form() {
        assert_eq!(normalize_tag("tag:yaml.org,2002:int"), "!!int");
        assert_eq!(normalize_tag("tag:yaml.org,2002:!int"), "!!int");
        assert_eq!(normalize_tag("!<tag:yaml.org,2002:float>"), "!!float");
        assert_eq!(normalize_tag("!!map"), "!!map");
        assert_eq!(normalize_tag("!local"), "!local");
        assert_eq!(
            normalize_tag("tag:example.com,2000:app/foo"),
            "tag:example.com,2000:app/foo"
        );
    }

    #[test]
    fn classify_known_and_custom() {
        assert_eq!(CoreTag::classify("!!null"), CoreTag::Null);
        assert_eq!(CoreTag::classify("!"), CoreTag::Str);
        assert_eq!(CoreTag::classify("!!foo"), CoreTag::Custom("!!foo"));
        assert_eq!(CoreTag::classify("!!foo").as_str(), "!!foo");
    }
}
