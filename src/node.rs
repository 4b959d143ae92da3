//! Generic, untyped document tree.
//!
//! A [`Node`] is what the loader produces and what the decoder consumes. Trees are
//! immutable once built; anchors and aliases are already expanded and tag handles
//! already rewritten to their short form (see [`crate::tags::normalize_tag`]).

use std::fmt;

use crate::location::Location;

/// How a scalar was written in the source.
///
/// Only plain scalars take part in implicit type resolution; every other style
/// denotes a string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn is_plain(self) -> bool {
        matches!(self, ScalarStyle::Plain)
    }
}

/// A parsed document unit.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Scalar {
        text: String,
        style: ScalarStyle,
        tag: Option<String>,
        location: Location,
    },
    Sequence {
        items: Vec<Node>,
        tag: Option<String>,
        location: Location,
    },
    /// Keys are nodes too. Duplicate keys are kept as written.
    Mapping {
        entries: Vec<(Node, Node)>,
        tag: Option<String>,
        location: Location,
    },
}

/// Node variant without payload, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeShape::Scalar => "scalar",
            NodeShape::Sequence => "sequence",
            NodeShape::Mapping => "mapping",
        })
    }
}

impl Node {
    /// Untagged plain scalar.
    pub fn scalar(text: impl Into<String>) -> Self {
        Node::Scalar {
            text: text.into(),
            style: ScalarStyle::Plain,
            tag: None,
            location: Location::UNKNOWN,
        }
    }

    /// Untagged single-quoted scalar.
    pub fn quoted(text: impl Into<String>) -> Self {
        Node::Scalar {
            text: text.into(),
            style: ScalarStyle::SingleQuoted,
            tag: None,
            location: Location::UNKNOWN,
        }
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Node::Sequence {
            items,
            tag: None,
            location: Location::UNKNOWN,
        }
    }

    pub fn mapping(entries: Vec<(Node, Node)>) -> Self {
        Node::Mapping {
            entries,
            tag: None,
            location: Location::UNKNOWN,
        }
    }

    /// Attach an explicit tag. The tag is normalized to its short form.
    pub fn with_tag(mut self, new_tag: &str) -> Self {
        let normalized = crate::tags::normalize_tag(new_tag);
        match &mut self {
            Node::Scalar { tag, .. } | Node::Sequence { tag, .. } | Node::Mapping { tag, .. } => {
                *tag = Some(normalized);
            }
        }
        self
    }

    pub fn with_location(mut self, at: Location) -> Self {
        match &mut self {
            Node::Scalar { location, .. }
            | Node::Sequence { location, .. }
            | Node::Mapping { location, .. } => *location = at,
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Scalar { tag, .. } | Node::Sequence { tag, .. } | Node::Mapping { tag, .. } => {
                tag.as_deref()
            }
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Node::Scalar { location, .. }
            | Node::Sequence { location, .. }
            | Node::Mapping { location, .. } => *location,
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self {
            Node::Scalar { .. } => NodeShape::Scalar,
            Node::Sequence { .. } => NodeShape::Sequence,
            Node::Mapping { .. } => NodeShape::Mapping,
        }
    }

    /// Text of a scalar node, `None` for collections.
    pub fn as_scalar_text(&self) -> Option<&str> {
        match self {
            Node::Scalar { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Look up a mapping entry whose key is a scalar with exactly this text.
    ///
    /// The last matching entry wins, mirroring how duplicate keys decode.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping { entries, .. } => entries
                .iter()
                .rev()
                .find(|(k, _)| k.as_scalar_text() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_tag_and_shape() {
        let n = Node::scalar("1").with_tag("tag:yaml.org,2002:float");
        assert_eq!(n.tag(), Some("!!float"));
        assert_eq!(n.shape(), NodeShape::Scalar);
        assert!(!n.location().is_known());
    }

    #[test]
    fn get_prefers_last_duplicate() {
        let m = Node::mapping(vec![
            (Node::scalar("a"), Node::scalar("1")),
            (Node::scalar("a"), Node::scalar("2")),
        ]);
        assert_eq!(m.get("a").and_then(Node::as_scalar_text), Some("2"));
        assert!(m.get("b").is_none());
    }
}
