//! Defines error and its location

use std::fmt;

use saphyr_parser::ScanError;
use serde::de;

use crate::budget::BudgetBreach;
use crate::location::Location;
use crate::node::NodeShape;

/// Everything that can go wrong while loading or decoding a document.
///
/// Decode errors carry the path of the offending node (`servers[2].port`, empty for
/// the document root) next to its source location.
#[derive(Debug)]
pub enum Error {
    /// A scalar resolved to a kind the target does not accept (`bool` slot given `42`).
    KindMismatch {
        /// Tag of the offending scalar, explicit or implicit (`!!int`, `!!str`, ...).
        found: String,
        text: String,
        expected: String,
        path: String,
        location: Location,
    },
    /// Integer or float does not fit the width/signedness of the target.
    Overflow {
        value: String,
        target: String,
        path: String,
        location: Location,
    },
    /// Node variant does not match the composite shape the target needs.
    ShapeMismatch {
        found: NodeShape,
        expected: String,
        path: String,
        location: Location,
    },
    /// Text does not satisfy the grammar of the kind its explicit tag forces.
    ExplicitTagRejected {
        tag: String,
        text: String,
        target: String,
        path: String,
        location: Location,
    },
    /// Unrecognized tag on a node whose target is neither dynamic nor hooked.
    UnknownTag {
        tag: String,
        target: String,
        path: String,
        location: Location,
    },
    /// Only raised with [`DuplicateKeyPolicy::Error`](crate::DuplicateKeyPolicy::Error).
    DuplicateKey {
        key: String,
        path: String,
        location: Location,
    },
    /// Nesting exceeded [`Options::max_depth`](crate::Options::max_depth).
    DepthLimit {
        max_depth: usize,
        path: String,
        location: Location,
    },
    /// `!!binary` payload is not valid base64, or not UTF-8 where text is required.
    InvalidBinary {
        msg: String,
        path: String,
        location: Location,
    },
    /// Free-form error with optional source location.
    Message {
        msg: String,
        location: Location,
    },
    /// The YAML text could not be parsed.
    Scan {
        msg: String,
        location: Location,
    },
    /// A YAML budget limit was exceeded.
    Budget {
        breach: BudgetBreach,
        location: Location,
    },
    /// Alias expansion exceeded [`AliasLimits`](crate::AliasLimits).
    AliasLimit {
        msg: String,
        location: Location,
    },
    /// Alias references a non-existent anchor id.
    UnknownAnchor {
        id: usize,
        location: Location,
    },
    /// More than one document where exactly one was expected.
    MultipleDocuments {
        location: Location,
    },
}

impl Error {
    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let mark = err.marker();
        Error::Scan {
            msg: err.info().to_owned(),
            location: Location::new(mark.line(), mark.col() + 1),
        }
    }

    /// Attach/override a concrete location to this error and return it.
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::KindMismatch { location, .. }
            | Error::Overflow { location, .. }
            | Error::ShapeMismatch { location, .. }
            | Error::ExplicitTagRejected { location, .. }
            | Error::UnknownTag { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::DepthLimit { location, .. }
            | Error::InvalidBinary { location, .. }
            | Error::Message { location, .. }
            | Error::Scan { location, .. }
            | Error::Budget { location, .. }
            | Error::AliasLimit { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::MultipleDocuments { location } => *location = set_location,
        }
        self
    }

    /// Source location of the offending node, if known.
    pub fn location(&self) -> Option<Location> {
        let location = match self {
            Error::KindMismatch { location, .. }
            | Error::Overflow { location, .. }
            | Error::ShapeMismatch { location, .. }
            | Error::ExplicitTagRejected { location, .. }
            | Error::UnknownTag { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::DepthLimit { location, .. }
            | Error::InvalidBinary { location, .. }
            | Error::Message { location, .. }
            | Error::Scan { location, .. }
            | Error::Budget { location, .. }
            | Error::AliasLimit { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::MultipleDocuments { location } => *location,
        };
        location.is_known().then_some(location)
    }

    /// Path of the offending node within the document, for decode errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::KindMismatch { path, .. }
            | Error::Overflow { path, .. }
            | Error::ShapeMismatch { path, .. }
            | Error::ExplicitTagRejected { path, .. }
            | Error::UnknownTag { path, .. }
            | Error::DuplicateKey { path, .. }
            | Error::DepthLimit { path, .. }
            | Error::InvalidBinary { path, .. } => Some(path),
            _ => None,
        }
    }

    /// True for errors a sequence of a narrower element type drops silently.
    pub(crate) fn is_narrowing(&self) -> bool {
        matches!(
            self,
            Error::KindMismatch { .. } | Error::Overflow { .. } | Error::ShapeMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KindMismatch {
                found,
                text,
                expected,
                ..
            } => write!(f, "cannot decode {found} '{text}' into {expected}")?,
            Error::Overflow { value, target, .. } => {
                write!(f, "value {value} overflows {target}")?
            }
            Error::ShapeMismatch {
                found, expected, ..
            } => write!(f, "expected {expected}, found {found}")?,
            Error::ExplicitTagRejected {
                tag, text, target, ..
            } => {
                write!(f, "cannot decode !!str '{text}' as a {tag}")?;
                if target.as_str() != tag.as_str() {
                    write!(f, " (requested {target})")?;
                }
            }
            Error::UnknownTag { tag, target, .. } => {
                write!(f, "cannot decode node tagged {tag} into {target}")?
            }
            Error::DuplicateKey { key, .. } => write!(f, "duplicate mapping key: {key}")?,
            Error::DepthLimit { max_depth, .. } => {
                write!(f, "nesting depth limit exceeded ({max_depth})")?
            }
            Error::InvalidBinary { msg, .. } => write!(f, "{msg}")?,
            Error::Message { msg, .. } | Error::Scan { msg, .. } | Error::AliasLimit { msg, .. } => {
                f.write_str(msg)?
            }
            Error::Budget { breach, .. } => write!(f, "YAML budget breached: {breach:?}")?,
            Error::UnknownAnchor { id, .. } => {
                write!(f, "alias references unknown anchor id {id}")?
            }
            Error::MultipleDocuments { .. } => {
                f.write_str("multiple YAML documents detected; use load_all_str")?
            }
        }
        if let Some(path) = self.path().filter(|p| !p.is_empty()) {
            write!(f, " at `{path}`")?;
        }
        if let Some(location) = self.location() {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::msg(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_and_location() {
        let err = Error::Overflow {
            value: "4294967297".into(),
            target: "i32".into(),
            path: "v".into(),
            location: Location::new(1, 4),
        };
        assert_eq!(
            err.to_string(),
            "value 4294967297 overflows i32 at `v` at line 1, column 4"
        );
    }

    #[test]
    fn explicit_tag_message_names_text_and_tag() {
        let err = Error::ExplicitTagRejected {
            tag: "!!float".into(),
            text: "error".into(),
            target: "!!float".into(),
            path: String::new(),
            location: Location::UNKNOWN,
        };
        assert_eq!(err.to_string(), "cannot decode !!str 'error' as a !!float");
    }
}
