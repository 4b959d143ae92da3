//! Type-directed decoding of YAML 1.1 documents.
//!
//! YAML text is loaded into a generic [`Node`] tree, which the decoder then walks
//! against a [`Target`] describing the shape the caller wants: records, maps,
//! sequences, numbers of a given width, strings, optional slots, or dynamic
//! values that keep whatever the YAML 1.1 core schema resolves to. Record types
//! can take over their own decoding through a [`DecodeHook`].
//!
//! ```rust
//! use saphyr_decode::{from_str, Target, Value};
//!
//! let doc = "hello: true";
//! let strings = from_str(doc, &Target::map(Target::Str, Target::Str)).unwrap();
//! assert_eq!(strings.get("hello"), Some(&Value::from("true")));
//!
//! let dynamic = from_str(doc, &Target::map(Target::Str, Target::Dynamic)).unwrap();
//! assert_eq!(dynamic.get("hello"), Some(&Value::Bool(true)));
//! ```

use serde::de::DeserializeOwned;

pub use budget::{check_yaml_budget, Budget, BudgetBreach, BudgetReport};
pub use de::{decode, decode_into, decode_into_with_options, decode_with_options};
pub use de_value::{from_value, ValueDeserializer};
pub use error::Error;
pub use hook::DecodeHook;
pub use location::Location;
pub use node::{Node, NodeShape, ScalarStyle};
pub use options::{AliasLimits, DuplicateKeyPolicy, Options};
pub use resolve::{canonical_float, resolve_plain, resolve_scalar, Resolved, ScalarKind};
pub use target::{Field, FloatKind, IntKind, RecordBuilder, RecordType, Target};
pub use value::{Mapping, Record, Value};

pub mod budget;
mod de;
mod de_value;
mod error;
mod hook;
mod loader;
mod location;
mod macros;
mod node;
pub mod options;
pub mod parse_scalars;
pub mod resolve;
pub mod tags;
mod target;
mod value;

/// Load a single YAML document into a [`Node`] tree.
///
/// An empty stream loads as a null scalar; a stream with more than one
/// non-empty document is rejected with [`Error::MultipleDocuments`].
pub fn load_str(input: &str) -> Result<Node, Error> {
    load_str_with_options(input, &Options::default())
}

pub fn load_str_with_options(input: &str, options: &Options) -> Result<Node, Error> {
    loader::load_single(input, options)
}

/// Load every non-empty document of a stream.
///
/// ```rust
/// let docs = saphyr_decode::load_all_str("--- a\n--- b\n").unwrap();
/// assert_eq!(docs.len(), 2);
/// ```
pub fn load_all_str(input: &str) -> Result<Vec<Node>, Error> {
    load_all_str_with_options(input, &Options::default())
}

pub fn load_all_str_with_options(input: &str, options: &Options) -> Result<Vec<Node>, Error> {
    loader::load_all(input, options)
}

/// Load a single document and decode it into `target`.
pub fn from_str(input: &str, target: &Target) -> Result<Value, Error> {
    from_str_with_options(input, target, Options::default())
}

pub fn from_str_with_options(input: &str, target: &Target, options: Options) -> Result<Value, Error> {
    let node = loader::load_single(input, &options)?;
    decode_with_options(&node, target, &options)
}

/// Decode with `target`, then hand the result to serde.
///
/// The target decides YAML semantics (which scalars are strings, which records
/// carry hooks); `T` only has to match the decoded shape.
///
/// ```rust
/// use serde::Deserialize;
/// use saphyr_decode::{from_str_as, Target};
///
/// #[derive(Deserialize)]
/// struct Doc {
///     seq: Vec<String>,
/// }
///
/// let target = Target::map(Target::Str, Target::seq(Target::Str));
/// let doc: Doc = from_str_as("seq: [A, 1, C]", &target).unwrap();
/// assert_eq!(doc.seq, ["A", "1", "C"]);
/// ```
pub fn from_str_as<T: DeserializeOwned>(input: &str, target: &Target) -> Result<T, Error> {
    from_value(from_str(input, target)?)
}
