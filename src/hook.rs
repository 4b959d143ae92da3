//! Custom decoder hook.

use crate::value::Value;

/// Capability a record type can declare to take over its own decoding.
///
/// When a record type carries a hook, the decoder does not match fields. It
/// decodes the node generically (scalars resolve as usual, sequences and mappings
/// become [`Value::Seq`] and [`Value::Map`]) and hands the result over together
/// with the effective tag: the explicit tag if the node has one, otherwise the
/// implicit one (`!!int`, `!!null`, `!!map`, ...).
///
/// `target` is a working copy of the slot being decoded (an empty instance of
/// the record if the slot was unset). Returning `true` commits it; returning
/// `false` marks the value as absent: an optional slot stays unset, a map entry
/// is omitted and a sequence element is dropped.
pub trait DecodeHook: Send + Sync {
    fn accepts_decoded(&self, target: &mut Value, tag: &str, value: Value) -> bool;
}

impl<F> DecodeHook for F
where
    F: Fn(&mut Value, &str, Value) -> bool + Send + Sync,
{
    fn accepts_decoded(&self, target: &mut Value, tag: &str, value: Value) -> bool {
        self(target, tag, value)
    }
}
