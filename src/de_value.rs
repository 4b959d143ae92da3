//! Serde bridge: feed a decoded [`Value`] into any `Deserialize` type.
//!
//! The decoder does the YAML-specific work (resolution, narrowing, hooks); this
//! layer only maps the resulting value tree onto serde's data model.

use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};

use crate::error::Error;
use crate::value::Value;

/// Deserialize `T` from a decoded value.
///
/// ```rust
/// use serde::Deserialize;
/// use saphyr_decode::{from_value, Value};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let value: Value = [("x", 1i64), ("y", 2)].into_iter().collect::<saphyr_decode::Mapping>().into();
/// assert_eq!(from_value::<Point>(value).unwrap(), Point { x: 1, y: 2 });
/// ```
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(ValueDeserializer::new(value))
}

/// Owning serde deserializer over a [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

fn visit_seq<'de, I, V>(items: I, visitor: V) -> Result<V::Value, Error>
where
    I: Iterator,
    I::Item: IntoDeserializer<'de, Error>,
    V: Visitor<'de>,
{
    let mut seq: SeqDeserializer<I, Error> = SeqDeserializer::new(items);
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_map<'de, K, V, Vis>(entries: Vec<(K, V)>, visitor: Vis) -> Result<Vis::Value, Error>
where
    K: IntoDeserializer<'de, Error>,
    V: IntoDeserializer<'de, Error>,
    Vis: Visitor<'de>,
{
    let mut map: MapDeserializer<'de, _, Error> = MapDeserializer::new(entries.into_iter());
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::UInt(u) => visitor.visit_u64(u),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::Seq(items) => visit_seq(items.into_iter(), visitor),
            Value::Map(m) => visit_map(m.into_entries(), visitor),
            Value::Record(r) => visit_map(r.into_fields(), visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    /// `!!binary` payloads also deserialize as a sequence of bytes (`Vec<u8>`).
    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.value {
            Value::Bytes(b) => visit_seq(b.into_iter(), visitor),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    /// Externally tagged enums: `Variant` or `{ Variant: value }`.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let access = match self.value {
            Value::String(variant) => EA {
                variant: Value::String(variant),
                payload: None,
            },
            Value::Map(m) => match <[(Value, Value); 1]>::try_from(m.into_entries()) {
                Ok([(variant, payload)]) => EA {
                    variant,
                    payload: Some(payload),
                },
                Err(_) => {
                    return Err(Error::msg(format!(
                        "enum {name} expects a mapping with exactly one entry"
                    )));
                }
            },
            other => {
                return Err(Error::msg(format!(
                    "enum {name} expects a string or a single-entry mapping, found {}",
                    other.kind_name()
                )));
            }
        };
        visitor.visit_enum(access)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple tuple_struct map struct
        identifier ignored_any
    }
}

struct EA {
    variant: Value,
    payload: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EA {
    type Error = Error;
    type Variant = VA;

    fn variant_seed<Vv>(self, seed: Vv) -> Result<(Vv::Value, Self::Variant), Error>
    where
        Vv: de::DeserializeSeed<'de>,
    {
        let v = seed.deserialize(self.variant.into_deserializer())?;
        Ok((
            v,
            VA {
                payload: self.payload,
            },
        ))
    }
}

struct VA {
    payload: Option<Value>,
}

impl VA {
    fn require(self, what: &str) -> Result<ValueDeserializer, Error> {
        self.payload
            .map(ValueDeserializer::new)
            .ok_or_else(|| Error::msg(format!("{what} enum variant requires a value")))
    }
}

impl<'de> de::VariantAccess<'de> for VA {
    type Error = Error;

    /// `Variant` or `{ Variant: ~ }`.
    fn unit_variant(self) -> Result<(), Error> {
        match self.payload {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(Error::msg(format!(
                "unexpected {} value for unit enum variant",
                other.kind_name()
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.require("newtype")?)
    }

    fn tuple_variant<Vv>(self, _len: usize, visitor: Vv) -> Result<Vv::Value, Error>
    where
        Vv: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self.require("tuple")?, visitor)
    }

    fn struct_variant<Vv>(
        self,
        _fields: &'static [&'static str],
        visitor: Vv,
    ) -> Result<Vv::Value, Error>
    where
        Vv: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self.require("struct")?, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    use crate::value::{Mapping, Record};

    #[derive(Debug, Deserialize, PartialEq)]
    enum Mode {
        Fast,
        Limit(u32),
    }

    #[test]
    fn enums_from_string_and_single_entry_map() {
        assert_eq!(from_value::<Mode>(Value::from("Fast")).unwrap(), Mode::Fast);
        let limited: Mapping = [("Limit", 5i64)].into_iter().collect();
        assert_eq!(from_value::<Mode>(limited.into()).unwrap(), Mode::Limit(5));
    }

    #[test]
    fn records_deserialize_as_structs() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Server {
            host: String,
            port: u16,
            tags: Option<Vec<String>>,
        }

        let record = Record::new(
            "Server",
            vec![
                ("host".into(), Value::from("localhost")),
                ("port".into(), Value::UInt(8080)),
                ("tags".into(), Value::Null),
            ],
        );
        assert_eq!(
            from_value::<Server>(Value::Record(record)).unwrap(),
            Server {
                host: "localhost".into(),
                port: 8080,
                tags: None,
            }
        );
    }

    #[test]
    fn bytes_as_vec() {
        let bytes = from_value::<Vec<u8>>(Value::Bytes(vec![1, 2, 3])).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(from_value::<u8>(Value::Int(300)).is_err());
    }
}
