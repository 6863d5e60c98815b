//! Bridge between `serde` types and the value model.
//!
//! Values travel through `serde_json::Value`; `serde_json` is built with
//! `arbitrary_precision` so number text survives the trip unchanged.

use crate::common::value::{AttributeValue, Item, MAX_NESTING_DEPTH, Number};
use crate::error::{Error, Result};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

fn from_json(value: Value, depth: usize) -> Result<AttributeValue> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::validation(format!(
            "value nests deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }
    let value = match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(value) => AttributeValue::Bool(value),
        Value::Number(number) => AttributeValue::Number(number.to_string().parse::<Number>()?),
        Value::String(value) => AttributeValue::String(value),
        Value::Array(values) => AttributeValue::List(
            values
                .into_iter()
                .map(|value| from_json(value, depth + 1))
                .collect::<Result<_>>()?,
        ),
        Value::Object(values) => AttributeValue::Map(
            values
                .into_iter()
                .map(|(name, value)| Ok((name, from_json(value, depth + 1)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(value)
}

fn to_json(value: AttributeValue) -> Result<Value> {
    let value = match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(value) => Value::Bool(value),
        AttributeValue::Number(number) => {
            let number: serde_json::Number = serde_json::from_str(number.as_str())
                .map_err(|error| Error::validation(format!("number `{number}`: {error}")))?;
            Value::Number(number)
        }
        AttributeValue::String(value) => Value::String(value),
        AttributeValue::Binary(bytes) => {
            Value::Array(bytes.iter().map(|byte| Value::from(*byte)).collect())
        }
        AttributeValue::List(values) => Value::Array(
            values
                .into_iter()
                .map(to_json)
                .collect::<Result<_>>()?,
        ),
        AttributeValue::Map(values) => Value::Object(
            values
                .into_iter()
                .map(|(name, value)| Ok((name, to_json(value)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(value)
}

/// Convert any serializable value into an `AttributeValue`.
///
/// ```rust
/// use keystone_client::common::native::to_attribute_value;
///
/// let value = to_attribute_value(vec![1, 2, 3]).unwrap();
/// assert_eq!(value.as_list().unwrap().len(), 3);
/// ```
pub fn to_attribute_value<T: Serialize>(value: T) -> Result<AttributeValue> {
    let value = serde_json::to_value(value)
        .map_err(|error| Error::validation(format!("cannot serialize value: {error}")))?;
    from_json(value, 0)
}

/// Convert an `AttributeValue` into any deserializable value.
///
/// `Binary` values are presented to the deserializer as a sequence of bytes.
pub fn from_attribute_value<T: DeserializeOwned>(value: AttributeValue) -> Result<T> {
    value.validate_depth()?;
    let value = to_json(value)?;
    serde_json::from_value(value)
        .map_err(|error| Error::validation(format!("cannot deserialize value: {error}")))
}

/// Convert a serializable struct or map into an `Item`.
pub fn to_item<T: Serialize>(value: T) -> Result<Item> {
    match to_attribute_value(value)? {
        AttributeValue::Map(item) => Ok(item),
        other => Err(Error::validation(format!(
            "an item must serialize to a map, found {}",
            other.type_name()
        ))),
    }
}

/// Convert an `Item` into a deserializable struct or map.
pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T> {
    from_attribute_value(AttributeValue::Map(item))
}
