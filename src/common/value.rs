use crate::error::{Error, Result, TransportError};
use crate::proto;

use bytes::Bytes;
use indexmap::IndexMap;
use std::{collections, fmt, str};

/// Maximum nesting of lists and maps inside one value.
pub const MAX_NESTING_DEPTH: usize = 32;

/// One item: attribute names mapped to values.
pub type Item = collections::HashMap<String, AttributeValue>;

/// Decimal number carried as its original text.
///
/// The text is validated but never normalized: `"30"`, `"30.0"` and `"3e1"`
/// are three different numbers as far as this type is concerned, and each
/// round-trips unchanged.
///
/// ```rust
/// use keystone_client::common::value::Number;
///
/// let age: Number = "30".parse().unwrap();
/// assert_eq!(age.as_str(), "30");
/// assert!("3O".parse::<Number>().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number(String);

impl Number {
    /// The decimal text exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the number, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Wrap text that is checked later by `AttributeValue::validate`.
    pub(crate) fn unchecked(text: String) -> Self {
        Self(text)
    }

    fn is_decimal(text: &str) -> bool {
        let text = text.strip_prefix('-').unwrap_or(text);
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(position) => (&text[..position], Some(&text[position + 1..])),
            None => (text, None),
        };
        let (integer, fraction) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (mantissa, None),
        };
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(integer) || fraction.is_some_and(|fraction| !digits(fraction)) {
            return false;
        }
        // no leading zeros, so every number also parses as JSON
        if integer.len() > 1 && integer.starts_with('0') {
            return false;
        }
        match exponent {
            Some(exponent) => {
                let exponent = exponent
                    .strip_prefix(['+', '-'])
                    .unwrap_or(exponent);
                digits(exponent)
            }
            None => true,
        }
    }
}

impl str::FromStr for Number {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        if Self::is_decimal(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(Error::validation(format!("`{text}` is not a decimal number")))
        }
    }
}

impl TryFrom<String> for Number {
    type Error = Error;

    fn try_from(text: String) -> Result<Self> {
        if Self::is_decimal(&text) {
            Ok(Self(text))
        } else {
            Err(Error::validation(format!("`{text}` is not a decimal number")))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! impl_number_from_integer {
    ($($integer:ty),*) => {
        $(
            impl From<$integer> for Number {
                fn from(value: $integer) -> Self {
                    Self(value.to_string())
                }
            }

            impl From<$integer> for AttributeValue {
                fn from(value: $integer) -> Self {
                    Self::Number(value.into())
                }
            }
        )*
    };
}

impl_number_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_number_try_from_float {
    ($($float:ty),*) => {
        $(
            impl TryFrom<$float> for Number {
                type Error = Error;

                fn try_from(value: $float) -> Result<Self> {
                    if value.is_finite() {
                        Ok(Self(value.to_string()))
                    } else {
                        Err(Error::validation(format!("{value} is not a finite number")))
                    }
                }
            }

            impl TryFrom<$float> for AttributeValue {
                type Error = Error;

                fn try_from(value: $float) -> Result<Self> {
                    Number::try_from(value).map(Self::Number)
                }
            }
        )*
    };
}

impl_number_try_from_float!(f32, f64);

/// One document value.
///
/// ```rust
/// use keystone_client::AttributeValue;
/// use std::collections::HashMap;
///
/// let profile = AttributeValue::from(HashMap::from([
///     ("name".to_string(), AttributeValue::from("Alice")),
///     ("tags".to_string(), AttributeValue::from(vec!["admin", "ops"])),
/// ]));
/// assert_eq!(profile.type_name(), "M");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// UTF-8 text.
    String(String),
    /// Decimal number, text-preserved.
    Number(Number),
    /// Boolean flag.
    Bool(bool),
    /// Opaque bytes.
    Binary(Bytes),
    /// Explicit null.
    Null,
    /// Ordered sequence of values.
    List(Vec<AttributeValue>),
    /// Unordered mapping of names to values.
    Map(collections::HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Short type descriptor (`S`, `N`, `BOOL`, `B`, `NULL`, `L`, `M`).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "S",
            Self::Number(_) => "N",
            Self::Bool(_) => "BOOL",
            Self::Binary(_) => "B",
            Self::Null => "NULL",
            Self::List(_) => "L",
            Self::Map(_) => "M",
        }
    }

    /// The text if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// The number if this is a `Number`.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    /// The flag if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The bytes if this is a `Binary`.
    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Self::Binary(value) => Some(value),
            _ => None,
        }
    }

    /// The elements if this is a `List`.
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// The entries if this is a `Map`.
    pub fn as_map(&self) -> Option<&collections::HashMap<String, AttributeValue>> {
        match self {
            Self::Map(values) => Some(values),
            _ => None,
        }
    }

    /// Whether this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Number of list/map levels, `0` for scalars.
    ///
    /// Stops descending once `MAX_NESTING_DEPTH` is exceeded.
    pub fn depth(&self) -> usize {
        self.depth_bounded(0)
    }

    fn depth_bounded(&self, current: usize) -> usize {
        if current > MAX_NESTING_DEPTH {
            return current;
        }
        match self {
            Self::List(values) => values
                .iter()
                .map(|value| value.depth_bounded(current + 1))
                .max()
                .unwrap_or(current + 1),
            Self::Map(values) => values
                .values()
                .map(|value| value.depth_bounded(current + 1))
                .max()
                .unwrap_or(current + 1),
            _ => current,
        }
    }

    /// Fail if this value nests deeper than `MAX_NESTING_DEPTH`.
    pub fn validate_depth(&self) -> Result<()> {
        if self.depth() > MAX_NESTING_DEPTH {
            return Err(Error::validation(format!(
                "value nests deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        Ok(())
    }

    /// Fail if this value nests too deep or holds a number that is not decimal text.
    pub fn validate(&self) -> Result<()> {
        self.validate_depth()?;
        self.validate_numbers()
    }

    fn validate_numbers(&self) -> Result<()> {
        match self {
            Self::Number(number) if !Number::is_decimal(number.as_str()) => Err(
                Error::validation(format!("`{number}` is not a decimal number")),
            ),
            Self::List(values) => values.iter().try_for_each(Self::validate_numbers),
            Self::Map(values) => values.values().try_for_each(Self::validate_numbers),
            _ => Ok(()),
        }
    }
}

/// Validate every attribute of `item`.
pub(crate) fn validate_item(item: &Item) -> Result<()> {
    for (name, value) in item {
        value
            .validate()
            .map_err(|error| Error::validation(format!("attribute `{name}`: {error}")))?;
    }
    Ok(())
}

impl From<AttributeValue> for proto::Value {
    fn from(value: AttributeValue) -> Self {
        use proto::value::Kind;

        let kind = match value {
            AttributeValue::String(value) => Kind::StringValue(value),
            AttributeValue::Number(number) => Kind::NumberValue(number.into_string()),
            AttributeValue::Bool(value) => Kind::BoolValue(value),
            AttributeValue::Binary(value) => Kind::BinaryValue(value.to_vec()),
            AttributeValue::Null => Kind::NullValue(true),
            AttributeValue::List(values) => Kind::ListValue(proto::ListValue {
                items: values.into_iter().map(Into::into).collect(),
            }),
            AttributeValue::Map(values) => Kind::MapValue(proto::MapValue {
                fields: to_proto_map(values),
            }),
        };
        Self { kind: Some(kind) }
    }
}

fn malformed(message: impl Into<String>) -> Error {
    TransportError::Malformed(message.into()).into()
}

fn from_proto(value: proto::Value, depth: usize) -> Result<AttributeValue> {
    use proto::value::Kind;

    if depth > MAX_NESTING_DEPTH {
        return Err(malformed(format!(
            "value nests deeper than {MAX_NESTING_DEPTH} levels"
        )));
    }
    let value = match value.kind {
        Some(Kind::StringValue(value)) => AttributeValue::String(value),
        Some(Kind::NumberValue(text)) => AttributeValue::Number(
            Number::try_from(text).map_err(|error| malformed(error.to_string()))?,
        ),
        Some(Kind::BoolValue(value)) => AttributeValue::Bool(value),
        Some(Kind::BinaryValue(value)) => AttributeValue::Binary(value.into()),
        Some(Kind::NullValue(_)) => AttributeValue::Null,
        Some(Kind::ListValue(list)) => AttributeValue::List(
            list.items
                .into_iter()
                .map(|value| from_proto(value, depth + 1))
                .collect::<Result<_>>()?,
        ),
        Some(Kind::MapValue(map)) => AttributeValue::Map(
            map.fields
                .into_iter()
                .map(|(name, value)| Ok((name, from_proto(value, depth + 1)?)))
                .collect::<Result<_>>()?,
        ),
        None => return Err(malformed("value without a kind")),
    };
    Ok(value)
}

impl TryFrom<proto::Value> for AttributeValue {
    type Error = Error;

    fn try_from(value: proto::Value) -> Result<Self> {
        from_proto(value, 0)
    }
}

pub(crate) fn to_proto_map(
    values: collections::HashMap<String, AttributeValue>,
) -> collections::HashMap<String, proto::Value> {
    values
        .into_iter()
        .map(|(name, value)| (name, value.into()))
        .collect()
}

pub(crate) fn to_proto_item(item: Item) -> proto::Item {
    proto::Item {
        attributes: to_proto_map(item),
    }
}

pub(crate) fn from_proto_item(item: proto::Item) -> Result<Item> {
    item.attributes
        .into_iter()
        .map(|(name, value)| Ok((name, from_proto(value, 0)?)))
        .collect()
}

pub(crate) fn from_proto_items(items: Vec<proto::Item>) -> Result<Vec<Item>> {
    items.into_iter().map(from_proto_item).collect()
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Bytes> for AttributeValue {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Number> for AttributeValue {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<AttributeValue>> From<collections::HashMap<String, T>> for AttributeValue {
    fn from(values: collections::HashMap<String, T>) -> Self {
        Self::Map(
            values
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
        )
    }
}

impl<T: Into<AttributeValue>> From<IndexMap<String, T>> for AttributeValue {
    fn from(values: IndexMap<String, T>) -> Self {
        Self::Map(
            values
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
        )
    }
}

fn mismatch(expected: &str, actual: &AttributeValue) -> Error {
    Error::validation(format!(
        "expected a {expected} value, found {}",
        actual.type_name()
    ))
}

impl TryFrom<AttributeValue> for String {
    type Error = Error;

    fn try_from(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::String(value) => Ok(value),
            other => Err(mismatch("S", &other)),
        }
    }
}

impl TryFrom<AttributeValue> for bool {
    type Error = Error;

    fn try_from(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Bool(value) => Ok(value),
            other => Err(mismatch("BOOL", &other)),
        }
    }
}

impl TryFrom<AttributeValue> for Bytes {
    type Error = Error;

    fn try_from(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Binary(value) => Ok(value),
            other => Err(mismatch("B", &other)),
        }
    }
}

impl TryFrom<AttributeValue> for Number {
    type Error = Error;

    fn try_from(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Number(value) => Ok(value),
            other => Err(mismatch("N", &other)),
        }
    }
}

macro_rules! impl_try_from_number {
    ($($native:ty),*) => {
        $(
            impl TryFrom<AttributeValue> for $native {
                type Error = Error;

                fn try_from(value: AttributeValue) -> Result<Self> {
                    let number = Number::try_from(value)?;
                    number.as_str().parse().map_err(|_| {
                        Error::validation(format!(
                            "`{number}` does not fit in {}",
                            stringify!($native)
                        ))
                    })
                }
            }
        )*
    };
}

impl_try_from_number!(i64, u64, f64);

impl TryFrom<AttributeValue> for Vec<AttributeValue> {
    type Error = Error;

    fn try_from(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::List(values) => Ok(values),
            other => Err(mismatch("L", &other)),
        }
    }
}

impl TryFrom<AttributeValue> for collections::HashMap<String, AttributeValue> {
    type Error = Error;

    fn try_from(value: AttributeValue) -> Result<Self> {
        match value {
            AttributeValue::Map(values) => Ok(values),
            other => Err(mismatch("M", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn nested(depth: usize) -> AttributeValue {
        (0..depth).fold(AttributeValue::Null, |value, _| {
            AttributeValue::List(vec![value])
        })
    }

    #[rstest]
    #[case::integer("30")]
    #[case::negative("-7")]
    #[case::trailing_zeros("30.00")]
    #[case::fraction("0.125")]
    #[case::zero("0")]
    #[case::negative_zero_fraction("-0.5")]
    #[case::exponent("1e10")]
    #[case::signed_exponent("6.02E+23")]
    #[case::large("123456789012345678901234567890.123456789")]
    fn test_number_text_is_preserved(#[case] text: &str) {
        let number: Number = text.parse().unwrap();
        let value = AttributeValue::from(number);
        let back = Number::try_from(value).unwrap();
        assert_eq!(back.as_str(), text);
    }

    #[rstest]
    #[case::empty("")]
    #[case::sign_only("-")]
    #[case::letters("3O")]
    #[case::dangling_dot("1.")]
    #[case::leading_dot(".5")]
    #[case::plus("+1")]
    #[case::empty_exponent("1e")]
    #[case::nan("NaN")]
    #[case::leading_zero("007")]
    #[case::negative_leading_zero("-01.5")]
    fn test_number_rejects_non_decimal_text(#[case] text: &str) {
        assert!(text.parse::<Number>().unwrap_err().is_validation());
    }

    #[test]
    fn test_integer_conversion_round_trips() {
        let value = AttributeValue::from(30_i64);
        assert_eq!(value.as_number().unwrap().as_str(), "30");
        assert_eq!(i64::try_from(value).unwrap(), 30);
    }

    #[rstest]
    #[case::nan(f64::NAN)]
    #[case::infinity(f64::INFINITY)]
    fn test_non_finite_float_is_rejected(#[case] float: f64) {
        assert!(AttributeValue::try_from(float).is_err());
    }

    #[test]
    fn test_scalar_round_trips() {
        assert_eq!(
            String::try_from(AttributeValue::from("Alice")).unwrap(),
            "Alice"
        );
        assert!(bool::try_from(AttributeValue::from(true)).unwrap());
        assert_eq!(
            Bytes::try_from(AttributeValue::from(Bytes::from_static(b"\x00\x01"))).unwrap(),
            Bytes::from_static(b"\x00\x01")
        );
        assert!(AttributeValue::from(None::<String>).is_null());
    }

    #[test]
    fn test_nested_collections_round_trip() {
        let inner = collections::HashMap::from([
            ("count".to_string(), AttributeValue::from(2_u32)),
            ("labels".to_string(), AttributeValue::from(vec!["a", "b"])),
        ]);
        let value = AttributeValue::from(vec![AttributeValue::from(inner.clone())]);
        let list = Vec::<AttributeValue>::try_from(value).unwrap();
        let map = collections::HashMap::<String, AttributeValue>::try_from(list[0].clone()).unwrap();
        assert_eq!(map, inner);
    }

    #[test]
    fn test_type_mismatch_is_a_validation_error() {
        let error = String::try_from(AttributeValue::from(1_u8)).unwrap_err();
        assert!(error.is_validation());
    }

    #[rstest]
    #[case::scalar(0, true)]
    #[case::at_limit(MAX_NESTING_DEPTH, true)]
    #[case::over_limit(MAX_NESTING_DEPTH + 1, false)]
    #[case::far_over_limit(MAX_NESTING_DEPTH * 4, false)]
    fn test_depth_guard(#[case] depth: usize, #[case] ok: bool) {
        assert_eq!(nested(depth).validate_depth().is_ok(), ok);
    }

    #[test]
    fn test_proto_round_trip_keeps_number_text() {
        let value = AttributeValue::from(collections::HashMap::from([
            ("age".to_string(), AttributeValue::Number("30".parse().unwrap())),
            ("avatar".to_string(), AttributeValue::from(Bytes::from_static(b"\x89PNG"))),
            ("nickname".to_string(), AttributeValue::Null),
            ("tags".to_string(), AttributeValue::from(vec!["a", "b"])),
        ]));
        let wire: proto::Value = value.clone().into();
        assert_eq!(AttributeValue::try_from(wire).unwrap(), value);
    }

    #[rstest]
    #[case::missing_kind(proto::Value { kind: None })]
    #[case::bad_number(proto::Value {
        kind: Some(proto::value::Kind::NumberValue("thirty".to_string())),
    })]
    fn test_malformed_proto_value(#[case] wire: proto::Value) {
        let error = AttributeValue::try_from(wire).unwrap_err();
        assert!(matches!(error, Error::Transport(TransportError::Malformed(_))));
    }

    #[test]
    fn test_deep_proto_value_is_malformed() {
        let wire: proto::Value = nested(MAX_NESTING_DEPTH + 1).into();
        assert!(AttributeValue::try_from(wire).unwrap_err().is_transport());
    }

    #[test]
    fn test_unchecked_number_fails_validation() {
        let item = Item::from([(
            "age".to_string(),
            AttributeValue::Number(Number::unchecked("thirty".to_string())),
        )]);
        assert!(validate_item(&item).unwrap_err().is_validation());
    }
}
