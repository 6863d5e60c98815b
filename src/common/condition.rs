use crate::common::{expression::Expression, value::AttributeValue};

use indexmap::IndexMap;
use std::ops;

/// Separator for attribute path components.
const PATH_SEPARATOR: &str = ".";

/// Logical operator for combining conditions.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicalOperator {
    /// Logical AND - all conditions must be true.
    And,
    /// Logical OR - at least one condition must be true.
    Or,
}

impl ops::Deref for LogicalOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Condition on a single attribute.
///
/// ```rust
/// use keystone_client::common::condition;
///
/// let eq = condition::Condition::Equals("value");
/// let gt = condition::Condition::GreaterThan(100);
/// let exists: condition::Condition<i32> = condition::Condition::Exists;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T = AttributeValue> {
    /// Attribute begins with the given prefix.
    BeginsWith(T),
    /// Attribute lies between two values (inclusive).
    Between(T, T),
    /// Attribute contains the value.
    Contains(T),
    /// Attribute equals the value.
    Equals(T),
    /// Attribute is greater than the value.
    GreaterThan(T),
    /// Attribute is greater than or equal to the value.
    GreaterThanOrEqual(T),
    /// Attribute equals one of the values.
    In(Vec<T>),
    /// Attribute is less than the value.
    LessThan(T),
    /// Attribute is less than or equal to the value.
    LessThanOrEqual(T),
    /// Attribute does not equal the value.
    NotEqual(T),
    /// Attribute is present.
    Exists,
    /// Attribute is absent.
    NotExists,
}

/// Turn an attribute name into a fragment usable inside a `:placeholder`.
fn placeholder_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl<T: Into<AttributeValue>> Condition<T> {
    fn get_expression(self, name: &str, path: &str, index: &mut usize) -> Expression {
        let stem = placeholder_stem(name);
        let mut expression = Expression::default();
        let mut placeholder = |suffix: &str, value: T, expression: &mut Expression| {
            let placeholder = format!(":{stem}_{suffix}{index}");
            *index += 1;
            expression.bind(placeholder.clone(), value.into());
            placeholder
        };
        expression.text = match self {
            Self::BeginsWith(prefix) => {
                let value = placeholder("begins_with", prefix, &mut expression);
                format!("begins_with({path}, {value})")
            }
            Self::Between(lower, upper) => {
                let lower = placeholder("between", lower, &mut expression);
                let upper = placeholder("between", upper, &mut expression);
                format!("{path} BETWEEN {lower} AND {upper}")
            }
            Self::Contains(value) => {
                let value = placeholder("contains", value, &mut expression);
                format!("contains({path}, {value})")
            }
            Self::Equals(value) => {
                let value = placeholder("eq", value, &mut expression);
                format!("{path} = {value}")
            }
            Self::GreaterThan(value) => {
                let value = placeholder("gt", value, &mut expression);
                format!("{path} > {value}")
            }
            Self::GreaterThanOrEqual(value) => {
                let value = placeholder("gte", value, &mut expression);
                format!("{path} >= {value}")
            }
            Self::In(values) => {
                let placeholders: Vec<_> = values
                    .into_iter()
                    .map(|value| placeholder("in", value, &mut expression))
                    .collect();
                format!("{path} IN ({})", placeholders.join(", "))
            }
            Self::LessThan(value) => {
                let value = placeholder("lt", value, &mut expression);
                format!("{path} < {value}")
            }
            Self::LessThanOrEqual(value) => {
                let value = placeholder("lte", value, &mut expression);
                format!("{path} <= {value}")
            }
            Self::NotEqual(value) => {
                let value = placeholder("ne", value, &mut expression);
                format!("{path} <> {value}")
            }
            Self::Exists => format!("attribute_exists({path})"),
            Self::NotExists => format!("attribute_not_exists({path})"),
        };
        expression
    }
}

/// Condition applied to a named attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition<T = AttributeValue> {
    /// The condition to apply to the attribute.
    pub condition: Condition<T>,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

/// Tree of conditions with logical operators.
///
/// ```rust
/// use keystone_client::common::{condition, expression::Expression};
///
/// let map = condition::ConditionMap::Leaves(
///     condition::LogicalOperator::And,
///     vec![
///         condition::KeyCondition {
///             name: "status".to_string(),
///             condition: condition::Condition::Equals("active"),
///         },
///     ],
/// );
/// let expression: Expression = map.into();
/// assert_eq!(expression.text(), "status = :status_eq0");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionMap<T = AttributeValue> {
    /// Leaf conditions - flat list of conditions combined with the logical operator.
    Leaves(LogicalOperator, Vec<KeyCondition<T>>),
    /// Node conditions - nested conditions for hierarchical attribute paths.
    Node(LogicalOperator, IndexMap<String, ConditionMap<T>>),
}

impl<T: Into<AttributeValue>> From<ConditionMap<T>> for Expression {
    fn from(condition_map: ConditionMap<T>) -> Self {
        condition_map.get_expression_recursive(&[], &mut 0, false)
    }
}

impl<T: Into<AttributeValue>> ConditionMap<T> {
    fn get_expression_recursive(
        self,
        keys: &[String],
        index: &mut usize,
        is_nested: bool,
    ) -> Expression {
        let (operator, expressions): (_, Vec<_>) = match self {
            Self::Leaves(operator, key_conditions) => {
                let expressions = key_conditions
                    .into_iter()
                    .map(|key_condition| {
                        let path = path(keys, &key_condition.name);
                        key_condition
                            .condition
                            .get_expression(&key_condition.name, &path, index)
                    })
                    .collect();
                (operator, expressions)
            }
            Self::Node(operator, map) => {
                let expressions = map
                    .into_iter()
                    .map(|(key, value)| {
                        let mut new_keys = keys.to_vec();
                        new_keys.push(key);
                        value.get_expression_recursive(&new_keys, index, true)
                    })
                    .collect();
                (operator, expressions)
            }
        };
        let is_composite = is_nested && expressions.len() > 1;
        let mut expression = Expression::merge(&operator, expressions);
        if is_composite {
            expression.text = format!("({})", expression.text);
        }
        expression
    }
}

fn path(keys: &[String], name: &str) -> String {
    let mut components: Vec<&str> = keys.iter().map(String::as_str).collect();
    components.push(name);
    components.join(PATH_SEPARATOR)
}
