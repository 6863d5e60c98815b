use crate::common::{
    expression::{self, Bindings, Expression},
    key::Key,
    value::{self, AttributeValue},
};
use crate::error::{Error, Result};
use crate::proto;

use std::collections;

/// Filter, index, limit and cursor shared by Query and Scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadArgs {
    pub(crate) filter: Option<String>,
    pub(crate) bindings: Bindings,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<u32>,
    pub(crate) exclusive_start_key: Option<Key>,
}

impl MultipleReadArgs {
    pub(crate) fn set_filter(&mut self, filter: Expression) {
        let (text, bindings) = filter.into_parts();
        self.filter = Some(text);
        self.bindings.extend(bindings);
    }

    pub(crate) fn bind(&mut self, name: String, value: AttributeValue) {
        self.bindings.insert(expression::placeholder_name(name), value);
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.filter {
            expression::validate_text("filter expression", filter, &self.bindings)?;
        }
        expression::validate_bindings(&self.bindings)?;
        if self.limit == Some(0) {
            return Err(Error::validation("limit must be greater than zero"));
        }
        if let Some(exclusive_start_key) = &self.exclusive_start_key {
            exclusive_start_key.validate()?;
        }
        Ok(())
    }
}

/// Wire form of `MultipleReadArgs`.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) filter_expression: Option<String>,
    pub(crate) expression_values: collections::HashMap<String, proto::Value>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<u32>,
    pub(crate) exclusive_start_key: Option<proto::Key>,
}

impl From<MultipleReadArgs> for MultipleReadInput {
    fn from(multiple_read_args: MultipleReadArgs) -> Self {
        Self {
            filter_expression: multiple_read_args.filter,
            expression_values: value::to_proto_map(multiple_read_args.bindings),
            index_name: multiple_read_args.index_name,
            limit: multiple_read_args.limit,
            exclusive_start_key: multiple_read_args.exclusive_start_key.map(Into::into),
        }
    }
}

/// Add the filter, index, limit and cursor mutators to a builder holding
/// `multiple_read_args: MultipleReadArgs`.
macro_rules! impl_multiple_read_mutators {
    ($builder:ty) => {
        impl $builder {
            /// Filter the results; replaces any earlier filter.
            ///
            /// Bindings carried by the expression are added to the request. Bindings of a
            /// replaced filter are kept and still sent, even if no longer referenced.
            pub fn with_filter(
                mut self,
                filter: impl Into<$crate::common::expression::Expression>,
            ) -> Self {
                self.multiple_read_args.set_filter(filter.into());
                self
            }

            /// Bind a `:placeholder` used by the filter.
            pub fn with_binding(
                mut self,
                name: impl Into<String>,
                value: impl Into<$crate::common::value::AttributeValue>,
            ) -> Self {
                self.multiple_read_args.bind(name.into(), value.into());
                self
            }

            /// Read from a secondary index instead of the base table.
            pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
                self.multiple_read_args.index_name = Some(index_name.into());
                self
            }

            /// Cap the number of items evaluated.
            pub fn with_limit(mut self, limit: u32) -> Self {
                self.multiple_read_args.limit = Some(limit);
                self
            }

            /// Resume after `exclusive_start_key`, usually a previous `last_evaluated_key`.
            pub fn start_after(mut self, exclusive_start_key: $crate::common::key::Key) -> Self {
                self.multiple_read_args.exclusive_start_key = Some(exclusive_start_key);
                self
            }
        }
    };
}

pub(crate) use impl_multiple_read_mutators;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::default(MultipleReadArgs::default(), true)]
    #[case::bound_filter(
        MultipleReadArgs {
            filter: Some("age > :min".to_string()),
            bindings: Bindings::from([(":min".to_string(), AttributeValue::from(18))]),
            ..Default::default()
        },
        true
    )]
    #[case::unbound_filter(
        MultipleReadArgs {
            filter: Some("age > :min".to_string()),
            ..Default::default()
        },
        false
    )]
    #[case::zero_limit(
        MultipleReadArgs {
            limit: Some(0),
            ..Default::default()
        },
        false
    )]
    #[case::empty_cursor(
        MultipleReadArgs {
            exclusive_start_key: Some(Key::new("")),
            ..Default::default()
        },
        false
    )]
    fn test_multiple_read_args_validation(#[case] args: MultipleReadArgs, #[case] ok: bool) {
        assert_eq!(args.validate().is_ok(), ok);
    }

    #[test]
    fn test_multiple_read_input() {
        let mut args = MultipleReadArgs {
            index_name: Some("by-email".to_string()),
            limit: Some(10),
            exclusive_start_key: Some(Key::new("a").with_sort_key("b")),
            ..Default::default()
        };
        args.set_filter(Expression::new("active = :yes").with_binding(":yes", true));
        let input = MultipleReadInput::from(args);
        assert_eq!(
            input,
            MultipleReadInput {
                filter_expression: Some("active = :yes".to_string()),
                expression_values: collections::HashMap::from([(
                    ":yes".to_string(),
                    AttributeValue::from(true).into()
                )]),
                index_name: Some("by-email".to_string()),
                limit: Some(10),
                exclusive_start_key: Some(proto::Key {
                    partition_key: b"a".to_vec(),
                    sort_key: Some(b"b".to_vec()),
                }),
            }
        );
    }

    #[test]
    fn test_replaced_filter_keeps_its_bindings() {
        let mut args = MultipleReadArgs::default();
        args.set_filter(Expression::new("status = :old").with_binding(":old", "open"));
        args.set_filter(Expression::new("age > :min").with_binding(":min", 18));
        args.validate().unwrap();
        let input = MultipleReadInput::from(args);
        assert_eq!(input.filter_expression.as_deref(), Some("age > :min"));
        let mut names: Vec<_> = input.expression_values.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec![":min".to_string(), ":old".to_string()]);
    }
}
