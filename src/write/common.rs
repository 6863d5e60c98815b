use crate::common::{
    expression::{self, Bindings, Expression},
    value::{self, AttributeValue},
};
use crate::error::Result;
use crate::proto;

use std::collections;

/// Condition and bindings shared by Put, Delete and Update.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteArgs {
    pub(crate) condition: Option<String>,
    pub(crate) bindings: Bindings,
}

impl WriteArgs {
    pub(crate) fn set_condition(&mut self, condition: Expression) {
        let (text, bindings) = condition.into_parts();
        self.condition = Some(text);
        self.bindings.extend(bindings);
    }

    pub(crate) fn bind(&mut self, name: String, value: AttributeValue) {
        self.bindings.insert(expression::placeholder_name(name), value);
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(condition) = &self.condition {
            expression::validate_text("condition expression", condition, &self.bindings)?;
        }
        expression::validate_bindings(&self.bindings)
    }
}

/// Wire form of `WriteArgs`.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_values: collections::HashMap<String, proto::Value>,
}

impl From<WriteArgs> for WriteInput {
    fn from(write_args: WriteArgs) -> Self {
        Self {
            condition_expression: write_args.condition,
            expression_values: value::to_proto_map(write_args.bindings),
        }
    }
}

/// Add `with_sort_key`, `with_condition` and `with_binding` to a builder
/// holding `key: Key` and `write_args: WriteArgs`.
macro_rules! impl_write_mutators {
    ($builder:ty) => {
        impl $builder {
            /// Set the sort key.
            pub fn with_sort_key(mut self, sort_key: impl Into<::bytes::Bytes>) -> Self {
                self.key.set_sort_key(sort_key.into());
                self
            }

            /// Guard the write with a condition expression; replaces any earlier condition.
            ///
            /// Bindings carried by the expression are added to the request. Bindings of a
            /// replaced condition are kept and still sent, even if no longer referenced.
            pub fn with_condition(
                mut self,
                condition: impl Into<$crate::common::expression::Expression>,
            ) -> Self {
                self.write_args.set_condition(condition.into());
                self
            }

            /// Bind a `:placeholder` used by the request's expressions.
            pub fn with_binding(
                mut self,
                name: impl Into<String>,
                value: impl Into<$crate::common::value::AttributeValue>,
            ) -> Self {
                self.write_args.bind(name.into(), value.into());
                self
            }
        }
    };
}

pub(crate) use impl_write_mutators;
