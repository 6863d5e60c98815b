use crate::client::Client;
use crate::common::{
    expression::{self, Bindings, Expression},
    key::Key,
    value::{self, AttributeValue, Item},
};
use crate::error::{self, Error, Result};
use crate::proto;

/// One entry of a transactional write.
#[derive(Clone, Debug, PartialEq)]
pub enum TransactWriteItem {
    /// Create or replace an item.
    Put {
        /// Where the item is written.
        key: Key,
        /// The attributes to write.
        item: Item,
        /// Guard evaluated before the write.
        condition: Option<Expression>,
    },
    /// Apply an update expression to an item.
    Update {
        /// The item to update.
        key: Key,
        /// The update expression.
        update_expression: Expression,
        /// Guard evaluated before the update.
        condition: Option<Expression>,
    },
    /// Remove an item.
    Delete {
        /// The item to remove.
        key: Key,
        /// Guard evaluated before the delete.
        condition: Option<Expression>,
    },
    /// Require a condition on an item without writing it.
    ConditionCheck {
        /// The item to check.
        key: Key,
        /// The condition that must hold.
        condition: Expression,
    },
}

impl TransactWriteItem {
    fn key(&self) -> &Key {
        match self {
            Self::Put { key, .. }
            | Self::Update { key, .. }
            | Self::Delete { key, .. }
            | Self::ConditionCheck { key, .. } => key,
        }
    }

    /// Move the entry's bindings into `bindings`, leaving only expression text behind.
    fn take_bindings(&mut self, bindings: &mut Bindings) -> Result<()> {
        let expressions = match self {
            Self::Put { condition, .. } | Self::Delete { condition, .. } => {
                condition.iter_mut().collect::<Vec<_>>()
            }
            Self::Update {
                update_expression,
                condition,
                ..
            } => {
                let mut expressions = vec![update_expression];
                expressions.extend(condition.iter_mut());
                expressions
            }
            Self::ConditionCheck { condition, .. } => vec![condition],
        };
        for expression in expressions {
            let incoming = std::mem::take(&mut expression.bindings);
            expression::merge_bindings(bindings, incoming)?;
        }
        Ok(())
    }

    fn validate(&self, bindings: &Bindings) -> Result<()> {
        self.key().validate()?;
        match self {
            Self::Put {
                item, condition, ..
            } => {
                value::validate_item(item)?;
                validate_condition(condition.as_ref(), bindings)
            }
            Self::Update {
                update_expression,
                condition,
                ..
            } => {
                expression::validate_text("update expression", update_expression.text(), bindings)?;
                validate_condition(condition.as_ref(), bindings)
            }
            Self::Delete { condition, .. } => validate_condition(condition.as_ref(), bindings),
            Self::ConditionCheck { condition, .. } => validate_condition(Some(condition), bindings),
        }
    }
}

fn validate_condition(condition: Option<&Expression>, bindings: &Bindings) -> Result<()> {
    match condition {
        Some(condition) => {
            expression::validate_text("condition expression", condition.text(), bindings)
        }
        None => Ok(()),
    }
}

fn text(expression: Option<Expression>) -> Option<String> {
    expression.map(|expression| expression.text)
}

impl From<TransactWriteItem> for proto::TransactWriteItem {
    fn from(transact_write_item: TransactWriteItem) -> Self {
        use proto::transact_write_item::Item as Entry;

        let item = match transact_write_item {
            TransactWriteItem::Put {
                key,
                item,
                condition,
            } => {
                let key: proto::Key = key.into();
                Entry::Put(proto::TransactPut {
                    partition_key: key.partition_key,
                    sort_key: key.sort_key,
                    item: Some(value::to_proto_item(item)),
                    condition_expression: text(condition),
                })
            }
            TransactWriteItem::Update {
                key,
                update_expression,
                condition,
            } => {
                let key: proto::Key = key.into();
                Entry::Update(proto::TransactUpdate {
                    partition_key: key.partition_key,
                    sort_key: key.sort_key,
                    update_expression: update_expression.text,
                    condition_expression: text(condition),
                })
            }
            TransactWriteItem::Delete { key, condition } => {
                let key: proto::Key = key.into();
                Entry::Delete(proto::TransactDelete {
                    partition_key: key.partition_key,
                    sort_key: key.sort_key,
                    condition_expression: text(condition),
                })
            }
            TransactWriteItem::ConditionCheck { key, condition } => {
                let key: proto::Key = key.into();
                Entry::ConditionCheck(proto::ConditionCheck {
                    partition_key: key.partition_key,
                    sort_key: key.sort_key,
                    condition_expression: condition.text,
                })
            }
        };
        Self { item: Some(item) }
    }
}

/// A validated transactional write.
///
/// The service applies every entry or none of them; entries are sent in
/// submission order.
///
/// ```rust,no_run
/// use keystone_client::{Client, Expression, Item, Key, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let transfer = write::transact_write_items::TransactWriteItems::builder()
///     .condition_check(
///         Key::new("account#1"),
///         Expression::new("balance >= :amount").with_binding(":amount", 100),
///     )
///     .update(Key::new("account#1"), "SET balance = balance - :amount")
///     .update(Key::new("account#2"), "SET balance = balance + :amount")
///     .build()?;
/// transfer.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransactWriteItems {
    pub(crate) items: Vec<TransactWriteItem>,
    pub(crate) bindings: Bindings,
}

impl TransactWriteItems {
    /// Start building a transactional write.
    pub fn builder() -> TransactWriteItemsBuilder {
        TransactWriteItemsBuilder::default()
    }

    /// The entries, in submission order.
    pub fn items(&self) -> &[TransactWriteItem] {
        &self.items
    }

    /// Execute the transactional write.
    pub async fn send(self, client: &Client) -> Result<TransactWriteItemsOutput> {
        client.transact_write(self).await
    }
}

/// Accumulates a transactional write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactWriteItemsBuilder {
    items: Vec<TransactWriteItem>,
    bindings: Bindings,
}

impl TransactWriteItemsBuilder {
    /// Append an entry.
    pub fn with_item(mut self, item: TransactWriteItem) -> Self {
        self.items.push(item);
        self
    }

    /// Append an unconditional put.
    pub fn put(self, key: Key, item: Item) -> Self {
        self.with_item(TransactWriteItem::Put {
            key,
            item,
            condition: None,
        })
    }

    /// Append a put guarded by `condition`.
    pub fn put_if(self, key: Key, item: Item, condition: impl Into<Expression>) -> Self {
        self.with_item(TransactWriteItem::Put {
            key,
            item,
            condition: Some(condition.into()),
        })
    }

    /// Append an update.
    pub fn update(self, key: Key, update_expression: impl Into<Expression>) -> Self {
        self.with_item(TransactWriteItem::Update {
            key,
            update_expression: update_expression.into(),
            condition: None,
        })
    }

    /// Append an update guarded by `condition`.
    pub fn update_if(
        self,
        key: Key,
        update_expression: impl Into<Expression>,
        condition: impl Into<Expression>,
    ) -> Self {
        self.with_item(TransactWriteItem::Update {
            key,
            update_expression: update_expression.into(),
            condition: Some(condition.into()),
        })
    }

    /// Append an unconditional delete.
    pub fn delete(self, key: Key) -> Self {
        self.with_item(TransactWriteItem::Delete {
            key,
            condition: None,
        })
    }

    /// Append a delete guarded by `condition`.
    pub fn delete_if(self, key: Key, condition: impl Into<Expression>) -> Self {
        self.with_item(TransactWriteItem::Delete {
            key,
            condition: Some(condition.into()),
        })
    }

    /// Append a condition check.
    pub fn condition_check(self, key: Key, condition: impl Into<Expression>) -> Self {
        self.with_item(TransactWriteItem::ConditionCheck {
            key,
            condition: condition.into(),
        })
    }

    /// Bind a `:placeholder` shared by every entry.
    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.bindings
            .insert(expression::placeholder_name(name.into()), value.into());
        self
    }

    /// Validate and freeze the request.
    ///
    /// Entry bindings are pooled; a placeholder bound to two different values fails.
    pub fn build(mut self) -> Result<TransactWriteItems> {
        if self.items.is_empty() {
            return Err(Error::validation(
                "a transactional write needs at least one item",
            ));
        }
        for item in &mut self.items {
            item.take_bindings(&mut self.bindings)?;
        }
        for item in &self.items {
            item.validate(&self.bindings)?;
        }
        expression::validate_bindings(&self.bindings)?;
        Ok(TransactWriteItems {
            items: self.items,
            bindings: self.bindings,
        })
    }
}

impl From<TransactWriteItems> for proto::TransactWriteRequest {
    fn from(transact_write_items: TransactWriteItems) -> Self {
        Self {
            items: transact_write_items
                .items
                .into_iter()
                .map(Into::into)
                .collect(),
            expression_values: value::to_proto_map(transact_write_items.bindings),
        }
    }
}

/// Result of a transactional write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactWriteItemsOutput {
    /// Whether the transaction committed.
    pub success: bool,
}

impl TryFrom<proto::TransactWriteResponse> for TransactWriteItemsOutput {
    type Error = Error;

    fn try_from(response: proto::TransactWriteResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        Ok(Self {
            success: response.success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_transact_write_items_to_request() {
        let transact_write_items = TransactWriteItems::builder()
            .condition_check(
                Key::new("account#1"),
                Expression::new("balance >= :amount").with_binding(":amount", 100),
            )
            .update(Key::new("account#1"), "SET balance = balance - :amount")
            .put_if(
                Key::new("ledger").with_sort_key("0001"),
                Item::from([("amount".to_string(), AttributeValue::from(100))]),
                "attribute_not_exists(amount)",
            )
            .delete(Key::new("hold#1"))
            .build()
            .unwrap();
        let request: proto::TransactWriteRequest = transact_write_items.into();
        assert_eq!(request.items.len(), 4);
        assert_eq!(
            request.expression_values,
            std::collections::HashMap::from([(
                ":amount".to_string(),
                AttributeValue::from(100).into()
            )])
        );
        match request.items[0].item.as_ref().unwrap() {
            proto::transact_write_item::Item::ConditionCheck(check) => {
                assert_eq!(check.condition_expression, "balance >= :amount");
            }
            other => panic!("unexpected entry {other:?}"),
        }
        match request.items[2].item.as_ref().unwrap() {
            proto::transact_write_item::Item::Put(put) => {
                assert_eq!(put.sort_key, Some(b"0001".to_vec()));
                assert_eq!(
                    put.condition_expression.as_deref(),
                    Some("attribute_not_exists(amount)")
                );
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[rstest]
    #[case::empty(TransactWriteItems::builder())]
    #[case::empty_partition_key(TransactWriteItems::builder().delete(Key::new("")))]
    #[case::unbound_placeholder(
        TransactWriteItems::builder().update(Key::new("a"), "SET b = :b")
    )]
    #[case::blank_update(TransactWriteItems::builder().update(Key::new("a"), ""))]
    #[case::conflicting_bindings(
        TransactWriteItems::builder()
            .condition_check(Key::new("a"), Expression::new("b = :v").with_binding(":v", 1))
            .condition_check(Key::new("c"), Expression::new("d = :v").with_binding(":v", 2))
    )]
    fn test_build_rejects(#[case] builder: TransactWriteItemsBuilder) {
        assert!(builder.build().unwrap_err().is_validation());
    }

    #[test]
    fn test_shared_binding() {
        let transact_write_items = TransactWriteItems::builder()
            .update(Key::new("a"), "SET b = :v")
            .delete_if(Key::new("c"), "d = :v")
            .with_binding("v", 1)
            .build();
        assert!(transact_write_items.is_ok());
    }
}
