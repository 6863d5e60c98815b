use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, AttributeValue, Item, Number},
};
use crate::error::{self, Result};
use crate::proto;
use crate::write;

use bytes::Bytes;

/// A validated put item request.
///
/// ```rust,no_run
/// use keystone_client::{Client, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem::builder("user#123")
///     .with_string("name", "Alice")
///     .with_number("age", "30")
///     .with_condition("attribute_not_exists(name)")
///     .build()?;
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PutItem {
    pub(crate) key: Key,
    pub(crate) item: Item,
    pub(crate) write_args: write::common::WriteArgs,
}

impl PutItem {
    /// Start building a put for the given partition key.
    pub fn builder(partition_key: impl Into<Bytes>) -> PutItemBuilder {
        PutItemBuilder {
            key: Key::new(partition_key),
            item: Item::new(),
            write_args: write::common::WriteArgs::default(),
        }
    }

    /// The key the item is written under.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The attributes to write.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Execute the put item operation.
    pub async fn send(self, client: &Client) -> Result<PutItemOutput> {
        client.put(self).await
    }
}

/// Accumulates a put item request.
#[derive(Clone, Debug, PartialEq)]
pub struct PutItemBuilder {
    key: Key,
    item: Item,
    write_args: write::common::WriteArgs,
}

write::common::impl_write_mutators!(PutItemBuilder);

impl PutItemBuilder {
    /// Set an attribute to any value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.item.insert(name.into(), value.into());
        self
    }

    /// Set a string attribute.
    pub fn with_string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_attribute(name, AttributeValue::String(value.into()))
    }

    /// Set a number attribute from its decimal text; the text is checked by `build()`.
    pub fn with_number(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_attribute(name, AttributeValue::Number(Number::unchecked(value.into())))
    }

    /// Set a boolean attribute.
    pub fn with_bool(self, name: impl Into<String>, value: bool) -> Self {
        self.with_attribute(name, value)
    }

    /// Set a binary attribute.
    pub fn with_binary(self, name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        self.with_attribute(name, AttributeValue::Binary(value.into()))
    }

    /// Set an attribute to null.
    pub fn with_null(self, name: impl Into<String>) -> Self {
        self.with_attribute(name, AttributeValue::Null)
    }

    /// Set every attribute of `item`, overwriting attributes of the same name.
    pub fn with_item(mut self, item: Item) -> Self {
        self.item.extend(item);
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<PutItem> {
        self.key.validate()?;
        value::validate_item(&self.item)?;
        self.write_args.validate()?;
        Ok(PutItem {
            key: self.key,
            item: self.item,
            write_args: self.write_args,
        })
    }
}

impl From<PutItem> for proto::PutRequest {
    fn from(put_item: PutItem) -> Self {
        let key: proto::Key = put_item.key.into();
        let write_input: write::common::WriteInput = put_item.write_args.into();
        Self {
            partition_key: key.partition_key,
            sort_key: key.sort_key,
            item: Some(value::to_proto_item(put_item.item)),
            condition_expression: write_input.condition_expression,
            expression_values: write_input.expression_values,
        }
    }
}

/// Result of a put item operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PutItemOutput {
    /// Whether the service applied the write.
    pub success: bool,
}

impl TryFrom<proto::PutResponse> for PutItemOutput {
    type Error = error::Error;

    fn try_from(response: proto::PutResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        Ok(Self {
            success: response.success,
        })
    }
}
