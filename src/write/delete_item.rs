use crate::client::Client;
use crate::common::key::Key;
use crate::error::{self, Result};
use crate::proto;
use crate::write;

use bytes::Bytes;

/// A validated delete item request.
///
/// ```rust,no_run
/// use keystone_client::{Client, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item = write::delete_item::DeleteItem::builder("user#123")
///     .with_condition("attribute_exists(email)")
///     .build()?;
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteItem {
    pub(crate) key: Key,
    pub(crate) write_args: write::common::WriteArgs,
}

impl DeleteItem {
    /// Start building a delete for the given partition key.
    pub fn builder(partition_key: impl Into<Bytes>) -> DeleteItemBuilder {
        DeleteItemBuilder {
            key: Key::new(partition_key),
            write_args: write::common::WriteArgs::default(),
        }
    }

    /// The key of the item to delete.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Execute the delete item operation.
    pub async fn send(self, client: &Client) -> Result<DeleteItemOutput> {
        client.delete(self).await
    }
}

/// Accumulates a delete item request.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteItemBuilder {
    key: Key,
    write_args: write::common::WriteArgs,
}

write::common::impl_write_mutators!(DeleteItemBuilder);

impl DeleteItemBuilder {
    /// Validate and freeze the request.
    pub fn build(self) -> Result<DeleteItem> {
        self.key.validate()?;
        self.write_args.validate()?;
        Ok(DeleteItem {
            key: self.key,
            write_args: self.write_args,
        })
    }
}

impl From<DeleteItem> for proto::DeleteRequest {
    fn from(delete_item: DeleteItem) -> Self {
        let key: proto::Key = delete_item.key.into();
        let write_input: write::common::WriteInput = delete_item.write_args.into();
        Self {
            partition_key: key.partition_key,
            sort_key: key.sort_key,
            condition_expression: write_input.condition_expression,
            expression_values: write_input.expression_values,
        }
    }
}

/// Result of a delete item operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteItemOutput {
    /// Whether the service applied the delete.
    pub success: bool,
}

impl TryFrom<proto::DeleteResponse> for DeleteItemOutput {
    type Error = error::Error;

    fn try_from(response: proto::DeleteResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        Ok(Self {
            success: response.success,
        })
    }
}
