use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, Item},
};
use crate::error::{self, Error, Result};
use crate::proto;

/// A validated batch get request.
///
/// Each key is read independently; missing items are simply absent from the output.
///
/// ```rust,no_run
/// use keystone_client::{Client, Key, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_get = read::batch_get_item::BatchGetItem::builder()
///     .with_key(Key::new("user#1"))
///     .with_key(Key::new("user#2").with_sort_key("profile"))
///     .build()?;
/// let output = batch_get.send(client).await?;
/// println!("{} items found", output.count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BatchGetItem {
    pub(crate) keys: Vec<Key>,
}

impl BatchGetItem {
    /// Start building a batch get.
    pub fn builder() -> BatchGetItemBuilder {
        BatchGetItemBuilder::default()
    }

    /// The requested keys, in submission order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Execute the batch get item operation.
    pub async fn send(self, client: &Client) -> Result<BatchGetItemOutput> {
        client.batch_get(self).await
    }
}

/// Accumulates a batch get request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItemBuilder {
    keys: Vec<Key>,
}

impl BatchGetItemBuilder {
    /// Append a key.
    pub fn with_key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Append several keys.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys.extend(keys);
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<BatchGetItem> {
        if self.keys.is_empty() {
            return Err(Error::validation("a batch get needs at least one key"));
        }
        for key in &self.keys {
            key.validate()?;
        }
        Ok(BatchGetItem { keys: self.keys })
    }
}

impl From<BatchGetItem> for proto::BatchGetRequest {
    fn from(batch_get_item: BatchGetItem) -> Self {
        Self {
            keys: batch_get_item.keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of a batch get operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItemOutput {
    /// The items found.
    pub items: Vec<Item>,
    /// Number of items found.
    pub count: u32,
    /// Keys the service did not process; resubmit them to retry.
    pub unprocessed_keys: Vec<Key>,
}

impl TryFrom<proto::BatchGetResponse> for BatchGetItemOutput {
    type Error = Error;

    fn try_from(response: proto::BatchGetResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        Ok(Self {
            items: value::from_proto_items(response.items)?,
            count: response.count,
            unprocessed_keys: response
                .unprocessed_keys
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}
