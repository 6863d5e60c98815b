use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, Item},
};
use crate::error::{self, Error, Result, TransportError};
use crate::proto;

/// A single request within a batch write operation.
///
/// Each request can be either a put (create/replace) or a delete (remove).
#[derive(Clone, Debug, PartialEq)]
pub enum BatchWriteItemRequest {
    /// Put item request - creates or replaces an item.
    Put {
        /// Where the item is written.
        key: Key,
        /// The attributes to write.
        item: Item,
    },
    /// Delete item request - removes an item by its primary key.
    Delete {
        /// The item to remove.
        key: Key,
    },
}

impl BatchWriteItemRequest {
    fn key(&self) -> &Key {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }

    fn validate(&self) -> Result<()> {
        self.key().validate()?;
        if let Self::Put { item, .. } = self {
            value::validate_item(item)?;
        }
        Ok(())
    }
}

impl From<BatchWriteItemRequest> for proto::WriteRequest {
    fn from(write_request: BatchWriteItemRequest) -> Self {
        let request = match write_request {
            BatchWriteItemRequest::Put { key, item } => {
                let key: proto::Key = key.into();
                proto::write_request::Request::Put(proto::PutItem {
                    partition_key: key.partition_key,
                    sort_key: key.sort_key,
                    item: Some(value::to_proto_item(item)),
                })
            }
            BatchWriteItemRequest::Delete { key } => {
                let key: proto::Key = key.into();
                proto::write_request::Request::Delete(proto::DeleteKey {
                    partition_key: key.partition_key,
                    sort_key: key.sort_key,
                })
            }
        };
        Self {
            request: Some(request),
        }
    }
}

impl TryFrom<proto::WriteRequest> for BatchWriteItemRequest {
    type Error = Error;

    fn try_from(write_request: proto::WriteRequest) -> Result<Self> {
        match write_request.request {
            Some(proto::write_request::Request::Put(put)) => Ok(Self::Put {
                key: proto::Key {
                    partition_key: put.partition_key,
                    sort_key: put.sort_key,
                }
                .into(),
                item: put
                    .item
                    .map(value::from_proto_item)
                    .transpose()?
                    .unwrap_or_default(),
            }),
            Some(proto::write_request::Request::Delete(delete)) => Ok(Self::Delete {
                key: proto::Key {
                    partition_key: delete.partition_key,
                    sort_key: delete.sort_key,
                }
                .into(),
            }),
            None => Err(TransportError::Malformed("write request without a body".to_string()).into()),
        }
    }
}

/// A validated batch write request.
///
/// Each entry is applied independently; one entry failing does not abort the others.
///
/// ```rust,no_run
/// use keystone_client::{Client, Item, Key, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_write = write::batch_write_item::BatchWriteItem::builder()
///     .put(Key::new("user#1"), Item::from([("name".to_string(), "Alice".into())]))
///     .delete(Key::new("user#2"))
///     .build()?;
/// let output = batch_write.send(client).await?;
/// assert!(output.unprocessed.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BatchWriteItem {
    pub(crate) requests: Vec<BatchWriteItemRequest>,
}

impl BatchWriteItem {
    /// Start building a batch write.
    pub fn builder() -> BatchWriteItemBuilder {
        BatchWriteItemBuilder::default()
    }

    /// The entries, in submission order.
    pub fn requests(&self) -> &[BatchWriteItemRequest] {
        &self.requests
    }

    /// Execute the batch write item operation.
    pub async fn send(self, client: &Client) -> Result<BatchWriteItemOutput> {
        client.batch_write(self).await
    }
}

/// Accumulates a batch write request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemBuilder {
    requests: Vec<BatchWriteItemRequest>,
}

impl BatchWriteItemBuilder {
    /// Append an entry.
    pub fn with_request(mut self, request: BatchWriteItemRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Append a put.
    pub fn put(self, key: Key, item: Item) -> Self {
        self.with_request(BatchWriteItemRequest::Put { key, item })
    }

    /// Append a delete.
    pub fn delete(self, key: Key) -> Self {
        self.with_request(BatchWriteItemRequest::Delete { key })
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<BatchWriteItem> {
        if self.requests.is_empty() {
            return Err(Error::validation("a batch write needs at least one request"));
        }
        for request in &self.requests {
            request.validate()?;
        }
        Ok(BatchWriteItem {
            requests: self.requests,
        })
    }
}

impl From<BatchWriteItem> for proto::BatchWriteRequest {
    fn from(batch_write_item: BatchWriteItem) -> Self {
        Self {
            writes: batch_write_item
                .requests
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Result of a batch write operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemOutput {
    /// Whether the service accepted the batch.
    pub success: bool,
    /// Entries the service did not apply; resubmit them to retry.
    pub unprocessed: Vec<BatchWriteItemRequest>,
}

impl TryFrom<proto::BatchWriteResponse> for BatchWriteItemOutput {
    type Error = Error;

    fn try_from(response: proto::BatchWriteResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        let unprocessed = response
            .unprocessed
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_>>()?;
        Ok(Self {
            success: response.success,
            unprocessed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::AttributeValue;

    use rstest::rstest;

    fn item(name: &str) -> Item {
        Item::from([("name".to_string(), AttributeValue::from(name))])
    }

    #[test]
    fn test_batch_write_item_preserves_order() {
        let batch_write_item = BatchWriteItem::builder()
            .put(Key::new("a"), item("Alice"))
            .delete(Key::new("b").with_sort_key("c"))
            .put(Key::new("d"), item("Dan"))
            .build()
            .unwrap();
        let request: proto::BatchWriteRequest = batch_write_item.into();
        let kinds: Vec<_> = request
            .writes
            .iter()
            .map(|write| match write.request.as_ref().unwrap() {
                proto::write_request::Request::Put(put) => ("put", put.partition_key.clone()),
                proto::write_request::Request::Delete(delete) => {
                    ("delete", delete.partition_key.clone())
                }
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("put", b"a".to_vec()),
                ("delete", b"b".to_vec()),
                ("put", b"d".to_vec()),
            ]
        );
    }

    #[rstest]
    #[case::empty(BatchWriteItem::builder())]
    #[case::empty_partition_key(BatchWriteItem::builder().put(Key::new("a"), item("x")).delete(Key::new("")))]
    fn test_build_rejects(#[case] builder: BatchWriteItemBuilder) {
        assert!(builder.build().unwrap_err().is_validation());
    }

    #[test]
    fn test_unprocessed_entries_are_decoded() {
        let unprocessed = BatchWriteItemRequest::Put {
            key: Key::new("a").with_sort_key("b"),
            item: item("Alice"),
        };
        let response = proto::BatchWriteResponse {
            success: true,
            error: None,
            unprocessed: vec![unprocessed.clone().into()],
        };
        let output = BatchWriteItemOutput::try_from(response).unwrap();
        assert!(output.success);
        assert_eq!(output.unprocessed, vec![unprocessed]);
    }

    #[test]
    fn test_remote_error_is_raised() {
        let response = proto::BatchWriteResponse {
            success: false,
            error: Some("throttled".to_string()),
            unprocessed: Vec::new(),
        };
        assert!(BatchWriteItemOutput::try_from(response).unwrap_err().is_application());
    }
}
