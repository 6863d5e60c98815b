use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, Item},
};
use crate::error::{self, Result};
use crate::proto;

use bytes::Bytes;

/// A validated get item request.
///
/// ```rust,no_run
/// use keystone_client::{Client, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem::builder("user#123")
///     .with_sort_key("profile")
///     .build()?;
/// if let Some(item) = get_item.send(client).await?.item {
///     println!("{item:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GetItem {
    pub(crate) key: Key,
}

impl GetItem {
    /// Start building a get for the given partition key.
    pub fn builder(partition_key: impl Into<Bytes>) -> GetItemBuilder {
        GetItemBuilder {
            key: Key::new(partition_key),
        }
    }

    /// The key of the item to read.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Execute the get item operation.
    pub async fn send(self, client: &Client) -> Result<GetItemOutput> {
        client.get(self).await
    }
}

/// Accumulates a get item request.
#[derive(Clone, Debug, PartialEq)]
pub struct GetItemBuilder {
    key: Key,
}

impl GetItemBuilder {
    /// Set the sort key.
    pub fn with_sort_key(mut self, sort_key: impl Into<Bytes>) -> Self {
        self.key.set_sort_key(sort_key.into());
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<GetItem> {
        self.key.validate()?;
        Ok(GetItem { key: self.key })
    }
}

impl From<GetItem> for proto::GetRequest {
    fn from(get_item: GetItem) -> Self {
        let key: proto::Key = get_item.key.into();
        Self {
            partition_key: key.partition_key,
            sort_key: key.sort_key,
        }
    }
}

/// Result of a get item operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItemOutput {
    /// The item, or `None` when nothing is stored under the key.
    pub item: Option<Item>,
}

impl TryFrom<proto::GetResponse> for GetItemOutput {
    type Error = error::Error;

    fn try_from(response: proto::GetResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        let item = response.item.map(value::from_proto_item).transpose()?;
        Ok(Self { item })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::value::AttributeValue;

    use rstest::rstest;

    #[rstest]
    #[case::partition_key_only(
        GetItem::builder("user#123"),
        proto::GetRequest {
            partition_key: b"user#123".to_vec(),
            sort_key: None,
        }
    )]
    #[case::with_sort_key(
        GetItem::builder("user#123").with_sort_key("profile"),
        proto::GetRequest {
            partition_key: b"user#123".to_vec(),
            sort_key: Some(b"profile".to_vec()),
        }
    )]
    fn test_get_item(#[case] builder: GetItemBuilder, #[case] expected: proto::GetRequest) {
        let actual: proto::GetRequest = builder.build().unwrap().into();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_partition_key_is_rejected() {
        let error = GetItem::builder("").with_sort_key("profile").build().unwrap_err();
        assert!(error.is_validation());
    }

    #[rstest]
    #[case::missing(proto::GetResponse { item: None, error: None }, None)]
    #[case::found(
        proto::GetResponse {
            item: Some(value::to_proto_item(Item::from([(
                "name".to_string(),
                AttributeValue::from("Alice"),
            )]))),
            error: None,
        },
        Some(Item::from([("name".to_string(), AttributeValue::from("Alice"))]))
    )]
    fn test_output(#[case] response: proto::GetResponse, #[case] expected: Option<Item>) {
        let output = GetItemOutput::try_from(response).unwrap();
        assert_eq!(output.item, expected);
    }

    #[test]
    fn test_remote_error_is_raised() {
        let response = proto::GetResponse {
            item: None,
            error: Some("unavailable partition".to_string()),
        };
        assert!(GetItemOutput::try_from(response).unwrap_err().is_application());
    }
}
