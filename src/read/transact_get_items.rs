use crate::client::Client;
use crate::common::{
    key::Key,
    value::{self, Item},
};
use crate::error::{self, Error, Result, TransportError};
use crate::proto;

/// A validated transactional read.
///
/// All items are read from one consistent snapshot; results come back in
/// submission order.
///
/// ```rust,no_run
/// use keystone_client::{Client, Key, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let transact_get = read::transact_get_items::TransactGetItems::builder()
///     .with_key(Key::new("account#1"))
///     .with_key(Key::new("account#2"))
///     .build()?;
/// let output = transact_get.send(client).await?;
/// assert_eq!(output.items.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransactGetItems {
    pub(crate) keys: Vec<Key>,
}

impl TransactGetItems {
    /// Start building a transactional read.
    pub fn builder() -> TransactGetItemsBuilder {
        TransactGetItemsBuilder::default()
    }

    /// The requested keys, in submission order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Execute the transactional read.
    pub async fn send(self, client: &Client) -> Result<TransactGetItemsOutput> {
        client.transact_get(self).await
    }
}

/// Accumulates a transactional read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactGetItemsBuilder {
    keys: Vec<Key>,
}

impl TransactGetItemsBuilder {
    /// Append a key.
    pub fn with_key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<TransactGetItems> {
        if self.keys.is_empty() {
            return Err(Error::validation(
                "a transactional read needs at least one key",
            ));
        }
        for key in &self.keys {
            key.validate()?;
        }
        Ok(TransactGetItems { keys: self.keys })
    }
}

impl From<TransactGetItems> for proto::TransactGetRequest {
    fn from(transact_get_items: TransactGetItems) -> Self {
        Self {
            keys: transact_get_items.keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of a transactional read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactGetItemsOutput {
    /// One slot per requested key, in submission order; `None` where nothing is stored.
    pub items: Vec<Option<Item>>,
}

impl TransactGetItemsOutput {
    /// Decode a response, checking it answers exactly `expected` keys.
    pub(crate) fn from_response(response: proto::TransactGetResponse, expected: usize) -> Result<Self> {
        let output = Self::try_from(response)?;
        if output.items.len() != expected {
            return Err(TransportError::Malformed(format!(
                "transactional read of {expected} keys returned {} results",
                output.items.len()
            ))
            .into());
        }
        Ok(output)
    }
}

impl TryFrom<proto::TransactGetResponse> for TransactGetItemsOutput {
    type Error = Error;

    fn try_from(response: proto::TransactGetResponse) -> Result<Self> {
        error::check_remote_error(response.error)?;
        let items = response
            .items
            .into_iter()
            .map(|slot| slot.item.map(value::from_proto_item).transpose())
            .collect::<Result<_>>()?;
        Ok(Self { items })
    }
}
