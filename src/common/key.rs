use crate::error::{Error, Result};
use crate::proto;

use bytes::Bytes;

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use keystone_client::common::key::Key;
///
/// let key = Key::new("user#123").with_sort_key("profile");
/// assert_eq!(key.partition_key().as_ref(), b"user#123");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Key {
    partition_key: Bytes,
    sort_key: Option<Bytes>,
}

impl Key {
    /// Create a key with only a partition key.
    pub fn new(partition_key: impl Into<Bytes>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    /// Set the sort key.
    pub fn with_sort_key(mut self, sort_key: impl Into<Bytes>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    /// The partition key.
    pub fn partition_key(&self) -> &Bytes {
        &self.partition_key
    }

    /// The sort key, if any.
    pub fn sort_key(&self) -> Option<&Bytes> {
        self.sort_key.as_ref()
    }

    pub(crate) fn set_sort_key(&mut self, sort_key: Bytes) {
        self.sort_key = Some(sort_key);
    }

    /// Fail if the partition key is empty.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.partition_key.is_empty() {
            return Err(Error::validation("partition key must not be empty"));
        }
        Ok(())
    }
}

impl From<Key> for proto::Key {
    fn from(key: Key) -> Self {
        Self {
            partition_key: key.partition_key.to_vec(),
            sort_key: key.sort_key.map(|sort_key| sort_key.to_vec()),
        }
    }
}

impl From<proto::Key> for Key {
    fn from(key: proto::Key) -> Self {
        Self {
            partition_key: key.partition_key.into(),
            sort_key: key.sort_key.map(Bytes::from),
        }
    }
}
