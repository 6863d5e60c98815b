//! Connection to a KeystoneDB service and dispatch of built requests.

use std::{sync::Arc, time::Duration};

use crate::error::Result;
use crate::read::{
    batch_get_item::{BatchGetItem, BatchGetItemOutput},
    get_item::{GetItem, GetItemOutput},
    query::{Query, QueryOutput},
    scan::{Scan, ScanOutput},
    transact_get_items::{TransactGetItems, TransactGetItemsOutput},
};
use crate::statement::{ExecuteStatement, ExecuteStatementOutput};
use crate::transport::{Transport, grpc::GrpcTransport};
use crate::write::{
    batch_write_item::{BatchWriteItem, BatchWriteItemOutput},
    delete_item::{DeleteItem, DeleteItemOutput},
    put_item::{PutItem, PutItemOutput},
    transact_write_items::{TransactWriteItems, TransactWriteItemsOutput},
    update_item::{UpdateItem, UpdateItemOutput},
};

/// Streaming scan aggregation.
pub(crate) mod scan;

/// Channel settings used by [`Client::connect_with`].
///
/// ```rust
/// use keystone_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig {
///     address: "db.internal:50051".to_string(),
///     timeout: Some(Duration::from_secs(2)),
///     ..Default::default()
/// };
/// assert_eq!(config.concurrency_limit, None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port`, or a full `http://` / `https://` URI.
    pub address: String,
    /// Limit on establishing the connection.
    pub connect_timeout: Duration,
    /// Per-request timeout applied by the channel; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// TCP keepalive interval; `None` disables it.
    pub tcp_keepalive: Option<Duration>,
    /// Maximum in-flight requests on the channel; `None` is unbounded.
    pub concurrency_limit: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "localhost:50051".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: None,
            tcp_keepalive: Some(Duration::from_secs(60)),
            concurrency_limit: None,
        }
    }
}

/// A connected KeystoneDB client.
///
/// Cloning is cheap and every clone shares one channel, so one client can
/// serve many concurrent tasks. The channel is released by [`Client::close`]
/// or when the last clone is dropped.
///
/// ```rust,no_run
/// use keystone_client::{Client, read, write};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::connect("localhost:50051").await?;
/// write::put_item::PutItem::builder("user#123")
///     .with_string("name", "Alice")
///     .with_number("age", "30")
///     .build()?
///     .send(&client)
///     .await?;
/// let output = read::get_item::GetItem::builder("user#123")
///     .build()?
///     .send(&client)
///     .await?;
/// assert_eq!(output.item.unwrap()["age"].as_number().unwrap().as_str(), "30");
/// client.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Connect eagerly to `address` with default settings.
    pub async fn connect(address: impl Into<String>) -> Result<Self> {
        Self::connect_with(ClientConfig {
            address: address.into(),
            ..Default::default()
        })
        .await
    }

    /// Connect eagerly with explicit channel settings.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.connect", skip_all, fields(address = %config.address), err)
    )]
    pub async fn connect_with(config: ClientConfig) -> Result<Self> {
        let transport = GrpcTransport::connect(&config).await?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Wrap an existing transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Store an item.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.put", skip_all, err)
    )]
    pub async fn put(&self, put_item: PutItem) -> Result<PutItemOutput> {
        self.transport.put(put_item.into()).await?.try_into()
    }

    /// Fetch an item by key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.get", skip_all, err)
    )]
    pub async fn get(&self, get_item: GetItem) -> Result<GetItemOutput> {
        self.transport.get(get_item.into()).await?.try_into()
    }

    /// Remove an item by key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.delete", skip_all, err)
    )]
    pub async fn delete(&self, delete_item: DeleteItem) -> Result<DeleteItemOutput> {
        self.transport.delete(delete_item.into()).await?.try_into()
    }

    /// Read one partition.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.query", skip_all, err)
    )]
    pub async fn query(&self, query: Query) -> Result<QueryOutput> {
        self.transport.query(query.into()).await?.try_into()
    }

    /// Scan and aggregate every chunk of the stream.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.scan", skip_all, fields(segment = ?scan.segment()), err)
    )]
    pub async fn scan(&self, scan: Scan) -> Result<ScanOutput> {
        let stream = self.transport.scan(scan.into()).await?;
        scan::aggregate(stream).await
    }

    /// Fetch several items independently.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.batch_get", skip_all, err)
    )]
    pub async fn batch_get(&self, batch_get_item: BatchGetItem) -> Result<BatchGetItemOutput> {
        self.transport
            .batch_get(batch_get_item.into())
            .await?
            .try_into()
    }

    /// Apply several writes independently.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.batch_write", skip_all, err)
    )]
    pub async fn batch_write(&self, batch_write_item: BatchWriteItem) -> Result<BatchWriteItemOutput> {
        self.transport
            .batch_write(batch_write_item.into())
            .await?
            .try_into()
    }

    /// Fetch several items from one snapshot.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.transact_get", skip_all, err)
    )]
    pub async fn transact_get(
        &self,
        transact_get_items: TransactGetItems,
    ) -> Result<TransactGetItemsOutput> {
        let expected = transact_get_items.keys.len();
        let response = self.transport.transact_get(transact_get_items.into()).await?;
        TransactGetItemsOutput::from_response(response, expected)
    }

    /// Apply several writes atomically.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.transact_write", skip_all, err)
    )]
    pub async fn transact_write(
        &self,
        transact_write_items: TransactWriteItems,
    ) -> Result<TransactWriteItemsOutput> {
        self.transport
            .transact_write(transact_write_items.into())
            .await?
            .try_into()
    }

    /// Modify an item in place.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.update", skip_all, err)
    )]
    pub async fn update(&self, update_item: UpdateItem) -> Result<UpdateItemOutput> {
        self.transport.update(update_item.into()).await?.try_into()
    }

    /// Run a statement.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "keystone.execute_statement", skip_all, err)
    )]
    pub async fn execute_statement(
        &self,
        execute_statement: ExecuteStatement,
    ) -> Result<ExecuteStatementOutput> {
        self.transport
            .execute_statement(execute_statement.into())
            .await?
            .try_into()
    }

    /// Release the channel.
    ///
    /// Outstanding calls on any clone fail with a closed-channel transport
    /// error. Closing twice is a no-op.
    pub async fn close(&self) {
        self.transport.close().await;
    }
}
