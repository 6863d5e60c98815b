//! The remote-call channel behind a [`Client`](crate::Client).
//!
//! [`Transport`] maps one wire message in to one wire message out, with
//! [`Transport::scan`] as the single server-streaming operation. The gRPC
//! implementation lives in [`grpc`].

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;

use crate::error::Result;
use crate::proto;

/// gRPC channel built on `tonic`.
pub mod grpc;

#[cfg(test)]
pub(crate) mod mock;

/// Chunks of a streamed scan, in arrival order.
pub type ScanStream = BoxStream<'static, Result<proto::ScanResponse>>;

/// A channel to a KeystoneDB service.
///
/// Implementations must be safe to share between tasks: the client issues
/// concurrent calls through one instance and never locks around it.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Store an item.
    async fn put(&self, request: proto::PutRequest) -> Result<proto::PutResponse>;

    /// Fetch an item by key.
    async fn get(&self, request: proto::GetRequest) -> Result<proto::GetResponse>;

    /// Remove an item by key.
    async fn delete(&self, request: proto::DeleteRequest) -> Result<proto::DeleteResponse>;

    /// Read one partition.
    async fn query(&self, request: proto::QueryRequest) -> Result<proto::QueryResponse>;

    /// Open a scan stream.
    async fn scan(&self, request: proto::ScanRequest) -> Result<ScanStream>;

    /// Fetch several items independently.
    async fn batch_get(&self, request: proto::BatchGetRequest) -> Result<proto::BatchGetResponse>;

    /// Apply several writes independently.
    async fn batch_write(
        &self,
        request: proto::BatchWriteRequest,
    ) -> Result<proto::BatchWriteResponse>;

    /// Fetch several items from one snapshot.
    async fn transact_get(
        &self,
        request: proto::TransactGetRequest,
    ) -> Result<proto::TransactGetResponse>;

    /// Apply several writes atomically.
    async fn transact_write(
        &self,
        request: proto::TransactWriteRequest,
    ) -> Result<proto::TransactWriteResponse>;

    /// Modify an item in place.
    async fn update(&self, request: proto::UpdateRequest) -> Result<proto::UpdateResponse>;

    /// Run a statement.
    async fn execute_statement(
        &self,
        request: proto::ExecuteStatementRequest,
    ) -> Result<proto::ExecuteStatementResponse>;

    /// Release the channel. Outstanding and later calls fail with
    /// [`TransportError::Closed`](crate::error::TransportError::Closed).
    /// Calling it again has no effect.
    async fn close(&self);
}
