use async_trait::async_trait;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use std::future::Future;
use tokio::sync::watch;
use tonic::{
    client::Grpc,
    codec::ProstCodec,
    codegen::http::uri::PathAndQuery,
    transport::{Channel, Endpoint},
};

use crate::client::ClientConfig;
use crate::error::{Error, Result, TransportError};
use crate::proto;
use crate::transport::{ScanStream, Transport};

/// Prepend a scheme to bare `host:port` addresses.
fn endpoint_uri(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

/// A [`Transport`] over one eagerly connected tonic [`Channel`].
#[derive(Debug)]
pub struct GrpcTransport {
    grpc: Mutex<Option<Grpc<Channel>>>,
    closed: watch::Sender<bool>,
}

impl GrpcTransport {
    /// Connect to the service described by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let endpoint = Endpoint::from_shared(endpoint_uri(&config.address)).map_err(|error| {
            TransportError::InvalidAddress {
                address: config.address.clone(),
                message: error.to_string(),
            }
        })?;
        let mut endpoint = endpoint
            .connect_timeout(config.connect_timeout)
            .tcp_keepalive(config.tcp_keepalive);
        if let Some(timeout) = config.timeout {
            endpoint = endpoint.timeout(timeout);
        }
        if let Some(concurrency_limit) = config.concurrency_limit {
            endpoint = endpoint.concurrency_limit(concurrency_limit);
        }
        let channel = endpoint
            .connect()
            .await
            .map_err(|error| TransportError::Connect {
                address: config.address.clone(),
                message: error.to_string(),
            })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(address = %config.address, "connected");
        Ok(Self::from_channel(channel))
    }

    fn from_channel(channel: Channel) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            grpc: Mutex::new(Some(Grpc::new(channel))),
            closed,
        }
    }

    /// A ready handle on the channel, or `Closed` once released.
    async fn ready(&self) -> Result<Grpc<Channel>> {
        let mut grpc = self.grpc.lock().clone().ok_or(TransportError::Closed)?;
        grpc.ready().await.map_err(|error| TransportError::Status {
            code: tonic::Code::Unavailable,
            message: format!("service was not ready: {error}"),
        })?;
        Ok(grpc)
    }

    /// Run `call` unless the channel is closed first.
    async fn guarded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow_and_update() {
            return Err(TransportError::Closed.into());
        }
        tokio::select! {
            biased;
            _ = closed.changed() => Err(TransportError::Closed.into()),
            result = call => result,
        }
    }

    async fn unary<Request, Response>(
        &self,
        method: &'static str,
        request: Request,
    ) -> Result<Response>
    where
        Request: prost::Message + Send + Sync + 'static,
        Response: prost::Message + Default + Send + Sync + 'static,
    {
        self.guarded(async {
            let mut grpc = self.ready().await?;
            let response = grpc
                .unary(
                    tonic::Request::new(request),
                    PathAndQuery::from_static(method),
                    ProstCodec::default(),
                )
                .await?;
            Ok(response.into_inner())
        })
        .await
    }
}

/// Yield chunks until the server ends the stream, fails, or the channel closes.
fn scan_stream<S>(messages: S, closed: watch::Receiver<bool>) -> ScanStream
where
    S: Stream<Item = std::result::Result<proto::ScanResponse, tonic::Status>> + Send + 'static,
{
    futures::stream::unfold(Some((messages.boxed(), closed)), |state| async move {
        let (mut messages, mut closed) = state?;
        tokio::select! {
            biased;
            _ = closed.changed() => Some((Err(TransportError::Closed.into()), None)),
            message = messages.next() => match message {
                Some(Ok(chunk)) => Some((Ok(chunk), Some((messages, closed)))),
                Some(Err(status)) => Some((Err(Error::from(status)), None)),
                None => None,
            },
        }
    })
    .boxed()
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn put(&self, request: proto::PutRequest) -> Result<proto::PutResponse> {
        self.unary("/keystone.KeystoneDB/Put", request).await
    }

    async fn get(&self, request: proto::GetRequest) -> Result<proto::GetResponse> {
        self.unary("/keystone.KeystoneDB/Get", request).await
    }

    async fn delete(&self, request: proto::DeleteRequest) -> Result<proto::DeleteResponse> {
        self.unary("/keystone.KeystoneDB/Delete", request).await
    }

    async fn query(&self, request: proto::QueryRequest) -> Result<proto::QueryResponse> {
        self.unary("/keystone.KeystoneDB/Query", request).await
    }

    async fn scan(&self, request: proto::ScanRequest) -> Result<ScanStream> {
        let closed = self.closed.subscribe();
        let stream = self
            .guarded(async {
                let mut grpc = self.ready().await?;
                let response = grpc
                    .server_streaming(
                        tonic::Request::new(request),
                        PathAndQuery::from_static("/keystone.KeystoneDB/Scan"),
                        ProstCodec::default(),
                    )
                    .await?;
                Ok(response.into_inner())
            })
            .await?;
        Ok(scan_stream(stream, closed))
    }

    async fn batch_get(&self, request: proto::BatchGetRequest) -> Result<proto::BatchGetResponse> {
        self.unary("/keystone.KeystoneDB/BatchGet", request).await
    }

    async fn batch_write(
        &self,
        request: proto::BatchWriteRequest,
    ) -> Result<proto::BatchWriteResponse> {
        self.unary("/keystone.KeystoneDB/BatchWrite", request).await
    }

    async fn transact_get(
        &self,
        request: proto::TransactGetRequest,
    ) -> Result<proto::TransactGetResponse> {
        self.unary("/keystone.KeystoneDB/TransactGet", request).await
    }

    async fn transact_write(
        &self,
        request: proto::TransactWriteRequest,
    ) -> Result<proto::TransactWriteResponse> {
        self.unary("/keystone.KeystoneDB/TransactWrite", request).await
    }

    async fn update(&self, request: proto::UpdateRequest) -> Result<proto::UpdateResponse> {
        self.unary("/keystone.KeystoneDB/Update", request).await
    }

    async fn execute_statement(
        &self,
        request: proto::ExecuteStatementRequest,
    ) -> Result<proto::ExecuteStatementResponse> {
        self.unary("/keystone.KeystoneDB/ExecuteStatement", request)
            .await
    }

    async fn close(&self) {
        if self.grpc.lock().take().is_some() {
            self.closed.send_replace(true);
            #[cfg(feature = "tracing")]
            tracing::debug!("channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case::host_port("localhost:50051", "http://localhost:50051")]
    #[case::http("http://db.internal:50051", "http://db.internal:50051")]
    #[case::https("https://db.example.com", "https://db.example.com")]
    fn test_endpoint_uri(#[case] address: &str, #[case] expected: &str) {
        assert_eq!(endpoint_uri(address), expected);
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_address() {
        let config = ClientConfig {
            address: "not a uri".to_string(),
            ..Default::default()
        };
        let error = GrpcTransport::connect(&config).await.unwrap_err();
        assert!(matches!(
            error,
            Error::Transport(TransportError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_is_eager() {
        // nothing listens on port 1
        let config = ClientConfig {
            address: "127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let error = GrpcTransport::connect(&config).await.unwrap_err();
        assert!(matches!(
            error,
            Error::Transport(TransportError::Connect { .. })
        ));
    }

    fn lazy_transport() -> Arc<GrpcTransport> {
        let channel = Endpoint::from_static("http://127.0.0.1:1").connect_lazy();
        Arc::new(GrpcTransport::from_channel(channel))
    }

    #[tokio::test]
    async fn test_close_aborts_outstanding_call() {
        let transport = lazy_transport();
        let call = tokio::spawn({
            let transport = transport.clone();
            async move {
                transport
                    .guarded(futures::future::pending::<Result<()>>())
                    .await
            }
        });
        tokio::task::yield_now().await;
        assert!(!call.is_finished());

        transport.close().await;
        let error = call.await.unwrap().unwrap_err();
        assert!(matches!(error, Error::Transport(TransportError::Closed)));
    }

    #[tokio::test]
    async fn test_close_ends_open_scan_stream() {
        let transport = lazy_transport();
        let mut chunks = scan_stream(
            futures::stream::pending::<std::result::Result<proto::ScanResponse, tonic::Status>>(),
            transport.closed.subscribe(),
        );
        let reader = tokio::spawn(async move {
            let first = chunks.next().await;
            let ended = chunks.next().await.is_none();
            (first, ended)
        });
        tokio::task::yield_now().await;
        assert!(!reader.is_finished());

        transport.close().await;
        let (first, ended) = reader.await.unwrap();
        assert!(matches!(
            first,
            Some(Err(Error::Transport(TransportError::Closed)))
        ));
        assert!(ended);
    }

    #[tokio::test]
    async fn test_scan_stream_forwards_chunks_and_status() {
        let transport = lazy_transport();
        let messages = futures::stream::iter(vec![
            Ok(proto::ScanResponse {
                count: 1,
                ..Default::default()
            }),
            Err(tonic::Status::unavailable("gone")),
        ]);
        let chunks: Vec<_> = scan_stream(messages, transport.closed.subscribe())
            .collect()
            .await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().count, 1);
        assert!(chunks[1].as_ref().unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_calls_after_close_fail_fast() {
        let transport = lazy_transport();
        transport.close().await;
        transport.close().await;
        let error = transport
            .get(proto::GetRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Transport(TransportError::Closed)));
    }
}
