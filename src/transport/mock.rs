//! In-memory [`Transport`] for exercising the client without a server.

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, TransportError};
use crate::proto;
use crate::transport::{ScanStream, Transport};

type StoreKey = (Vec<u8>, Option<Vec<u8>>);

fn store_key(partition_key: Vec<u8>, sort_key: Option<Vec<u8>>) -> StoreKey {
    (partition_key, sort_key)
}

fn to_proto_key((partition_key, sort_key): &StoreKey) -> proto::Key {
    proto::Key {
        partition_key: partition_key.clone(),
        sort_key: sort_key.clone(),
    }
}

fn value_bytes(value: &proto::Value) -> Vec<u8> {
    match &value.kind {
        Some(proto::value::Kind::BinaryValue(bytes)) => bytes.clone(),
        Some(proto::value::Kind::StringValue(text)) => text.as_bytes().to_vec(),
        _ => Vec::new(),
    }
}

fn matches_sort_key(sort_key: Option<&[u8]>, condition: &proto::SortKeyCondition) -> bool {
    use proto::sort_key_condition::Condition;

    let Some(condition) = &condition.condition else {
        return true;
    };
    let Some(sort_key) = sort_key else {
        return false;
    };
    match condition {
        Condition::EqualTo(value) => sort_key == value_bytes(value),
        Condition::LessThan(value) => sort_key < value_bytes(value).as_slice(),
        Condition::LessThanOrEqual(value) => sort_key <= value_bytes(value).as_slice(),
        Condition::GreaterThan(value) => sort_key > value_bytes(value).as_slice(),
        Condition::GreaterThanOrEqual(value) => sort_key >= value_bytes(value).as_slice(),
        Condition::Between(between) => {
            let lower = between.lower.as_ref().map(value_bytes).unwrap_or_default();
            let upper = between.upper.as_ref().map(value_bytes).unwrap_or_default();
            lower.as_slice() <= sort_key && sort_key <= upper.as_slice()
        }
        Condition::BeginsWith(value) => sort_key.starts_with(&value_bytes(value)),
    }
}

/// Items keyed by `(partition_key, sort_key)`; expressions are not evaluated,
/// except that a put conditioned on `attribute_not_exists` fails when the
/// item is already stored.
#[derive(Debug, Default)]
pub(crate) struct MemoryTransport {
    items: Mutex<BTreeMap<StoreKey, proto::Item>>,
    scan_chunks: Mutex<Option<Vec<Result<proto::ScanResponse>>>>,
    statement_responses: Mutex<VecDeque<proto::ExecuteStatementResponse>>,
    remote_error: Mutex<Option<String>>,
    calls: Mutex<Vec<&'static str>>,
    closed: AtomicBool,
}

impl MemoryTransport {
    /// Replay `chunks` on the next scan instead of reading the store.
    pub(crate) fn script_scan(&self, chunks: Vec<Result<proto::ScanResponse>>) {
        *self.scan_chunks.lock() = Some(chunks);
    }

    /// Answer the next statement with `response`.
    pub(crate) fn script_statement(&self, response: proto::ExecuteStatementResponse) {
        self.statement_responses.lock().push_back(response);
    }

    /// Report `message` in the error field of every unary response.
    pub(crate) fn fail_with(&self, message: &str) {
        *self.remote_error.lock() = Some(message.to_string());
    }

    /// Names of the operations received, in order.
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.lock().len()
    }

    fn enter(&self, operation: &'static str) -> Result<Option<String>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed.into());
        }
        self.calls.lock().push(operation);
        Ok(self.remote_error.lock().clone())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn put(&self, request: proto::PutRequest) -> Result<proto::PutResponse> {
        if let Some(error) = self.enter("put")? {
            return Ok(proto::PutResponse {
                success: false,
                error: Some(error),
            });
        }
        let key = store_key(request.partition_key, request.sort_key);
        let mut items = self.items.lock();
        let guarded = request
            .condition_expression
            .as_deref()
            .is_some_and(|condition| condition.contains("attribute_not_exists"));
        if guarded && items.contains_key(&key) {
            return Err(tonic::Status::failed_precondition("the conditional request failed").into());
        }
        items.insert(key, request.item.unwrap_or_default());
        Ok(proto::PutResponse {
            success: true,
            error: None,
        })
    }

    async fn get(&self, request: proto::GetRequest) -> Result<proto::GetResponse> {
        if let Some(error) = self.enter("get")? {
            return Ok(proto::GetResponse {
                item: None,
                error: Some(error),
            });
        }
        let key = store_key(request.partition_key, request.sort_key);
        Ok(proto::GetResponse {
            item: self.items.lock().get(&key).cloned(),
            error: None,
        })
    }

    async fn delete(&self, request: proto::DeleteRequest) -> Result<proto::DeleteResponse> {
        if let Some(error) = self.enter("delete")? {
            return Ok(proto::DeleteResponse {
                success: false,
                error: Some(error),
            });
        }
        let key = store_key(request.partition_key, request.sort_key);
        Ok(proto::DeleteResponse {
            success: self.items.lock().remove(&key).is_some(),
            error: None,
        })
    }

    async fn query(&self, request: proto::QueryRequest) -> Result<proto::QueryResponse> {
        if let Some(error) = self.enter("query")? {
            return Ok(proto::QueryResponse {
                error: Some(error),
                ..Default::default()
            });
        }
        let mut matched: Vec<(StoreKey, proto::Item)> = self
            .items
            .lock()
            .iter()
            .filter(|((partition_key, sort_key), _)| {
                *partition_key == request.partition_key
                    && request
                        .sort_key_condition
                        .as_ref()
                        .is_none_or(|condition| matches_sort_key(sort_key.as_deref(), condition))
            })
            .map(|(key, item)| (key.clone(), item.clone()))
            .collect();
        if request.scan_forward == Some(false) {
            matched.reverse();
        }
        let scanned_count = matched.len() as u32;
        let mut last_evaluated_key = None;
        if let Some(limit) = request.limit {
            if matched.len() > limit as usize {
                matched.truncate(limit as usize);
                last_evaluated_key = matched.last().map(|(key, _)| to_proto_key(key));
            }
        }
        Ok(proto::QueryResponse {
            count: matched.len() as u32,
            scanned_count,
            items: matched.into_iter().map(|(_, item)| item).collect(),
            last_evaluated_key,
            error: None,
        })
    }

    async fn scan(&self, request: proto::ScanRequest) -> Result<ScanStream> {
        self.enter("scan")?;
        if let Some(chunks) = self.scan_chunks.lock().take() {
            return Ok(futures::stream::iter(chunks).boxed());
        }
        let items: Vec<proto::Item> = self
            .items
            .lock()
            .values()
            .enumerate()
            .filter(|(index, _)| match (request.segment, request.total_segments) {
                (Some(segment), Some(total_segments)) => {
                    *index as u32 % total_segments == segment
                }
                _ => true,
            })
            .map(|(_, item)| item.clone())
            .collect();
        let chunk = proto::ScanResponse {
            count: items.len() as u32,
            scanned_count: items.len() as u32,
            items,
            last_evaluated_key: None,
            error: None,
        };
        Ok(futures::stream::iter([Ok(chunk)]).boxed())
    }

    async fn batch_get(&self, request: proto::BatchGetRequest) -> Result<proto::BatchGetResponse> {
        if let Some(error) = self.enter("batch_get")? {
            return Ok(proto::BatchGetResponse {
                error: Some(error),
                ..Default::default()
            });
        }
        let stored = self.items.lock();
        let items: Vec<proto::Item> = request
            .keys
            .into_iter()
            .filter_map(|key| stored.get(&store_key(key.partition_key, key.sort_key)).cloned())
            .collect();
        Ok(proto::BatchGetResponse {
            count: items.len() as u32,
            items,
            error: None,
            unprocessed_keys: Vec::new(),
        })
    }

    async fn batch_write(
        &self,
        request: proto::BatchWriteRequest,
    ) -> Result<proto::BatchWriteResponse> {
        use proto::write_request::Request;

        if let Some(error) = self.enter("batch_write")? {
            return Ok(proto::BatchWriteResponse {
                success: false,
                error: Some(error),
                unprocessed: request.writes,
            });
        }
        let mut items = self.items.lock();
        for write in request.writes {
            match write.request {
                Some(Request::Put(put)) => {
                    items.insert(
                        store_key(put.partition_key, put.sort_key),
                        put.item.unwrap_or_default(),
                    );
                }
                Some(Request::Delete(delete)) => {
                    items.remove(&store_key(delete.partition_key, delete.sort_key));
                }
                None => {}
            }
        }
        Ok(proto::BatchWriteResponse {
            success: true,
            error: None,
            unprocessed: Vec::new(),
        })
    }

    async fn transact_get(
        &self,
        request: proto::TransactGetRequest,
    ) -> Result<proto::TransactGetResponse> {
        if let Some(error) = self.enter("transact_get")? {
            return Ok(proto::TransactGetResponse {
                items: Vec::new(),
                error: Some(error),
            });
        }
        let stored = self.items.lock();
        let items = request
            .keys
            .into_iter()
            .map(|key| proto::TransactGetItem {
                item: stored.get(&store_key(key.partition_key, key.sort_key)).cloned(),
            })
            .collect();
        Ok(proto::TransactGetResponse { items, error: None })
    }

    async fn transact_write(
        &self,
        request: proto::TransactWriteRequest,
    ) -> Result<proto::TransactWriteResponse> {
        use proto::transact_write_item::Item;

        if let Some(error) = self.enter("transact_write")? {
            return Ok(proto::TransactWriteResponse {
                success: false,
                error: Some(error),
            });
        }
        let mut items = self.items.lock();
        for entry in request.items {
            match entry.item {
                Some(Item::Put(put)) => {
                    items.insert(
                        store_key(put.partition_key, put.sort_key),
                        put.item.unwrap_or_default(),
                    );
                }
                Some(Item::Delete(delete)) => {
                    items.remove(&store_key(delete.partition_key, delete.sort_key));
                }
                Some(Item::Update(_)) | Some(Item::ConditionCheck(_)) | None => {}
            }
        }
        Ok(proto::TransactWriteResponse {
            success: true,
            error: None,
        })
    }

    async fn update(&self, request: proto::UpdateRequest) -> Result<proto::UpdateResponse> {
        if let Some(error) = self.enter("update")? {
            return Ok(proto::UpdateResponse {
                item: None,
                error: Some(error),
            });
        }
        let key = store_key(request.partition_key, request.sort_key);
        Ok(proto::UpdateResponse {
            item: self.items.lock().get(&key).cloned(),
            error: None,
        })
    }

    async fn execute_statement(
        &self,
        _request: proto::ExecuteStatementRequest,
    ) -> Result<proto::ExecuteStatementResponse> {
        if let Some(error) = self.enter("execute_statement")? {
            return Ok(proto::ExecuteStatementResponse {
                response: None,
                error: Some(error),
            });
        }
        Ok(self
            .statement_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| proto::ExecuteStatementResponse {
                response: Some(proto::execute_statement_response::Response::Insert(
                    proto::InsertResult { success: true },
                )),
                error: None,
            }))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
