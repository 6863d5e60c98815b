//! Wire messages of the `keystone.KeystoneDB` gRPC service.
//!
//! Declared with `prost` derives instead of generated from a `.proto` file so
//! the crate builds without `protoc`. Field tags match the service contract.

#![allow(missing_docs)]

use std::collections::HashMap;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Value {
    #[prost(oneof = "value::Kind", tags = "1, 2, 3, 4, 5, 6, 7")]
    pub kind: Option<value::Kind>,
}

pub mod value {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Kind {
        #[prost(string, tag = "1")]
        StringValue(String),
        #[prost(string, tag = "2")]
        NumberValue(String),
        #[prost(bytes = "vec", tag = "3")]
        BinaryValue(Vec<u8>),
        #[prost(bool, tag = "4")]
        BoolValue(bool),
        #[prost(bool, tag = "5")]
        NullValue(bool),
        #[prost(message, tag = "6")]
        ListValue(super::ListValue),
        #[prost(message, tag = "7")]
        MapValue(super::MapValue),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListValue {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MapValue {
    #[prost(map = "string, message", tag = "1")]
    pub fields: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Item {
    #[prost(map = "string, message", tag = "1")]
    pub attributes: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, Eq, Hash, prost::Message)]
pub struct Key {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PutRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(message, optional, tag = "3")]
    pub item: Option<Item>,
    #[prost(string, optional, tag = "4")]
    pub condition_expression: Option<String>,
    #[prost(map = "string, message", tag = "5")]
    pub expression_values: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PutResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetResponse {
    #[prost(message, optional, tag = "1")]
    pub item: Option<Item>,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(string, optional, tag = "3")]
    pub condition_expression: Option<String>,
    #[prost(map = "string, message", tag = "4")]
    pub expression_values: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BetweenCondition {
    #[prost(message, optional, tag = "1")]
    pub lower: Option<Value>,
    #[prost(message, optional, tag = "2")]
    pub upper: Option<Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SortKeyCondition {
    #[prost(oneof = "sort_key_condition::Condition", tags = "1, 2, 3, 4, 5, 6, 7")]
    pub condition: Option<sort_key_condition::Condition>,
}

pub mod sort_key_condition {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Condition {
        #[prost(message, tag = "1")]
        EqualTo(super::Value),
        #[prost(message, tag = "2")]
        LessThan(super::Value),
        #[prost(message, tag = "3")]
        LessThanOrEqual(super::Value),
        #[prost(message, tag = "4")]
        GreaterThan(super::Value),
        #[prost(message, tag = "5")]
        GreaterThanOrEqual(super::Value),
        #[prost(message, tag = "6")]
        Between(super::BetweenCondition),
        #[prost(message, tag = "7")]
        BeginsWith(super::Value),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sort_key_condition: Option<SortKeyCondition>,
    #[prost(string, optional, tag = "3")]
    pub filter_expression: Option<String>,
    #[prost(map = "string, message", tag = "4")]
    pub expression_values: HashMap<String, Value>,
    #[prost(string, optional, tag = "5")]
    pub index_name: Option<String>,
    #[prost(uint32, optional, tag = "6")]
    pub limit: Option<u32>,
    #[prost(message, optional, tag = "7")]
    pub exclusive_start_key: Option<Key>,
    #[prost(bool, optional, tag = "8")]
    pub scan_forward: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct QueryResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Item>,
    #[prost(uint32, tag = "2")]
    pub count: u32,
    #[prost(uint32, tag = "3")]
    pub scanned_count: u32,
    #[prost(message, optional, tag = "4")]
    pub last_evaluated_key: Option<Key>,
    #[prost(string, optional, tag = "5")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ScanRequest {
    #[prost(string, optional, tag = "1")]
    pub filter_expression: Option<String>,
    #[prost(map = "string, message", tag = "2")]
    pub expression_values: HashMap<String, Value>,
    #[prost(uint32, optional, tag = "3")]
    pub limit: Option<u32>,
    #[prost(message, optional, tag = "4")]
    pub exclusive_start_key: Option<Key>,
    #[prost(string, optional, tag = "5")]
    pub index_name: Option<String>,
    #[prost(uint32, optional, tag = "6")]
    pub segment: Option<u32>,
    #[prost(uint32, optional, tag = "7")]
    pub total_segments: Option<u32>,
}

/// One chunk of a streamed scan.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ScanResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Item>,
    #[prost(uint32, tag = "2")]
    pub count: u32,
    #[prost(uint32, tag = "3")]
    pub scanned_count: u32,
    #[prost(message, optional, tag = "4")]
    pub last_evaluated_key: Option<Key>,
    #[prost(string, optional, tag = "5")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchGetRequest {
    #[prost(message, repeated, tag = "1")]
    pub keys: Vec<Key>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchGetResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Item>,
    #[prost(uint32, tag = "2")]
    pub count: u32,
    #[prost(string, optional, tag = "3")]
    pub error: Option<String>,
    #[prost(message, repeated, tag = "4")]
    pub unprocessed_keys: Vec<Key>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PutItem {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(message, optional, tag = "3")]
    pub item: Option<Item>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteKey {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct WriteRequest {
    #[prost(oneof = "write_request::Request", tags = "1, 2")]
    pub request: Option<write_request::Request>,
}

pub mod write_request {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Request {
        #[prost(message, tag = "1")]
        Put(super::PutItem),
        #[prost(message, tag = "2")]
        Delete(super::DeleteKey),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchWriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub writes: Vec<WriteRequest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BatchWriteResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
    #[prost(message, repeated, tag = "3")]
    pub unprocessed: Vec<WriteRequest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactGetRequest {
    #[prost(message, repeated, tag = "1")]
    pub keys: Vec<Key>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactGetItem {
    #[prost(message, optional, tag = "1")]
    pub item: Option<Item>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactGetResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<TransactGetItem>,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactPut {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(message, optional, tag = "3")]
    pub item: Option<Item>,
    #[prost(string, optional, tag = "4")]
    pub condition_expression: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactUpdate {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(string, tag = "3")]
    pub update_expression: String,
    #[prost(string, optional, tag = "4")]
    pub condition_expression: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactDelete {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(string, optional, tag = "3")]
    pub condition_expression: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ConditionCheck {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(string, tag = "3")]
    pub condition_expression: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactWriteItem {
    #[prost(oneof = "transact_write_item::Item", tags = "1, 2, 3, 4")]
    pub item: Option<transact_write_item::Item>,
}

pub mod transact_write_item {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Item {
        #[prost(message, tag = "1")]
        Put(super::TransactPut),
        #[prost(message, tag = "2")]
        Update(super::TransactUpdate),
        #[prost(message, tag = "3")]
        Delete(super::TransactDelete),
        #[prost(message, tag = "4")]
        ConditionCheck(super::ConditionCheck),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactWriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<TransactWriteItem>,
    #[prost(map = "string, message", tag = "2")]
    pub expression_values: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransactWriteResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub partition_key: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub sort_key: Option<Vec<u8>>,
    #[prost(string, tag = "3")]
    pub update_expression: String,
    #[prost(string, optional, tag = "4")]
    pub condition_expression: Option<String>,
    #[prost(map = "string, message", tag = "5")]
    pub expression_values: HashMap<String, Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateResponse {
    #[prost(message, optional, tag = "1")]
    pub item: Option<Item>,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteStatementRequest {
    #[prost(string, tag = "1")]
    pub statement: String,
    #[prost(message, repeated, tag = "2")]
    pub parameters: Vec<Value>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SelectResult {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Item>,
    #[prost(uint32, tag = "2")]
    pub count: u32,
    #[prost(uint32, tag = "3")]
    pub scanned_count: u32,
    #[prost(message, optional, tag = "4")]
    pub last_key: Option<Key>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct InsertResult {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateResult {
    #[prost(message, optional, tag = "1")]
    pub item: Option<Item>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteResult {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExecuteStatementResponse {
    #[prost(oneof = "execute_statement_response::Response", tags = "1, 2, 3, 4")]
    pub response: Option<execute_statement_response::Response>,
    #[prost(string, optional, tag = "5")]
    pub error: Option<String>,
}

pub mod execute_statement_response {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Response {
        #[prost(message, tag = "1")]
        Select(super::SelectResult),
        #[prost(message, tag = "2")]
        Insert(super::InsertResult),
        #[prost(message, tag = "3")]
        Update(super::UpdateResult),
        #[prost(message, tag = "4")]
        Delete(super::DeleteResult),
    }
}
