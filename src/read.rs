//! Read operations for retrieving items.
//!
//! This module provides operations for reading data:
//! - Getting individual items by primary key
//! - Querying one partition with sort-key conditions
//! - Scanning the whole store, optionally in parallel segments
//! - Batch retrieving multiple items
//! - Transactional reads from one snapshot

/// Batch get item operation for retrieving multiple items.
pub mod batch_get_item;

/// Common utilities and types for read operations.
pub(crate) mod common;

/// Get item operation for retrieving a single item by primary key.
pub mod get_item;

/// Query operation for retrieving items of one partition.
pub mod query;

/// Scan operation for retrieving every item.
pub mod scan;

/// Transactional read operation.
pub mod transact_get_items;
