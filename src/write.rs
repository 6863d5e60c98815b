//! Write operations for modifying items.
//!
//! This module provides operations for writing data:
//! - Putting new items or replacing existing ones
//! - Updating items with expressions or typed actions
//! - Deleting items by primary key
//! - Batch writing multiple independent items
//! - Transactional writes applied all-or-nothing

/// Batch write item operation for writing multiple independent items.
pub mod batch_write_item;

/// Common utilities and types for write operations.
pub(crate) mod common;

/// Delete item operation for removing items.
pub mod delete_item;

/// Put item operation for creating or replacing items.
pub mod put_item;

/// Transactional write operation.
pub mod transact_write_items;

/// Update item operation for modifying existing items.
pub mod update_item;
