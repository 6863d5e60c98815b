#![deny(missing_docs)]

//! # KeystoneDB client
//!
//! Strongly-typed request builders and a gRPC client for the KeystoneDB
//! key-value/document service.
//!
//! ## Overview
//!
//! - Documents are [`Item`]s: attribute names mapped to [`AttributeValue`]s.
//!   Numbers keep their decimal text exactly as written.
//! - Every operation has a builder. Mutators chain and never fail; `build()`
//!   is the single validation point and never touches the network.
//! - A [`Client`] connects eagerly, is cheap to clone and dispatches each
//!   built request as one remote call. Scans are streamed and aggregated,
//!   failing fast on the first error chunk.
//!
//! ## Quick Example
//!
//! ```no_run
//! use keystone_client::{Client, Expression, Key, read, write};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::connect("localhost:50051").await?;
//!
//! // only create the profile if it does not exist yet
//! write::put_item::PutItem::builder("user#123")
//!     .with_sort_key("profile")
//!     .with_string("name", "Alice")
//!     .with_number("age", "30")
//!     .with_condition("attribute_not_exists(pk)")
//!     .build()?
//!     .send(&client)
//!     .await?;
//!
//! let adults = read::query::Query::builder("user#123")
//!     .with_sort_key_begins_with("profile")
//!     .with_filter(Expression::new("age >= :min").with_binding(":min", 18))
//!     .build()?
//!     .send(&client)
//!     .await?;
//! println!("{} matching items", adults.count);
//!
//! let output = read::batch_get_item::BatchGetItem::builder()
//!     .with_key(Key::new("user#123").with_sort_key("profile"))
//!     .build()?
//!     .send(&client)
//!     .await?;
//! assert!(output.unprocessed_keys.is_empty());
//!
//! client.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Values, keys, expressions and typed conditions
//! - [`mod@read`] - Read operations (GetItem, Query, Scan, BatchGetItem, TransactGetItems)
//! - [`mod@write`] - Write operations (PutItem, UpdateItem, DeleteItem, BatchWriteItem, TransactWriteItems)
//! - [`mod@statement`] - SQL-like statements with positional parameters
//! - [`mod@client`] - Connection and dispatch

/// Connection to a KeystoneDB service.
pub mod client;

/// Common utilities for values, keys and expressions.
pub mod common;

/// Errors raised by builders and the client.
pub mod error;

/// Wire messages of the service.
pub mod proto;

/// Read operations for retrieving items.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying a partition with sort-key conditions
/// - Scanning the whole store
/// - Batch and transactional retrieval of multiple items
pub mod read;

/// Statements executed by the service.
pub mod statement;

/// The remote-call channel.
pub mod transport;

/// Write operations for modifying items.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Updating items with typed actions or raw expressions
/// - Deleting items by key
/// - Batch and transactional writes of multiple items
pub mod write;

pub use client::{Client, ClientConfig};
pub use common::{
    expression::Expression,
    key::Key,
    value::{AttributeValue, Item, Number},
};
pub use error::{Error, Result};
