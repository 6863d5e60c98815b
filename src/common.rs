//! Common building blocks shared by read and write operations.
//!
//! This module provides the value model, keys, and the expressions used for
//! conditions, filters and updates.

/// Typed conditions that render into expressions.
pub mod condition;

/// Expression text with placeholder bindings.
pub mod expression;

/// Primary keys addressing items.
pub mod key;

/// Conversion between `serde` types and the value model.
pub mod native;

/// The document value model.
pub mod value;
