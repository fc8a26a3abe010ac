//! Shared domain types for the order fulfillment engine
//!
//! Common types used across the workspace: catalog and inventory models,
//! promotions, tables, employees, system configuration, and the order
//! aggregate (line items, snapshots, statuses, request DTOs).

pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};
