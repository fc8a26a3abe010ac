//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    /// Reserved tables are blocked for walk-in orders
    Reserved,
    OutOfService,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub status: TableStatus,
}
