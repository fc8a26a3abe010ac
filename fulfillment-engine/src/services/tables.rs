//! Dining table provider
//!
//! The engine's authoritative table-occupancy check is its own
//! order-per-table index inside the write transaction; this provider is the
//! advisory floor-state mirror (occupy/free run after commit, failures are
//! logged by the caller).

use dashmap::DashMap;
use shared::models::{DiningTable, TableStatus};

/// Table state consumed by the engine
pub trait TableProvider: Send + Sync {
    /// Whether the table exists and can take a new DINE_IN order
    fn is_available(&self, table_id: &str) -> bool;
    fn occupy(&self, table_id: &str);
    fn free(&self, table_id: &str);
}

/// DashMap-backed table registry for embedding and tests
#[derive(Default)]
pub struct InMemoryTables {
    tables: DashMap<String, DiningTable>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, table: DiningTable) {
        self.tables.insert(table.id.clone(), table);
    }

    pub fn status(&self, table_id: &str) -> Option<TableStatus> {
        self.tables.get(table_id).map(|t| t.status)
    }
}

impl TableProvider for InMemoryTables {
    fn is_available(&self, table_id: &str) -> bool {
        self.tables
            .get(table_id)
            .map(|t| t.status == TableStatus::Available)
            .unwrap_or(false)
    }

    fn occupy(&self, table_id: &str) {
        if let Some(mut table) = self.tables.get_mut(table_id) {
            table.status = TableStatus::Occupied;
        }
    }

    fn free(&self, table_id: &str) {
        if let Some(mut table) = self.tables.get_mut(table_id) {
            table.status = TableStatus::Available;
        }
    }
}
