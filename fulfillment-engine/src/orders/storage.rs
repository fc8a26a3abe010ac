//! redb-based storage layer for orders and inventory
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `snapshots` | `order_id` | `OrderSnapshot` | Order state |
//! | `active_orders` | `order_id` | `()` | Active order index |
//! | `table_orders` | `table_id` | `order_id` | Active order per table |
//! | `ingredient_stock` | `ingredient_id` | `Decimal` | Inventory levels |
//! | `counters` | `"order_count"` | `u64` | Order number sequence |
//!
//! # Concurrency
//!
//! redb admits a single writer: every mutating operation runs inside one
//! write transaction, so guard checks always observe the latest committed
//! state and a losing concurrent claim sees the winner's write. Commits are
//! durable as soon as `commit()` returns (copy-on-write with atomic pointer
//! swap), which keeps the store consistent across power loss.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use rust_decimal::Decimal;
use shared::order::OrderSnapshot;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Orders: key = order_id, value = JSON-serialized OrderSnapshot
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Active orders: key = order_id, value = empty (existence check)
const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_orders");

/// Active order per table: key = table_id, value = order_id
const TABLE_ORDERS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("table_orders");

/// Ingredient stock levels: key = ingredient_id, value = JSON-serialized Decimal
const STOCK_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("ingredient_stock");

/// Counters: key = counter name, value = u64
const COUNTER_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ORDER_COUNT_KEY: &str = "order_count";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order and inventory storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let _ = txn.open_table(SNAPSHOTS_TABLE)?;
            let _ = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = txn.open_table(TABLE_ORDERS_TABLE)?;
            let _ = txn.open_table(STOCK_TABLE)?;
            let mut counters = txn.open_table(COUNTER_TABLE)?;
            if counters.get(ORDER_COUNT_KEY)?.is_none() {
                counters.insert(ORDER_COUNT_KEY, 0u64)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Persist a snapshot and keep the active/table indices consistent
    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &OrderSnapshot,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        {
            let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
            table.insert(snapshot.order_id.as_str(), bytes.as_slice())?;
        }
        {
            let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            if snapshot.is_terminal() {
                active.remove(snapshot.order_id.as_str())?;
            } else {
                active.insert(snapshot.order_id.as_str(), ())?;
            }
        }
        Ok(())
    }

    /// Load a snapshot inside a write transaction (read-your-writes)
    pub fn get_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<OrderSnapshot>> {
        let table = txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Load a snapshot from committed state
    pub fn get_snapshot(&self, order_id: &str) -> StorageResult<Option<OrderSnapshot>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All active (non-terminal) orders
    pub fn active_orders(&self) -> StorageResult<Vec<OrderSnapshot>> {
        let txn = self.db.begin_read()?;
        let active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let snapshots = txn.open_table(SNAPSHOTS_TABLE)?;

        let mut orders = Vec::new();
        for entry in active.iter()? {
            let (key, _) = entry?;
            if let Some(guard) = snapshots.get(key.value())? {
                orders.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(orders)
    }

    /// Every stored order, terminal ones included
    pub fn all_orders(&self) -> StorageResult<Vec<OrderSnapshot>> {
        let txn = self.db.begin_read()?;
        let snapshots = txn.open_table(SNAPSHOTS_TABLE)?;
        let mut orders = Vec::new();
        for entry in snapshots.iter()? {
            let (_, guard) = entry?;
            orders.push(serde_json::from_slice(guard.value())?);
        }
        Ok(orders)
    }

    // ========================================================================
    // Table index
    // ========================================================================

    /// Active order currently holding the table, if any
    pub fn table_active_order(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(TABLE_ORDERS_TABLE)?;
        Ok(table.get(table_id)?.map(|g| g.value().to_string()))
    }

    pub fn index_table(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_ORDERS_TABLE)?;
        table.insert(table_id, order_id)?;
        Ok(())
    }

    pub fn clear_table(&self, txn: &WriteTransaction, table_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(TABLE_ORDERS_TABLE)?;
        table.remove(table_id)?;
        Ok(())
    }

    /// Committed-state table lookup (read path)
    pub fn table_order(&self, table_id: &str) -> StorageResult<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TABLE_ORDERS_TABLE)?;
        Ok(table.get(table_id)?.map(|g| g.value().to_string()))
    }

    // ========================================================================
    // Inventory stock
    // ========================================================================

    /// Current stock level, zero when unknown
    pub fn stock_level(
        &self,
        txn: &WriteTransaction,
        ingredient_id: &str,
    ) -> StorageResult<Decimal> {
        let table = txn.open_table(STOCK_TABLE)?;
        match table.get(ingredient_id)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(Decimal::ZERO),
        }
    }

    pub fn set_stock_level(
        &self,
        txn: &WriteTransaction,
        ingredient_id: &str,
        level: Decimal,
    ) -> StorageResult<()> {
        let bytes = serde_json::to_vec(&level)?;
        let mut table = txn.open_table(STOCK_TABLE)?;
        table.insert(ingredient_id, bytes.as_slice())?;
        Ok(())
    }

    /// Committed-state stock read (queries, tests)
    pub fn stock_level_committed(&self, ingredient_id: &str) -> StorageResult<Decimal> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(STOCK_TABLE)?;
        match table.get(ingredient_id)? {
            Some(guard) => Ok(serde_json::from_slice(guard.value())?),
            None => Ok(Decimal::ZERO),
        }
    }

    /// Seed a stock level in its own transaction (setup paths)
    pub fn seed_stock(&self, ingredient_id: &str, level: Decimal) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.set_stock_level(&txn, ingredient_id, level)?;
        txn.commit()?;
        Ok(())
    }

    // ========================================================================
    // Counters
    // ========================================================================

    /// Next order sequence number, crash-safe (increments within `txn`)
    pub fn next_order_count(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut counters = txn.open_table(COUNTER_TABLE)?;
        let next = counters
            .get(ORDER_COUNT_KEY)?
            .map(|g| g.value())
            .unwrap_or(0)
            + 1;
        counters.insert(ORDER_COUNT_KEY, next)?;
        Ok(next)
    }
}
