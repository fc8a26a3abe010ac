//! FulfillmentManager - the per-role entry points
//!
//! Wraps each operation in a single redb write transaction (atomic
//! read-modify-write; the serialized writer resolves concurrent claims so
//! exactly one actor's claim commits), then mirrors table state to the
//! provider and broadcasts a notification. Notification and mirror
//! failures are logged, never propagated.

#[cfg(test)]
mod tests;

use crate::error::FulfillmentError;
use crate::inventory::StockReturn;
use crate::orders::actions::{
    AddItemsAction, CancelOrderAction, ChangeItemStatusAction, ChangeStatusAction,
    CollectPaymentAction, CreateOrderAction, RemoveItemAction,
};
use crate::orders::notification::OrderNotification;
use crate::orders::storage::{OrderStorage, StorageError};
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::services::{ConfigProvider, MenuProvider, PromotionProvider, TableProvider};
use redb::WriteTransaction;
use shared::order::{
    ItemStatus, LineItem, LineItemInput, OrderDraft, OrderSnapshot, OrderStatus, PaymentDetails,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notification channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Order fulfillment facade
pub struct FulfillmentManager {
    storage: OrderStorage,
    catalog: Arc<dyn MenuProvider>,
    promotions: Arc<dyn PromotionProvider>,
    tables: Arc<dyn TableProvider>,
    config: Arc<dyn ConfigProvider>,
    event_tx: broadcast::Sender<OrderNotification>,
}

impl std::fmt::Debug for FulfillmentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FulfillmentManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl FulfillmentManager {
    /// Open (or create) the store at `db_path` and assemble the facade
    pub fn new(
        db_path: impl AsRef<Path>,
        catalog: Arc<dyn MenuProvider>,
        promotions: Arc<dyn PromotionProvider>,
        tables: Arc<dyn TableProvider>,
        config: Arc<dyn ConfigProvider>,
    ) -> Result<Self, FulfillmentError> {
        let storage = OrderStorage::open(db_path)?;
        Ok(Self::with_parts(storage, catalog, promotions, tables, config))
    }

    /// Assemble from an existing storage handle
    pub fn with_parts(
        storage: OrderStorage,
        catalog: Arc<dyn MenuProvider>,
        promotions: Arc<dyn PromotionProvider>,
        tables: Arc<dyn TableProvider>,
        config: Arc<dyn ConfigProvider>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            catalog,
            promotions,
            tables,
            config,
            event_tx,
        }
    }

    /// Subscribe to order notifications
    pub fn subscribe(&self) -> broadcast::Receiver<OrderNotification> {
        self.event_tx.subscribe()
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    fn op_context<'a>(&'a self, txn: &'a WriteTransaction) -> OpContext<'a> {
        OpContext {
            txn,
            storage: &self.storage,
            catalog: self.catalog.as_ref(),
            promotions: self.promotions.as_ref(),
            tables: self.tables.as_ref(),
            config: self.config.as_ref(),
            today: chrono::Local::now().date_naive(),
            now_millis: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn notify(&self, notification: OrderNotification) {
        if self.event_tx.send(notification).is_err() {
            tracing::debug!("no notification subscribers");
        }
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Create an order with at least one line item
    pub async fn create_order(
        &self,
        draft: OrderDraft,
        lines: Vec<LineItemInput>,
        actor: &ActorContext,
    ) -> Result<OrderSnapshot, FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            CreateOrderAction { draft, lines }.execute(&ctx, actor).await
        };
        let snapshot = result?;
        txn.commit().map_err(StorageError::from)?;

        if let Some(table_id) = &snapshot.table_id {
            self.tables.occupy(table_id);
        }
        self.notify(OrderNotification::OrderCreated {
            order_id: snapshot.order_id.clone(),
            order_number: snapshot.order_number.clone(),
            order_type: snapshot.order_type,
        });
        Ok(snapshot)
    }

    /// Add line items to an existing order
    pub async fn add_items(
        &self,
        order_id: &str,
        lines: Vec<LineItemInput>,
        actor: &ActorContext,
    ) -> Result<OrderSnapshot, FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            AddItemsAction {
                order_id: order_id.to_string(),
                lines,
            }
            .execute(&ctx, actor)
            .await
        };
        let (snapshot, count) = result?;
        txn.commit().map_err(StorageError::from)?;

        self.notify(OrderNotification::ItemsAdded {
            order_id: snapshot.order_id.clone(),
            order_number: snapshot.order_number.clone(),
            count,
        });
        Ok(snapshot)
    }

    /// Delete one line item; the stock-return analysis comes back with it
    pub async fn delete_item(
        &self,
        order_id: &str,
        instance_id: &str,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, LineItem, StockReturn), FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            RemoveItemAction {
                order_id: order_id.to_string(),
                instance_id: instance_id.to_string(),
            }
            .execute(&ctx, actor)
            .await
        };
        let output = result?;
        txn.commit().map_err(StorageError::from)?;
        Ok(output)
    }

    /// Apply an order-level transition per the guard table
    pub async fn change_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        actor: &ActorContext,
    ) -> Result<OrderSnapshot, FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            ChangeStatusAction {
                order_id: order_id.to_string(),
                new_status,
            }
            .execute(&ctx, actor)
            .await
        };
        let (snapshot, old_status) = result?;
        txn.commit().map_err(StorageError::from)?;

        self.notify(OrderNotification::StatusChanged {
            order_id: snapshot.order_id.clone(),
            order_number: snapshot.order_number.clone(),
            from: old_status,
            to: snapshot.status,
        });
        Ok(snapshot)
    }

    /// Advance individual line items; the aggregate status is re-derived
    pub async fn change_item_status(
        &self,
        order_id: &str,
        instance_ids: Vec<String>,
        new_status: ItemStatus,
        actor: &ActorContext,
    ) -> Result<OrderSnapshot, FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            ChangeItemStatusAction {
                order_id: order_id.to_string(),
                instance_ids,
                new_status,
            }
            .execute(&ctx, actor)
            .await
        };
        let (snapshot, old_status) = result?;
        txn.commit().map_err(StorageError::from)?;

        if snapshot.status != old_status {
            self.notify(OrderNotification::StatusChanged {
                order_id: snapshot.order_id.clone(),
                order_number: snapshot.order_number.clone(),
                from: old_status,
                to: snapshot.status,
            });
        }
        Ok(snapshot)
    }

    /// Collect payment (DELIVERED -> PAID), recording method and tip
    pub async fn collect_payment(
        &self,
        order_id: &str,
        details: PaymentDetails,
        actor: &ActorContext,
    ) -> Result<OrderSnapshot, FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            CollectPaymentAction {
                order_id: order_id.to_string(),
                details,
            }
            .execute(&ctx, actor)
            .await
        };
        let (snapshot, freed_table) = result?;
        txn.commit().map_err(StorageError::from)?;

        if let Some(table_id) = freed_table {
            self.tables.free(&table_id);
        }
        self.notify(OrderNotification::StatusChanged {
            order_id: snapshot.order_id.clone(),
            order_number: snapshot.order_number.clone(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Paid,
        });
        Ok(snapshot)
    }

    /// Cancel a PENDING order; all stock comes back per the return policy
    pub async fn cancel_order(
        &self,
        order_id: &str,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, StockReturn), FulfillmentError> {
        let txn = self.storage.begin_write()?;
        let result = {
            let ctx = self.op_context(&txn);
            CancelOrderAction {
                order_id: order_id.to_string(),
            }
            .execute(&ctx, actor)
            .await
        };
        let (snapshot, stock_return, freed_table) = result?;
        txn.commit().map_err(StorageError::from)?;

        if let Some(table_id) = freed_table {
            self.tables.free(&table_id);
        }
        self.notify(OrderNotification::OrderCancelled {
            order_id: snapshot.order_id.clone(),
            order_number: snapshot.order_number.clone(),
        });
        Ok((snapshot, stock_return))
    }

    // ========================================================================
    // Read paths
    // ========================================================================

    pub fn get_order(&self, order_id: &str) -> Result<OrderSnapshot, FulfillmentError> {
        self.storage
            .get_snapshot(order_id)?
            .ok_or_else(|| FulfillmentError::OrderNotFound(order_id.to_string()))
    }

    pub fn active_orders(&self) -> Result<Vec<OrderSnapshot>, FulfillmentError> {
        let mut orders = self.storage.active_orders()?;
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    pub fn orders_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<OrderSnapshot>, FulfillmentError> {
        let mut orders = self.storage.all_orders()?;
        orders.retain(|o| o.status == status);
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Active order currently holding the table, if any
    pub fn order_for_table(
        &self,
        table_id: &str,
    ) -> Result<Option<OrderSnapshot>, FulfillmentError> {
        match self.storage.table_order(table_id)? {
            Some(order_id) => Ok(self.storage.get_snapshot(&order_id)?),
            None => Ok(None),
        }
    }

    /// The cook's working queue: globally-visible unclaimed pending work
    /// plus the caller's own claimed-but-unfinished work; other cooks'
    /// claimed work is hidden
    pub fn kitchen_queue(
        &self,
        actor: &ActorContext,
    ) -> Result<Vec<OrderSnapshot>, FulfillmentError> {
        let mut queue = self.storage.active_orders()?;
        queue.retain(|order| {
            if !order.has_items_requiring_preparation() {
                return false;
            }
            match &order.prepared_by {
                None => order
                    .items
                    .iter()
                    .any(|i| i.status == ItemStatus::Pending && i.requires_preparation),
                Some(claimant) if claimant.id == actor.employee.id => order
                    .items
                    .iter()
                    .any(|i| matches!(i.status, ItemStatus::Pending | ItemStatus::InPreparation)),
                Some(_) => false,
            }
        });
        queue.sort_by_key(|o| o.created_at);
        Ok(queue)
    }
}
