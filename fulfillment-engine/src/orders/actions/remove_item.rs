//! RemoveItem handler
//!
//! Deletes one line item while the order is still mutable and analyzes the
//! stock return: automatic credit when the preparation stage implies the
//! ingredients were never consumed, an explicit manual-reconciliation
//! signal otherwise. Deleting the sole remaining item is refused with a
//! distinguished `LastItem` signal so the caller cancels the whole order
//! instead of leaving a zero-item order behind.

use async_trait::async_trait;

use crate::error::FulfillmentError;
use crate::inventory::{
    aggregate_requirements, credit, return_disposition, ReturnDisposition, StockReturn,
};
use crate::money;
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::orders::transitions;
use shared::order::{ItemStatus, LineItem, OrderSnapshot};

/// RemoveItem action
#[derive(Debug, Clone)]
pub struct RemoveItemAction {
    pub order_id: String,
    pub instance_id: String,
}

#[async_trait]
impl OrderAction for RemoveItemAction {
    type Output = (OrderSnapshot, LineItem, StockReturn);

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, LineItem, StockReturn), FulfillmentError> {
        let mut snapshot = ctx.load_order(&self.order_id)?;
        if snapshot.is_terminal() {
            return Err(FulfillmentError::OrderClosed {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }

        // Creator, cashier, or a supervisor
        let is_creator = snapshot.created_by.id == actor.employee.id;
        if !(is_creator
            || actor.role == shared::models::Role::Cashier
            || actor.role.is_supervisor())
        {
            return Err(FulfillmentError::NotPermitted {
                role: actor.role,
                action: "delete items from this order".to_string(),
            });
        }

        let position = snapshot
            .items
            .iter()
            .position(|i| i.instance_id == self.instance_id)
            .ok_or_else(|| FulfillmentError::ItemNotFound(self.instance_id.clone()))?;

        if snapshot.items[position].status == ItemStatus::Delivered {
            return Err(FulfillmentError::ItemAlreadyDelivered {
                name: snapshot.items[position].name.clone(),
            });
        }
        if snapshot.items.len() == 1 {
            return Err(FulfillmentError::LastItem);
        }

        let removed = snapshot.items.remove(position);

        let stock_return =
            match return_disposition(removed.status, removed.requires_preparation) {
                ReturnDisposition::Automatic => match ctx.catalog.get_item(&removed.item_id) {
                    Some(menu_item) => {
                        let requirements =
                            aggregate_requirements([(&menu_item, removed.quantity)]);
                        let credits = credit(ctx.storage, ctx.txn, &requirements)?;
                        StockReturn {
                            credits,
                            manual_items: Vec::new(),
                        }
                    }
                    None => {
                        tracing::warn!(
                            item = %removed.item_id,
                            "menu item no longer in catalog, stock not credited"
                        );
                        StockReturn::default()
                    }
                },
                ReturnDisposition::Manual => {
                    tracing::warn!(
                        order_number = %snapshot.order_number,
                        item = %removed.name,
                        status = %removed.status,
                        "item removal requires manual stock reconciliation"
                    );
                    StockReturn {
                        credits: Vec::new(),
                        manual_items: vec![removed.name.clone()],
                    }
                }
            };

        money::recalculate_totals(&mut snapshot);
        snapshot.status = transitions::derive_status(&snapshot);
        snapshot.updated_by = Some(actor.employee.clone());
        snapshot.updated_at = ctx.now_millis;

        ctx.storage.store_snapshot(ctx.txn, &snapshot)?;

        tracing::info!(
            order_number = %snapshot.order_number,
            item = %removed.name,
            manual_return = stock_return.requires_manual_reconciliation(),
            total = %snapshot.total,
            "item removed from order"
        );
        Ok((snapshot, removed, stock_return))
    }
}
