//! CancelOrder handler
//!
//! Cancellation is reachable from PENDING only, by the order's creator or a
//! supervisor. Stock comes back per the return policy: items whose stage
//! implies no consumption are credited automatically; anything a cook
//! already touched is surfaced for manual reconciliation. The DINE_IN
//! table is freed.

use async_trait::async_trait;

use crate::error::FulfillmentError;
use crate::inventory::{
    aggregate_requirements, credit, return_disposition, ReturnDisposition, StockReturn,
};
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use shared::order::{OrderSnapshot, OrderStatus, OrderType};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
}

#[async_trait]
impl OrderAction for CancelOrderAction {
    type Output = (OrderSnapshot, StockReturn, Option<String>);

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, StockReturn, Option<String>), FulfillmentError> {
        let mut snapshot = ctx.load_order(&self.order_id)?;
        if snapshot.is_terminal() {
            return Err(FulfillmentError::OrderClosed {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }

        let is_creator = snapshot.created_by.id == actor.employee.id;
        if !(is_creator || actor.role.is_supervisor()) {
            return Err(FulfillmentError::NotPermitted {
                role: actor.role,
                action: "cancel this order".to_string(),
            });
        }

        if snapshot.status != OrderStatus::Pending {
            return Err(FulfillmentError::NotCancellable {
                status: snapshot.status,
                detail: "order already progressed past PENDING".to_string(),
            });
        }
        // The aggregate can read PENDING while individual items were already
        // handed over (divergent item statuses); those must not be cancelled
        if snapshot.has_delivered_items() {
            return Err(FulfillmentError::NotCancellable {
                status: snapshot.status,
                detail: "order has delivered items; remove the rest individually".to_string(),
            });
        }

        // Return stock per item disposition
        let mut stock_return = StockReturn::default();
        let mut auto_pairs = Vec::new();
        for item in &snapshot.items {
            match return_disposition(item.status, item.requires_preparation) {
                ReturnDisposition::Automatic => match ctx.catalog.get_item(&item.item_id) {
                    Some(menu_item) => auto_pairs.push((menu_item, item.quantity)),
                    None => {
                        tracing::warn!(
                            item = %item.item_id,
                            "menu item no longer in catalog, stock not credited"
                        );
                    }
                },
                ReturnDisposition::Manual => {
                    stock_return.manual_items.push(item.name.clone());
                }
            }
        }
        let requirements = aggregate_requirements(auto_pairs.iter().map(|(m, q)| (m, *q)));
        stock_return.credits = credit(ctx.storage, ctx.txn, &requirements)?;

        if stock_return.requires_manual_reconciliation() {
            tracing::warn!(
                order_number = %snapshot.order_number,
                items = ?stock_return.manual_items,
                "cancelled order has items requiring manual stock reconciliation"
            );
        }

        snapshot.status = OrderStatus::Cancelled;
        snapshot.cancelled_at = Some(ctx.now_millis);
        snapshot.updated_by = Some(actor.employee.clone());
        snapshot.updated_at = ctx.now_millis;

        let freed_table = match (snapshot.order_type, snapshot.table_id.clone()) {
            (OrderType::DineIn, Some(table_id)) => {
                ctx.storage.clear_table(ctx.txn, &table_id)?;
                Some(table_id)
            }
            _ => None,
        };

        ctx.storage.store_snapshot(ctx.txn, &snapshot)?;

        tracing::info!(
            order_number = %snapshot.order_number,
            cancelled_by = %actor.employee.name,
            credited = stock_return.credits.len(),
            "order cancelled"
        );
        Ok((snapshot, stock_return, freed_table))
    }
}
