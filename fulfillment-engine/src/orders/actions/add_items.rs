//! AddItems handler
//!
//! Adds new line items to an existing order. New items always start at
//! their natural initial status, so on a re-opened DINE_IN order the item
//! statuses diverge from the (sticky) aggregate status: the table ordered
//! dessert after the mains were delivered.

use async_trait::async_trait;

use super::build_line;
use crate::error::FulfillmentError;
use crate::inventory::{aggregate_requirements, deduct};
use crate::money;
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::orders::transitions;
use shared::order::{LineItemInput, OrderSnapshot};

/// AddItems action
#[derive(Debug, Clone)]
pub struct AddItemsAction {
    pub order_id: String,
    pub lines: Vec<LineItemInput>,
}

#[async_trait]
impl OrderAction for AddItemsAction {
    type Output = (OrderSnapshot, usize);

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, usize), FulfillmentError> {
        if !actor.role.can_create_orders() {
            return Err(FulfillmentError::NotPermitted {
                role: actor.role,
                action: "add items to orders".to_string(),
            });
        }
        if self.lines.is_empty() {
            return Err(FulfillmentError::Validation(
                "no line items to add".to_string(),
            ));
        }

        let mut snapshot = ctx.load_order(&self.order_id)?;
        if snapshot.is_terminal() {
            return Err(FulfillmentError::OrderClosed {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }
        if !snapshot.can_accept_new_items() {
            return Err(FulfillmentError::CannotAcceptItems {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }

        let mut pairs = Vec::with_capacity(self.lines.len());
        let mut new_items = Vec::with_capacity(self.lines.len());
        for input in &self.lines {
            let (menu_item, line) = build_line(ctx, input, true)?;
            pairs.push((menu_item, input.quantity));
            new_items.push(line);
        }

        let requirements = aggregate_requirements(pairs.iter().map(|(m, q)| (m, *q)));
        deduct(ctx.storage, ctx.txn, &requirements)?;

        let count = new_items.len();
        snapshot.items.extend(new_items);

        money::recalculate_totals(&mut snapshot);
        snapshot.status = transitions::derive_status(&snapshot);
        snapshot.updated_by = Some(actor.employee.clone());
        snapshot.updated_at = ctx.now_millis;

        ctx.storage.store_snapshot(ctx.txn, &snapshot)?;

        tracing::info!(
            order_number = %snapshot.order_number,
            count,
            total = %snapshot.total,
            "items added to order"
        );
        Ok((snapshot, count))
    }
}
