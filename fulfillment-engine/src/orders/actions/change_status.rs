//! ChangeStatus handler
//!
//! Applies the order-level guard table: claims are acquired or checked per
//! the transition's effects, and items lagging behind the target status are
//! bulk-advanced (the chef accepting an order pulls its pending items into
//! preparation with it).

use async_trait::async_trait;

use crate::error::FulfillmentError;
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::orders::transitions::{self, advance_items};
use shared::order::{OrderSnapshot, OrderStatus};

/// ChangeStatus action
#[derive(Debug, Clone)]
pub struct ChangeStatusAction {
    pub order_id: String,
    pub new_status: OrderStatus,
}

#[async_trait]
impl OrderAction for ChangeStatusAction {
    type Output = (OrderSnapshot, OrderStatus);

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, OrderStatus), FulfillmentError> {
        let mut snapshot = ctx.load_order(&self.order_id)?;
        if snapshot.is_terminal() {
            return Err(FulfillmentError::OrderClosed {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }

        let old_status = snapshot.status;
        let effects = transitions::authorize_transition(
            old_status,
            self.new_status,
            actor.role,
            snapshot.order_type,
        )?;

        if let Some(field) = effects.must_hold {
            match snapshot.claimant(field) {
                Some(current) if current.id == actor.employee.id => {}
                Some(current) => {
                    return Err(FulfillmentError::NotClaimant {
                        claimant: current.name.clone(),
                    });
                }
                // Unclaimed despite progress (legacy data): take it now
                None => {
                    snapshot.claim(field, &actor.employee)?;
                }
            }
        }
        if let Some(field) = effects.claim {
            snapshot.claim(field, &actor.employee)?;
        }
        if let Some(target) = effects.item_advance {
            advance_items(&mut snapshot.items, target);
        }

        snapshot.status = self.new_status;
        if !self.new_status.is_explicit() {
            // Keep the derived band honest with the roll-up
            snapshot.status = transitions::derive_status(&snapshot);
        }
        snapshot.updated_by = Some(actor.employee.clone());
        snapshot.updated_at = ctx.now_millis;

        ctx.storage.store_snapshot(ctx.txn, &snapshot)?;

        tracing::info!(
            order_number = %snapshot.order_number,
            from = %old_status,
            to = %snapshot.status,
            actor = %actor.employee.name,
            "order status changed"
        );
        Ok((snapshot, old_status))
    }
}
