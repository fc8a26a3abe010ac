//! ChangeItemStatus handler
//!
//! Item statuses advance independently of sibling items; the aggregate
//! status is re-derived afterwards. Claim semantics live at the order
//! level: the first cook to start any item claims the order, and only that
//! cook (or a supervisor) continues it.

use async_trait::async_trait;

use crate::error::FulfillmentError;
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::orders::transitions;
use shared::order::{ItemStatus, OrderSnapshot, OrderStatus};

/// ChangeItemStatus action
#[derive(Debug, Clone)]
pub struct ChangeItemStatusAction {
    pub order_id: String,
    pub instance_ids: Vec<String>,
    pub new_status: ItemStatus,
}

#[async_trait]
impl OrderAction for ChangeItemStatusAction {
    type Output = (OrderSnapshot, OrderStatus);

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, OrderStatus), FulfillmentError> {
        if self.instance_ids.is_empty() {
            return Err(FulfillmentError::Validation(
                "no items to update".to_string(),
            ));
        }

        let mut snapshot = ctx.load_order(&self.order_id)?;
        if snapshot.is_terminal() {
            return Err(FulfillmentError::OrderClosed {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }
        let old_status = snapshot.status;

        // Validate every requested item before mutating any of them
        let mut claims = Vec::new();
        for instance_id in &self.instance_ids {
            let item = snapshot
                .find_item(instance_id)
                .ok_or_else(|| FulfillmentError::ItemNotFound(instance_id.clone()))?;
            if item.status == ItemStatus::Delivered {
                return Err(FulfillmentError::ItemAlreadyDelivered {
                    name: item.name.clone(),
                });
            }
            let effects =
                transitions::authorize_item_transition(item.status, self.new_status, actor.role)?;

            if let Some(field) = effects.must_hold {
                match snapshot.claimant(field) {
                    Some(current) if current.id == actor.employee.id => {}
                    Some(current) => {
                        return Err(FulfillmentError::NotClaimant {
                            claimant: current.name.clone(),
                        });
                    }
                    None => claims.push(field),
                }
            }
            if let Some(field) = effects.claim {
                claims.push(field);
            }
        }

        for field in claims {
            snapshot.claim(field, &actor.employee)?;
        }
        for instance_id in &self.instance_ids {
            if let Some(item) = snapshot.find_item_mut(instance_id) {
                item.status = self.new_status;
            }
        }

        snapshot.status = transitions::derive_status(&snapshot);
        snapshot.updated_by = Some(actor.employee.clone());
        snapshot.updated_at = ctx.now_millis;

        ctx.storage.store_snapshot(ctx.txn, &snapshot)?;

        tracing::info!(
            order_number = %snapshot.order_number,
            items = self.instance_ids.len(),
            item_status = %self.new_status,
            order_status = %snapshot.status,
            "item statuses changed"
        );
        Ok((snapshot, old_status))
    }
}
