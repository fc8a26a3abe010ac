//! CreateOrder handler
//!
//! Validates the draft against its order type, checks table availability
//! (both the provider state and the engine's own order-per-table index),
//! re-prices promotional lines server-side, deducts stock all-or-nothing,
//! and persists the new order with a crash-safe order number.

use async_trait::async_trait;

use super::build_line;
use crate::error::FulfillmentError;
use crate::inventory::{aggregate_requirements, deduct};
use crate::money;
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::orders::transitions;
use shared::order::{LineItemInput, OrderDraft, OrderSnapshot, OrderStatus, OrderType};
use validator::Validate;

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub draft: OrderDraft,
    pub lines: Vec<LineItemInput>,
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Customer data requirements per order type:
/// DELIVERY needs name + phone + address, TAKEOUT needs name + phone,
/// DINE_IN identifies the customer by table and takes no address.
fn validate_customer_info(draft: &OrderDraft) -> Result<(), FulfillmentError> {
    match draft.order_type {
        OrderType::Delivery => {
            if !has_text(&draft.customer_name) {
                return Err(FulfillmentError::Validation(
                    "customer name is required for delivery orders".to_string(),
                ));
            }
            if !has_text(&draft.customer_phone) {
                return Err(FulfillmentError::Validation(
                    "customer phone is required for delivery orders".to_string(),
                ));
            }
            if !has_text(&draft.delivery_address) {
                return Err(FulfillmentError::Validation(
                    "delivery address is required for delivery orders".to_string(),
                ));
            }
        }
        OrderType::Takeout => {
            if !has_text(&draft.customer_name) {
                return Err(FulfillmentError::Validation(
                    "customer name is required for takeout orders".to_string(),
                ));
            }
            if !has_text(&draft.customer_phone) {
                return Err(FulfillmentError::Validation(
                    "customer phone is required for takeout orders".to_string(),
                ));
            }
        }
        OrderType::DineIn => {
            if has_text(&draft.delivery_address) {
                return Err(FulfillmentError::Validation(
                    "dine-in orders take no delivery address".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl OrderAction for CreateOrderAction {
    type Output = OrderSnapshot;

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<OrderSnapshot, FulfillmentError> {
        if !actor.role.can_create_orders() {
            return Err(FulfillmentError::NotPermitted {
                role: actor.role,
                action: "create orders".to_string(),
            });
        }
        self.draft
            .validate()
            .map_err(|e| FulfillmentError::Validation(e.to_string()))?;
        if self.lines.is_empty() {
            return Err(FulfillmentError::Validation(
                "an order needs at least one line item".to_string(),
            ));
        }
        validate_customer_info(&self.draft)?;

        // Table requirement by order type
        let table_id = match self.draft.order_type {
            OrderType::DineIn => Some(self.draft.table_id.clone().ok_or_else(|| {
                FulfillmentError::Validation("a table is required for dine-in orders".to_string())
            })?),
            OrderType::Takeout | OrderType::Delivery => {
                if self.draft.table_id.is_some() {
                    tracing::warn!(order_type = ?self.draft.order_type, "table reference ignored");
                }
                None
            }
        };

        // Provider state plus the authoritative order-per-table index
        if let Some(tid) = &table_id {
            if !ctx.tables.is_available(tid)
                || ctx.storage.table_active_order(ctx.txn, tid)?.is_some()
            {
                return Err(FulfillmentError::TableUnavailable(tid.clone()));
            }
        }

        if !ctx
            .config
            .is_payment_method_enabled(self.draft.payment_method)
        {
            return Err(FulfillmentError::PaymentMethodDisabled(
                self.draft.payment_method,
            ));
        }

        // Build lines with server-side promotion validation
        let mut pairs = Vec::with_capacity(self.lines.len());
        let mut items = Vec::with_capacity(self.lines.len());
        for input in &self.lines {
            let (menu_item, line) = build_line(ctx, input, false)?;
            pairs.push((menu_item, input.quantity));
            items.push(line);
        }

        // All-or-nothing stock deduction across the whole order
        let requirements = aggregate_requirements(pairs.iter().map(|(m, q)| (m, *q)));
        deduct(ctx.storage, ctx.txn, &requirements)?;

        let count = ctx.storage.next_order_count(ctx.txn)?;
        let order_number = format!("ORD-{}-{:03}", ctx.today.format("%Y%m%d"), count);

        let mut snapshot = OrderSnapshot {
            order_id: uuid::Uuid::new_v4().to_string(),
            order_number,
            order_type: self.draft.order_type,
            status: OrderStatus::Pending,
            table_id: table_id.clone(),
            customer_name: self.draft.customer_name.clone(),
            customer_phone: self.draft.customer_phone.clone(),
            delivery_address: self.draft.delivery_address.clone(),
            delivery_references: self.draft.delivery_references.clone(),
            payment_method: self.draft.payment_method,
            items,
            subtotal: rust_decimal::Decimal::ZERO,
            tax_rate: ctx.config.tax_rate(),
            tax_amount: rust_decimal::Decimal::ZERO,
            tip: rust_decimal::Decimal::ZERO,
            total: rust_decimal::Decimal::ZERO,
            prepared_by: None,
            delivered_by: None,
            paid_by: None,
            created_by: actor.employee.clone(),
            updated_by: None,
            created_at: ctx.now_millis,
            updated_at: ctx.now_millis,
            cancelled_at: None,
        };
        money::recalculate_totals(&mut snapshot);
        // An order of grab-and-go items derives READY immediately
        snapshot.status = transitions::derive_status(&snapshot);

        ctx.storage.store_snapshot(ctx.txn, &snapshot)?;
        if let Some(tid) = &table_id {
            ctx.storage.index_table(ctx.txn, tid, &snapshot.order_id)?;
        }

        tracing::info!(
            order_number = %snapshot.order_number,
            order_type = ?snapshot.order_type,
            status = %snapshot.status,
            total = %snapshot.total,
            "order created"
        );
        Ok(snapshot)
    }
}
