//! CollectPayment handler
//!
//! DELIVERED -> PAID. Cashiers take any enabled method; waiters never
//! handle cash; couriers take cash only on DELIVERY orders they delivered
//! themselves. Collection claims `paid_by`, records the final method and
//! tip, and frees the DINE_IN table.

use async_trait::async_trait;

use crate::error::FulfillmentError;
use crate::money;
use crate::orders::traits::{ActorContext, OpContext, OrderAction};
use crate::orders::transitions;
use shared::order::{ClaimField, OrderSnapshot, OrderStatus, OrderType, PaymentDetails};

/// CollectPayment action
#[derive(Debug, Clone)]
pub struct CollectPaymentAction {
    pub order_id: String,
    pub details: PaymentDetails,
}

#[async_trait]
impl OrderAction for CollectPaymentAction {
    type Output = (OrderSnapshot, Option<String>);

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, Option<String>), FulfillmentError> {
        money::validate_tip(self.details.tip)?;

        let mut snapshot = ctx.load_order(&self.order_id)?;
        if snapshot.is_terminal() {
            return Err(FulfillmentError::OrderClosed {
                order_number: snapshot.order_number,
                status: snapshot.status,
            });
        }
        if snapshot.status != OrderStatus::Delivered {
            return Err(FulfillmentError::InvalidTransition {
                from: snapshot.status,
                to: OrderStatus::Paid,
            });
        }
        if !ctx.config.is_payment_method_enabled(self.details.method) {
            return Err(FulfillmentError::PaymentMethodDisabled(self.details.method));
        }

        let is_self_delivered = snapshot
            .delivered_by
            .as_ref()
            .is_some_and(|e| e.id == actor.employee.id);
        transitions::authorize_payment(
            actor.role,
            snapshot.order_type,
            self.details.method,
            is_self_delivered,
        )?;

        snapshot.claim(ClaimField::PaidBy, &actor.employee)?;
        snapshot.payment_method = self.details.method;
        snapshot.tip = money::round_money(self.details.tip);
        snapshot.status = OrderStatus::Paid;
        snapshot.updated_by = Some(actor.employee.clone());
        snapshot.updated_at = ctx.now_millis;

        // Table is freed on payment, not on delivery
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
            method = %snapshot.payment_method,
            tip = %snapshot.tip,
            total = %snapshot.total,
            collected_by = %actor.employee.name,
            "payment collected"
        );
        Ok((snapshot, freed_table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::{ChangeStatusAction, CreateOrderAction};
    use crate::orders::testkit::{self, TestEnv};
    use rust_decimal::Decimal;
    use shared::models::PaymentMethod;
    use shared::order::{LineItemInput, OrderDraft};

    async fn create_delivered(env: &TestEnv, draft: OrderDraft, lines: Vec<LineItemInput>) -> OrderSnapshot {
        let delivery = draft.order_type == shared::order::OrderType::Delivery;
        let txn = env.storage.begin_write().unwrap();
        let order = {
            let ctx = env.ctx(&txn);
            CreateOrderAction { draft, lines }
                .execute(&ctx, &testkit::waiter())
                .await
                .unwrap()
        };
        txn.commit().unwrap();

        let path: Vec<(OrderStatus, ActorContext)> = if delivery {
            vec![
                (OrderStatus::InPreparation, testkit::chef()),
                (OrderStatus::Ready, testkit::chef()),
                (OrderStatus::OnTheWay, testkit::courier()),
                (OrderStatus::Delivered, testkit::courier()),
            ]
        } else {
            vec![
                (OrderStatus::InPreparation, testkit::chef()),
                (OrderStatus::Ready, testkit::chef()),
                (OrderStatus::Delivered, testkit::waiter()),
            ]
        };
        let mut snapshot = order;
        for (status, actor) in path {
            let txn = env.storage.begin_write().unwrap();
            snapshot = {
                let ctx = env.ctx(&txn);
                ChangeStatusAction {
                    order_id: snapshot.order_id.clone(),
                    new_status: status,
                }
                .execute(&ctx, &actor)
                .await
                .unwrap()
                .0
            };
            txn.commit().unwrap();
        }
        snapshot
    }

    async fn pay(
        env: &TestEnv,
        order_id: &str,
        method: PaymentMethod,
        tip: Decimal,
        actor: &ActorContext,
    ) -> Result<(OrderSnapshot, Option<String>), FulfillmentError> {
        let txn = env.storage.begin_write().unwrap();
        let result = {
            let ctx = env.ctx(&txn);
            CollectPaymentAction {
                order_id: order_id.to_string(),
                details: PaymentDetails { method, tip },
            }
            .execute(&ctx, actor)
            .await
        };
        if result.is_ok() {
            txn.commit().unwrap();
        }
        result
    }

    #[tokio::test]
    async fn test_cashier_collects_cash_and_frees_table() {
        let env = TestEnv::new();
        let order = create_delivered(
            &env,
            testkit::dine_in_draft("table-1"),
            vec![testkit::line("item-taco", 2)],
        )
        .await;

        let (paid, freed) = pay(
            &env,
            &order.order_id,
            PaymentMethod::Cash,
            Decimal::new(1000, 2),
            &testkit::cashier(),
        )
        .await
        .unwrap();

        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(paid.paid_by.as_ref().unwrap().id, "cashier-1");
        assert_eq!(paid.tip, Decimal::new(1000, 2));
        // Tip never leaks into the total
        assert_eq!(paid.total, Decimal::new(2436, 2)); // 21.00 + 16%
        assert_eq!(paid.total_with_tip(), Decimal::new(3436, 2));
        assert_eq!(freed.as_deref(), Some("table-1"));
        assert!(env.storage.table_order("table-1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_waiter_collects_card_but_not_cash() {
        let env = TestEnv::new();
        let order = create_delivered(
            &env,
            testkit::dine_in_draft("table-1"),
            vec![testkit::line("item-taco", 1)],
        )
        .await;

        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Cash,
            Decimal::ZERO,
            &testkit::waiter(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::NotPermitted { .. }));

        let (paid, _) = pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::ZERO,
            &testkit::waiter(),
        )
        .await
        .unwrap();
        assert_eq!(paid.payment_method, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_courier_collects_cash_on_own_delivery_only() {
        let env = TestEnv::new();
        let order = create_delivered(
            &env,
            testkit::delivery_draft(),
            vec![testkit::line("item-taco", 1)],
        )
        .await;

        // The courier who delivered (courier-1) collects cash
        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::ZERO,
            &testkit::courier(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::NotPermitted { .. }));

        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Cash,
            Decimal::ZERO,
            &testkit::second_courier(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::NotPermitted { .. }));

        let (paid, freed) = pay(
            &env,
            &order.order_id,
            PaymentMethod::Cash,
            Decimal::new(500, 2),
            &testkit::courier(),
        )
        .await
        .unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(freed.is_none());
    }

    #[tokio::test]
    async fn test_payment_requires_delivered_status() {
        let env = TestEnv::new();
        let txn = env.storage.begin_write().unwrap();
        let order = {
            let ctx = env.ctx(&txn);
            CreateOrderAction {
                draft: testkit::takeout_draft(),
                lines: vec![testkit::line("item-taco", 1)],
            }
            .execute(&ctx, &testkit::waiter())
            .await
            .unwrap()
        };
        txn.commit().unwrap();

        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::ZERO,
            &testkit::cashier(),
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, FulfillmentError::InvalidTransition { from: OrderStatus::Pending, to: OrderStatus::Paid })
        );
    }

    #[tokio::test]
    async fn test_disabled_method_rejected_at_collection() {
        let env = TestEnv::new();
        let order = create_delivered(
            &env,
            testkit::dine_in_draft("table-1"),
            vec![testkit::line("item-taco", 1)],
        )
        .await;
        env.restrict_payment_methods(vec![PaymentMethod::Cash]);

        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::ZERO,
            &testkit::cashier(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::PaymentMethodDisabled(_)));
    }

    #[tokio::test]
    async fn test_double_payment_is_rejected() {
        let env = TestEnv::new();
        let order = create_delivered(
            &env,
            testkit::dine_in_draft("table-1"),
            vec![testkit::line("item-taco", 1)],
        )
        .await;

        pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::ZERO,
            &testkit::cashier(),
        )
        .await
        .unwrap();

        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::ZERO,
            &testkit::cashier(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::OrderClosed { .. }));
    }

    #[tokio::test]
    async fn test_negative_tip_rejected() {
        let env = TestEnv::new();
        let order = create_delivered(
            &env,
            testkit::dine_in_draft("table-1"),
            vec![testkit::line("item-taco", 1)],
        )
        .await;

        let err = pay(
            &env,
            &order.order_id,
            PaymentMethod::Card,
            Decimal::new(-100, 2),
            &testkit::cashier(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FulfillmentError::Validation(_)));
    }
}
