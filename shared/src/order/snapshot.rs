//! Order snapshot - the aggregate root
//!
//! Claim fields (`prepared_by`, `delivered_by`, `paid_by`) are
//! single-assignment: they are set through [`OrderSnapshot::claim`], which
//! refuses to overwrite another actor's claim. Monetary fields are
//! recomputed wholesale whenever line items change, never patched
//! incrementally.

use super::line_item::LineItem;
use super::types::{ClaimField, ItemStatus, OrderStatus, OrderType};
use crate::models::{EmployeeRef, PaymentMethod};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A claim attempt lost to an earlier claimant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field} already claimed by {}", claimed_by.name)]
pub struct ClaimError {
    pub field: ClaimField,
    pub claimed_by: EmployeeRef,
}

/// Order aggregate snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: String,
    /// Human-facing, unique, generated at creation
    pub order_number: String,
    pub order_type: OrderType,
    pub status: OrderStatus,

    // ========== Location / Customer ==========
    /// Required iff DINE_IN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    /// Required iff DELIVERY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_references: Option<String>,

    // ========== Payment / Money ==========
    pub payment_method: PaymentMethod,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    /// Tax rate snapshot (percent) taken at creation
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    /// Tracked separately, never part of `total`
    pub tip: Decimal,
    /// subtotal + tax_amount
    pub total: Decimal,

    // ========== Claims ==========
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_by: Option<EmployeeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_by: Option<EmployeeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<EmployeeRef>,

    // ========== Audit ==========
    pub created_by: EmployeeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<EmployeeRef>,
    /// Unix milliseconds
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
}

impl OrderSnapshot {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether new line items may still be added, per order type.
    /// DINE_IN guests keep ordering until the bill is paid; TAKEOUT and
    /// DELIVERY close once the order is READY.
    pub fn can_accept_new_items(&self) -> bool {
        match self.order_type {
            OrderType::DineIn => matches!(
                self.status,
                OrderStatus::Pending
                    | OrderStatus::InPreparation
                    | OrderStatus::Ready
                    | OrderStatus::Delivered
            ),
            OrderType::Takeout | OrderType::Delivery => matches!(
                self.status,
                OrderStatus::Pending | OrderStatus::InPreparation | OrderStatus::Ready
            ),
        }
    }

    /// At least one line item needs a cook
    pub fn has_items_requiring_preparation(&self) -> bool {
        self.items.iter().any(|item| item.requires_preparation)
    }

    pub fn has_delivered_items(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.status == ItemStatus::Delivered)
    }

    pub fn find_item(&self, instance_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.instance_id == instance_id)
    }

    pub fn find_item_mut(&mut self, instance_id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.instance_id == instance_id)
    }

    pub fn claimant(&self, field: ClaimField) -> Option<&EmployeeRef> {
        match field {
            ClaimField::PreparedBy => self.prepared_by.as_ref(),
            ClaimField::DeliveredBy => self.delivered_by.as_ref(),
            ClaimField::PaidBy => self.paid_by.as_ref(),
        }
    }

    /// Compare-and-set claim: succeeds when the field is unset or already
    /// held by the same actor; otherwise the caller lost the race.
    pub fn claim(&mut self, field: ClaimField, actor: &EmployeeRef) -> Result<(), ClaimError> {
        let slot = match field {
            ClaimField::PreparedBy => &mut self.prepared_by,
            ClaimField::DeliveredBy => &mut self.delivered_by,
            ClaimField::PaidBy => &mut self.paid_by,
        };
        match slot {
            None => {
                *slot = Some(actor.clone());
                Ok(())
            }
            Some(current) if current.id == actor.id => Ok(()),
            Some(current) => Err(ClaimError {
                field,
                claimed_by: current.clone(),
            }),
        }
    }

    /// Grand total shown on the receipt (tip is never part of `total`)
    pub fn total_with_tip(&self) -> Decimal {
        self.total + self.tip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(order_type: OrderType, status: OrderStatus) -> OrderSnapshot {
        OrderSnapshot {
            order_id: "order-1".to_string(),
            order_number: "ORD-20260807-001".to_string(),
            order_type,
            status,
            table_id: None,
            customer_name: None,
            customer_phone: None,
            delivery_address: None,
            delivery_references: None,
            payment_method: PaymentMethod::Cash,
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            tax_rate: Decimal::new(1600, 2),
            tax_amount: Decimal::ZERO,
            tip: Decimal::ZERO,
            total: Decimal::ZERO,
            prepared_by: None,
            delivered_by: None,
            paid_by: None,
            created_by: EmployeeRef::new("emp-1", "Ana"),
            updated_by: None,
            created_at: 0,
            updated_at: 0,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_claim_sets_unset_field() {
        let mut order = snapshot(OrderType::DineIn, OrderStatus::Pending);
        let chef = EmployeeRef::new("chef-1", "Luis");

        assert!(order.claim(ClaimField::PreparedBy, &chef).is_ok());
        assert_eq!(order.prepared_by.as_ref().unwrap().id, "chef-1");
    }

    #[test]
    fn test_claim_is_idempotent_for_same_actor() {
        let mut order = snapshot(OrderType::DineIn, OrderStatus::Pending);
        let chef = EmployeeRef::new("chef-1", "Luis");

        order.claim(ClaimField::PreparedBy, &chef).unwrap();
        assert!(order.claim(ClaimField::PreparedBy, &chef).is_ok());
    }

    #[test]
    fn test_claim_rejects_second_actor() {
        let mut order = snapshot(OrderType::DineIn, OrderStatus::Pending);
        let first = EmployeeRef::new("chef-1", "Luis");
        let second = EmployeeRef::new("chef-2", "Marta");

        order.claim(ClaimField::PreparedBy, &first).unwrap();
        let err = order.claim(ClaimField::PreparedBy, &second).unwrap_err();
        assert_eq!(err.field, ClaimField::PreparedBy);
        assert_eq!(err.claimed_by.id, "chef-1");
        // Winner's claim is untouched
        assert_eq!(order.prepared_by.as_ref().unwrap().id, "chef-1");
    }

    #[test]
    fn test_dine_in_accepts_items_until_paid() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::InPreparation,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ] {
            assert!(snapshot(OrderType::DineIn, status).can_accept_new_items());
        }
        assert!(!snapshot(OrderType::DineIn, OrderStatus::Paid).can_accept_new_items());
        assert!(!snapshot(OrderType::DineIn, OrderStatus::Cancelled).can_accept_new_items());
    }

    #[test]
    fn test_takeout_and_delivery_close_after_ready() {
        for order_type in [OrderType::Takeout, OrderType::Delivery] {
            assert!(snapshot(order_type, OrderStatus::Ready).can_accept_new_items());
            assert!(!snapshot(order_type, OrderStatus::Delivered).can_accept_new_items());
        }
        assert!(!snapshot(OrderType::Delivery, OrderStatus::OnTheWay).can_accept_new_items());
    }

    #[test]
    fn test_total_with_tip_keeps_total_intact() {
        let mut order = snapshot(OrderType::DineIn, OrderStatus::Delivered);
        order.total = Decimal::new(11600, 2);
        order.tip = Decimal::new(1000, 2);
        assert_eq!(order.total_with_tip(), Decimal::new(12600, 2));
        assert_eq!(order.total, Decimal::new(11600, 2));
    }
}
