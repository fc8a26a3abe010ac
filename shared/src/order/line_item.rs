//! Order line item
//!
//! A line item is owned exclusively by one order and carries its own
//! sub-state machine. The unit price is a snapshot of the menu price at add
//! time; the promotion price is only trusted after server-side
//! re-validation. The subtotal is always recomputed from the current price
//! fields, never stored stale.

use super::types::ItemStatus;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const DECIMAL_PLACES: u32 = 2;

/// Line item snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Unique within the order
    pub instance_id: String,
    /// Menu item reference
    pub item_id: String,
    /// Menu item name snapshot
    pub name: String,
    pub quantity: u32,
    /// Menu price snapshot at add time, immutable thereafter
    pub unit_price: Decimal,
    /// Server-validated promotion, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_promotion_id: Option<String>,
    /// Per-unit discounted price, authoritative only after re-validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_applied_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// effective unit price × quantity, recomputed on every mutation
    pub subtotal: Decimal,
    pub status: ItemStatus,
    /// Menu flag snapshot, drives initial status and stock-return policy
    pub requires_preparation: bool,
    /// Added after the initial order (extra rounds)
    #[serde(default)]
    pub is_new: bool,
    /// Unix milliseconds
    pub added_at: i64,
}

impl LineItem {
    /// Promotion price when present, else the menu price snapshot
    pub fn effective_unit_price(&self) -> Decimal {
        self.promotion_applied_price.unwrap_or(self.unit_price)
    }

    /// Recompute the subtotal from the current price fields
    pub fn recompute_subtotal(&mut self) {
        let total = self.effective_unit_price() * Decimal::from(self.quantity);
        self.subtotal =
            total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: Decimal, promo_price: Option<Decimal>, quantity: u32) -> LineItem {
        let mut item = LineItem {
            instance_id: "inst-1".to_string(),
            item_id: "item-1".to_string(),
            name: "Tacos al pastor".to_string(),
            quantity,
            unit_price,
            applied_promotion_id: promo_price.map(|_| "promo-1".to_string()),
            promotion_applied_price: promo_price,
            comments: None,
            subtotal: Decimal::ZERO,
            status: ItemStatus::Pending,
            requires_preparation: true,
            is_new: false,
            added_at: 0,
        };
        item.recompute_subtotal();
        item
    }

    #[test]
    fn test_subtotal_from_menu_price() {
        let item = item(Decimal::new(1099, 2), None, 3);
        assert_eq!(item.subtotal, Decimal::new(3297, 2)); // 10.99 * 3
    }

    #[test]
    fn test_subtotal_prefers_promotion_price() {
        let item = item(Decimal::new(1000, 2), Some(Decimal::new(800, 2)), 2);
        assert_eq!(item.effective_unit_price(), Decimal::new(800, 2));
        assert_eq!(item.subtotal, Decimal::new(1600, 2));
    }

    #[test]
    fn test_subtotal_rounds_half_up() {
        // 3.333 * 3 = 9.999 -> 10.00
        let item = item(Decimal::new(3333, 3), None, 3);
        assert_eq!(item.subtotal, Decimal::new(1000, 2));
    }
}
