//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary values are `Decimal`, rounded to 2 decimal places half-up
//! (`MidpointAwayFromZero`). Order totals are recomputed wholesale from the
//! current line items whenever anything changes; nothing is patched
//! incrementally.

use crate::error::FulfillmentError;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::order::{LineItemInput, OrderSnapshot};

/// Rounding for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed tip
const MAX_TIP: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to currency precision, half-up
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a line input beyond its field-level constraints
pub fn validate_line_input(line: &LineItemInput) -> Result<(), FulfillmentError> {
    if line.quantity == 0 {
        return Err(FulfillmentError::Validation(format!(
            "quantity must be positive for item {}",
            line.item_id
        )));
    }
    if let Some(price) = line.claimed_promotion_price {
        if price < Decimal::ZERO || price > MAX_PRICE {
            return Err(FulfillmentError::Validation(format!(
                "claimed promotion price out of range: {}",
                price
            )));
        }
    }
    Ok(())
}

/// Validate a tip amount
pub fn validate_tip(tip: Decimal) -> Result<(), FulfillmentError> {
    if tip < Decimal::ZERO {
        return Err(FulfillmentError::Validation(
            "tip must be non-negative".to_string(),
        ));
    }
    if tip > MAX_TIP {
        return Err(FulfillmentError::Validation(format!(
            "tip exceeds maximum allowed, got {}",
            tip
        )));
    }
    Ok(())
}

/// Recalculate all monetary fields from the current line items
///
/// - every line subtotal is recomputed from its price fields
/// - subtotal = Σ line subtotals
/// - tax_amount = subtotal × tax_rate / 100, rounded half-up
/// - total = subtotal + tax_amount (tip stays separate)
pub fn recalculate_totals(snapshot: &mut OrderSnapshot) {
    let mut subtotal = Decimal::ZERO;
    for item in &mut snapshot.items {
        item.recompute_subtotal();
        subtotal += item.subtotal;
    }

    snapshot.subtotal = round_money(subtotal);
    snapshot.tax_amount = round_money(subtotal * snapshot.tax_rate / Decimal::ONE_HUNDRED);
    snapshot.total = snapshot.subtotal + snapshot.tax_amount;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{EmployeeRef, PaymentMethod};
    use shared::order::types::{ItemStatus, OrderStatus, OrderType};
    use shared::order::LineItem;

    fn line(price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            instance_id: uuid::Uuid::new_v4().to_string(),
            item_id: "item-1".to_string(),
            name: "Enchiladas".to_string(),
            quantity,
            unit_price: price,
            applied_promotion_id: None,
            promotion_applied_price: None,
            comments: None,
            subtotal: Decimal::ZERO,
            status: ItemStatus::Pending,
            requires_preparation: true,
            is_new: false,
            added_at: 0,
        }
    }

    fn snapshot_with(items: Vec<LineItem>, tax_rate: Decimal) -> OrderSnapshot {
        OrderSnapshot {
            order_id: "order-1".to_string(),
            order_number: "ORD-20260807-001".to_string(),
            order_type: OrderType::DineIn,
            status: OrderStatus::Pending,
            table_id: Some("table-1".to_string()),
            customer_name: None,
            customer_phone: None,
            delivery_address: None,
            delivery_references: None,
            payment_method: PaymentMethod::Cash,
            items,
            subtotal: Decimal::ZERO,
            tax_rate,
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
    fn test_round_money_half_up() {
        assert_eq!(round_money(Decimal::new(5, 3)), Decimal::new(1, 2)); // 0.005 -> 0.01
        assert_eq!(round_money(Decimal::new(4, 3)), Decimal::ZERO.round_dp(2)); // 0.004 -> 0.00
    }

    #[test]
    fn test_totals_invariant() {
        let mut snapshot = snapshot_with(
            vec![
                line(Decimal::new(1050, 2), 2), // 21.00
                line(Decimal::new(499, 2), 3),  // 14.97
            ],
            Decimal::new(1600, 2), // 16%
        );
        recalculate_totals(&mut snapshot);

        assert_eq!(snapshot.subtotal, Decimal::new(3597, 2));
        // 35.97 * 0.16 = 5.7552 -> 5.76
        assert_eq!(snapshot.tax_amount, Decimal::new(576, 2));
        assert_eq!(snapshot.total, snapshot.subtotal + snapshot.tax_amount);
    }

    #[test]
    fn test_totals_recomputed_not_patched() {
        let mut snapshot = snapshot_with(vec![line(Decimal::new(1000, 2), 1)], Decimal::ZERO);
        recalculate_totals(&mut snapshot);
        assert_eq!(snapshot.total, Decimal::new(1000, 2));

        // Stale line subtotals must not survive a recompute
        snapshot.items[0].subtotal = Decimal::new(99_999, 2);
        recalculate_totals(&mut snapshot);
        assert_eq!(snapshot.total, Decimal::new(1000, 2));
    }

    #[test]
    fn test_zero_tax_rate() {
        let mut snapshot = snapshot_with(vec![line(Decimal::new(750, 2), 2)], Decimal::ZERO);
        recalculate_totals(&mut snapshot);
        assert_eq!(snapshot.tax_amount, Decimal::ZERO.round_dp(2));
        assert_eq!(snapshot.total, Decimal::new(1500, 2));
    }

    #[test]
    fn test_validate_tip_rejects_negative() {
        assert!(validate_tip(Decimal::new(-1, 2)).is_err());
        assert!(validate_tip(Decimal::ZERO).is_ok());
        assert!(validate_tip(Decimal::new(500, 2)).is_ok());
    }

    #[test]
    fn test_validate_line_rejects_forged_negative_promo_price() {
        let line = LineItemInput {
            item_id: "item-1".to_string(),
            quantity: 1,
            claimed_promotion_id: Some("promo-1".to_string()),
            claimed_promotion_price: Some(Decimal::new(-100, 2)),
            comments: None,
        };
        assert!(validate_line_input(&line).is_err());
    }
}
