//! Server-side promotion validation
//!
//! A client may *claim* a promotion and a discounted price; neither is
//! trusted. The engine re-derives the discounted total from the canonical
//! menu price and quantity, then a per-unit price (total ÷ quantity, 2dp
//! half-up). A claim that fails any check degrades to "no promotion" and
//! the item is charged full price; a stale or forged claim must never
//! block the sale.

use crate::money::round_money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{MenuItem, Promotion, PromotionKind};

use super::matcher;

/// Outcome of a successful validation: the authoritative per-unit price
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPromotion {
    pub promotion_id: String,
    pub unit_price: Decimal,
}

/// Discounted total for `quantity` units at `unit_price`
///
/// BUY_X_PAY_Y charges complete sets at the pay quantity plus the remainder
/// at full price; percentage and fixed-amount discounts apply per unit.
pub fn discounted_total(promotion: &Promotion, unit_price: Decimal, quantity: u32) -> Decimal {
    if unit_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let qty = Decimal::from(quantity);

    match promotion.kind {
        PromotionKind::BuyXPayY => {
            let (Some(buy), Some(pay)) = (promotion.buy_quantity, promotion.pay_quantity) else {
                return unit_price * qty;
            };
            if buy == 0 || pay == 0 {
                return unit_price * qty;
            }
            let sets = quantity / buy;
            let remainder = quantity % buy;
            unit_price * Decimal::from(sets * pay + remainder)
        }
        PromotionKind::PercentageDiscount => {
            let Some(percentage) = promotion.discount_percentage else {
                return unit_price * qty;
            };
            if percentage <= Decimal::ZERO {
                return unit_price * qty;
            }
            let multiplier = Decimal::ONE - percentage / Decimal::ONE_HUNDRED;
            round_money(unit_price * multiplier * qty)
        }
        PromotionKind::FixedAmountDiscount => {
            let Some(amount) = promotion.discount_amount else {
                return unit_price * qty;
            };
            if amount <= Decimal::ZERO {
                return unit_price * qty;
            }
            let discounted = (unit_price - amount).max(Decimal::ZERO);
            round_money(discounted * qty)
        }
    }
}

/// Re-derive the authoritative discounted unit price for a claimed promotion
///
/// Returns `None` (charge full price) when the promotion is absent,
/// inactive or outside its window on `on`, not linked to the item,
/// misconfigured, or (for BUY_X_PAY_Y) the quantity is below the minimum
/// buy quantity.
pub fn validate_promotion(
    promotion: Option<&Promotion>,
    item: &MenuItem,
    quantity: u32,
    on: NaiveDate,
) -> Option<ValidatedPromotion> {
    let promo = promotion?;

    if !matcher::is_valid_on(promo, on) {
        tracing::warn!(promotion = %promo.id, item = %item.id, "promotion claim rejected: not valid today");
        return None;
    }
    if !promo.applies_to(&item.id) {
        tracing::warn!(promotion = %promo.id, item = %item.id, "promotion claim rejected: not linked to item");
        return None;
    }
    if !promo.is_valid_configuration() {
        tracing::warn!(promotion = %promo.id, "promotion claim rejected: invalid configuration");
        return None;
    }
    if promo.kind == PromotionKind::BuyXPayY {
        let minimum = promo.buy_quantity.unwrap_or(0);
        if quantity < minimum {
            tracing::warn!(
                promotion = %promo.id,
                quantity,
                minimum,
                "promotion claim rejected: below minimum buy quantity"
            );
            return None;
        }
    }

    let total = discounted_total(promo, item.price, quantity);
    let unit_price = round_money(total / Decimal::from(quantity));
    Some(ValidatedPromotion {
        promotion_id: promo.id.clone(),
        unit_price,
    })
}
