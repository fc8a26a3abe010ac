//! Promotion Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Promotion kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionKind {
    /// Buy X units, pay for Y (X > Y)
    BuyXPayY,
    /// Percentage off the unit price (0-100)
    PercentageDiscount,
    /// Fixed amount off the unit price
    FixedAmountDiscount,
}

/// Promotional offer linked to menu items
///
/// Validity is a date range plus a day-of-week list
/// (0=Sunday .. 6=Saturday).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: PromotionKind,

    // ========== Discount Configuration ==========
    /// BUY_X_PAY_Y: quantity to buy (X)
    pub buy_quantity: Option<u32>,
    /// BUY_X_PAY_Y: quantity to pay for (Y)
    pub pay_quantity: Option<u32>,
    /// PERCENTAGE_DISCOUNT: percentage off (0-100)
    pub discount_percentage: Option<Decimal>,
    /// FIXED_AMOUNT_DISCOUNT: amount off per unit
    pub discount_amount: Option<Decimal>,

    // ========== Validity ==========
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days of week the promotion applies, 0=Sunday .. 6=Saturday
    pub valid_days: Vec<u8>,
    pub active: bool,
    /// Higher wins when multiple promotions target the same item
    pub priority: i32,

    /// Menu items this promotion is linked to
    pub item_ids: Vec<String>,
}

impl Promotion {
    /// Whether this promotion is linked to the given menu item
    pub fn applies_to(&self, item_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == item_id)
    }

    /// Whether the discount configuration is coherent for the kind
    pub fn is_valid_configuration(&self) -> bool {
        match self.kind {
            PromotionKind::BuyXPayY => match (self.buy_quantity, self.pay_quantity) {
                (Some(buy), Some(pay)) => buy > 0 && pay > 0 && buy > pay,
                _ => false,
            },
            PromotionKind::PercentageDiscount => self
                .discount_percentage
                .is_some_and(|p| p > Decimal::ZERO && p <= Decimal::ONE_HUNDRED),
            PromotionKind::FixedAmountDiscount => {
                self.discount_amount.is_some_and(|a| a > Decimal::ZERO)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_promotion(kind: PromotionKind) -> Promotion {
        Promotion {
            id: "promo-1".to_string(),
            name: "Test".to_string(),
            description: None,
            kind,
            buy_quantity: None,
            pay_quantity: None,
            discount_percentage: None,
            discount_amount: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            valid_days: vec![0, 1, 2, 3, 4, 5, 6],
            active: true,
            priority: 1,
            item_ids: vec!["item-1".to_string()],
        }
    }

    #[test]
    fn test_buy_x_pay_y_requires_buy_greater_than_pay() {
        let mut promo = base_promotion(PromotionKind::BuyXPayY);
        promo.buy_quantity = Some(3);
        promo.pay_quantity = Some(2);
        assert!(promo.is_valid_configuration());

        promo.pay_quantity = Some(3);
        assert!(!promo.is_valid_configuration());

        promo.buy_quantity = None;
        assert!(!promo.is_valid_configuration());
    }

    #[test]
    fn test_percentage_bounds() {
        let mut promo = base_promotion(PromotionKind::PercentageDiscount);
        promo.discount_percentage = Some(Decimal::new(20, 0));
        assert!(promo.is_valid_configuration());

        promo.discount_percentage = Some(Decimal::new(101, 0));
        assert!(!promo.is_valid_configuration());

        promo.discount_percentage = Some(Decimal::ZERO);
        assert!(!promo.is_valid_configuration());
    }

    #[test]
    fn test_applies_to_linked_items_only() {
        let promo = base_promotion(PromotionKind::FixedAmountDiscount);
        assert!(promo.applies_to("item-1"));
        assert!(!promo.applies_to("item-2"));
    }
}
