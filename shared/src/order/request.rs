//! Caller-facing request DTOs
//!
//! Field-level constraints live here via `validator`; business rules
//! (table requirements, stock, promotions) are enforced by the engine.

use super::types::OrderType;
use crate::models::PaymentMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Draft of a new order (everything but the lines)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderDraft {
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[validate(length(max = 100, message = "customer name too long"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[validate(length(min = 7, max = 20, message = "invalid phone length"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[validate(length(max = 500, message = "delivery address too long"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[validate(length(max = 500, message = "delivery references too long"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_references: Option<String>,
    pub payment_method: PaymentMethod,
}

/// One requested line: menu item, quantity, and an advisory promotion claim
///
/// The claimed promotion price is never trusted; the engine re-derives the
/// authoritative discounted price server-side on every mutating call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemInput {
    #[validate(length(min = 1, message = "item id required"))]
    pub item_id: String,
    #[validate(range(min = 1, max = 999, message = "quantity out of range"))]
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_promotion_id: Option<String>,
    /// Advisory only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_promotion_price: Option<Decimal>,
    #[validate(length(max = 500, message = "comments too long"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Payment collection details (DELIVERED -> PAID)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    #[serde(default)]
    pub tip: Decimal,
}
