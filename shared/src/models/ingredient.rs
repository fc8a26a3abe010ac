//! Ingredient Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory ingredient entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub unit_of_measure: String,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
}
