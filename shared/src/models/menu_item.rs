//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ingredient requirement in a menu item's recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeLine {
    pub ingredient_id: String,
    /// Name snapshot (for shortfall messages)
    pub ingredient_name: String,
    /// Quantity consumed per ordered unit
    pub quantity_per_unit: Decimal,
    pub unit: String,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// false for bottled drinks and other grab-and-go items:
    /// their line items are created directly at READY
    pub requires_preparation: bool,
    pub recipe: Vec<RecipeLine>,
    pub is_active: bool,
}
