//! Stock deduction, crediting, and the return-eligibility policy
//!
//! The return policy is asymmetric on purpose. Stock is credited back
//! automatically only when the item's stage implies no cook ever consumed
//! the ingredients:
//!
//! - PENDING: never touched, always credited.
//! - READY without preparation (bottled drinks): auto-advanced at creation,
//!   the deduction still happened, so it is credited.
//! - READY with preparation, or IN_PREPARATION: the ingredients were
//!   physically consumed; crediting would corrupt the ledger, so the caller
//!   gets an explicit manual-reconciliation signal instead.

use crate::error::{FulfillmentError, StockShortfall};
use crate::orders::storage::{OrderStorage, StorageError};
use redb::WriteTransaction;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::MenuItem;
use shared::order::ItemStatus;
use std::collections::BTreeMap;

/// Aggregated requirement for one ingredient across an item set
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRequirement {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub quantity: Decimal,
}

/// One automatic stock credit applied by a return
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockCredit {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub quantity: Decimal,
}

/// Outcome of a stock-return analysis
///
/// This is informational, never an error: `manual_items` lists items whose
/// ingredients were consumed and must be reconciled by hand.
#[derive(Debug, Clone, Serialize, Default)]
pub struct StockReturn {
    /// Credits applied automatically
    pub credits: Vec<StockCredit>,
    /// Item names that require manual stock reconciliation
    pub manual_items: Vec<String>,
}

impl StockReturn {
    pub fn requires_manual_reconciliation(&self) -> bool {
        !self.manual_items.is_empty()
    }

    pub fn merge(&mut self, other: StockReturn) {
        self.credits.extend(other.credits);
        self.manual_items.extend(other.manual_items);
    }
}

/// Whether a removed/cancelled item's stock comes back automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnDisposition {
    Automatic,
    Manual,
}

/// Return eligibility by preparation stage
pub fn return_disposition(status: ItemStatus, requires_preparation: bool) -> ReturnDisposition {
    match status {
        ItemStatus::Pending => ReturnDisposition::Automatic,
        ItemStatus::Ready if !requires_preparation => ReturnDisposition::Automatic,
        ItemStatus::Ready | ItemStatus::InPreparation | ItemStatus::Delivered => {
            ReturnDisposition::Manual
        }
    }
}

/// Merge per-ingredient requirements across `(menu item, quantity)` pairs
///
/// BTreeMap keeps the output deterministic for shortfall reporting.
pub fn aggregate_requirements<'a, I>(lines: I) -> Vec<IngredientRequirement>
where
    I: IntoIterator<Item = (&'a MenuItem, u32)>,
{
    let mut merged: BTreeMap<String, IngredientRequirement> = BTreeMap::new();
    for (item, quantity) in lines {
        for recipe_line in &item.recipe {
            let required = recipe_line.quantity_per_unit * Decimal::from(quantity);
            merged
                .entry(recipe_line.ingredient_id.clone())
                .and_modify(|req| req.quantity += required)
                .or_insert_with(|| IngredientRequirement {
                    ingredient_id: recipe_line.ingredient_id.clone(),
                    ingredient_name: recipe_line.ingredient_name.clone(),
                    quantity: required,
                });
        }
    }
    merged.into_values().collect()
}

/// Deduct the requirements, all-or-nothing
///
/// Every shortfall is collected before failing so the caller can explain
/// exactly which ingredients ran out; on failure nothing is written.
pub fn deduct(
    storage: &OrderStorage,
    txn: &WriteTransaction,
    requirements: &[IngredientRequirement],
) -> Result<(), FulfillmentError> {
    let mut levels = Vec::with_capacity(requirements.len());
    let mut shortfalls = Vec::new();

    for req in requirements {
        let available = storage.stock_level(txn, &req.ingredient_id)?;
        if available < req.quantity {
            shortfalls.push(StockShortfall {
                ingredient_id: req.ingredient_id.clone(),
                ingredient_name: req.ingredient_name.clone(),
                required: req.quantity,
                available,
            });
        }
        levels.push(available);
    }

    if !shortfalls.is_empty() {
        return Err(FulfillmentError::InsufficientStock { shortfalls });
    }

    for (req, available) in requirements.iter().zip(levels) {
        storage.set_stock_level(txn, &req.ingredient_id, available - req.quantity)?;
    }
    Ok(())
}

/// Credit the requirements back, unconditionally
///
/// Clamps at zero as a defensive floor; never errors on business grounds.
pub fn credit(
    storage: &OrderStorage,
    txn: &WriteTransaction,
    requirements: &[IngredientRequirement],
) -> Result<Vec<StockCredit>, StorageError> {
    let mut credits = Vec::with_capacity(requirements.len());
    for req in requirements {
        let current = storage.stock_level(txn, &req.ingredient_id)?;
        let restored = (current + req.quantity).max(Decimal::ZERO);
        storage.set_stock_level(txn, &req.ingredient_id, restored)?;
        credits.push(StockCredit {
            ingredient_id: req.ingredient_id.clone(),
            ingredient_name: req.ingredient_name.clone(),
            quantity: req.quantity,
        });
    }
    Ok(credits)
}
