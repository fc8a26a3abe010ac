//! Inventory ledger
//!
//! Per-ingredient stock tracking keyed by recipe requirements. Deduction is
//! all-or-nothing across the whole item set of an operation; returns are
//! unconditional but only applied automatically when the item's preparation
//! stage implies the ingredients were never consumed.

pub mod ledger;

pub use ledger::{
    aggregate_requirements, credit, deduct, return_disposition, IngredientRequirement,
    ReturnDisposition, StockCredit, StockReturn,
};
