//! Engine error taxonomy
//!
//! Four caller-visible classes: validation (correct the input), state
//! conflict (the order/table/claim is not in the state the request
//! assumed), insufficient stock (with per-ingredient shortfall detail), and
//! not-found. Storage failures are internal. A losing concurrent claim
//! (`AlreadyClaimed`) is deliberately distinct from `NotPermitted` /
//! `NotClaimant`: "someone already accepted this" and "not your order" are
//! different messages.

use crate::orders::storage::StorageError;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{PaymentMethod, Role};
use shared::order::snapshot::ClaimError;
use shared::order::{ItemStatus, OrderStatus};
use thiserror::Error;

/// Per-ingredient shortfall detail for `InsufficientStock`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockShortfall {
    pub ingredient_id: String,
    pub ingredient_name: String,
    pub required: Decimal,
    pub available: Decimal,
}

/// Coarse error class, for callers that branch on kind rather than variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    StateConflict,
    InsufficientStock,
    NotFound,
    Internal,
}

/// Engine errors
#[derive(Debug, Error)]
pub enum FulfillmentError {
    // ========== Validation ==========
    #[error("validation failed: {0}")]
    Validation(String),

    // ========== Not Found ==========
    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("item not found in order: {0}")]
    ItemNotFound(String),

    #[error("menu item not found: {0}")]
    MenuItemNotFound(String),

    // ========== State Conflicts ==========
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("invalid item transition: {from} -> {to}")]
    InvalidItemTransition { from: ItemStatus, to: ItemStatus },

    /// Lost a claim race: another actor already holds the field
    #[error(transparent)]
    AlreadyClaimed(#[from] ClaimError),

    /// Acting on work claimed by someone else ("not your order")
    #[error("only {claimant} may continue this step")]
    NotClaimant { claimant: String },

    #[error("role {role} is not permitted to {action}")]
    NotPermitted { role: Role, action: String },

    #[error("order {order_number} is closed ({status})")]
    OrderClosed {
        order_number: String,
        status: OrderStatus,
    },

    #[error("order {order_number} cannot accept new items (status {status})")]
    CannotAcceptItems {
        order_number: String,
        status: OrderStatus,
    },

    #[error("item '{name}' was already delivered")]
    ItemAlreadyDelivered { name: String },

    #[error("table {0} is not available")]
    TableUnavailable(String),

    /// Deleting the sole remaining line item: cancel the order instead
    #[error("cannot delete the last item of an order; cancel the order instead")]
    LastItem,

    #[error("order cannot be cancelled (status {status}): {detail}")]
    NotCancellable { status: OrderStatus, detail: String },

    #[error("payment method {0} is not enabled")]
    PaymentMethodDisabled(PaymentMethod),

    // ========== Stock ==========
    #[error("insufficient stock for {} ingredient(s)", shortfalls.len())]
    InsufficientStock { shortfalls: Vec<StockShortfall> },

    // ========== Internal ==========
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FulfillmentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FulfillmentError::Validation(_) => ErrorCategory::Validation,
            FulfillmentError::OrderNotFound(_)
            | FulfillmentError::ItemNotFound(_)
            | FulfillmentError::MenuItemNotFound(_) => ErrorCategory::NotFound,
            FulfillmentError::InvalidTransition { .. }
            | FulfillmentError::InvalidItemTransition { .. }
            | FulfillmentError::AlreadyClaimed(_)
            | FulfillmentError::NotClaimant { .. }
            | FulfillmentError::NotPermitted { .. }
            | FulfillmentError::OrderClosed { .. }
            | FulfillmentError::CannotAcceptItems { .. }
            | FulfillmentError::ItemAlreadyDelivered { .. }
            | FulfillmentError::TableUnavailable(_)
            | FulfillmentError::LastItem
            | FulfillmentError::NotCancellable { .. }
            | FulfillmentError::PaymentMethodDisabled(_) => ErrorCategory::StateConflict,
            FulfillmentError::InsufficientStock { .. } => ErrorCategory::InsufficientStock,
            FulfillmentError::Storage(_) => ErrorCategory::Internal,
        }
    }
}
