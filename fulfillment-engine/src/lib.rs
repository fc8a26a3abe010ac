//! Order Fulfillment Engine
//!
//! Tracks restaurant orders and their line items through a multi-actor
//! lifecycle: created by a waiter/cashier/customer, claimed and prepared by
//! a cook, delivered by a waiter or courier, paid through a cashier, waiter
//! or courier. Inventory, pricing, and claim invariants stay consistent
//! under concurrent actors because every mutating operation executes as a
//! single atomic read-modify-write against the persisted order.
//!
//! # Architecture
//!
//! ```text
//! Facade op → FulfillmentManager → Action (guard table + claims)
//!                   │                      │
//!              Broadcast             redb transaction
//!                   │               (snapshot + stock + indices)
//!             All subscribers
//! ```
//!
//! - **orders**: storage, transitions, per-operation actions, manager facade
//! - **inventory**: stock ledger with the asymmetric return policy
//! - **pricing**: server-side promotion re-validation
//! - **services**: collaborator traits (menu, promotions, tables, config)

pub mod error;
pub mod inventory;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod services;

// Re-exports
pub use error::{ErrorCategory, FulfillmentError, StockShortfall};
pub use inventory::{StockCredit, StockReturn};
pub use orders::manager::FulfillmentManager;
pub use orders::notification::OrderNotification;
pub use orders::traits::ActorContext;
