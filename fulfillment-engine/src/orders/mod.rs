//! Order fulfillment module
//!
//! - **storage**: redb persistence for snapshots, indices, stock, counters
//! - **transitions**: the role-parameterized guard table and status roll-up
//! - **actions**: one handler per facade operation
//! - **manager**: the `FulfillmentManager` facade and queries
//!
//! # Operation flow
//!
//! ```text
//! facade op
//!     ├─ 1. Validate input (field constraints, money bounds)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Action: load snapshot, check guards, claim, mutate
//!     ├─ 4. Recompute totals and the status roll-up
//!     ├─ 5. Persist snapshot + indices + stock
//!     ├─ 6. Commit
//!     ├─ 7. Mirror table state to the provider (advisory)
//!     └─ 8. Broadcast notification (fire-and-forget)
//! ```

pub mod actions;
pub mod manager;
pub mod notification;
pub mod storage;
pub mod traits;
pub mod transitions;

#[cfg(test)]
pub(crate) mod testkit;

// Re-exports
pub use manager::FulfillmentManager;
pub use notification::OrderNotification;
pub use storage::{OrderStorage, StorageError};
pub use traits::{ActorContext, OpContext};
