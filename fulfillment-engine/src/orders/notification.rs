//! Broadcast notifications
//!
//! Fire-and-forget: emitted after the transaction commits; a send with no
//! subscribers is logged at debug and ignored, never propagated.

use serde::Serialize;
use shared::order::{OrderStatus, OrderType};

/// Events broadcast to subscribers (kitchen displays, cashier views, ...)
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderNotification {
    OrderCreated {
        order_id: String,
        order_number: String,
        order_type: OrderType,
    },
    ItemsAdded {
        order_id: String,
        order_number: String,
        count: usize,
    },
    StatusChanged {
        order_id: String,
        order_number: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderCancelled {
        order_id: String,
        order_number: String,
    },
}
