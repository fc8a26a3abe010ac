//! Shared types for the order lifecycle

use serde::{Deserialize, Serialize};

/// Order type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
}

/// Aggregate order status
///
/// PENDING, IN_PREPARATION and READY are derived from line-item statuses.
/// ON_THE_WAY, DELIVERED, PAID and CANCELLED are reached by explicit actor
/// action and are sticky: the roll-up never reverts them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InPreparation,
    Ready,
    /// DELIVERY orders only: courier is en route
    OnTheWay,
    Delivered,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further mutation
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// States reached only by explicit actor action, never reverted by the
    /// item roll-up
    pub fn is_explicit(&self) -> bool {
        matches!(
            self,
            OrderStatus::OnTheWay
                | OrderStatus::Delivered
                | OrderStatus::Paid
                | OrderStatus::Cancelled
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Ready => "READY",
            OrderStatus::OnTheWay => "ON_THE_WAY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", name)
    }
}

/// Line-item status, independent of the aggregate status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    InPreparation,
    Ready,
    Delivered,
}

impl ItemStatus {
    /// Natural initial status: items that need no preparation are born READY
    pub fn initial(requires_preparation: bool) -> Self {
        if requires_preparation {
            ItemStatus::Pending
        } else {
            ItemStatus::Ready
        }
    }

    /// Position in the forward progression, for no-backward checks
    pub fn rank(&self) -> u8 {
        match self {
            ItemStatus::Pending => 0,
            ItemStatus::InPreparation => 1,
            ItemStatus::Ready => 2,
            ItemStatus::Delivered => 3,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ItemStatus::Pending => "PENDING",
            ItemStatus::InPreparation => "IN_PREPARATION",
            ItemStatus::Ready => "READY",
            ItemStatus::Delivered => "DELIVERED",
        };
        write!(f, "{}", name)
    }
}

/// Single-assignment claim fields on an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimField {
    PreparedBy,
    DeliveredBy,
    PaidBy,
}

impl std::fmt::Display for ClaimField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClaimField::PreparedBy => "prepared_by",
            ClaimField::DeliveredBy => "delivered_by",
            ClaimField::PaidBy => "paid_by",
        };
        write!(f, "{}", name)
    }
}
