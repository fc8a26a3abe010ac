//! Employee Model

use serde::{Deserialize, Serialize};

/// Actor roles recognized by the fulfillment guard table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Waiter,
    Cashier,
    Chef,
    Courier,
    Customer,
}

impl Role {
    /// Roles allowed to create orders
    pub fn can_create_orders(&self) -> bool {
        matches!(
            self,
            Role::Admin | Role::Manager | Role::Waiter | Role::Cashier | Role::Customer
        )
    }

    /// Back-office roles that may override creator-only guards
    pub fn is_supervisor(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Waiter => "WAITER",
            Role::Cashier => "CASHIER",
            Role::Chef => "CHEF",
            Role::Courier => "COURIER",
            Role::Customer => "CUSTOMER",
        };
        write!(f, "{}", name)
    }
}

/// Lightweight employee reference stored on orders (claims, audit)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeRef {
    pub id: String,
    /// Name snapshot for audit display
    pub name: String,
}

impl EmployeeRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
