//! System Configuration Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment methods accepted by the business
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
        };
        write!(f, "{}", name)
    }
}

/// Business-wide configuration snapshot consumed by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Tax rate in percent (e.g. 16.00 for 16%)
    pub tax_rate: Decimal,
    pub enabled_payment_methods: Vec<PaymentMethod>,
}

impl SystemConfig {
    pub fn is_payment_method_enabled(&self, method: PaymentMethod) -> bool {
        self.enabled_payment_methods.contains(&method)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(1600, 2),
            enabled_payment_methods: vec![
                PaymentMethod::Cash,
                PaymentMethod::Card,
                PaymentMethod::Transfer,
            ],
        }
    }
}
