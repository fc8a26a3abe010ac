//! System configuration provider
//!
//! Injected read-only configuration: the tax rate is snapshotted onto each
//! order at creation, and the enabled-payment-method set is consulted on
//! every payment-bearing operation. Tests swap the values per case.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::models::{PaymentMethod, SystemConfig};

/// Configuration lookup consumed by the engine
pub trait ConfigProvider: Send + Sync {
    fn tax_rate(&self) -> Decimal;
    fn is_payment_method_enabled(&self, method: PaymentMethod) -> bool;
}

/// RwLock-wrapped configuration for embedding and tests
pub struct StaticConfig {
    inner: RwLock<SystemConfig>,
}

impl StaticConfig {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    pub fn set(&self, config: SystemConfig) {
        *self.inner.write() = config;
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self::new(SystemConfig::default())
    }
}

impl ConfigProvider for StaticConfig {
    fn tax_rate(&self) -> Decimal {
        self.inner.read().tax_rate
    }

    fn is_payment_method_enabled(&self, method: PaymentMethod) -> bool {
        self.inner.read().is_payment_method_enabled(method)
    }
}
