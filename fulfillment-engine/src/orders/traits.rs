//! Action context and handler trait

use crate::error::FulfillmentError;
use crate::orders::storage::OrderStorage;
use crate::services::{ConfigProvider, MenuProvider, PromotionProvider, TableProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use redb::WriteTransaction;
use shared::models::{EmployeeRef, MenuItem, Role};
use shared::order::OrderSnapshot;

/// The authenticated actor performing an operation
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub employee: EmployeeRef,
    pub role: Role,
}

impl ActorContext {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            employee: EmployeeRef::new(id, name),
            role,
        }
    }
}

/// Everything an action needs: the open write transaction plus collaborators
pub struct OpContext<'a> {
    pub txn: &'a WriteTransaction,
    pub storage: &'a OrderStorage,
    pub catalog: &'a dyn MenuProvider,
    pub promotions: &'a dyn PromotionProvider,
    pub tables: &'a dyn TableProvider,
    pub config: &'a dyn ConfigProvider,
    /// Business date, drives promotion windows and order numbers
    pub today: NaiveDate,
    /// Unix milliseconds
    pub now_millis: i64,
}

impl OpContext<'_> {
    /// Load an order inside the transaction (read-your-writes)
    pub fn load_order(&self, order_id: &str) -> Result<OrderSnapshot, FulfillmentError> {
        self.storage
            .get_snapshot_txn(self.txn, order_id)?
            .ok_or_else(|| FulfillmentError::OrderNotFound(order_id.to_string()))
    }

    /// Resolve an orderable menu item
    pub fn menu_item(&self, item_id: &str) -> Result<MenuItem, FulfillmentError> {
        let item = self
            .catalog
            .get_item(item_id)
            .ok_or_else(|| FulfillmentError::MenuItemNotFound(item_id.to_string()))?;
        if !item.is_active {
            return Err(FulfillmentError::Validation(format!(
                "menu item '{}' is not active",
                item.name
            )));
        }
        Ok(item)
    }
}

/// One facade operation
#[async_trait]
pub trait OrderAction {
    type Output;

    async fn execute(
        &self,
        ctx: &OpContext<'_>,
        actor: &ActorContext,
    ) -> Result<Self::Output, FulfillmentError>;
}
