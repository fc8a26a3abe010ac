//! Test fixtures: seeded providers, storage, and actor helpers

use crate::orders::manager::FulfillmentManager;
use crate::orders::storage::OrderStorage;
use crate::orders::traits::{ActorContext, OpContext};
use crate::services::{InMemoryCatalog, InMemoryPromotions, InMemoryTables, StaticConfig};
use chrono::NaiveDate;
use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::models::{
    DiningTable, MenuItem, PaymentMethod, Promotion, PromotionKind, RecipeLine, Role, SystemConfig,
    TableStatus,
};
use shared::order::{LineItemInput, OrderDraft, OrderType};
use std::sync::Arc;

/// Fixed business date for deterministic promotion windows (a Friday)
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

pub struct TestEnv {
    pub storage: OrderStorage,
    pub catalog: Arc<InMemoryCatalog>,
    pub promotions: Arc<InMemoryPromotions>,
    pub tables: Arc<InMemoryTables>,
    pub config: Arc<StaticConfig>,
}

impl TestEnv {
    /// In-memory environment with a seeded menu, stock, and tables
    pub fn new() -> Self {
        let storage = OrderStorage::open_in_memory().unwrap();
        let catalog = Arc::new(InMemoryCatalog::new());
        let promotions = Arc::new(InMemoryPromotions::new());
        let tables = Arc::new(InMemoryTables::new());
        let config = Arc::new(StaticConfig::default());

        // Taco al pastor: 2 tortillas + 1 pastor portion per unit
        catalog.insert(MenuItem {
            id: "item-taco".to_string(),
            name: "Taco al pastor".to_string(),
            price: Decimal::new(1050, 2),
            requires_preparation: true,
            recipe: vec![
                recipe("ing-tortilla", "Tortilla", Decimal::new(2, 0)),
                recipe("ing-pastor", "Carne al pastor", Decimal::new(1, 0)),
            ],
            is_active: true,
        });
        // Quesadilla: 1 tortilla + 1.5 cheese per unit
        catalog.insert(MenuItem {
            id: "item-quesadilla".to_string(),
            name: "Quesadilla".to_string(),
            price: Decimal::new(800, 2),
            requires_preparation: true,
            recipe: vec![
                recipe("ing-tortilla", "Tortilla", Decimal::new(1, 0)),
                recipe("ing-cheese", "Queso Oaxaca", Decimal::new(15, 1)),
            ],
            is_active: true,
        });
        // Bottled soda: no preparation, 1 bottle per unit
        catalog.insert(MenuItem {
            id: "item-soda".to_string(),
            name: "Refresco".to_string(),
            price: Decimal::new(250, 2),
            requires_preparation: false,
            recipe: vec![recipe("ing-soda", "Refresco embotellado", Decimal::new(1, 0))],
            is_active: true,
        });

        storage.seed_stock("ing-tortilla", Decimal::new(100, 0)).unwrap();
        storage.seed_stock("ing-pastor", Decimal::new(40, 0)).unwrap();
        storage.seed_stock("ing-cheese", Decimal::new(50, 0)).unwrap();
        storage.seed_stock("ing-soda", Decimal::new(30, 0)).unwrap();

        tables.insert(dining_table("table-1", TableStatus::Available));
        tables.insert(dining_table("table-2", TableStatus::Occupied));
        tables.insert(dining_table("table-3", TableStatus::Reserved));

        Self {
            storage,
            catalog,
            promotions,
            tables,
            config,
        }
    }

    pub fn ctx<'a>(&'a self, txn: &'a WriteTransaction) -> OpContext<'a> {
        OpContext {
            txn,
            storage: &self.storage,
            catalog: self.catalog.as_ref(),
            promotions: self.promotions.as_ref(),
            tables: self.tables.as_ref(),
            config: self.config.as_ref(),
            today: today(),
            now_millis: 1_786_060_800_000,
        }
    }

    pub fn manager(&self) -> FulfillmentManager {
        FulfillmentManager::with_parts(
            self.storage.clone(),
            self.catalog.clone(),
            self.promotions.clone(),
            self.tables.clone(),
            self.config.clone(),
        )
    }

    pub fn restrict_payment_methods(&self, methods: Vec<PaymentMethod>) {
        self.config.set(SystemConfig {
            tax_rate: Decimal::new(1600, 2),
            enabled_payment_methods: methods,
        });
    }

    pub fn stock(&self, ingredient_id: &str) -> Decimal {
        self.storage.stock_level_committed(ingredient_id).unwrap()
    }
}

fn recipe(id: &str, name: &str, qty: Decimal) -> RecipeLine {
    RecipeLine {
        ingredient_id: id.to_string(),
        ingredient_name: name.to_string(),
        quantity_per_unit: qty,
        unit: "pz".to_string(),
    }
}

fn dining_table(id: &str, status: TableStatus) -> DiningTable {
    DiningTable {
        id: id.to_string(),
        name: format!("Mesa {}", id.trim_start_matches("table-")),
        capacity: 4,
        status,
    }
}

// ============================================================================
// Actors
// ============================================================================

pub fn waiter() -> ActorContext {
    ActorContext::new("waiter-1", "Ana", Role::Waiter)
}

pub fn chef() -> ActorContext {
    ActorContext::new("chef-1", "Luis", Role::Chef)
}

pub fn second_chef() -> ActorContext {
    ActorContext::new("chef-2", "Marta", Role::Chef)
}

pub fn cashier() -> ActorContext {
    ActorContext::new("cashier-1", "Sofía", Role::Cashier)
}

pub fn courier() -> ActorContext {
    ActorContext::new("courier-1", "Diego", Role::Courier)
}

pub fn second_courier() -> ActorContext {
    ActorContext::new("courier-2", "Pablo", Role::Courier)
}

pub fn manager_actor() -> ActorContext {
    ActorContext::new("manager-1", "Elena", Role::Manager)
}

// ============================================================================
// Drafts and lines
// ============================================================================

pub fn dine_in_draft(table_id: &str) -> OrderDraft {
    OrderDraft {
        order_type: OrderType::DineIn,
        table_id: Some(table_id.to_string()),
        customer_name: None,
        customer_phone: None,
        delivery_address: None,
        delivery_references: None,
        payment_method: PaymentMethod::Cash,
    }
}

pub fn takeout_draft() -> OrderDraft {
    OrderDraft {
        order_type: OrderType::Takeout,
        table_id: None,
        customer_name: Some("Carlos".to_string()),
        customer_phone: Some("555-0100".to_string()),
        delivery_address: None,
        delivery_references: None,
        payment_method: PaymentMethod::Card,
    }
}

pub fn delivery_draft() -> OrderDraft {
    OrderDraft {
        order_type: OrderType::Delivery,
        table_id: None,
        customer_name: Some("Lucía".to_string()),
        customer_phone: Some("555-0101".to_string()),
        delivery_address: Some("Av. Siempre Viva 742".to_string()),
        delivery_references: None,
        payment_method: PaymentMethod::Cash,
    }
}

pub fn line(item_id: &str, quantity: u32) -> LineItemInput {
    LineItemInput {
        item_id: item_id.to_string(),
        quantity,
        claimed_promotion_id: None,
        claimed_promotion_price: None,
        comments: None,
    }
}

pub fn promo_line(
    item_id: &str,
    quantity: u32,
    promotion_id: &str,
    claimed_price: Option<Decimal>,
) -> LineItemInput {
    LineItemInput {
        item_id: item_id.to_string(),
        quantity,
        claimed_promotion_id: Some(promotion_id.to_string()),
        claimed_promotion_price: claimed_price,
        comments: None,
    }
}

/// 2x1 on the given item, valid all week through 2026
pub fn two_for_one(id: &str, item_id: &str) -> Promotion {
    Promotion {
        id: id.to_string(),
        name: "2x1".to_string(),
        description: None,
        kind: PromotionKind::BuyXPayY,
        buy_quantity: Some(2),
        pay_quantity: Some(1),
        discount_percentage: None,
        discount_amount: None,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        valid_days: (0..7).collect(),
        active: true,
        priority: 1,
        item_ids: vec![item_id.to_string()],
    }
}

/// Percentage discount on the given item, valid all week through 2026
pub fn percent_off(id: &str, item_id: &str, percent: i64) -> Promotion {
    Promotion {
        id: id.to_string(),
        name: format!("{}% off", percent),
        description: None,
        kind: PromotionKind::PercentageDiscount,
        buy_quantity: None,
        pay_quantity: None,
        discount_percentage: Some(Decimal::new(percent, 0)),
        discount_amount: None,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        valid_days: (0..7).collect(),
        active: true,
        priority: 1,
        item_ids: vec![item_id.to_string()],
    }
}
