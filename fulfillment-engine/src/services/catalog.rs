//! Menu catalog provider

use dashmap::DashMap;
use shared::models::MenuItem;

/// Menu/recipe lookup consumed by the engine
pub trait MenuProvider: Send + Sync {
    fn get_item(&self, item_id: &str) -> Option<MenuItem>;
}

/// DashMap-backed catalog for embedding and tests
#[derive(Default)]
pub struct InMemoryCatalog {
    items: DashMap<String, MenuItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, item: MenuItem) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn remove(&self, item_id: &str) {
        self.items.remove(item_id);
    }
}

impl MenuProvider for InMemoryCatalog {
    fn get_item(&self, item_id: &str) -> Option<MenuItem> {
        self.items.get(item_id).map(|entry| entry.value().clone())
    }
}
