//! Promotion provider

use dashmap::DashMap;
use shared::models::Promotion;

/// Promotion lookup consumed by the pricing validator
pub trait PromotionProvider: Send + Sync {
    fn get(&self, promotion_id: &str) -> Option<Promotion>;
}

/// DashMap-backed promotion registry for embedding and tests
#[derive(Default)]
pub struct InMemoryPromotions {
    promotions: DashMap<String, Promotion>,
}

impl InMemoryPromotions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, promotion: Promotion) {
        self.promotions.insert(promotion.id.clone(), promotion);
    }

    pub fn remove(&self, promotion_id: &str) {
        self.promotions.remove(promotion_id);
    }
}

impl PromotionProvider for InMemoryPromotions {
    fn get(&self, promotion_id: &str) -> Option<Promotion> {
        self.promotions
            .get(promotion_id)
            .map(|entry| entry.value().clone())
    }
}
