//! Application context and services

use super::{CartItem, Product};
use route_lifecycle::MemoryStore;
use std::sync::{Arc, Mutex};

/// Application context reachable from every loader through the app handle
#[derive(Clone)]
pub struct ShopContext {
    /// Product catalog
    pub catalog: CatalogService,
    /// Store the loaders write into
    pub store: Arc<MemoryStore>,
    /// Signed-in user, if any
    pub user: Option<String>,
}

impl ShopContext {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            catalog: CatalogService::new(),
            store,
            user: None,
        }
    }

    pub fn signed_in(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Catalog service (simulated in-memory backend)
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<Mutex<Vec<Product>>>,
    cart: Arc<Mutex<Vec<CartItem>>>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self {
            products: Arc::new(Mutex::new(vec![
                Product::new(1, "Espresso machine", 24900),
                Product::new(2, "Burr grinder", 12900),
                Product::new(3, "Milk jug", 1900),
            ])),
            cart: Arc::new(Mutex::new(vec![CartItem {
                product_id: 3,
                quantity: 2,
            }])),
        }
    }

    pub fn get_product(&self, id: u32) -> Option<Product> {
        self.products.lock().ok()?.iter().find(|p| p.id == id).cloned()
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.products
            .lock()
            .ok()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn cart_items(&self) -> Vec<CartItem> {
        self.cart.lock().ok().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::new()
    }
}
