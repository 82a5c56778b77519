//! Shop types
//!
//! Stored as JSON in the store state tree, one module per page concern.

use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price_cents: u64,
}

impl Product {
    pub fn new(id: u32, name: impl Into<String>, price_cents: u64) -> Self {
        Self {
            id,
            name: name.into(),
            price_cents,
        }
    }
}

/// State of a `product/<id>` module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductState {
    pub product: Option<Product>,
}

// =============================================================================
// Cart & Session
// =============================================================================

/// Cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: u32,
    pub quantity: u32,
}

/// State of the `cart` module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

/// State of the `session` module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}
