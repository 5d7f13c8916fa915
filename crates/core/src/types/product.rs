//! Catalog item type.
//!
//! A [`CatalogItem`] is the purchasable product a UI component hands to the
//! cart. It is produced from server-fetched product data; this crate never
//! fetches it.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors that can occur when validating a [`CatalogItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The product ID is empty.
    #[error("product id cannot be empty")]
    EmptyId,
    /// The product name is empty.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    /// The price is below zero.
    #[error("product {id} has a negative price: {price}")]
    NegativePrice {
        /// Offending product.
        id: ProductId,
        /// The rejected price.
        price: Price,
    },
}

/// A purchasable product as supplied by the catalog.
///
/// ## Constraints
///
/// - `id` must not be blank
/// - `name` must not be blank
/// - `price` must not be negative
///
/// ## Examples
///
/// ```
/// use shopfront_core::{CatalogItem, CurrencyCode, Price};
///
/// let item = CatalogItem::new("sku1", "Widget", Price::from_cents(1000, CurrencyCode::USD));
/// assert!(item.validate().is_ok());
///
/// let nameless = CatalogItem::new("sku2", "  ", Price::from_cents(1000, CurrencyCode::USD));
/// assert!(nameless.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current catalog price.
    pub price: Price,
    /// Image URL or media reference.
    #[serde(default)]
    pub image: Option<String>,
}

impl CatalogItem {
    /// Create a catalog item without an image.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check the fields the cart requires.
    ///
    /// # Errors
    ///
    /// Returns the first failing constraint.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.is_blank() {
            return Err(ProductError::EmptyId);
        }

        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName(self.id.clone()));
        }

        if self.price.is_negative() {
            return Err(ProductError::NegativePrice {
                id: self.id.clone(),
                price: self.price,
            });
        }

        Ok(())
    }
}
