//! Product catalog file.
//!
//! The CLI stands in for the storefront pages, which receive products from
//! the content API. Here products come from a YAML file instead:
//!
//! ```yaml
//! - id: sku1
//!   name: Widget
//!   price: 10
//!   image: https://media.example/widget.png
//! - id: sku2
//!   name: Gadget
//!   price: "4.50"
//!   currency: USD
//! ```
//!
//! `currency` defaults to the cart currency.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use shopfront_core::{CatalogItem, CurrencyCode, Price, ProductId};
use tracing::info;

use super::CliError;

/// One product as written in the catalog file.
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    id: ProductId,
    name: String,
    price: Decimal,
    #[serde(default)]
    currency: Option<CurrencyCode>,
    #[serde(default)]
    image: Option<String>,
}

/// Products available to add.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Read a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path, default_currency: CurrencyCode) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::CatalogRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let catalog = Self::from_yaml_str(&content, default_currency)?;
        info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse catalog YAML.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Yaml` if the document is not a product list.
    pub fn from_yaml_str(content: &str, default_currency: CurrencyCode) -> Result<Self, CliError> {
        let entries: Vec<CatalogEntry> = serde_yaml::from_str(content)?;
        let items = entries
            .into_iter()
            .map(|entry| CatalogItem {
                id: entry.id,
                name: entry.name,
                price: Price::new(entry.price, entry.currency.unwrap_or(default_currency)),
                image: entry.image,
            })
            .collect();
        Ok(Self { items })
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
