//! CLI commands.

pub mod cart;
pub mod catalog;

use shopfront_cart::{CartError, ConfigError, StorageError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart storage could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart rejected the change.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid YAML.
    #[error("Invalid catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Product is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
