//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory for durable cart storage (default: .shopfront)
//! - `CART_STORAGE_KEY` - Storage slot for the cart snapshot (default: cart-product)
//! - `CART_CURRENCY` - ISO 4217 currency for the cart (default: USD)
//! - `CART_STORAGE_DISABLED` - `true`/`1` to run without durable storage
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use shopfront_core::CurrencyCode;
use thiserror::Error;

use crate::storage::{CartStorage, FileStore, StorageError, validate_key};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding the durable store
    pub storage_dir: PathBuf,
    /// Key of the cart snapshot inside the store
    pub storage_key: String,
    /// Currency every line is priced in
    pub currency: CurrencyCode,
    /// Run without durable storage
    pub storage_disabled: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".shopfront"),
            storage_key: CartStorage::DEFAULT_KEY.to_owned(),
            currency: CurrencyCode::default(),
            storage_disabled: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let defaults = Self::default();

        let storage_dir = env
            .optional("CART_STORAGE_DIR")
            .map_or(defaults.storage_dir, PathBuf::from);

        let storage_key = env.or_default("CART_STORAGE_KEY", &defaults.storage_key);
        validate_key(&storage_key).map_err(|e| {
            ConfigError::InvalidEnvVar("CART_STORAGE_KEY".to_string(), e.to_string())
        })?;

        let currency = env
            .or_default("CART_CURRENCY", defaults.currency.code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("CART_CURRENCY".to_string(), e.to_string()))?;

        let storage_disabled = match env.optional("CART_STORAGE_DISABLED") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CART_STORAGE_DISABLED".to_string(),
                    format!("expected true/false, got {value:?}"),
                )
            })?,
            None => defaults.storage_disabled,
        };

        Ok(Self {
            storage_dir,
            storage_key,
            currency,
            storage_disabled,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Build the storage adapter this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage directory cannot be created.
    pub fn open_storage(&self) -> Result<CartStorage, StorageError> {
        if self.storage_disabled {
            return Ok(CartStorage::inert());
        }
        let store = FileStore::open(&self.storage_dir)?;
        Ok(CartStorage::new(store, self.storage_key.clone()))
    }
}

/// Variable source with the usual defaulting helpers.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
