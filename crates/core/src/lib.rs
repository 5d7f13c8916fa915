//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all shopfront components:
//! - `cart` - Client-side shopping cart state, persistence and totals
//! - `cli` - Command-line driver for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and catalog items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
