// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GoMarketplace` Store
//!
//! State management for the `GoMarketplace` shopping cart.
//!
//! This crate provides:
//!
//! - **CartStore**: The authoritative cart with watch-channel notifications
//! - **CartProvider**: Mounts a store and scopes access through [`use_cart`]
//! - **Storage**: In-memory and file-backed key-value backends
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gomarket_core::ProductInput;
//! use gomarket_store::{use_cart, CartConfig, CartProvider, FileStorage};
//!
//! let config = CartConfig::load_default().await?;
//! let storage = Arc::new(FileStorage::new(config.storage_path()));
//! let provider = CartProvider::mount(storage, &config).await?;
//!
//! provider
//!     .scope(async {
//!         let cart = use_cart()?;
//!         cart.add_to_cart(ProductInput::new("p1", "Shirt", "u", 10.0)).await?;
//!
//!         // Subscribe to changes
//!         let mut rx = cart.subscribe();
//!         while rx.changed().await.is_ok() {
//!             println!("{} items", cart.products().await.len());
//!         }
//!         Ok::<_, gomarket_store::StoreError>(())
//!     })
//!     .await?;
//! ```

pub mod cart_store;
pub mod config;
pub mod error;
pub mod persistence;
pub mod provider;
pub mod storage;
pub mod writer;

pub use cart_store::{CartStore, StorePhase};
pub use config::{CartConfig, CorruptDataPolicy, DEFAULT_NAMESPACE};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, default_data_dir, default_storage_path, load_json,
    load_json_opt, save_json,
};
pub use provider::{CartProvider, use_cart};
pub use storage::{FileStorage, MemoryStorage};
pub use writer::PersistStatus;
#[cfg(test)]
mod persistence_tests;
