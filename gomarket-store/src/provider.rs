//! Provider scope for the cart.
//!
//! A [`CartProvider`] mounts one [`CartStore`] and makes it reachable through
//! [`use_cart`] for the duration of [`CartProvider::scope`]. Code that runs
//! outside a scope gets [`StoreError::OutsideProvider`] instead of a silently
//! empty cart.
//!
//! The scope is a Tokio task-local: futures awaited inside `scope` see the
//! store, tasks spawned from inside do not.

use gomarket_core::KeyValueStorage;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::cart_store::CartStore;
use crate::config::CartConfig;
use crate::error::StoreError;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Owns the mounted cart store for an application scope.
#[derive(Debug, Clone)]
pub struct CartProvider {
    store: CartStore,
}

impl CartProvider {
    /// Creates the store and loads the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid or the initial load fails.
    pub async fn mount(
        storage: Arc<dyn KeyValueStorage>,
        config: &CartConfig,
    ) -> Result<Self, StoreError> {
        config.validate()?;
        let store = CartStore::open(storage, config).await?;
        info!(key = %store.storage_key(), "Cart provider mounted");
        Ok(Self { store })
    }

    /// Returns the mounted store.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Runs `f` with this provider's store available through [`use_cart`].
    pub async fn scope<F>(&self, f: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.store.clone(), f).await
    }
}

/// Returns the store of the enclosing [`CartProvider::scope`].
///
/// # Errors
///
/// Returns `StoreError::OutsideProvider` when called outside a scope.
pub fn use_cart() -> Result<CartStore, StoreError> {
    CURRENT_CART
        .try_with(CartStore::clone)
        .map_err(|_| StoreError::OutsideProvider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use gomarket_core::ProductInput;

    async fn mounted() -> CartProvider {
        CartProvider::mount(Arc::new(MemoryStorage::new()), &CartConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_use_cart_outside_scope_fails() {
        let err = use_cart().unwrap_err();
        assert!(matches!(err, StoreError::OutsideProvider));
        assert!(err.is_usage_error());
    }

    #[tokio::test]
    async fn test_use_cart_inside_scope() {
        let provider = mounted().await;

        provider
            .scope(async {
                let cart = use_cart().unwrap();
                cart.add_to_cart(ProductInput::new("p1", "Shirt", "u", 10.0))
                    .await
                    .unwrap();
            })
            .await;

        assert!(provider.store().products().await.contains("p1"));
        assert!(use_cart().is_err());
    }

    #[tokio::test]
    async fn test_spawned_task_is_outside_scope() {
        let provider = mounted().await;

        let inside = provider
            .scope(async { tokio::spawn(async { use_cart().is_ok() }).await.unwrap() })
            .await;
        assert!(!inside);
    }

    #[tokio::test]
    async fn test_mount_propagates_corrupt_data() {
        let storage = MemoryStorage::with_entry("@GoMarketplace:products", "[{");
        let result = CartProvider::mount(Arc::new(storage), &CartConfig::default()).await;
        assert!(matches!(result, Err(StoreError::CorruptCart(_))));
    }

    #[tokio::test]
    async fn test_mount_rejects_blank_namespace() {
        let config = CartConfig {
            namespace: String::new(),
            ..Default::default()
        };
        let result = CartProvider::mount(Arc::new(MemoryStorage::new()), &config).await;
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
