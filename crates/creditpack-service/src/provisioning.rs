//! Credit provisioning for paid orders.
//!
//! One `order.paid` event becomes one atomic credit increment. There is no
//! deduplication here: Polar delivers webhooks at least once, so a redelivered
//! event credits the user again.

use std::sync::Arc;

use creditpack_core::{CoreError, CreditPack, Order, ProductCatalog, UserId};
use creditpack_store::{StoreError, UserCreditStore};

/// Errors from provisioning an order.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The order cannot be tied to a user.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The credit store rejected the increment.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of provisioning one paid order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditGrant {
    /// The credited user.
    pub user_id: UserId,
    /// The paid order.
    pub order_id: String,
    /// The pack the product resolved to.
    pub pack: CreditPack,
    /// Credits added (0 for unknown products).
    pub credits: u32,
    /// Balance after the increment.
    pub new_balance: i64,
}

/// Turns paid orders into credit increments.
#[derive(Clone)]
pub struct CreditProvisioner {
    store: Arc<dyn UserCreditStore>,
    catalog: ProductCatalog,
}

impl CreditProvisioner {
    /// Create a provisioner over a store and catalog.
    #[must_use]
    pub fn new(store: Arc<dyn UserCreditStore>, catalog: ProductCatalog) -> Self {
        Self { store, catalog }
    }

    /// The catalog used to price orders.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Credit the purchasing user for a paid order.
    ///
    /// Unknown products grant 0 credits but still go through the store, so an
    /// unknown user is reported either way.
    ///
    /// # Errors
    ///
    /// - `CoreError::MissingIdentity` if the order has no external customer id.
    ///   Nothing is written in that case.
    /// - Any `StoreError` from the increment, unchanged.
    pub async fn on_order_paid(&self, order: &Order) -> Result<CreditGrant, ProvisionError> {
        let user_id = order.user_id()?;

        let pack = self.catalog.resolve(&order.product_id);
        if !pack.is_known() {
            tracing::warn!(
                order_id = %order.id,
                product_id = %order.product_id,
                "Paid order for unknown product, granting no credits"
            );
        }
        let credits = pack.credits();

        let new_balance = self.store.increment_credits(&user_id, credits).await?;

        tracing::info!(
            user_id = %user_id,
            order_id = %order.id,
            pack = ?pack,
            credits_added = credits,
            new_balance,
            "Credits provisioned for paid order"
        );

        Ok(CreditGrant {
            user_id,
            order_id: order.id.clone(),
            pack,
            credits,
            new_balance,
        })
    }
}
