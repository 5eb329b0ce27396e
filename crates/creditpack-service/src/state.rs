//! Application state.

use std::sync::Arc;

use creditpack_store::UserCreditStore;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::polar::PolarClient;
use crate::provisioning::CreditProvisioner;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn UserCreditStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Credit provisioning for paid orders.
    pub provisioner: CreditProvisioner,

    /// Polar client for checkout, customers and portal (optional).
    pub polar: Option<Arc<PolarClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn UserCreditStore>, config: ServiceConfig) -> Self {
        let polar = config.polar_access_token.as_ref().and_then(|token| {
            let base_url = config.polar_base_url();
            match PolarClient::new(base_url, token) {
                Ok(client) => {
                    tracing::info!(polar_url = %base_url, "Polar integration enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create Polar client");
                    None
                }
            }
        });

        if polar.is_none() {
            tracing::warn!("Polar not configured - checkout and portal will not be available");
        }

        if config.catalog.is_empty() {
            tracing::warn!("No credit pack products configured - paid orders will grant no credits");
        }

        let provisioner = CreditProvisioner::new(Arc::clone(&store), config.catalog.clone());

        Self {
            store,
            config,
            provisioner,
            polar,
        }
    }

    /// Check if Polar is configured.
    #[must_use]
    pub fn has_polar(&self) -> bool {
        self.polar.is_some()
    }

    /// The Polar client, or `Unavailable` if not configured.
    pub fn polar(&self) -> Result<&PolarClient, ApiError> {
        self.polar
            .as_deref()
            .ok_or_else(|| ApiError::Unavailable("Polar is not configured".into()))
    }
}
