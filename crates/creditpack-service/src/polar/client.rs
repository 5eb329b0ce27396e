//! Polar API client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use super::types::{
    Checkout, CheckoutCreate, Customer, CustomerCreate, CustomerSession, CustomerSessionCreate,
    PolarErrorResponse,
};

/// Timeout for Polar API requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for Polar operations.
#[derive(Debug, thiserror::Error)]
pub enum PolarError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Polar API returned an error.
    #[error("Polar API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type reported by Polar, if any.
        error_type: Option<String>,
        /// Error message.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Polar API client.
#[derive(Debug, Clone)]
pub struct PolarClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl PolarClient {
    /// Create a new Polar client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL, e.g. `https://sandbox-api.polar.sh`
    /// * `access_token` - Organization access token
    ///
    /// # Errors
    ///
    /// Returns an error if the token is blank or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, PolarError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(PolarError::Configuration(
                "access token must not be empty".into(),
            ));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Create a checkout session.
    pub async fn create_checkout(&self, input: &CheckoutCreate) -> Result<Checkout, PolarError> {
        tracing::debug!(
            products = ?input.products,
            external_customer_id = ?input.external_customer_id,
            "Creating Polar checkout"
        );

        let response = self
            .client
            .post(format!("{}/v1/checkouts/", self.base_url))
            .bearer_auth(&self.access_token)
            .json(input)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Create a customer linked to one of our users.
    pub async fn create_customer(&self, input: &CustomerCreate) -> Result<Customer, PolarError> {
        tracing::debug!(external_id = %input.external_id, "Creating Polar customer");

        let response = self
            .client
            .post(format!("{}/v1/customers/", self.base_url))
            .bearer_auth(&self.access_token)
            .json(input)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Look up the customer linked to one of our users.
    ///
    /// Returns `Ok(None)` if Polar has no customer with that external id.
    pub async fn get_customer_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Customer>, PolarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PolarError::Configuration(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| PolarError::Configuration("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["v1", "customers", "external", external_id]);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::handle_response(response).await.map(Some)
    }

    /// Create a customer portal session for one of our users.
    pub async fn create_customer_session(
        &self,
        external_customer_id: &str,
    ) -> Result<CustomerSession, PolarError> {
        let body = CustomerSessionCreate {
            external_customer_id: external_customer_id.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/v1/customer-sessions/", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Decode a success body, or turn an error body into `PolarError::Api`.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PolarError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<PolarErrorResponse, _> = response.json().await;

        match error_body {
            Ok(polar_error) => Err(PolarError::Api {
                status: status.as_u16(),
                message: polar_error.detail_message(),
                error_type: polar_error.error,
            }),
            Err(_) => Err(PolarError::Api {
                status: status.as_u16(),
                error_type: None,
                message: format!("HTTP {status}"),
            }),
        }
    }
}
