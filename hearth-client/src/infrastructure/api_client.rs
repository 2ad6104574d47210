use crate::config::Config;
use hearth_model::ApiFailureBody;
use log::{debug, info};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Error surfaced by every backend call.
///
/// Two tiers: a response body that parses as `{"success": false, "message":
/// ...}` becomes `Rejected` carrying the backend's own message; everything
/// else (connection failures, timeouts, malformed bodies, unexpected
/// statuses) becomes `Transport` carrying the raw error text. The view layer
/// never needs to distinguish them; it calls [`ApiError::surface_message`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend rejected the request with a structured failure body
    #[error("{message}")]
    Rejected {
        /// Backend-provided reason, shown to the user verbatim
        message: String,
    },
    /// The request failed below the API contract level
    #[error("{message}")]
    Transport {
        /// Raw transport or decode error text
        message: String,
    },
}

impl ApiError {
    /// The text shown to the user, identical accessor for both tiers.
    pub fn surface_message(&self) -> &str {
        match self {
            ApiError::Rejected { message } | ApiError::Transport { message } => message,
        }
    }

    /// True when the failure carries a backend-authored message.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport {
            message: err.to_string(),
        }
    }
}

/// API client with bearer-token support.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        info!("[ApiClient] Creating new API client with base URL: {base_url}");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_store: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a client pointed at the configured backend.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.server_url.clone())
    }

    /// Build a full URL for a given path.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Set the session token attached to subsequent requests.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// Get the current session token.
    pub async fn get_token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Build a request with authentication headers.
    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.header("Authorization", format!("Bearer {token}"))
        } else {
            builder
        }
    }

    /// Execute a request and classify every failure into one of the two
    /// error tiers.
    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::transport)?;

        if status.is_success() {
            serde_json::from_slice(&body)
                .map_err(|e| ApiError::transport(format!("Malformed response body: {e}")))
        } else {
            Err(classify_failure(status, &body))
        }
    }

    /// Execute a request whose success body is irrelevant.
    ///
    /// Any 2xx answer counts as success regardless of what, if anything, the
    /// body contains; failures are classified into the two tiers as usual.
    async fn execute_no_content(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::transport)?;

        if status.is_success() {
            Ok(())
        } else {
            Err(classify_failure(status, &body))
        }
    }

    // Public API methods

    /// GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET request to: {url}");
        let request = self.client.get(&url);
        let request = self.build_request(request).await;
        self.execute_request(request).await
    }

    /// POST request with a JSON body
    pub async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        debug!("[ApiClient] POST request to: {url}");
        let request = self.client.post(&url).json(body);
        let request = self.build_request(request).await;
        self.execute_request(request).await
    }

    /// DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.build_url(path);
        debug!("[ApiClient] DELETE request to: {url}");
        let request = self.client.delete(&url);
        let request = self.build_request(request).await;
        self.execute_request(request).await
    }

    /// GET request whose response body is discarded
    pub async fn get_no_content(&self, path: &str) -> Result<(), ApiError> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET request to: {url}");
        let request = self.client.get(&url);
        let request = self.build_request(request).await;
        self.execute_no_content(request).await
    }

    /// DELETE request whose response body is discarded
    pub async fn delete_no_content(&self, path: &str) -> Result<(), ApiError> {
        let url = self.build_url(path);
        debug!("[ApiClient] DELETE request to: {url}");
        let request = self.client.delete(&url);
        let request = self.build_request(request).await;
        self.execute_no_content(request).await
    }
}

/// Decide which tier a non-success response belongs to.
fn classify_failure(status: StatusCode, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ApiFailureBody>(body) {
        Ok(failure) if !failure.success => ApiError::Rejected {
            message: failure.message,
        },
        _ => ApiError::Transport {
            message: format!("Request failed with status {status}"),
        },
    }
}
