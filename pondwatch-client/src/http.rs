//! [`MonitoringApi`] over HTTP/JSON.
//!
//! Every response is wrapped in `{ success, data, message }`. The bearer
//! token is read from the [`SessionStore`] on each request, so a login or a
//! forced clear takes effect on the next call without rebuilding the client.
//!
//! Any `401` answer, from any endpoint, publishes
//! [`AuthEvent::Unauthorized`] before the error is returned.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pondwatch_client::{AuthEvents, HttpApi, MemorySessionStore, MonitoringApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpApi::builder()
//!         .base_url("http://localhost:5000")
//!         .store(Arc::new(MemorySessionStore::new()))
//!         .events(AuthEvents::new())
//!         .build()?;
//!
//!     let history = api.history().await?;
//!     println!("{} readings", history.len());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pondwatch_types::{Locale, Reading};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::events::{AuthEvent, AuthEvents};
use crate::session::{MemorySessionStore, SessionStore};
use crate::{ClientError, Credentials, LoginData, MonitoringApi, Registration, UserProfile};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The response wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Just the message of an error body, whatever else it carries.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Whether a failed call should read as a form error or a session problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Auth,
    Session,
}

/// HTTP client for the monitoring backend.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    events: AuthEvents,
    locale: Locale,
}

impl HttpApi {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpApiBuilder {
        HttpApiBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match self.store.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send `request` and unwrap the envelope's `data`.
    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<Option<T>, ClientError> {
        debug!("Calling {}", path);
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            warn!("{} answered 401", path);
            self.events.emit(AuthEvent::Unauthorized {
                path: path.to_string(),
            });
            return Err(match endpoint {
                Endpoint::Auth => ClientError::Auth(self.message_or_default(body.message)),
                Endpoint::Session => ClientError::SessionExpired,
            });
        }

        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            debug!("{} answered {}", path, status);
            return Err(self.rejected(endpoint, body.message));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        if !envelope.success {
            return Err(self.rejected(endpoint, envelope.message));
        }

        Ok(envelope.data)
    }

    fn rejected(&self, endpoint: Endpoint, message: Option<String>) -> ClientError {
        let message = self.message_or_default(message);
        match endpoint {
            Endpoint::Auth => ClientError::Auth(message),
            Endpoint::Session => ClientError::Rejected(message),
        }
    }

    fn message_or_default(&self, message: Option<String>) -> String {
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.locale.generic_error().to_string())
    }
}

fn missing_data(path: &str) -> ClientError {
    ClientError::Parse(format!("{} returned no data", path))
}

#[async_trait]
impl MonitoringApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginData, ClientError> {
        const PATH: &str = "/api/auth/login";
        let request = self.request(Method::POST, PATH).json(credentials);
        self.call(PATH, request, Endpoint::Auth)
            .await?
            .ok_or_else(|| missing_data(PATH))
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile, ClientError> {
        const PATH: &str = "/api/auth/register";
        let request = self.request(Method::POST, PATH).json(registration);
        self.call(PATH, request, Endpoint::Auth)
            .await?
            .ok_or_else(|| missing_data(PATH))
    }

    async fn logout(&self) -> Result<(), ClientError> {
        const PATH: &str = "/api/auth/logout";
        let request = self.request(Method::POST, PATH);
        self.call::<serde_json::Value>(PATH, request, Endpoint::Session)
            .await
            .map(|_| ())
    }

    async fn profile(&self) -> Result<UserProfile, ClientError> {
        const PATH: &str = "/api/auth/profile";
        if self.store.token().is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        let request = self.request(Method::GET, PATH);
        self.call(PATH, request, Endpoint::Session)
            .await?
            .ok_or_else(|| missing_data(PATH))
    }

    async fn latest_reading(&self) -> Result<Option<Reading>, ClientError> {
        const PATH: &str = "/api/data/latest";
        let request = self.request(Method::GET, PATH);
        self.call(PATH, request, Endpoint::Session).await
    }

    async fn history(&self) -> Result<Vec<Reading>, ClientError> {
        const PATH: &str = "/api/data/all";
        let request = self.request(Method::GET, PATH);
        Ok(self
            .call(PATH, request, Endpoint::Session)
            .await?
            .unwrap_or_default())
    }

    async fn notifications(&self) -> Result<Vec<Reading>, ClientError> {
        const PATH: &str = "/api/data/notifications";
        let request = self.request(Method::GET, PATH);
        Ok(self
            .call(PATH, request, Endpoint::Session)
            .await?
            .unwrap_or_default())
    }
}

/// Builder for [`HttpApi`].
#[derive(Debug, Default)]
pub struct HttpApiBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    store: Option<Arc<dyn SessionStore>>,
    events: Option<AuthEvents>,
    locale: Option<Locale>,
}

impl HttpApiBuilder {
    /// Set the backend base URL (default: `http://localhost:5000`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The store the bearer token is read from.
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The bus unauthorized responses are published on.
    pub fn events(mut self, events: AuthEvents) -> Self {
        self.events = Some(events);
        self
    }

    /// Language of the fallback error message.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpApi, ClientError> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpApi {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            events: self.events.unwrap_or_default(),
            locale: self.locale.unwrap_or_default(),
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
