//! The backend contract.
//!
//! [`MonitoringApi`] is the seam between the pipeline and the network: the
//! session manager and dashboard store only ever talk to this trait, so tests
//! can substitute an in-memory backend.

use std::fmt;

use async_trait::async_trait;
use pondwatch_types::Reading;
use serde::{Deserialize, Serialize};

use crate::ClientError;

/// Operations exposed by the monitoring backend.
///
/// | Method | Endpoint |
/// |---|---|
/// | `login` | `POST /api/auth/login` |
/// | `register` | `POST /api/auth/register` |
/// | `logout` | `POST /api/auth/logout` |
/// | `profile` | `GET /api/auth/profile` |
/// | `latest_reading` | `GET /api/data/latest` |
/// | `history` | `GET /api/data/all` |
/// | `notifications` | `GET /api/data/notifications` |
#[async_trait]
pub trait MonitoringApi: Send + Sync + fmt::Debug {
    async fn login(&self, credentials: &Credentials) -> Result<LoginData, ClientError>;

    async fn register(&self, registration: &Registration) -> Result<UserProfile, ClientError>;

    async fn logout(&self) -> Result<(), ClientError>;

    async fn profile(&self) -> Result<UserProfile, ClientError>;

    /// The most recent reading; `None` when the backend has none yet.
    async fn latest_reading(&self) -> Result<Option<Reading>, ClientError>;

    /// Up to the 100 most recent readings.
    async fn history(&self) -> Result<Vec<Reading>, ClientError>;

    /// Raw readings to be classified client-side into notifications.
    async fn notifications(&self) -> Result<Vec<Reading>, ClientError>;
}

/// Login form contents.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Registration form contents.
///
/// `confirm_password` is checked locally and never sent.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A user id as issued by the backend (numeric or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{}", n),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

/// The canonical user record returned by the backend.
///
/// Unknown fields are preserved so the persisted copy round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserProfile,
}
