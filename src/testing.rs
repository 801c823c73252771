//! In-memory backend for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use pondwatch_client::{
    AuthEvent, AuthEvents, ClientError, Credentials, LoginData, MonitoringApi, Registration,
    UserId, UserProfile,
};
use pondwatch_types::Reading;

/// A JWT-shaped token whose claims carry `email`.
pub(crate) fn token_for(email: &str) -> String {
    let claims = serde_json::json!({ "id": 1, "email": email, "role": "user" });
    format!(
        "eyJhbGciOiJIUzI1NiJ9.{}.sig",
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// Accepts any login and serves the readings pushed into it.
///
/// After [`FakeBackend::expire_session`] every authenticated call behaves
/// like a `401`: it publishes the unauthorized event and fails.
#[derive(Debug)]
pub(crate) struct FakeBackend {
    events: AuthEvents,
    readings: Mutex<Vec<Reading>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    expired: AtomicBool,
}

impl FakeBackend {
    pub(crate) fn new(events: AuthEvents) -> Self {
        Self {
            events,
            readings: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
            expired: AtomicBool::new(false),
        }
    }

    pub(crate) fn push_reading(&self, reading: Reading) {
        self.readings.lock().push(reading);
    }

    pub(crate) fn expire_session(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self, name: &str) -> usize {
        self.calls.lock().get(name).copied().unwrap_or(0)
    }

    fn enter(&self, name: &'static str, path: &str) -> Result<(), ClientError> {
        *self.calls.lock().entry(name).or_default() += 1;
        if self.expired.load(Ordering::SeqCst) {
            self.events.emit(AuthEvent::Unauthorized {
                path: path.to_string(),
            });
            return Err(ClientError::SessionExpired);
        }
        Ok(())
    }

    fn user(email: &str) -> UserProfile {
        UserProfile {
            id: Some(UserId::Number(1)),
            name: Some("Sari".into()),
            email: email.to_string(),
            role: Some("user".into()),
            extra: Default::default(),
        }
    }
}

#[async_trait]
impl MonitoringApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginData, ClientError> {
        *self.calls.lock().entry("login").or_default() += 1;
        Ok(LoginData {
            token: token_for(&credentials.email),
            user: Self::user(&credentials.email),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile, ClientError> {
        *self.calls.lock().entry("register").or_default() += 1;
        Ok(Self::user(&registration.email))
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.enter("logout", "/api/auth/logout")
    }

    async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.enter("profile", "/api/auth/profile")?;
        Ok(Self::user("sari@tambak.id"))
    }

    async fn latest_reading(&self) -> Result<Option<Reading>, ClientError> {
        self.enter("latest_reading", "/api/data/latest")?;
        Ok(self.readings.lock().last().cloned())
    }

    async fn history(&self) -> Result<Vec<Reading>, ClientError> {
        self.enter("history", "/api/data/all")?;
        Ok(self.readings.lock().clone())
    }

    async fn notifications(&self) -> Result<Vec<Reading>, ClientError> {
        self.enter("notifications", "/api/data/notifications")?;
        Ok(self.readings.lock().clone())
    }
}
