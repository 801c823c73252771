//! In-memory backend for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use pondwatch_types::Reading;

use crate::{ClientError, Credentials, LoginData, MonitoringApi, Registration, UserId, UserProfile};

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    email: String,
    password: String,
    failure: Mutex<Option<ClientError>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    readings: Mutex<Vec<Reading>>,
}

impl FakeApi {
    /// A backend with a single account.
    pub(crate) fn accepting(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with `err`.
    pub(crate) fn fail_with(&self, err: ClientError) {
        *self.failure.lock() = Some(err);
    }

    pub(crate) fn calls(&self, name: &str) -> usize {
        self.calls.lock().get(name).copied().unwrap_or(0)
    }

    fn enter(&self, name: &'static str) -> Result<(), ClientError> {
        *self.calls.lock().entry(name).or_default() += 1;
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn user(&self) -> UserProfile {
        UserProfile {
            id: Some(UserId::Number(1)),
            name: Some("Sari".into()),
            email: self.email.clone(),
            role: Some("user".into()),
            extra: Default::default(),
        }
    }

    fn token(&self) -> String {
        let claims = serde_json::json!({ "id": 1, "email": self.email, "role": "user" });
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.sig",
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }
}

#[async_trait]
impl MonitoringApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginData, ClientError> {
        self.enter("login")?;
        if credentials.email != self.email || credentials.password != self.password {
            return Err(ClientError::Auth("Email atau password salah".into()));
        }
        Ok(LoginData {
            token: self.token(),
            user: self.user(),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile, ClientError> {
        self.enter("register")?;
        if registration.email == self.email {
            return Err(ClientError::Auth("Email sudah terdaftar".into()));
        }
        Ok(UserProfile {
            id: Some(UserId::Number(2)),
            name: Some(registration.name.clone()),
            email: registration.email.clone(),
            role: Some("user".into()),
            extra: Default::default(),
        })
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.enter("logout")
    }

    async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.enter("profile")?;
        Ok(self.user())
    }

    async fn latest_reading(&self) -> Result<Option<Reading>, ClientError> {
        self.enter("latest_reading")?;
        Ok(self.readings.lock().last().cloned())
    }

    async fn history(&self) -> Result<Vec<Reading>, ClientError> {
        self.enter("history")?;
        Ok(self.readings.lock().clone())
    }

    async fn notifications(&self) -> Result<Vec<Reading>, ClientError> {
        self.enter("notifications")?;
        Ok(self.readings.lock().clone())
    }
}
