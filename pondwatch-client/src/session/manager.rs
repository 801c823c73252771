//! Session lifecycle: login, restore, profile sync, logout and forced expiry.

use std::sync::{Arc, Weak};

use pondwatch_types::Locale;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::store::SessionStore;
use super::token::{decode_claims, Claims};
use crate::events::{AuthEvent, AuthEvents, ClearReason};
use crate::{ClientError, Credentials, MonitoringApi, Registration, UserProfile};

/// An established session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    /// Claims decoded from the token; `None` if the token is opaque.
    pub claims: Option<Claims>,
    /// The last profile confirmed by the backend.
    pub profile: Option<UserProfile>,
}

/// Who is logged in, from the best source available.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentUser {
    /// Freshly synced from the backend.
    Profile(UserProfile),
    /// Decoded locally from the token because the sync failed.
    Claims(Claims),
}

/// Owns the token lifecycle. The only writer of the [`SessionStore`].
#[derive(Debug)]
pub struct SessionManager {
    api: Arc<dyn MonitoringApi>,
    store: Arc<dyn SessionStore>,
    events: AuthEvents,
    locale: Locale,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn MonitoringApi>,
        store: Arc<dyn SessionStore>,
        events: AuthEvents,
    ) -> Self {
        Self {
            api,
            store,
            events,
            locale: Locale::default(),
        }
    }

    /// Set the language for locally generated error messages.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// A token is stored. It may still be rejected by the backend.
    pub fn is_authenticated(&self) -> bool {
        self.store.token().is_some()
    }

    /// Decode the persisted token without touching the network.
    ///
    /// Returns `None` when there is no token or it cannot be decoded.
    pub fn restore_session(&self) -> Option<Claims> {
        let token = self.store.token()?;
        match decode_claims(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Stored token could not be decoded: {}", e);
                None
            }
        }
    }

    /// The full stored session, if any.
    pub fn current_session(&self) -> Option<Session> {
        let token = self.store.token()?;
        let claims = decode_claims(&token).ok();
        Some(Session {
            token,
            claims,
            profile: self.store.profile(),
        })
    }

    /// Authenticate and persist the returned token and user.
    ///
    /// Every failure is reported as [`ClientError::Auth`] carrying the server
    /// message, or a generic message when the server gave none.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let data = self
            .api
            .login(credentials)
            .await
            .map_err(|e| self.as_auth_error(e))?;

        if let Err(e) = self.store.set_token(&data.token) {
            warn!("Token could not be persisted: {}", e);
        }
        if let Err(e) = self.store.set_profile(&data.user) {
            warn!("Profile could not be persisted: {}", e);
        }

        info!("Logged in as {}", data.user.email);

        Ok(Session {
            claims: decode_claims(&data.token).ok(),
            token: data.token,
            profile: Some(data.user),
        })
    }

    /// Create an account. Does not establish a session; on success the
    /// caller should send the user to login.
    pub async fn register(&self, registration: &Registration) -> Result<UserProfile, ClientError> {
        if !registration.passwords_match() {
            return Err(ClientError::Auth(self.locale.password_mismatch().to_string()));
        }

        let user = self
            .api
            .register(registration)
            .await
            .map_err(|e| self.as_auth_error(e))?;

        info!("Registered {}", user.email);
        Ok(user)
    }

    /// Refresh the stored profile from the backend.
    ///
    /// On any failure the stored profile is dropped and `None` is returned;
    /// the session itself stays. A rejected token is handled separately by
    /// the expiry listener.
    pub async fn sync_profile(&self) -> Option<UserProfile> {
        if !self.is_authenticated() {
            return None;
        }

        match self.api.profile().await {
            Ok(profile) => {
                if let Err(e) = self.store.set_profile(&profile) {
                    warn!("Profile could not be persisted: {}", e);
                }
                Some(profile)
            }
            Err(e) => {
                warn!("Profile sync failed: {}", e);
                if let Err(e) = self.store.clear_profile() {
                    warn!("Stale profile could not be removed: {}", e);
                }
                None
            }
        }
    }

    /// Resolve the current user on navigation: synced profile first, token
    /// claims as fallback.
    pub async fn on_navigate(&self) -> Option<CurrentUser> {
        if !self.is_authenticated() {
            return None;
        }

        match self.sync_profile().await {
            Some(profile) => Some(CurrentUser::Profile(profile)),
            None => self.restore_session().map(CurrentUser::Claims),
        }
    }

    /// Invalidate the session on the server (best effort) and clear it
    /// locally regardless of the outcome.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!("Logout request failed: {}", e);
        }
        self.clear_session(ClearReason::Logout);
    }

    /// Drop the local token and profile and announce it.
    pub fn clear_session(&self, reason: ClearReason) {
        if let Err(e) = self.store.clear() {
            warn!("Session could not be cleared from storage: {}", e);
        }
        info!("Session cleared ({:?})", reason);
        self.events.emit(AuthEvent::SessionCleared { reason });
    }

    /// Listen for unauthorized responses from any endpoint and force the
    /// session clear. The task ends when the manager is dropped.
    pub fn spawn_expiry_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.events.subscribe();
        let manager: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(AuthEvent::Unauthorized { path }) => {
                        let Some(manager) = manager.upgrade() else {
                            break;
                        };
                        warn!("Unauthorized response from {}, clearing session", path);
                        manager.clear_session(ClearReason::Unauthorized);
                    }
                    Ok(AuthEvent::SessionCleared { .. }) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Expiry listener lagged by {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn as_auth_error(&self, err: ClientError) -> ClientError {
        match err {
            ClientError::Auth(message) => ClientError::Auth(message),
            other => {
                warn!("Auth request failed: {}", other);
                ClientError::Auth(self.locale.generic_error().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemorySessionStore, USER_KEY};
    use crate::testing::FakeApi;
    use crate::UserId;
    use std::time::Duration;

    fn manager(api: FakeApi) -> (SessionManager, Arc<MemorySessionStore>, Arc<FakeApi>) {
        let api = Arc::new(api);
        let store = Arc::new(MemorySessionStore::new());
        let manager = SessionManager::new(api.clone(), store.clone(), AuthEvents::new());
        (manager, store, api)
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let (manager, store, _) = manager(FakeApi::accepting("sari@tambak.id", "rahasia"));

        let session = manager
            .login(&Credentials::new("sari@tambak.id", "rahasia"))
            .await
            .unwrap();

        assert_eq!(store.token(), Some(session.token.clone()));
        assert_eq!(store.profile().unwrap().email, "sari@tambak.id");
        assert_eq!(
            session.claims.unwrap().email.as_deref(),
            Some("sari@tambak.id")
        );
        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn login_failure_carries_server_message() {
        let (manager, store, _) = manager(FakeApi::accepting("sari@tambak.id", "rahasia"));

        let err = manager
            .login(&Credentials::new("sari@tambak.id", "salah"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Auth(ref m) if m == "Email atau password salah"));
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn login_network_failure_uses_generic_message() {
        let api = FakeApi::accepting("a@b.c", "pw");
        api.fail_with(ClientError::Network("connection refused".into()));
        let (manager, _, _) = manager(api);

        let err = manager.login(&Credentials::new("a@b.c", "pw")).await.unwrap_err();
        assert_eq!(err.to_string(), "Terjadi kesalahan");
    }

    #[tokio::test]
    async fn register_rejects_mismatched_confirmation_locally() {
        let (manager, _, api) = manager(FakeApi::accepting("a@b.c", "pw"));
        let manager = manager.with_locale(Locale::English);

        let err = manager
            .register(&Registration::new("A", "new@b.c", "pw1", "pw2"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), Locale::English.password_mismatch());
        assert_eq!(api.calls("register"), 0);
    }

    #[tokio::test]
    async fn register_does_not_create_session() {
        let (manager, store, _) = manager(FakeApi::accepting("a@b.c", "pw"));

        let user = manager
            .register(&Registration::new("Dewi", "dewi@b.c", "pw", "pw"))
            .await
            .unwrap();

        assert_eq!(user.name.as_deref(), Some("Dewi"));
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn register_conflict_is_auth_error() {
        let (manager, _, _) = manager(FakeApi::accepting("a@b.c", "pw"));

        let err = manager
            .register(&Registration::new("A", "a@b.c", "pw", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Auth(ref m) if m == "Email sudah terdaftar"));
    }

    #[test]
    fn restore_session_with_garbage_token_is_none() {
        let (manager, store, _) = manager(FakeApi::accepting("a@b.c", "pw"));
        store.set_token("definitely.not-a.jwt!").unwrap();

        assert!(manager.restore_session().is_none());
        assert!(manager.is_authenticated());
    }

    #[test]
    fn restore_session_without_token_is_none() {
        let (manager, _, _) = manager(FakeApi::accepting("a@b.c", "pw"));
        assert!(manager.restore_session().is_none());
        assert!(manager.current_session().is_none());
    }

    #[tokio::test]
    async fn sync_profile_updates_store() {
        let (manager, store, _) = manager(FakeApi::accepting("a@b.c", "pw"));
        manager.login(&Credentials::new("a@b.c", "pw")).await.unwrap();

        let profile = manager.sync_profile().await.unwrap();
        assert_eq!(profile.role.as_deref(), Some("user"));
        assert_eq!(store.profile(), Some(profile));
    }

    #[tokio::test]
    async fn sync_failure_clears_profile_but_keeps_session() {
        let (manager, store, api) = manager(FakeApi::accepting("a@b.c", "pw"));
        manager.login(&Credentials::new("a@b.c", "pw")).await.unwrap();
        api.fail_with(ClientError::Timeout);

        assert!(manager.sync_profile().await.is_none());
        assert!(store.profile().is_none());
        assert!(store.token().is_some());

        match manager.on_navigate().await {
            Some(CurrentUser::Claims(claims)) => {
                assert_eq!(claims.user_id, Some(UserId::Number(1)))
            }
            other => panic!("expected claims fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sync_without_session_does_nothing() {
        let (manager, _, api) = manager(FakeApi::accepting("a@b.c", "pw"));
        assert!(manager.sync_profile().await.is_none());
        assert!(manager.on_navigate().await.is_none());
        assert_eq!(api.calls("profile"), 0);
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_fails() {
        let (manager, store, api) = manager(FakeApi::accepting("a@b.c", "pw"));
        manager.login(&Credentials::new("a@b.c", "pw")).await.unwrap();
        let mut events = manager.events().subscribe();
        api.fail_with(ClientError::Network("offline".into()));

        manager.logout().await;

        assert!(store.token().is_none());
        assert!(store.profile().is_none());
        assert_eq!(api.calls("logout"), 1);
        assert_eq!(
            events.recv().await.unwrap(),
            AuthEvent::SessionCleared {
                reason: ClearReason::Logout
            }
        );
    }

    #[tokio::test]
    async fn unauthorized_event_forces_clear() {
        let (manager, store, _) = manager(FakeApi::accepting("a@b.c", "pw"));
        let manager = Arc::new(manager);
        manager.login(&Credentials::new("a@b.c", "pw")).await.unwrap();
        store.insert_raw(USER_KEY, r#"{"email":"a@b.c"}"#);

        let mut events = manager.events().subscribe();
        let listener = manager.spawn_expiry_listener();

        manager.events().emit(AuthEvent::Unauthorized {
            path: "/api/data/all".into(),
        });

        let cleared = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if let Ok(AuthEvent::SessionCleared { reason }) = events.recv().await {
                    return reason;
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(cleared, ClearReason::Unauthorized);
        assert!(store.token().is_none());
        assert!(store.profile().is_none());
        listener.abort();
    }
}
