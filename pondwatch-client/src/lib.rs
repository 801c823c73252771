//! # pondwatch-client
//!
//! Backend access and session handling for the pond monitoring dashboard.
//!
//! - [`MonitoringApi`] is the backend contract; [`HttpApi`] implements it
//!   over HTTP/JSON.
//! - [`SessionManager`] owns the token lifecycle and is the only writer of
//!   the [`SessionStore`].
//! - [`AuthEvents`] carries unauthorized responses from the HTTP layer to
//!   the session layer, and session teardown to everyone else.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pondwatch_client::{
//!     AuthEvents, Credentials, FileSessionStore, HttpApi, SessionManager, SessionStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open("session.json"));
//!     let events = AuthEvents::new();
//!     let api = HttpApi::builder()
//!         .base_url("http://localhost:5000")
//!         .store(store.clone())
//!         .events(events.clone())
//!         .build()?;
//!
//!     let sessions = SessionManager::new(Arc::new(api), store, events);
//!     let session = sessions.login(&Credentials::new("sari@tambak.id", "rahasia")).await?;
//!     println!("Logged in, claims: {:?}", session.claims);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod events;
pub mod http;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::{Credentials, LoginData, MonitoringApi, Registration, UserId, UserProfile};
pub use error::{ClientError, ErrorKind};
pub use events::{AuthEvent, AuthEvents, ClearReason};
pub use http::{HttpApi, HttpApiBuilder};
pub use session::{
    decode_claims, Claims, CurrentUser, FileSessionStore, MemorySessionStore, Session,
    SessionManager, SessionStore, StoreError, TokenError,
};

// Re-export types for convenience
pub use pondwatch_types::{Locale, Reading};
