//! Session handling: persisted state, token decoding and the manager that
//! ties them to the backend.

mod manager;
mod store;
mod token;

pub use manager::{CurrentUser, Session, SessionManager};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError, TOKEN_KEY, USER_KEY};
pub use token::{decode_claims, Claims, TokenError};
