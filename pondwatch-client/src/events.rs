//! Auth event bus.
//!
//! The HTTP layer publishes [`AuthEvent::Unauthorized`] whenever any call comes
//! back with `401`; the session layer subscribes, clears the stored session and
//! publishes [`AuthEvent::SessionCleared`], which the monitor and presentation
//! layers treat as "stop polling, go to login".

use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 16;

/// Something that happened to the client's authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A request was answered with an unauthorized status.
    Unauthorized { path: String },
    /// The local session was torn down.
    SessionCleared { reason: ClearReason },
}

/// Why a session was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    Logout,
    Unauthorized,
}

/// Cloneable publisher/subscriber handle for [`AuthEvent`]s.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
