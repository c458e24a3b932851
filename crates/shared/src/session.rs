//! Session credential storage and entry-point navigation.
//!
//! The attendance client never owns a login flow; the host shell hands it a
//! bearer token and decides what "navigate to the entry point" means. Both
//! sides of that contract live here so every crate can speak it.

use std::sync::RwLock;

/// Provides and clears the bearer credential attached to API requests.
pub trait SessionStore: Send + Sync {
    /// The current bearer token, if a session exists.
    fn bearer_token(&self) -> Option<String>;

    /// Drops the stored credential. Called when the backend rejects it.
    fn clear(&self);
}

/// Navigation hooks for session-expiry handling.
///
/// `redirect_to_entry` is only invoked when the host is not already at the
/// entry point, which is what prevents redirect loops.
pub trait Navigator: Send + Sync {
    /// Whether the host currently shows the application entry point.
    fn at_entry(&self) -> bool;

    /// Navigate the host to the application entry point.
    fn redirect_to_entry(&self);
}

/// In-memory session store.
///
/// Hosts with durable credential storage implement [`SessionStore`] over it;
/// this impl covers embedded use and tests.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("session lock poisoned") = Some(token.into());
    }
}

impl SessionStore for MemorySession {
    fn bearer_token(&self) -> Option<String> {
        self.token.read().expect("session lock poisoned").clone()
    }

    fn clear(&self) {
        *self.token.write().expect("session lock poisoned") = None;
    }
}
