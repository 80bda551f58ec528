//! Authentication session.
//!
//! Holds the bearer token for the lifetime of the process. The session is
//! created at login, cleared at logout, and never persisted by the core;
//! persistence, if any, is an external collaborator's concern.
//!
//! # Security Note
//!
//! Implementations should ensure the token is never logged or exposed in
//! error messages.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;

/// Read-only view of the current authentication session.
///
/// The application layer reads `token` before constructing any query or
/// mutation and propagates it into the HTTP client; queries are disabled
/// while no token is present.
pub trait AuthSession: Send + Sync {
    /// Returns the current bearer token, if any.
    fn token(&self) -> Option<String>;

    /// Whether a token is currently held.
    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Interface for the remote login endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String>;
}

/// Process-lifetime in-memory session.
///
/// Suitable for a single-user client; a multi-session host would provide its
/// own [`AuthSession`] implementation.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<String>>,
}

impl MemorySession {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already holding a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Stores the token obtained at login.
    pub fn login(&self, token: impl Into<String>) {
        *self.token.write().expect("session lock poisoned") = Some(token.into());
    }

    /// Clears the token. In-flight requests are not cancelled; subsequent
    /// queries see an unauthenticated session and stop fetching.
    pub fn logout(&self) {
        *self.token.write().expect("session lock poisoned") = None;
    }
}

impl AuthSession for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.read().expect("session lock poisoned").clone()
    }
}
