//! Admin session store
//!
//! Tokens are 32 random bytes, hex encoded. Sessions live in memory only,
//! so a restart logs every admin out.

use std::time::Duration;

use dashmap::DashMap;
use rand::RngCore;
use shared::util::now_millis;
use thiserror::Error;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "admin_session";

/// A live admin session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub created_at: i64,
    /// Unix millis
    pub expires_at: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no such session")]
    Missing,
    #[error("session expired")]
    Expired,
}

/// Token -> session map with a fixed time-to-live
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh session
    pub fn create(&self) -> Session {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);

        let now = now_millis();
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let session = Session {
            token: hex::encode(bytes),
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Look up a token; expired sessions are dropped on sight
    pub fn validate(&self, token: &str) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .get(token)
            .map(|s| s.clone())
            .ok_or(SessionError::Missing)?;

        if now_millis() >= session.expires_at {
            self.sessions.remove(token);
            return Err(SessionError::Expired);
        }
        Ok(session)
    }

    /// Returns false if the token was unknown
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = now_millis();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
