//! In-memory session registry.
//!
//! Opaque high-entropy tokens mapped to expiry instants. Expiry is lazy:
//! an expired token is evicted the first time it is validated, there is no
//! background sweep. The registry knows nothing about entries; it is an
//! independent namespace injected into the router state.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::slug::{self, RandomnessUnavailable};

const TOKEN_BYTES: usize = 32;

/// Session token table with a fixed time-to-live.
pub struct SessionRegistry {
    ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionRegistry {
    /// Registry with the production TTL of 24 hours.
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(24))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a new token and register it. Fails rather than ever handing out
    /// a token built from anything weaker than the OS CSPRNG.
    pub async fn create(&self) -> Result<(String, DateTime<Utc>), RandomnessUnavailable> {
        let mut buf = [0u8; TOKEN_BYTES];
        slug::fill_random(&mut buf)?;
        let token = URL_SAFE_NO_PAD.encode(buf);
        let expires = Utc::now() + self.ttl;

        self.sessions.write().await.insert(token.clone(), expires);
        debug!(expires = %expires, "session created");
        Ok((token, expires))
    }

    /// True iff the token is registered and not yet expired.
    pub async fn validate(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let expired = {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return false,
                Some(expiry) => Utc::now() > *expiry,
            }
        };
        if expired {
            self.remove(token).await;
            return false;
        }
        true
    }

    /// Idempotent removal; no-op for empty or unknown tokens.
    pub async fn remove(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        self.sessions.write().await.remove(token);
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_validates_until_removed() {
        let registry = SessionRegistry::new();
        let (token, expires) = registry.create().await.unwrap();

        assert!(expires > Utc::now());
        assert!(registry.validate(&token).await);

        registry.remove(&token).await;
        assert!(!registry.validate(&token).await);
        // Removing again is a no-op.
        registry.remove(&token).await;
    }

    #[tokio::test]
    async fn expired_token_is_lazily_evicted() {
        let registry = SessionRegistry::with_ttl(Duration::seconds(-1));
        let (token, _) = registry.create().await.unwrap();

        assert!(!registry.validate(&token).await);
        // Eviction happened: the table no longer holds the token.
        assert!(registry.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn empty_and_unknown_tokens_are_invalid() {
        let registry = SessionRegistry::new();
        assert!(!registry.validate("").await);
        assert!(!registry.validate("no-such-token").await);
    }

    #[tokio::test]
    async fn tokens_are_high_entropy_and_distinct() {
        let registry = SessionRegistry::new();
        let (a, _) = registry.create().await.unwrap();
        let (b, _) = registry.create().await.unwrap();
        assert_ne!(a, b);
        // 32 bytes base64url without padding.
        assert_eq!(a.len(), 43);
    }
}
