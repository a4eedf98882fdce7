use crate::config::AuthConfig;
use crate::domain::session::{ActiveSession, IssuedSession};
use crate::error::Result;
use crate::storage::session_repo::SessionRepository;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Opaque-token authentication with server-side revocable state. Validity
/// always requires a store lookup, so revocation takes effect immediately;
/// the token itself carries no claims.
#[derive(Debug, Clone)]
pub struct SessionService {
    config: AuthConfig,
    session_repo: SessionRepository,
}

impl SessionService {
    #[must_use]
    pub const fn new(config: AuthConfig, session_repo: SessionRepository) -> Self {
        Self { config, session_repo }
    }

    /// Issues a fresh session for the user and persists it. The raw token
    /// is returned exactly once, for the cookie; only its hash is stored.
    #[tracing::instrument(err, skip(self), fields(user_id = %user_id))]
    pub async fn create_session(&self, user_id: Uuid) -> Result<IssuedSession> {
        let token = generate_opaque_token();
        let token_hash = hash_opaque_token(&token);
        let expires_at = Utc::now() + Duration::days(self.config.session_ttl_days);

        self.session_repo.create(&token_hash, user_id, expires_at).await?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Resolves a bearer token to its session and owning user.
    ///
    /// Expiry is lazy: an expired row is deleted here, during the lookup
    /// that found it, rather than by a background sweep. Expired or unknown
    /// tokens both come back as `None`.
    #[tracing::instrument(skip(self, token), fields(user_id = tracing::field::Empty))]
    pub async fn get_session(&self, token: &str) -> Result<Option<ActiveSession>> {
        let token_hash = hash_opaque_token(token);

        let Some(active) = self.session_repo.find_with_user(&token_hash).await? else {
            return Ok(None);
        };

        if is_expired(active.session.expires_at, Utc::now()) {
            tracing::debug!("Removing expired session found during lookup");
            self.session_repo.delete_by_token(&token_hash).await?;
            return Ok(None);
        }

        tracing::Span::current().record("user_id", tracing::field::display(active.session.user_id));
        Ok(Some(active))
    }

    /// Revokes every stored session matching the token. A no-op for tokens
    /// that are unknown or already gone.
    #[tracing::instrument(err, skip(self, token))]
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        let token_hash = hash_opaque_token(token);
        self.session_repo.delete_by_token(&token_hash).await?;
        Ok(())
    }
}

/// Whether a stored session is past its expiry. Strict comparison: a
/// session is valid through its exact `expires_at` instant and stale one
/// tick after, never the other way around.
fn is_expired(expires_at: chrono::DateTime<Utc>, now: chrono::DateTime<Utc>) -> bool {
    expires_at < now
}

fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_opaque_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_unpadded() {
        let token1 = generate_opaque_token();
        let token2 = generate_opaque_token();

        assert_ne!(token1, token2);
        // 32 bytes of entropy, URL-safe alphabet, no padding.
        assert_eq!(token1.len(), 43);
        assert!(!token1.contains('='));
        assert!(token1.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn expiry_is_strict_about_the_boundary() {
        let now = Utc::now();

        // A session whose expires_at has passed is stale and gets removed
        // on the lookup that finds it; one expiring in the future is valid.
        assert!(is_expired(now - Duration::seconds(1), now));
        assert!(is_expired(now - Duration::days(91), now));
        assert!(!is_expired(now + Duration::seconds(1), now));
        assert!(!is_expired(now + Duration::days(90), now));

        // The exact expiry instant is still valid; only strictly-past
        // sessions are treated as none.
        assert!(!is_expired(now, now));
    }

    #[test]
    fn token_hashing_is_deterministic() {
        let token = generate_opaque_token();
        assert_eq!(hash_opaque_token(&token), hash_opaque_token(&token));
        assert_ne!(hash_opaque_token(&token), hash_opaque_token("other"));
        // SHA-256 hex digest.
        assert_eq!(hash_opaque_token(&token).len(), 64);
    }
}
