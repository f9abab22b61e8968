//! Bearer token claims and revocation fingerprints.
//!
//! Access tokens authorise API calls; refresh tokens only mint new access
//! tokens. Revoked tokens are remembered by [`TokenDigest`], never verbatim.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{UserId, UserRole};

/// Purpose of a token, carried in the `token_type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// Decoded, signature-checked token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub role: UserRole,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token_id: Uuid,
}

impl TokenClaims {
    /// Claims for a freshly issued token.
    #[must_use]
    pub fn issue(
        user_id: UserId,
        role: UserRole,
        kind: TokenKind,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            user_id,
            role,
            kind,
            issued_at: now,
            expires_at: now + ttl,
            token_id: Uuid::new_v4(),
        }
    }

    /// Whether the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Encoded token together with its claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Access/refresh pair returned at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Lifetimes applied when issuing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::hours(1),
            refresh: Duration::days(1),
        }
    }
}

/// SHA-256 hex fingerprint of a raw token, used as the revocation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Fingerprint a raw token string.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::TokenDigest;
    ///
    /// let digest = TokenDigest::of("abc");
    /// assert_eq!(digest.as_str().len(), 64);
    /// ```
    #[must_use]
    pub fn of(token: &str) -> Self {
        Self(hex::encode(Sha256::digest(token.as_bytes())))
    }

    /// Rehydrate a stored digest.
    #[must_use]
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Lowercase hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn digest_matches_known_sha256() {
        assert_eq!(
            TokenDigest::of("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[rstest]
    fn issue_sets_expiry_from_ttl() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        let claims = TokenClaims::issue(
            UserId::random(),
            UserRole::EndUser,
            TokenKind::Access,
            now,
            Duration::minutes(5),
        );
        assert_eq!(claims.expires_at - claims.issued_at, Duration::minutes(5));
        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::minutes(5)));
    }

    #[rstest]
    fn issued_tokens_get_distinct_ids() {
        let now = Utc::now();
        let user = UserId::random();
        let first = TokenClaims::issue(user, UserRole::Admin, TokenKind::Refresh, now, Duration::days(1));
        let second = TokenClaims::issue(user, UserRole::Admin, TokenKind::Refresh, now, Duration::days(1));
        assert_ne!(first.token_id, second.token_id);
    }
}
