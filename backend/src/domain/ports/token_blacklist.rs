//! Port for the revoked-token log consulted on every authenticated request.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::TokenDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blacklist adapters.
    pub enum TokenBlacklistError {
        /// Store connection could not be established.
        Connection { message: String } => "token blacklist connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token blacklist query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Record a revoked token. Revoking twice is not an error.
    async fn revoke(
        &self,
        digest: &TokenDigest,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistError>;

    async fn is_revoked(&self, digest: &TokenDigest) -> Result<bool, TokenBlacklistError>;
}
