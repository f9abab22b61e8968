//! Port for signing and verifying bearer tokens.

use crate::domain::TokenClaims;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenCodecError {
        /// Signing failed.
        Encoding { message: String } => "token encoding failed: {message}",
        /// The token is malformed, tampered with, or carries bad claims.
        Invalid { message: String } => "token is invalid: {message}",
    }
}

/// Signs claims into compact tokens and verifies them back.
///
/// Expiry is *not* checked here; callers compare `expires_at` against their
/// clock so tests can control time.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenCodecError>;

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError>;
}
