//! HS256 JWT implementation of the token codec port.
//!
//! Expiry is deliberately not validated here: the account service compares
//! `exp` against its injectable clock so expiry is testable.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{TokenClaims, TokenKind, UserId, UserRole};

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Signing secret was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("jwt secret must be at least {MIN_SECRET_LEN} bytes, got {actual}")]
pub struct JwtSecretError {
    pub actual: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: Uuid,
    role: UserRole,
    iat: i64,
    exp: i64,
    jti: Uuid,
    token_type: TokenKind,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Build a codec from `secret`, which must be at least
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: &Zeroizing<String>) -> Result<Self, JwtSecretError> {
        let bytes = secret.as_bytes();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(JwtSecretError {
                actual: bytes.len(),
            });
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        })
    }
}

fn timestamp(field: &str, secs: i64) -> Result<DateTime<Utc>, TokenCodecError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TokenCodecError::invalid(format!("{field} is out of range")))
}

impl TokenCodec for JwtTokenCodec {
    fn encode(&self, claims: &TokenClaims) -> Result<String, TokenCodecError> {
        let wire = WireClaims {
            sub: *claims.user_id.as_uuid(),
            role: claims.role,
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            jti: claims.token_id,
            token_type: claims.kind,
        };
        encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|error| TokenCodecError::encoding(error.to_string()))
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError> {
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|error| TokenCodecError::invalid(error.to_string()))?;
        let wire = data.claims;
        Ok(TokenClaims {
            user_id: UserId::from_uuid(wire.sub),
            role: wire.role,
            kind: wire.token_type,
            issued_at: timestamp("iat", wire.iat)?,
            expires_at: timestamp("exp", wire.exp)?,
            token_id: wire.jti,
        })
    }
}
