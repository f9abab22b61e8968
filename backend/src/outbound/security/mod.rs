//! Security adapters: password hashing and bearer-token signing.

mod argon2_password_hasher;
mod jwt_token_codec;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_codec::{JwtSecretError, JwtTokenCodec, MIN_SECRET_LEN};
