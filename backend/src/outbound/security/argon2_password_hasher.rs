//! Argon2id implementation of the password hashing port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

/// Hashes passwords into PHC strings with a random per-password salt.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|error| PasswordHashError::malformed_digest(error.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(PasswordHashError::hashing(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("non-empty password")
    }

    #[rstest]
    fn verifies_the_original_password(hasher: Argon2PasswordHasher) {
        let digest = hasher.hash(&password("s3cret-pass")).expect("hash");
        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&password("s3cret-pass"), &digest).expect("verify"));
        assert!(!hasher.verify(&password("wrong"), &digest).expect("verify"));
    }

    #[rstest]
    fn salts_each_hash(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("same")).expect("hash");
        let second = hasher.hash(&password("same")).expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn rejects_malformed_digests(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&password("x"), &PasswordDigest::new("not-a-phc-string"))
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedDigest { .. }));
    }
}
