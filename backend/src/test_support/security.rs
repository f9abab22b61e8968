use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

const PREFIX: &str = "plain$";

/// Password hasher that stores passwords verbatim behind a marker prefix.
///
/// Argon2 is deliberately slow; this keeps service and HTTP suites fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        Ok(PasswordDigest::new(format!("{PREFIX}{}", password.expose())))
    }

    fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let Some(stored) = digest.as_str().strip_prefix(PREFIX) else {
            return Err(PasswordHashError::malformed_digest("missing plain$ prefix"));
        };
        Ok(stored == password.expose())
    }
}
