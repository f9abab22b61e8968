//! Authentication primitives: login credentials, passwords, and the
//! authenticated principal.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{ContactNumber, EmailAddress, Error, UserId, UserRole};

/// Domain error returned when login or password values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Identifier was missing or blank once trimmed.
    EmptyIdentifier,
    /// Identifier was neither an email nor a contact number.
    MalformedIdentifier,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "identifier must not be empty"),
            Self::MalformedIdentifier => {
                write!(f, "identifier must be an email address or contact number")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Account lookup key supplied at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(EmailAddress),
    ContactNumber(ContactNumber),
}

impl LoginIdentifier {
    /// Classify raw input: anything containing `@` is treated as an email.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::LoginIdentifier;
    ///
    /// let id = LoginIdentifier::parse("9876543210").expect("contact number");
    /// assert!(matches!(id, LoginIdentifier::ContactNumber(_)));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, LoginValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }
        if trimmed.contains('@') {
            EmailAddress::new(trimmed)
                .map(Self::Email)
                .map_err(|_| LoginValidationError::MalformedIdentifier)
        } else {
            ContactNumber::new(trimmed)
                .map(Self::ContactNumber)
                .map_err(|_| LoginValidationError::MalformedIdentifier)
        }
    }
}

/// Caller-supplied plaintext password, zeroed on drop.
///
/// Whitespace is preserved so credential comparisons are not surprising.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password.
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        if raw.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Validated login credentials used by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: LoginIdentifier,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, LoginValidationError> {
        Ok(Self {
            identifier: LoginIdentifier::parse(identifier)?,
            password: Password::new(password)?,
        })
    }

    /// Account lookup key.
    #[must_use]
    pub fn identifier(&self) -> &LoginIdentifier {
        &self.identifier
    }

    /// Password provided by the caller.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    /// Whether the caller is a platform administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Reject callers that are not administrators.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrator role required"))
        }
    }

    /// Allow the owner of a record or any administrator.
    pub fn require_owner_or_admin(&self, owner: &UserId) -> Result<(), Error> {
        if self.is_admin() || self.user_id == *owner {
            Ok(())
        } else {
            Err(Error::forbidden("you do not own this resource"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("+919876543210", false)]
    fn identifier_is_classified_by_at_sign(#[case] raw: &str, #[case] is_email: bool) {
        let parsed = LoginIdentifier::parse(raw).expect("valid identifier");
        assert_eq!(matches!(parsed, LoginIdentifier::Email(_)), is_email);
    }

    #[rstest]
    #[case("", LoginValidationError::EmptyIdentifier)]
    #[case("   ", LoginValidationError::EmptyIdentifier)]
    #[case("ada@", LoginValidationError::MalformedIdentifier)]
    #[case("12ab", LoginValidationError::MalformedIdentifier)]
    fn identifier_rejects_bad_input(#[case] raw: &str, #[case] expected: LoginValidationError) {
        assert_eq!(LoginIdentifier::parse(raw), Err(expected));
    }

    #[rstest]
    fn credentials_reject_empty_password() {
        let result = LoginCredentials::try_from_parts("ada@example.com", "");
        assert_eq!(result, Err(LoginValidationError::EmptyPassword));
    }

    #[rstest]
    fn password_keeps_whitespace_and_redacts_debug() {
        let password = Password::new(" secret ").expect("non-empty");
        assert_eq!(password.expose(), " secret ");
        assert_eq!(format!("{password:?}"), "Password(..)");
    }

    #[rstest]
    #[case(UserRole::Admin, true)]
    #[case(UserRole::Seller, false)]
    #[case(UserRole::EndUser, false)]
    fn only_admins_pass_admin_check(#[case] role: UserRole, #[case] allowed: bool) {
        let actor = Actor {
            user_id: UserId::random(),
            role,
        };
        assert_eq!(actor.require_admin().is_ok(), allowed);
    }

    #[rstest]
    fn owner_check_allows_owner_and_admin_only() {
        let owner = UserId::random();
        let me = Actor {
            user_id: owner,
            role: UserRole::Seller,
        };
        let stranger = Actor {
            user_id: UserId::random(),
            role: UserRole::Seller,
        };
        let admin = Actor {
            user_id: UserId::random(),
            role: UserRole::Admin,
        };

        assert!(me.require_owner_or_admin(&owner).is_ok());
        assert!(admin.require_owner_or_admin(&owner).is_ok());
        let denied = stranger
            .require_owner_or_admin(&owner)
            .expect_err("stranger is rejected");
        assert_eq!(denied.code(), ErrorCode::Forbidden);
    }
}
