//! Translation of driven-port failures into domain errors.
//!
//! Connection failures surface as `service_unavailable`, query failures as
//! `internal_error`, and uniqueness violations as `invalid_request` naming
//! the conflicting field.

use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{
    CategoryPersistenceError, HeroSectionPersistenceError, PasswordHashError,
    ProductPersistenceError, SellerPersistenceError, TokenBlacklistError, TokenCodecError,
    UserPersistenceError,
};

pub(crate) fn duplicate(field: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": "duplicate",
    }))
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        match error {
            UserPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Self::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::Duplicate { field } => {
                let message = format!("a user with this {field} already exists");
                duplicate(&field, message)
            }
        }
    }
}

impl From<SellerPersistenceError> for Error {
    fn from(error: SellerPersistenceError) -> Self {
        match error {
            SellerPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("seller repository unavailable: {message}"))
            }
            SellerPersistenceError::Query { message } => {
                Self::internal(format!("seller repository error: {message}"))
            }
            SellerPersistenceError::Duplicate { .. } => {
                duplicate("user_id", "user already has a seller profile")
            }
        }
    }
}

impl From<CategoryPersistenceError> for Error {
    fn from(error: CategoryPersistenceError) -> Self {
        match error {
            CategoryPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("category repository unavailable: {message}"))
            }
            CategoryPersistenceError::Query { message } => {
                Self::internal(format!("category repository error: {message}"))
            }
            CategoryPersistenceError::Duplicate { name } => duplicate(
                "name",
                format!("a category named {name} already exists for this seller"),
            ),
        }
    }
}

impl From<ProductPersistenceError> for Error {
    fn from(error: ProductPersistenceError) -> Self {
        match error {
            ProductPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("product repository unavailable: {message}"))
            }
            ProductPersistenceError::Query { message } => {
                Self::internal(format!("product repository error: {message}"))
            }
        }
    }
}

impl From<HeroSectionPersistenceError> for Error {
    fn from(error: HeroSectionPersistenceError) -> Self {
        match error {
            HeroSectionPersistenceError::Connection { message } => {
                Self::service_unavailable(format!("hero section repository unavailable: {message}"))
            }
            HeroSectionPersistenceError::Query { message } => {
                Self::internal(format!("hero section repository error: {message}"))
            }
        }
    }
}

impl From<TokenBlacklistError> for Error {
    fn from(error: TokenBlacklistError) -> Self {
        match error {
            TokenBlacklistError::Connection { message } => {
                Self::service_unavailable(format!("token blacklist unavailable: {message}"))
            }
            TokenBlacklistError::Query { message } => {
                Self::internal(format!("token blacklist error: {message}"))
            }
        }
    }
}

impl From<PasswordHashError> for Error {
    fn from(error: PasswordHashError) -> Self {
        Self::internal(error.to_string())
    }
}

impl From<TokenCodecError> for Error {
    fn from(error: TokenCodecError) -> Self {
        match error {
            TokenCodecError::Encoding { message } => {
                Self::internal(format!("token encoding failed: {message}"))
            }
            TokenCodecError::Invalid { .. } => Self::unauthorized("token is invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::connection("down").into(), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("syntax").into(), ErrorCode::InternalError)]
    #[case(UserPersistenceError::duplicate("email").into(), ErrorCode::InvalidRequest)]
    #[case(CategoryPersistenceError::duplicate("Chairs").into(), ErrorCode::InvalidRequest)]
    #[case(ProductPersistenceError::connection("down").into(), ErrorCode::ServiceUnavailable)]
    #[case(TokenBlacklistError::query("boom").into(), ErrorCode::InternalError)]
    #[case(TokenCodecError::invalid("bad signature").into(), ErrorCode::Unauthorized)]
    fn maps_port_errors_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn duplicates_name_the_field() {
        let error: Error = UserPersistenceError::duplicate("contact_number").into();
        assert_eq!(
            error.details(),
            Some(&json!({"field": "contact_number", "code": "duplicate"}))
        );
    }
}
