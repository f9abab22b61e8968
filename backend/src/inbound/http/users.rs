//! Account API handlers.
//!
//! ```text
//! POST /api/v1/signup {"first_name":"Ada",...}
//! POST /api/v1/login {"identifier":"ada@example.com","password":"..."}
//! POST /api/v1/token/refresh {"refresh_token":"..."}
//! POST /api/v1/logout {"refresh_token":"..."}
//! GET /api/v1/me
//! PUT /api/v1/update
//! PATCH /api/v1/deactivate?user_id=...
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AccountPatch, ContactNumber, EmailAddress, Error, FieldError, LoginCredentials,
    LoginValidationError, NewAccount, Password, PersonName, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    AccessTokenResponse, LoginResponse, MessageResponse, UserResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require, user_value_error};

/// Registration body for `POST /api/v1/signup`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "9876543210")]
    pub contact_number: Option<String>,
    pub password: Option<String>,
}

fn person_name(field: &'static str, raw: String) -> Result<PersonName, Error> {
    PersonName::new(raw).map_err(|err| user_value_error(field, &err))
}

fn email(raw: String) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| user_value_error("email", &err))
}

fn contact_number(raw: String) -> Result<ContactNumber, Error> {
    ContactNumber::new(raw).map_err(|err| user_value_error("contact_number", &err))
}

fn password(raw: &str) -> Result<Password, Error> {
    Password::new(raw).map_err(|_| FieldError::missing("password").into())
}

impl TryFrom<SignupRequest> for NewAccount {
    type Error = Error;

    fn try_from(value: SignupRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: person_name(
                "first_name",
                require(value.first_name, FieldName::new("first_name"))?,
            )?,
            last_name: person_name(
                "last_name",
                require(value.last_name, FieldName::new("last_name"))?,
            )?,
            email: email(require(value.email, FieldName::new("email"))?)?,
            contact_number: contact_number(require(
                value.contact_number,
                FieldName::new("contact_number"),
            )?)?,
            password: password(&require(value.password, FieldName::new("password"))?)?,
        })
    }
}

/// Login body for `POST /api/v1/login`.
///
/// `identifier` is an email address when it contains `@`, otherwise a
/// contact number.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub identifier: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let identifier = require(value.identifier, FieldName::new("identifier"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Self::try_from_parts(&identifier, &password).map_err(map_login_validation_error)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyIdentifier => FieldError::missing("identifier").into(),
        LoginValidationError::EmptyPassword => FieldError::missing("password").into(),
        // An identifier that cannot name any account fails like a wrong
        // password so the response does not reveal which part was wrong.
        LoginValidationError::MalformedIdentifier => Error::unauthorized("invalid credentials"),
    }
}

/// Body carrying a refresh token.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Partial profile update. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<UpdateUserRequest> for AccountPatch {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: value
                .first_name
                .map(|raw| person_name("first_name", raw))
                .transpose()?,
            last_name: value
                .last_name
                .map(|raw| person_name("last_name", raw))
                .transpose()?,
            email: value.email.map(email).transpose()?,
            contact_number: value.contact_number.map(contact_number).transpose()?,
            password: value.password.as_deref().map(password).transpose()?,
        })
    }
}

/// Query for `PATCH /api/v1/deactivate`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeactivateUserQuery {
    /// Account to deactivate. Required for administrators, otherwise it
    /// may only name the caller.
    pub user_id: Option<String>,
}

/// Register an end-user account.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid or duplicate details", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let account = NewAccount::try_from(payload.into_inner())?;
    let user = state.accounts.signup(account).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = Error),
        (status = 401, description = "Invalid credentials or deactivated account", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let outcome = state.accounts.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        access_token: outcome.tokens.access.token,
        refresh_token: outcome.tokens.refresh.token,
        user: UserResponse::from(&outcome.user),
    }))
}

/// Mint a new access token from a refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh token", body = Error),
        (status = 401, description = "Refresh token invalid, expired or revoked", body = Error)
    ),
    tags = ["users"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/token/refresh")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<AccessTokenResponse>> {
    let token = require(
        payload.into_inner().refresh_token,
        FieldName::new("refresh_token"),
    )?;
    let issued = state.accounts.refresh(&token).await?;
    Ok(web::Json(AccessTokenResponse {
        access_token: issued.token,
        expires_at: issued.claims.expires_at,
    }))
}

/// Revoke the presented access token and the supplied refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens revoked", body = MessageResponse),
        (status = 400, description = "Refresh token missing or malformed", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "logout",
    security(("bearerAuth" = []))
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let refresh = require(
        payload.into_inner().refresh_token,
        FieldName::new("refresh_token"),
    )?;
    state
        .accounts
        .logout(auth.actor(), auth.token(), &refresh)
        .await?;
    Ok(web::Json(MessageResponse::new("Logout successful")))
}

/// The calling user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearerAuth" = []))
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.current_user(auth.actor()).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Partially update the calling user's profile.
#[utoipa::path(
    put,
    path = "/api/v1/update",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid or duplicate details", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("bearerAuth" = []))
)]
#[put("/update")]
pub async fn update_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let patch = AccountPatch::try_from(payload.into_inner())?;
    let user = state.accounts.update_profile(auth.actor(), patch).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Deactivate the caller, or as an administrator the account named by
/// `user_id`.
#[utoipa::path(
    patch,
    path = "/api/v1/deactivate",
    params(DeactivateUserQuery),
    responses(
        (status = 200, description = "Deactivated user", body = UserResponse),
        (status = 400, description = "Missing target or already inactive", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deactivateUser",
    security(("bearerAuth" = []))
)]
#[patch("/deactivate")]
pub async fn deactivate_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<DeactivateUserQuery>,
) -> ApiResult<web::Json<UserResponse>> {
    let target = query
        .into_inner()
        .user_id
        .map(|raw| parse_uuid(&raw, FieldName::new("user_id")).map(UserId::from_uuid))
        .transpose()?;
    let user = state.accounts.deactivate(auth.actor(), target).await?;
    Ok(web::Json(UserResponse::from(&user)))
}
