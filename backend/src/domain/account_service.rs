//! Account use cases: registration, login, token refresh and revocation,
//! profile maintenance, and deactivation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::port_errors::duplicate;
use crate::domain::ports::{PasswordHasher, TokenBlacklist, TokenCodec, UserRepository};
use crate::domain::{
    Actor, ContactNumber, EmailAddress, Error, IssuedToken, LoginCredentials, LoginIdentifier,
    Password, PersonName, SharedClock, TokenClaims, TokenDigest, TokenKind, TokenLifetimes,
    TokenPair, User, UserId, UserRole,
};

/// Validated registration details.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub contact_number: ContactNumber,
    pub password: Password,
}

/// Profile changes requested by a user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub contact_number: Option<ContactNumber>,
    pub password: Option<Password>,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Driven ports used by [`AccountService`].
#[derive(Clone)]
pub struct AccountPorts {
    pub users: Arc<dyn UserRepository>,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenCodec>,
}

/// Account service backed by the user repository and token ports.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    blacklist: Arc<dyn TokenBlacklist>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    clock: SharedClock,
    lifetimes: TokenLifetimes,
}

impl AccountService {
    pub fn new(ports: AccountPorts, clock: SharedClock, lifetimes: TokenLifetimes) -> Self {
        Self {
            users: ports.users,
            blacklist: ports.blacklist,
            hasher: ports.hasher,
            tokens: ports.tokens,
            clock,
            lifetimes,
        }
    }

    /// Register an end user.
    pub async fn signup(&self, account: NewAccount) -> Result<User, Error> {
        self.register(account, UserRole::EndUser).await
    }

    /// Register an administrator. Used by operator tooling, not the API.
    pub async fn create_admin(&self, account: NewAccount) -> Result<User, Error> {
        self.register(account, UserRole::Admin).await
    }

    async fn register(&self, account: NewAccount, role: UserRole) -> Result<User, Error> {
        self.ensure_email_free(&account.email, None).await?;
        self.ensure_contact_free(&account.contact_number, None).await?;

        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            contact_number: account.contact_number,
            password: self.hasher.hash(&account.password)?,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user).await?;
        info!(user_id = %user.id, role = %role, "account registered");
        Ok(user)
    }

    async fn ensure_email_free(
        &self,
        email: &EmailAddress,
        owner: Option<UserId>,
    ) -> Result<(), Error> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(duplicate("email", "a user with this email already exists"))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_contact_free(
        &self,
        number: &ContactNumber,
        owner: Option<UserId>,
    ) -> Result<(), Error> {
        match self.users.find_by_contact_number(number).await? {
            Some(existing) if Some(existing.id) != owner => Err(duplicate(
                "contact_number",
                "a user with this contact number already exists",
            )),
            _ => Ok(()),
        }
    }

    /// Verify credentials and issue an access/refresh pair.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let found = match credentials.identifier() {
            LoginIdentifier::Email(email) => self.users.find_by_email(email).await?,
            LoginIdentifier::ContactNumber(number) => {
                self.users.find_by_contact_number(number).await?
            }
        };
        let Some(user) = found else {
            warn!("login rejected: unknown identifier");
            return Err(Error::unauthorized("invalid credentials"));
        };
        if !self.hasher.verify(credentials.password(), &user.password)? {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(Error::unauthorized("invalid credentials"));
        }
        if !user.is_active {
            warn!(user_id = %user.id, "login rejected: account deactivated");
            return Err(Error::unauthorized("account is deactivated"));
        }

        let tokens = TokenPair {
            access: self.issue(&user, TokenKind::Access)?,
            refresh: self.issue(&user, TokenKind::Refresh)?,
        };
        info!(user_id = %user.id, "login succeeded");
        Ok(LoginOutcome { user, tokens })
    }

    fn issue(&self, user: &User, kind: TokenKind) -> Result<IssuedToken, Error> {
        let ttl = match kind {
            TokenKind::Access => self.lifetimes.access,
            TokenKind::Refresh => self.lifetimes.refresh,
        };
        let claims = TokenClaims::issue(user.id, user.role, kind, self.clock.utc(), ttl);
        let token = self.tokens.encode(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Decode `token`, then require the expected kind, an unexpired and
    /// unrevoked token, and an active owner.
    async fn verify_token(&self, token: &str, kind: TokenKind) -> Result<User, Error> {
        let claims = self.tokens.decode(token)?;
        if claims.kind != kind {
            return Err(Error::unauthorized(format!("expected {kind} token")));
        }
        if claims.is_expired_at(self.clock.utc()) {
            return Err(Error::unauthorized("token has expired"));
        }
        if self.blacklist.is_revoked(&TokenDigest::of(token)).await? {
            return Err(Error::unauthorized("token has been revoked"));
        }
        let user = self
            .users
            .find_by_id(&claims.user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        if !user.is_active {
            return Err(Error::unauthorized("account is deactivated"));
        }
        Ok(user)
    }

    /// Resolve a bearer access token to the calling user.
    ///
    /// The role comes from the stored user, so promotions take effect
    /// without re-login.
    pub async fn authenticate(&self, access_token: &str) -> Result<Actor, Error> {
        let user = self.verify_token(access_token, TokenKind::Access).await?;
        Ok(Actor {
            user_id: user.id,
            role: user.role,
        })
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, Error> {
        let user = self.verify_token(refresh_token, TokenKind::Refresh).await?;
        self.issue(&user, TokenKind::Access)
    }

    /// Revoke the caller's access token and the supplied refresh token.
    pub async fn logout(
        &self,
        actor: &Actor,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), Error> {
        let claims = self
            .tokens
            .decode(refresh_token)
            .map_err(|_| Error::invalid_request("refresh_token is invalid"))?;
        let now = self.clock.utc();
        if claims.kind != TokenKind::Refresh
            || claims.user_id != actor.user_id
            || claims.is_expired_at(now)
        {
            return Err(Error::invalid_request("refresh_token is invalid or expired"));
        }

        self.blacklist
            .revoke(&TokenDigest::of(access_token), now)
            .await?;
        self.blacklist
            .revoke(&TokenDigest::of(refresh_token), now)
            .await?;
        info!(user_id = %actor.user_id, "logged out; tokens revoked");
        Ok(())
    }

    /// The calling user's record.
    pub async fn current_user(&self, actor: &Actor) -> Result<User, Error> {
        self.users
            .find_by_id(&actor.user_id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Apply a partial profile update, re-checking uniqueness against other
    /// accounts.
    pub async fn update_profile(&self, actor: &Actor, patch: AccountPatch) -> Result<User, Error> {
        let mut user = self.current_user(actor).await?;
        if let Some(email) = patch.email {
            self.ensure_email_free(&email, Some(user.id)).await?;
            user.email = email;
        }
        if let Some(number) = patch.contact_number {
            self.ensure_contact_free(&number, Some(user.id)).await?;
            user.contact_number = number;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(password) = patch.password {
            user.password = self.hasher.hash(&password)?;
        }
        user.updated_at = self.clock.utc();
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Deactivate the caller, or for administrators the user named by
    /// `target`.
    pub async fn deactivate(&self, actor: &Actor, target: Option<UserId>) -> Result<User, Error> {
        let target_id = if actor.is_admin() {
            target.ok_or_else(|| {
                Error::invalid_request("user_id is required").with_details(serde_json::json!({
                    "field": "user_id",
                    "code": "missing_field",
                }))
            })?
        } else {
            match target {
                Some(id) if id != actor.user_id => {
                    return Err(Error::forbidden("only administrators can deactivate other users"));
                }
                _ => actor.user_id,
            }
        };

        let mut user = self
            .users
            .find_by_id(&target_id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        if !user.is_active {
            return Err(Error::invalid_request("account is already deactivated"));
        }
        user.is_active = false;
        user.updated_at = self.clock.utc();
        self.users.update(&user).await?;
        info!(user_id = %user.id, by = %actor.user_id, "account deactivated");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
