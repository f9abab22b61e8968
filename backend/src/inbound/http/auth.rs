//! Bearer-token authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by resolving
//! the `Authorization` header to a domain [`Actor`] here. Handlers that take
//! [`Authenticated`] never run for anonymous, expired, revoked, or
//! deactivated callers.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, Error};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

/// Caller resolved from a valid access token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    actor: Actor,
    token: String,
}

impl Authenticated {
    /// The authenticated principal.
    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The raw access token, needed to revoke it at logout.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    let scheme_len = BEARER_PREFIX.len();
    match (value.get(..scheme_len), value.get(scheme_len..)) {
        (Some(scheme), Some(rest)) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
            let token = rest.trim();
            if token.is_empty() {
                Err(Error::unauthorized("bearer token is empty"))
            } else {
                Ok(token.to_owned())
            }
        }
        _ => Err(Error::unauthorized("authorization header must use the Bearer scheme")),
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered with the app"))?;
            let token = token?;
            let actor = state.accounts.authenticate(&token).await?;
            Ok(Self { actor, token })
        })
    }
}
