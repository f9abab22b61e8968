//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use bazaar::domain::TokenLifetimes;
use bazaar::outbound::persistence::DbPool;
use bazaar::outbound::security::JwtTokenCodec;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) tokens: Arc<JwtTokenCodec>,
    pub(crate) lifetimes: TokenLifetimes,
}

impl ServerConfig {
    /// Construct a server configuration over a ready database pool and
    /// token codec.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, tokens: JwtTokenCodec) -> Self {
        Self {
            bind_addr,
            db_pool,
            tokens: Arc::new(tokens),
            lifetimes: TokenLifetimes::default(),
        }
    }

    /// Override the default access and refresh token lifetimes.
    #[must_use]
    pub fn with_token_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }
}
