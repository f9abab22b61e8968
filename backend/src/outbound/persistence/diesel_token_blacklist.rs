//! PostgreSQL-backed `TokenBlacklist` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::TokenDigest;
use crate::domain::ports::{TokenBlacklist, TokenBlacklistError};

use super::diesel_error_mapping::port_error_mapping;
use super::models::NewBlacklistedTokenRow;
use super::pool::DbPool;
use super::schema::blacklisted_tokens;

port_error_mapping!(TokenBlacklistError);

/// Append-only revocation log keyed by token digest.
#[derive(Clone)]
pub struct DieselTokenBlacklist {
    pool: DbPool,
}

impl DieselTokenBlacklist {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklist for DieselTokenBlacklist {
    async fn revoke(
        &self,
        digest: &TokenDigest,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(blacklisted_tokens::table)
            .values(NewBlacklistedTokenRow {
                token_digest: digest.as_str(),
                blacklisted_at: revoked_at,
            })
            .on_conflict(blacklisted_tokens::token_digest)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn is_revoked(&self, digest: &TokenDigest) -> Result<bool, TokenBlacklistError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            blacklisted_tokens::table
                .filter(blacklisted_tokens::token_digest.eq(digest.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
