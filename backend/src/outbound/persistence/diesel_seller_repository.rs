//! PostgreSQL-backed `SellerRepository` implementation using Diesel ORM.
//!
//! Profile creation and deletion also rewrite the owner's role; both run in
//! a single transaction. Catalogue rows are removed by `ON DELETE CASCADE`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{SellerPersistenceError, SellerRepository};
use crate::domain::{Seller, SellerId, UserId, UserRole};

use super::diesel_error_mapping::port_error_mapping;
use super::models::SellerRow;
use super::pool::DbPool;
use super::schema::{sellers, users};

port_error_mapping!(SellerPersistenceError, |_constraint: Option<String>| {
    SellerPersistenceError::duplicate("seller profile")
});

fn to_domain(row: SellerRow) -> Result<Seller, SellerPersistenceError> {
    Seller::try_from(row).map_err(SellerPersistenceError::query)
}

/// Diesel-backed implementation of the `SellerRepository` port.
#[derive(Clone)]
pub struct DieselSellerRepository {
    pool: DbPool,
}

impl DieselSellerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

macro_rules! find_seller {
    ($self:ident, $filter:expr) => {{
        let mut conn = $self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SellerRow> = sellers::table
            .filter($filter)
            .select(SellerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }};
}

#[async_trait]
impl SellerRepository for DieselSellerRepository {
    async fn create_and_promote(&self, seller: &Seller) -> Result<(), SellerPersistenceError> {
        let row = SellerRow::from(seller);
        let user_id = *seller.user_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(sellers::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                let promoted = diesel::update(users::table.find(user_id))
                    .set(users::role.eq(UserRole::Seller.as_str()))
                    .execute(conn)
                    .await?;
                if promoted == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, seller: &Seller) -> Result<(), SellerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(sellers::table.find(*seller.id.as_uuid()))
            .set(SellerRow::from(seller))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(SellerPersistenceError::query("seller not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SellerId) -> Result<Option<Seller>, SellerPersistenceError> {
        find_seller!(self, sellers::id.eq(*id.as_uuid()))
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Seller>, SellerPersistenceError> {
        find_seller!(self, sellers::user_id.eq(*user_id.as_uuid()))
    }

    async fn list_discoverable(&self) -> Result<Vec<Seller>, SellerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SellerRow> = sellers::table
            .filter(sellers::is_approved.eq(true))
            .filter(sellers::is_active.eq(true))
            .filter(sellers::geo_location_lat.is_not_null())
            .filter(sellers::geo_location_lng.is_not_null())
            .select(SellerRow::as_select())
            .order_by(sellers::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn delete_and_demote(&self, seller: &Seller) -> Result<(), SellerPersistenceError> {
        let seller_id = *seller.id.as_uuid();
        let user_id = *seller.user_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let deleted = diesel::delete(sellers::table.find(seller_id))
                    .execute(conn)
                    .await?;
                if deleted == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                diesel::update(
                    users::table
                        .find(user_id)
                        .filter(users::role.eq(UserRole::Seller.as_str())),
                )
                .set(users::role.eq(UserRole::EndUser.as_str()))
                .execute(conn)
                .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
