//! PostgreSQL-backed `HeroSectionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HeroSectionPersistenceError, HeroSectionRepository};
use crate::domain::{HeroSection, HeroSectionId, SellerId};

use super::diesel_error_mapping::port_error_mapping;
use super::models::HeroSectionRow;
use super::pool::DbPool;
use super::schema::hero_sections;

port_error_mapping!(HeroSectionPersistenceError);

#[derive(Clone)]
pub struct DieselHeroSectionRepository {
    pool: DbPool,
}

impl DieselHeroSectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HeroSectionRepository for DieselHeroSectionRepository {
    async fn insert(&self, section: &HeroSection) -> Result<(), HeroSectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(hero_sections::table)
            .values(HeroSectionRow::from(section))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &HeroSectionId,
    ) -> Result<Option<HeroSection>, HeroSectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HeroSectionRow> = hero_sections::table
            .find(*id.as_uuid())
            .select(HeroSectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(HeroSection::from))
    }

    async fn list(
        &self,
        seller_id: Option<SellerId>,
    ) -> Result<Vec<HeroSection>, HeroSectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = hero_sections::table
            .select(HeroSectionRow::as_select())
            .order_by((hero_sections::priority, hero_sections::name))
            .into_boxed();
        if let Some(seller) = seller_id {
            query = query.filter(hero_sections::seller_id.eq(*seller.as_uuid()));
        }
        let rows: Vec<HeroSectionRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(HeroSection::from).collect())
    }

    async fn delete(&self, id: &HeroSectionId) -> Result<(), HeroSectionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(hero_sections::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
