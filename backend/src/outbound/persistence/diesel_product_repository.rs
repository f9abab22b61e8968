//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductPersistenceError, ProductRepository, ProductSlice};
use crate::domain::{Product, ProductFilter, ProductId, ProductImage};

use super::diesel_error_mapping::port_error_mapping;
use super::models::{ProductImageRow, ProductRow};
use super::pool::DbPool;
use super::schema::{product_images, products};

port_error_mapping!(ProductPersistenceError);

fn to_domain(row: ProductRow) -> Result<Product, ProductPersistenceError> {
    Product::try_from(row).map_err(ProductPersistenceError::query)
}

#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Active products matching `filter`, as a boxed query for reuse by the
/// count and page queries.
fn active_products(filter: &ProductFilter) -> products::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = products::table
        .filter(products::is_active.eq(true))
        .into_boxed();
    if let Some(seller) = filter.seller_id {
        query = query.filter(products::seller_id.eq(*seller.as_uuid()));
    }
    if let Some(category) = filter.category_id {
        query = query.filter(products::category_id.eq(*category.as_uuid()));
    }
    query
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(products::table)
            .values(ProductRow::from(product))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(products::table.find(*product.id.as_uuid()))
            .set(ProductRow::from(product))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(ProductPersistenceError::query("product not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .find(*id.as_uuid())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_domain).transpose()
    }

    async fn list_active(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u32,
    ) -> Result<ProductSlice, ProductPersistenceError> {
        let offset = i64::try_from(offset)
            .map_err(|_| ProductPersistenceError::query("page offset out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = active_products(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ProductRow> = active_products(filter)
            .select(ProductRow::as_select())
            .order_by((products::created_at.desc(), products::id.desc()))
            .offset(offset)
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProductSlice {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(products::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn add_image(&self, image: &ProductImage) -> Result<(), ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(product_images::table)
            .values(ProductImageRow::from(image))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_images(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductImage>, ProductPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductImageRow> = product_images::table
            .filter(product_images::product_id.eq(*product_id.as_uuid()))
            .select(ProductImageRow::as_select())
            .order_by((product_images::created_at, product_images::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(ProductImage::from).collect())
    }
}
