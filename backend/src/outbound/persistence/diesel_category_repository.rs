//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.
//!
//! Deleting a category relies on the `parent_category_id` cascade to remove
//! its subtree and on `products.category_id ... ON DELETE SET NULL` to detach
//! products.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryPersistenceError, CategoryRepository};
use crate::domain::{Category, CategoryId, SellerId};

use super::diesel_error_mapping::port_error_mapping;
use super::models::CategoryRow;
use super::pool::DbPool;
use super::schema::categories;

port_error_mapping!(CategoryPersistenceError, |_constraint: Option<String>| {
    CategoryPersistenceError::duplicate("category")
});

#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn insert(&self, category: &Category) -> Result<(), CategoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(categories::table)
            .values(CategoryRow::from(category))
            .execute(&mut conn)
            .await
            .map_err(|error| match map_diesel_error(error) {
                CategoryPersistenceError::Duplicate { .. } => {
                    CategoryPersistenceError::duplicate(category.name.clone())
                }
                other => other,
            })?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<(), CategoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(categories::table.find(*category.id.as_uuid()))
            .set(CategoryRow::from(category))
            .execute(&mut conn)
            .await
            .map_err(|error| match map_diesel_error(error) {
                CategoryPersistenceError::Duplicate { .. } => {
                    CategoryPersistenceError::duplicate(category.name.clone())
                }
                other => other,
            })?;
        if updated == 0 {
            return Err(CategoryPersistenceError::query("category not found"));
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<Option<Category>, CategoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CategoryRow> = categories::table
            .find(*id.as_uuid())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Category::from))
    }

    async fn list_for_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<Category>, CategoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .filter(categories::seller_id.eq(*seller_id.as_uuid()))
            .select(CategoryRow::as_select())
            .order_by(categories::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn name_taken(
        &self,
        seller_id: &SellerId,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<bool, CategoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let same_name = categories::table
            .filter(categories::seller_id.eq(*seller_id.as_uuid()))
            .filter(categories::name.eq(name));
        let taken = match except {
            Some(id) => {
                diesel::select(exists(same_name.filter(categories::id.ne(*id.as_uuid()))))
                    .get_result(&mut conn)
                    .await
            }
            None => diesel::select(exists(same_name)).get_result(&mut conn).await,
        };
        taken.map_err(map_diesel_error)
    }

    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(categories::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
