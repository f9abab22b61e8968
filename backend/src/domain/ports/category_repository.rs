//! Port for category persistence.
use async_trait::async_trait;

use crate::domain::{Category, CategoryId, SellerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by category repository adapters.
    pub enum CategoryPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "category repository query failed: {message}",
        /// The seller already has a category with this name.
        Duplicate { name: String } => "category {name} already exists for this seller",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: &Category) -> Result<(), CategoryPersistenceError>;

    async fn update(&self, category: &Category) -> Result<(), CategoryPersistenceError>;

    async fn find_by_id(
        &self,
        id: &CategoryId,
    ) -> Result<Option<Category>, CategoryPersistenceError>;

    /// Every category owned by `seller_id`, in no particular order.
    async fn list_for_seller(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<Category>, CategoryPersistenceError>;

    /// Whether `seller_id` already uses `name`, ignoring `except`.
    async fn name_taken(
        &self,
        seller_id: &SellerId,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<bool, CategoryPersistenceError>;

    /// Delete a category and its whole subtree. Products that referenced a
    /// deleted category keep existing without one.
    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryPersistenceError>;
}
