//! Port for products and their gallery images.
use async_trait::async_trait;

use crate::domain::{Product, ProductFilter, ProductId, ProductImage};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by product repository adapters.
    pub enum ProductPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
    }
}

/// One window of the product listing plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductSlice {
    pub items: Vec<Product>,
    pub total: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: &Product) -> Result<(), ProductPersistenceError>;

    async fn update(&self, product: &Product) -> Result<(), ProductPersistenceError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductPersistenceError>;

    /// Active products matching `filter`, newest first.
    async fn list_active(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u32,
    ) -> Result<ProductSlice, ProductPersistenceError>;

    /// Delete a product together with its images and hero sections.
    async fn delete(&self, id: &ProductId) -> Result<(), ProductPersistenceError>;

    async fn add_image(&self, image: &ProductImage) -> Result<(), ProductPersistenceError>;

    /// Gallery images, oldest first.
    async fn list_images(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ProductImage>, ProductPersistenceError>;
}
