//! Product use cases: listing, ownership-checked mutation, and gallery
//! images.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ownership::{require_owner, require_owner_or_admin, require_seller};
use crate::domain::ports::{CategoryRepository, ProductRepository, SellerRepository};
use crate::domain::{
    Actor, CategoryId, Error, ImageRef, Product, ProductFilter, ProductId, ProductImage,
    ProductImageId, ProductInput, ProductWithImages, SellerId, SharedClock,
};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    sellers: Arc<dyn SellerRepository>,
    clock: SharedClock,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        sellers: Arc<dyn SellerRepository>,
        clock: SharedClock,
    ) -> Self {
        Self {
            products,
            categories,
            sellers,
            clock,
        }
    }

    async fn ensure_category_owned(
        &self,
        seller_id: &SellerId,
        category_id: Option<CategoryId>,
    ) -> Result<(), Error> {
        let Some(id) = category_id else {
            return Ok(());
        };
        match self.categories.find_by_id(&id).await? {
            Some(category) if category.seller_id == *seller_id => Ok(()),
            _ => Err(Error::not_found("category not found")),
        }
    }

    async fn find(&self, id: &ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("product not found"))
    }

    pub async fn create(&self, actor: &Actor, input: ProductInput) -> Result<Product, Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        let details = input.validate()?;
        self.ensure_category_owned(&seller.id, details.category_id)
            .await?;

        let now = self.clock.utc();
        let mut product = Product {
            id: ProductId::random(),
            seller_id: seller.id,
            category_id: None,
            name: String::new(),
            title: String::new(),
            description: String::new(),
            price: details.price,
            discounted_price: details.discounted_price,
            stock_quantity: 0,
            is_active: true,
            banner_image: details.banner_image.clone(),
            exclusives: String::new(),
            default_category: seller.profile.seller_category,
            created_at: now,
            updated_at: now,
        };
        details.write_to(&mut product, now);
        self.products.insert(&product).await?;
        info!(product_id = %product.id, seller_id = %seller.id, "product created");
        Ok(product)
    }

    /// Active products, newest first.
    pub async fn list(
        &self,
        filter: ProductFilter,
        request: PageRequest,
    ) -> Result<Page<Product>, Error> {
        let slice = self
            .products
            .list_active(&filter, request.offset(), request.page_size())
            .await?;
        Ok(Page::new(slice.items, slice.total, request))
    }

    pub async fn get(&self, id: &ProductId) -> Result<ProductWithImages, Error> {
        let product = self.find(id).await?;
        let images = self.products.list_images(&product.id).await?;
        Ok(ProductWithImages { product, images })
    }

    /// Merge `input` over the stored product and revalidate the result.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, Error> {
        let mut product = self.find(id).await?;
        require_owner_or_admin(self.sellers.as_ref(), actor, &product.seller_id).await?;
        let changes_category = input.category_id.is_some();
        let details = input.apply_to(&product)?;
        if changes_category {
            self.ensure_category_owned(&product.seller_id, details.category_id)
                .await?;
        }
        details.write_to(&mut product, self.clock.utc());
        self.products.update(&product).await?;
        Ok(product)
    }

    /// Delete a product with its images and hero sections.
    pub async fn delete(&self, actor: &Actor, id: &ProductId) -> Result<(), Error> {
        let product = self.find(id).await?;
        require_owner_or_admin(self.sellers.as_ref(), actor, &product.seller_id).await?;
        self.products.delete(&product.id).await?;
        info!(product_id = %product.id, by = %actor.user_id, "product deleted");
        Ok(())
    }

    /// Append a gallery image. Only the owning seller may do this.
    pub async fn add_image(
        &self,
        actor: &Actor,
        id: &ProductId,
        image: Option<String>,
    ) -> Result<ProductImage, Error> {
        let product = self.find(id).await?;
        require_owner(self.sellers.as_ref(), actor, &product.seller_id).await?;
        let image = ProductImage {
            id: ProductImageId::random(),
            product_id: product.id,
            image: ImageRef::parse("image", image)?,
            created_at: self.clock.utc(),
        };
        self.products.add_image(&image).await?;
        Ok(image)
    }
}

#[cfg(test)]
#[path = "product_service_tests.rs"]
mod tests;
