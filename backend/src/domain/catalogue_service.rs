//! Category use cases. Every operation acts on the caller's own seller
//! profile; categories belonging to other sellers are reported as missing.

use std::sync::Arc;

use tracing::info;

use crate::domain::ownership::require_seller;
use crate::domain::port_errors::duplicate;
use crate::domain::ports::{CategoryRepository, SellerRepository};
use crate::domain::{
    Actor, Category, CategoryDraft, CategoryId, CategoryNode, CategoryPatch, CategoryTree, Error,
    Seller, SharedClock,
};

fn category_not_found() -> Error {
    Error::not_found("category not found")
}

#[derive(Clone)]
pub struct CatalogueService {
    categories: Arc<dyn CategoryRepository>,
    sellers: Arc<dyn SellerRepository>,
    clock: SharedClock,
}

impl CatalogueService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        sellers: Arc<dyn SellerRepository>,
        clock: SharedClock,
    ) -> Self {
        Self {
            categories,
            sellers,
            clock,
        }
    }

    async fn find_owned(
        &self,
        seller: &Seller,
        id: &CategoryId,
    ) -> Result<Option<Category>, Error> {
        Ok(self
            .categories
            .find_by_id(id)
            .await?
            .filter(|category| category.seller_id == seller.id))
    }

    async fn owned(&self, seller: &Seller, id: &CategoryId) -> Result<Category, Error> {
        self.find_owned(seller, id)
            .await?
            .ok_or_else(category_not_found)
    }

    async fn ensure_parent(&self, seller: &Seller, parent: &CategoryId) -> Result<(), Error> {
        match self.find_owned(seller, parent).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("parent category not found")),
        }
    }

    async fn ensure_name_free(
        &self,
        seller: &Seller,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<(), Error> {
        if self.categories.name_taken(&seller.id, name, except).await? {
            return Err(duplicate(
                "name",
                format!("a category named {name} already exists for this seller"),
            ));
        }
        Ok(())
    }

    async fn seller_tree(&self, seller: &Seller) -> Result<CategoryTree, Error> {
        Ok(CategoryTree::new(
            self.categories.list_for_seller(&seller.id).await?,
        ))
    }

    pub async fn create(&self, actor: &Actor, draft: CategoryDraft) -> Result<Category, Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        self.ensure_name_free(&seller, &draft.name, None).await?;
        if let Some(parent) = draft.parent_id {
            self.ensure_parent(&seller, &parent).await?;
        }

        let now = self.clock.utc();
        let category = Category {
            id: CategoryId::random(),
            seller_id: seller.id,
            name: draft.name,
            description: draft.description,
            image: draft.image,
            parent_id: draft.parent_id,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        self.categories.insert(&category).await?;
        Ok(category)
    }

    /// The caller's categories as a forest, roots and children by name.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<CategoryNode>, Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        Ok(self.seller_tree(&seller).await?.roots())
    }

    /// One category with its nested subcategories.
    pub async fn get(&self, actor: &Actor, id: &CategoryId) -> Result<CategoryNode, Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        self.seller_tree(&seller)
            .await?
            .subtree(*id)
            .ok_or_else(category_not_found)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        let mut category = self.owned(&seller, id).await?;

        if let Some(name) = patch.validated_name()?
            && name != category.name
        {
            self.ensure_name_free(&seller, &name, Some(category.id)).await?;
        }
        if let Some(parent) = patch.parent_id {
            let tree = self.seller_tree(&seller).await?;
            if tree.would_cycle(category.id, parent) {
                return Err(Error::invalid_request(
                    "a category cannot be its own ancestor",
                )
                .with_details(serde_json::json!({
                    "field": "parent_category",
                    "code": "invalid_value",
                })));
            }
            self.ensure_parent(&seller, &parent).await?;
        }

        patch.apply(&mut category, self.clock.utc())?;
        self.categories.update(&category).await?;
        Ok(category)
    }

    /// Delete a category and its subtree; products in it are detached.
    pub async fn delete(&self, actor: &Actor, id: &CategoryId) -> Result<(), Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        let category = self.owned(&seller, id).await?;
        self.categories.delete(&category.id).await?;
        info!(category_id = %category.id, seller_id = %seller.id, "category deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
