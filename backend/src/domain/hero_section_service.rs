//! Hero section use cases.

use std::sync::Arc;

use crate::domain::ownership::{require_owner_or_admin, require_seller};
use crate::domain::ports::{HeroSectionRepository, ProductRepository, SellerRepository};
use crate::domain::{
    Actor, Error, HeroSection, HeroSectionDraft, HeroSectionId, SellerId,
};

#[derive(Clone)]
pub struct HeroSectionService {
    sections: Arc<dyn HeroSectionRepository>,
    products: Arc<dyn ProductRepository>,
    sellers: Arc<dyn SellerRepository>,
}

impl HeroSectionService {
    pub fn new(
        sections: Arc<dyn HeroSectionRepository>,
        products: Arc<dyn ProductRepository>,
        sellers: Arc<dyn SellerRepository>,
    ) -> Self {
        Self {
            sections,
            products,
            sellers,
        }
    }

    /// Feature one of the caller's own products.
    pub async fn create(&self, actor: &Actor, draft: HeroSectionDraft) -> Result<HeroSection, Error> {
        let seller = require_seller(self.sellers.as_ref(), actor).await?;
        let product = self
            .products
            .find_by_id(&draft.product_id)
            .await?
            .ok_or_else(|| Error::not_found("product not found"))?;
        if product.seller_id != seller.id {
            return Err(Error::forbidden("product belongs to another seller"));
        }

        let section = HeroSection {
            id: HeroSectionId::random(),
            seller_id: seller.id,
            product_id: product.id,
            name: draft.name,
            section_name: draft.section_name,
            priority: draft.priority,
            banner_image: draft.banner_image,
        };
        self.sections.insert(&section).await?;
        Ok(section)
    }

    /// Sections ordered by ascending priority, then name.
    pub async fn list(&self, seller_id: Option<SellerId>) -> Result<Vec<HeroSection>, Error> {
        Ok(self.sections.list(seller_id).await?)
    }

    pub async fn delete(&self, actor: &Actor, id: &HeroSectionId) -> Result<(), Error> {
        let section = self
            .sections
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("hero section not found"))?;
        require_owner_or_admin(self.sellers.as_ref(), actor, &section.seller_id).await?;
        self.sections.delete(&section.id).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "hero_section_service_tests.rs"]
mod tests;
