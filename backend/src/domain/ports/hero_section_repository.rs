//! Port for promotional hero sections.
use async_trait::async_trait;

use crate::domain::{HeroSection, HeroSectionId, SellerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by hero section adapters.
    pub enum HeroSectionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "hero section repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "hero section repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeroSectionRepository: Send + Sync {
    async fn insert(&self, section: &HeroSection) -> Result<(), HeroSectionPersistenceError>;

    async fn find_by_id(
        &self,
        id: &HeroSectionId,
    ) -> Result<Option<HeroSection>, HeroSectionPersistenceError>;

    /// Sections ordered by ascending priority, then name.
    async fn list(
        &self,
        seller_id: Option<SellerId>,
    ) -> Result<Vec<HeroSection>, HeroSectionPersistenceError>;

    async fn delete(&self, id: &HeroSectionId) -> Result<(), HeroSectionPersistenceError>;
}
