//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O: tests build the
//! same services over in-memory adapters.

use crate::domain::{
    AccountService, CatalogueService, HeroSectionService, ProductService, SellerService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub sellers: SellerService,
    pub catalogue: CatalogueService,
    pub products: ProductService,
    pub hero_sections: HeroSectionService,
}
