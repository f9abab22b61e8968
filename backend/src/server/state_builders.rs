//! Builders wiring Diesel repositories and security adapters into the
//! domain services held by [`HttpState`].

use std::sync::Arc;

use mockable::DefaultClock;

use bazaar::domain::{
    AccountPorts, AccountService, CatalogueService, HeroSectionService, ProductService,
    SellerService, SharedClock,
};
use bazaar::inbound::http::state::HttpState;
use bazaar::outbound::persistence::{
    DieselCategoryRepository, DieselHeroSectionRepository, DieselProductRepository,
    DieselSellerRepository, DieselTokenBlacklist, DieselUserRepository,
};
use bazaar::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the handler state over the configured pool.
///
/// Repositories are cheap handles around the shared pool, so each service
/// receives its own `Arc` while all of them share one connection pool and
/// one clock.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let pool = &config.db_pool;
    let clock: SharedClock = Arc::new(DefaultClock);

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let sellers = Arc::new(DieselSellerRepository::new(pool.clone()));
    let categories = Arc::new(DieselCategoryRepository::new(pool.clone()));
    let products = Arc::new(DieselProductRepository::new(pool.clone()));
    let sections = Arc::new(DieselHeroSectionRepository::new(pool.clone()));

    let accounts = AccountService::new(
        AccountPorts {
            users,
            blacklist: Arc::new(DieselTokenBlacklist::new(pool.clone())),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            tokens: config.tokens.clone(),
        },
        clock.clone(),
        config.lifetimes,
    );

    HttpState {
        accounts,
        sellers: SellerService::new(sellers.clone(), clock.clone()),
        catalogue: CatalogueService::new(categories.clone(), sellers.clone(), clock.clone()),
        products: ProductService::new(products.clone(), categories, sellers.clone(), clock),
        hero_sections: HeroSectionService::new(sections, products, sellers),
    }
}
