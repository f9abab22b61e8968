//! HTTP inbound adapter exposing the REST API.

use actix_web::web;

pub mod auth;
pub mod categories;
pub mod error;
pub mod health;
pub mod hero_sections;
pub mod products;
pub mod schemas;
pub mod sellers;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` resource on `cfg`.
///
/// The caller mounts this under the versioned scope and supplies
/// [`state::HttpState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use bazaar::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::signup)
        .service(users::login)
        .service(users::refresh_token)
        .service(users::logout)
        .service(users::current_user)
        .service(users::update_user)
        .service(users::deactivate_user)
        .service(sellers::create_seller)
        .service(sellers::update_seller)
        // Literal seller paths must precede `/sellers/{id}`.
        .service(sellers::nearby_sellers)
        .service(sellers::deactivate_seller)
        .service(sellers::delete_seller)
        .service(sellers::get_seller)
        .service(sellers::approve_seller)
        .service(sellers::reject_seller)
        .service(categories::create_category)
        .service(categories::list_categories)
        .service(categories::get_category)
        .service(categories::update_category)
        .service(categories::delete_category)
        .service(products::create_product)
        .service(products::list_products)
        .service(products::get_product)
        .service(products::update_product)
        .service(products::delete_product)
        .service(products::add_product_image)
        .service(hero_sections::create_hero_section)
        .service(hero_sections::list_hero_sections)
        .service(hero_sections::delete_hero_section);
}
