//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer together
//! with the request and response bodies they exchange. The document backs
//! Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump` for client generation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, SellerCategory, UserRole};
use crate::inbound::http::categories::CategoryRequest;
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::hero_sections::HeroSectionRequest;
use crate::inbound::http::products::{ProductImageRequest, ProductRequest};
use crate::inbound::http::schemas::{
    AccessTokenResponse, CategoryResponse, CategoryTreeResponse, HeroSectionResponse,
    LoginResponse, MessageResponse, NearbySellerPageSchema, NearbySellerResponse,
    ProductDetailResponse, ProductImageResponse, ProductPageSchema, ProductResponse,
    SellerResponse, UserResponse,
};
use crate::inbound::http::sellers::SellerProfileRequest;
use crate::inbound::http::users::{
    LoginRequest, RefreshRequest, SignupRequest, UpdateUserRequest,
};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Enrich the generated document with the JWT bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bazaar marketplace API",
        description = "Accounts, seller storefronts, categories, products and hero banners.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::refresh_token,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::deactivate_user,
        crate::inbound::http::sellers::create_seller,
        crate::inbound::http::sellers::update_seller,
        crate::inbound::http::sellers::nearby_sellers,
        crate::inbound::http::sellers::get_seller,
        crate::inbound::http::sellers::deactivate_seller,
        crate::inbound::http::sellers::delete_seller,
        crate::inbound::http::sellers::approve_seller,
        crate::inbound::http::sellers::reject_seller,
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::categories::get_category,
        crate::inbound::http::categories::update_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::add_product_image,
        crate::inbound::http::hero_sections::create_hero_section,
        crate::inbound::http::hero_sections::list_hero_sections,
        crate::inbound::http::hero_sections::delete_hero_section,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserRole,
        SellerCategory,
        SignupRequest,
        LoginRequest,
        RefreshRequest,
        UpdateUserRequest,
        SellerProfileRequest,
        CategoryRequest,
        ProductRequest,
        ProductImageRequest,
        HeroSectionRequest,
        UserResponse,
        LoginResponse,
        AccessTokenResponse,
        MessageResponse,
        SellerResponse,
        NearbySellerResponse,
        NearbySellerPageSchema,
        CategoryResponse,
        CategoryTreeResponse,
        ProductResponse,
        ProductImageResponse,
        ProductDetailResponse,
        ProductPageSchema,
        HeroSectionResponse,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Accounts, tokens and logout"),
        (name = "sellers", description = "Seller storefronts and moderation"),
        (name = "categories", description = "Seller-owned category trees"),
        (name = "products", description = "Product catalogue and images"),
        (name = "hero-sections", description = "Promotional banners"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
