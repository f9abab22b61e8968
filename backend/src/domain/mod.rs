//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed marketplace entities used by the API and
//! persistence layers, and the services that enforce ownership and
//! validation rules over them. Services depend only on the driven ports in
//! [`ports`]; adapters live under `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Seller, Category, Product, HeroSection: marketplace aggregates.
//! - AccountService, SellerService, CatalogueService, ProductService,
//!   HeroSectionService: use cases driven by the HTTP adapter.

use std::sync::Arc;

pub mod account_service;
pub mod auth;
pub mod catalogue_service;
pub mod category;
pub mod error;
pub mod geo;
pub mod hero_section_service;
pub mod ids;
pub mod image;
pub mod money;
mod ownership;
mod port_errors;
pub mod ports;
pub mod product;
pub mod product_service;
pub mod seller;
pub mod seller_service;
pub mod token;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::account_service::{AccountPatch, AccountPorts, AccountService, LoginOutcome, NewAccount};
pub use self::auth::{Actor, LoginCredentials, LoginIdentifier, LoginValidationError, Password};
pub use self::catalogue_service::CatalogueService;
pub use self::category::{Category, CategoryDraft, CategoryNode, CategoryPatch, CategoryTree};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{GeoPoint, GeoPointError, NEARBY_RADIUS_KM};
pub use self::hero_section_service::HeroSectionService;
pub use self::ids::{CategoryId, HeroSectionId, ProductId, ProductImageId, SellerId};
pub use self::image::ImageRef;
pub use self::money::{Money, MoneyError};
pub use self::product::{
    HeroSection, HeroSectionDraft, Product, ProductDetails, ProductFilter, ProductImage,
    ProductInput, ProductWithImages, sort_hero_sections,
};
pub use self::product_service::ProductService;
pub use self::seller::{
    NearbySeller, Seller, SellerCategory, SellerProfile, SellerProfileInput,
};
pub use self::seller_service::SellerService;
pub use self::token::{
    IssuedToken, TokenClaims, TokenDigest, TokenKind, TokenLifetimes, TokenPair,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    ContactNumber, EmailAddress, PasswordDigest, PersonName, User, UserId, UserRole,
    UserValidationError,
};
pub use self::validation::{FieldError, FieldErrorCode};

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Clock shared by services; tests substitute a controllable implementation.
pub type SharedClock = Arc<dyn mockable::Clock + Send + Sync>;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bazaar::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
