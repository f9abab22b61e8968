//! Response payloads rendered by the HTTP adapter.
//!
//! Domain aggregates stay framework-agnostic by not deriving `Serialize` or
//! `ToSchema`. The types here flatten them into the `snake_case` JSON bodies
//! clients consume and document those bodies for OpenAPI.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryNode, HeroSection, Money, NearbySeller, Product, ProductImage,
    ProductWithImages, Seller, SellerCategory, User, UserRole,
};

const TIME_FORMAT: &str = "%H:%M:%S";

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "9876543210")]
    pub contact_number: String,
    pub user_type: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            first_name: user.first_name.as_ref().to_owned(),
            last_name: user.last_name.as_ref().to_owned(),
            email: user.email.to_string(),
            contact_number: user.contact_number.to_string(),
            user_type: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Tokens and account returned by a successful login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

/// A freshly minted access token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Plain confirmation message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logout successful")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Seller profile as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SellerResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Teak House")]
    pub business_name: String,
    pub business_address: String,
    pub business_contact_number: String,
    pub business_email: Option<String>,
    pub seller_category: SellerCategory,
    pub seller_exclusives: String,
    pub is_seller_exclusives: bool,
    pub shop_description: Option<String>,
    #[schema(example = "09:30:00")]
    pub shop_timing_open: String,
    #[schema(example = "21:00:00")]
    pub shop_timing_close: String,
    pub shop_location: String,
    pub geo_location_lat: Option<f64>,
    pub geo_location_lng: Option<f64>,
    pub shop_photo: Option<String>,
    pub days_closed: String,
    pub gst_number: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Seller> for SellerResponse {
    fn from(seller: &Seller) -> Self {
        let profile = &seller.profile;
        Self {
            id: *seller.id.as_uuid(),
            user_id: *seller.user_id.as_uuid(),
            business_name: profile.business_name.clone(),
            business_address: profile.business_address.clone(),
            business_contact_number: profile.business_contact_number.to_string(),
            business_email: profile.business_email.as_ref().map(ToString::to_string),
            seller_category: profile.seller_category,
            seller_exclusives: profile.seller_exclusives.clone(),
            is_seller_exclusives: seller.is_seller_exclusives,
            shop_description: profile.shop_description.clone(),
            shop_timing_open: profile.shop_timing_open.format(TIME_FORMAT).to_string(),
            shop_timing_close: profile.shop_timing_close.format(TIME_FORMAT).to_string(),
            shop_location: profile.shop_location.clone(),
            geo_location_lat: profile.geo_location_lat,
            geo_location_lng: profile.geo_location_lng,
            shop_photo: profile.shop_photo.as_ref().map(|p| p.as_str().to_owned()),
            days_closed: profile.days_closed.clone(),
            gst_number: profile.gst_number.clone(),
            is_approved: seller.is_approved,
            is_active: seller.is_active,
            created_at: seller.created_at,
            updated_at: seller.updated_at,
        }
    }
}

/// Seller found by the nearby search, with its distance from the query
/// point.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NearbySellerResponse {
    #[serde(flatten)]
    pub seller: SellerResponse,
    #[schema(example = 3.42)]
    pub distance_km: f64,
}

impl From<NearbySeller> for NearbySellerResponse {
    fn from(hit: NearbySeller) -> Self {
        Self {
            seller: SellerResponse::from(&hit.seller),
            distance_km: hit.distance_km,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    #[schema(example = "Chairs")]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_category: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: *category.id.as_uuid(),
            seller_id: *category.seller_id.as_uuid(),
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.as_ref().map(|i| i.as_str().to_owned()),
            parent_category: category.parent_id.map(|id| *id.as_uuid()),
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// A category with its nested subcategories, children sorted by name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryTreeResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    #[schema(no_recursion)]
    pub subcategories: Vec<CategoryTreeResponse>,
}

impl From<CategoryNode> for CategoryTreeResponse {
    fn from(node: CategoryNode) -> Self {
        Self {
            category: CategoryResponse::from(&node.category),
            subcategories: node.subcategories.into_iter().map(Self::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub category_id: Option<Uuid>,
    #[schema(example = "Armchair")]
    pub name: String,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, example = "1499.00")]
    pub price: Money,
    #[schema(value_type = String, example = "1299.50")]
    pub discounted_price: Money,
    pub stock_quantity: u32,
    pub is_active: bool,
    pub banner_image: String,
    pub exclusives: String,
    pub default_category: SellerCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: *product.id.as_uuid(),
            seller_id: *product.seller_id.as_uuid(),
            category_id: product.category_id.map(|id| *id.as_uuid()),
            name: product.name.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            discounted_price: product.discounted_price,
            stock_quantity: product.stock_quantity,
            is_active: product.is_active,
            banner_image: product.banner_image.as_str().to_owned(),
            exclusives: product.exclusives.clone(),
            default_category: product.default_category,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductImageResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ProductImage> for ProductImageResponse {
    fn from(image: &ProductImage) -> Self {
        Self {
            id: *image.id.as_uuid(),
            product_id: *image.product_id.as_uuid(),
            image: image.image.as_str().to_owned(),
            created_at: image.created_at,
        }
    }
}

/// A product together with its gallery images, oldest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetailResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub images: Vec<ProductImageResponse>,
}

impl From<ProductWithImages> for ProductDetailResponse {
    fn from(value: ProductWithImages) -> Self {
        Self {
            product: ProductResponse::from(&value.product),
            images: value.images.iter().map(ProductImageResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeroSectionResponse {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub section_name: String,
    pub priority: i32,
    pub banner_image: String,
}

impl From<&HeroSection> for HeroSectionResponse {
    fn from(section: &HeroSection) -> Self {
        Self {
            id: *section.id.as_uuid(),
            seller_id: *section.seller_id.as_uuid(),
            product_id: *section.product_id.as_uuid(),
            name: section.name.clone(),
            section_name: section.section_name.clone(),
            priority: section.priority,
            banner_image: section.banner_image.as_str().to_owned(),
        }
    }
}

/// OpenAPI schema for a page of nearby sellers.
///
/// Mirrors `pagination::Page`, which stays free of framework derives.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NearbySellerPageSchema {
    count: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
    #[schema(example = "/api/v1/sellers/nearby?lat=12.97&lng=77.59&page=2")]
    next: Option<String>,
    previous: Option<String>,
    results: Vec<NearbySellerResponse>,
}

/// OpenAPI schema for a page of products.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProductPageSchema {
    count: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
    #[schema(example = "/api/v1/products?page=2")]
    next: Option<String>,
    previous: Option<String>,
    results: Vec<ProductResponse>,
}
