//! Product handlers.
//!
//! ```text
//! POST   /api/v1/products
//! GET    /api/v1/products?seller_id=...&category_id=...&page=1&page_size=10
//! GET    /api/v1/products/{id}
//! PUT    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! POST   /api/v1/products/{id}/images
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageParams};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CategoryId, Error, Money, ProductFilter, ProductId, ProductInput, SellerCategory, SellerId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    ProductDetailResponse, ProductImageResponse, ProductPageSchema, ProductResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_uuid};

/// Product fields.
///
/// Creation requires `name`, `title`, `description`, `price`,
/// `banner_image` and `exclusives`. Updates accept any subset and are
/// revalidated against the stored product.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProductRequest {
    #[schema(example = "Armchair")]
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "1499.00")]
    pub price: Option<Money>,
    /// Defaults to `price`; may not exceed it.
    #[schema(value_type = Option<String>, example = "1299.50")]
    pub discounted_price: Option<Money>,
    pub stock_quantity: Option<u32>,
    pub is_active: Option<bool>,
    pub banner_image: Option<String>,
    pub exclusives: Option<String>,
    /// One of the seller's own categories.
    pub category_id: Option<String>,
    /// Defaults to the seller's trade category.
    pub default_category: Option<SellerCategory>,
}

impl TryFrom<ProductRequest> for ProductInput {
    type Error = Error;

    fn try_from(value: ProductRequest) -> Result<Self, Self::Error> {
        let category_id = value
            .category_id
            .map(|raw| parse_uuid(&raw, FieldName::new("category_id")).map(CategoryId::from_uuid))
            .transpose()?;
        Ok(Self {
            name: value.name,
            title: value.title,
            description: value.description,
            price: value.price,
            discounted_price: value.discounted_price,
            stock_quantity: value.stock_quantity,
            is_active: value.is_active,
            banner_image: value.banner_image,
            exclusives: value.exclusives,
            category_id,
            default_category: value.default_category,
        })
    }
}

/// Filters and paging for the public product listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Only products of this seller.
    pub seller_id: Option<String>,
    /// Only products in this category.
    pub category_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductListQuery {
    fn filter(&self) -> Result<ProductFilter, Error> {
        let seller_id = self
            .seller_id
            .as_deref()
            .map(|raw| parse_uuid(raw, FieldName::new("seller_id")).map(SellerId::from_uuid))
            .transpose()?;
        let category_id = self
            .category_id
            .as_deref()
            .map(|raw| parse_uuid(raw, FieldName::new("category_id")).map(CategoryId::from_uuid))
            .transpose()?;
        Ok(ProductFilter {
            seller_id,
            category_id,
        })
    }
}

/// Gallery image to append to a product.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProductImageRequest {
    #[schema(example = "https://cdn.example/armchair-side.jpg")]
    pub image: Option<String>,
}

fn product_id(raw: &str) -> Result<ProductId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(ProductId::from_uuid)
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Seller profile required", body = Error),
        (status = 404, description = "Category not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct",
    security(("bearerAuth" = []))
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let input = ProductInput::try_from(payload.into_inner())?;
    let product = state.products.create(auth.actor(), input).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(&product)))
}

/// Active products, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductPageSchema),
        (status = 400, description = "Invalid filter or paging", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(
    req: HttpRequest,
    state: web::Data<HttpState>,
    query: web::Query<ProductListQuery>,
) -> ApiResult<web::Json<Page<ProductResponse>>> {
    let query = query.into_inner();
    let filter = query.filter()?;
    let request = page_request(PageParams {
        page: query.page,
        page_size: query.page_size,
    })?;
    let page = state
        .products
        .list(filter, request)
        .await?
        .map(|product| ProductResponse::from(&product))
        .with_links(&req.full_url());
    Ok(web::Json(page))
}

/// A product with its gallery images.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product", body = ProductDetailResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductDetailResponse>> {
    let id = product_id(&path.into_inner())?;
    let product = state.products.get(&id).await?;
    Ok(web::Json(ProductDetailResponse::from(product)))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "Invalid change", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owner or administrator only", body = Error),
        (status = 404, description = "Product or category not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct",
    security(("bearerAuth" = []))
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id = product_id(&path.into_inner())?;
    let input = ProductInput::try_from(payload.into_inner())?;
    let product = state.products.update(auth.actor(), &id, input).await?;
    Ok(web::Json(ProductResponse::from(&product)))
}

/// Delete a product together with its images and hero sections.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owner or administrator only", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct",
    security(("bearerAuth" = []))
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = product_id(&path.into_inner())?;
    state.products.delete(auth.actor(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/images",
    params(("id" = String, Path, description = "Product identifier")),
    request_body = ProductImageRequest,
    responses(
        (status = 201, description = "Image added", body = ProductImageResponse),
        (status = 400, description = "Missing image", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owner only", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "addProductImage",
    security(("bearerAuth" = []))
)]
#[post("/products/{id}/images")]
pub async fn add_product_image(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ProductImageRequest>,
) -> ApiResult<HttpResponse> {
    let id = product_id(&path.into_inner())?;
    let image = state
        .products
        .add_image(auth.actor(), &id, payload.into_inner().image)
        .await?;
    Ok(HttpResponse::Created().json(ProductImageResponse::from(&image)))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
