//! Seller profile handlers.
//!
//! ```text
//! POST   /api/v1/create-seller
//! PUT    /api/v1/update-seller
//! GET    /api/v1/sellers/nearby?lat=12.97&lng=77.59&page=1&page_size=10
//! GET    /api/v1/sellers/{id}
//! PATCH  /api/v1/sellers/deactivate?seller_id=...
//! DELETE /api/v1/sellers/delete?seller_id=...
//! POST   /api/v1/sellers/{id}/approve
//! POST   /api/v1/sellers/{id}/reject
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use pagination::{Page, PageParams};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, FieldError, GeoPoint, SellerId, SellerProfileInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{NearbySellerPageSchema, NearbySellerResponse, SellerResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_uuid, require};

/// Shop details for creating or updating a seller profile.
///
/// Creation requires `business_name`, `business_address`,
/// `business_contact_number`, both shop timings (`HH:MM` or `HH:MM:SS`)
/// and `shop_location`. Updates accept any subset.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SellerProfileRequest {
    #[schema(example = "Teak House")]
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub business_contact_number: Option<String>,
    pub business_email: Option<String>,
    #[schema(example = "furniture")]
    pub seller_category: Option<String>,
    pub seller_exclusives: Option<String>,
    pub shop_description: Option<String>,
    #[schema(example = "09:30")]
    pub shop_timing_open: Option<String>,
    #[schema(example = "21:00")]
    pub shop_timing_close: Option<String>,
    pub shop_location: Option<String>,
    #[schema(example = 12.9716)]
    pub geo_location_lat: Option<f64>,
    #[schema(example = 77.5946)]
    pub geo_location_lng: Option<f64>,
    pub shop_photo: Option<String>,
    #[schema(example = "Sunday")]
    pub days_closed: Option<String>,
    pub gst_number: Option<String>,
}

impl From<SellerProfileRequest> for SellerProfileInput {
    fn from(value: SellerProfileRequest) -> Self {
        Self {
            business_name: value.business_name,
            business_address: value.business_address,
            business_contact_number: value.business_contact_number,
            business_email: value.business_email,
            seller_category: value.seller_category,
            seller_exclusives: value.seller_exclusives,
            shop_description: value.shop_description,
            shop_timing_open: value.shop_timing_open,
            shop_timing_close: value.shop_timing_close,
            shop_location: value.shop_location,
            geo_location_lat: value.geo_location_lat,
            geo_location_lng: value.geo_location_lng,
            shop_photo: value.shop_photo,
            days_closed: value.days_closed,
            gst_number: value.gst_number,
        }
    }
}

/// Query for the nearby-seller search.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NearbyQuery {
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub lng: Option<f64>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Results per page, capped at 50.
    pub page_size: Option<u32>,
}

impl NearbyQuery {
    fn origin(&self) -> Result<GeoPoint, Error> {
        let lat = require(self.lat, FieldName::new("lat"))?;
        let lng = require(self.lng, FieldName::new("lng"))?;
        GeoPoint::new(lat, lng)
            .map_err(|err| FieldError::invalid(err.field(), err.to_string()).into())
    }
}

/// Administrator target for seller moderation.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SellerTargetQuery {
    /// Seller profile to act on. Required for administrators; sellers
    /// always act on their own profile.
    pub seller_id: Option<String>,
}

impl SellerTargetQuery {
    fn target(self) -> Result<Option<SellerId>, Error> {
        self.seller_id
            .map(|raw| parse_uuid(&raw, FieldName::new("seller_id")).map(SellerId::from_uuid))
            .transpose()
    }
}

fn seller_id(raw: &str) -> Result<SellerId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(SellerId::from_uuid)
}

/// Open a seller profile for the calling end user.
///
/// The caller is promoted to `seller`. The profile stays hidden from the
/// nearby search until an administrator approves it.
#[utoipa::path(
    post,
    path = "/api/v1/create-seller",
    request_body = SellerProfileRequest,
    responses(
        (status = 201, description = "Profile created, pending approval", body = SellerResponse),
        (status = 400, description = "Invalid details or already a seller", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators cannot become sellers", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "createSeller",
    security(("bearerAuth" = []))
)]
#[post("/create-seller")]
pub async fn create_seller(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SellerProfileRequest>,
) -> ApiResult<HttpResponse> {
    let seller = state
        .sellers
        .create(auth.actor(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(SellerResponse::from(&seller)))
}

/// Partially update the caller's seller profile.
#[utoipa::path(
    put,
    path = "/api/v1/update-seller",
    request_body = SellerProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = SellerResponse),
        (status = 400, description = "Invalid details or caller is not a seller", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Profile not found", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "updateSeller",
    security(("bearerAuth" = []))
)]
#[put("/update-seller")]
pub async fn update_seller(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SellerProfileRequest>,
) -> ApiResult<web::Json<SellerResponse>> {
    let seller = state
        .sellers
        .update(auth.actor(), payload.into_inner().into())
        .await?;
    Ok(web::Json(SellerResponse::from(&seller)))
}

/// Approved, active sellers within 40 km, nearest first.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Page of nearby sellers", body = NearbySellerPageSchema),
        (status = 400, description = "Missing or out-of-range coordinates", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "nearbySellers",
    security([])
)]
#[get("/sellers/nearby")]
pub async fn nearby_sellers(
    req: HttpRequest,
    state: web::Data<HttpState>,
    query: web::Query<NearbyQuery>,
) -> ApiResult<web::Json<Page<NearbySellerResponse>>> {
    let query = query.into_inner();
    let origin = query.origin()?;
    let request = page_request(PageParams {
        page: query.page,
        page_size: query.page_size,
    })?;
    let page = state
        .sellers
        .nearby(origin, request)
        .await?
        .map(NearbySellerResponse::from)
        .with_links(&req.full_url());
    Ok(web::Json(page))
}

/// Public seller profile.
#[utoipa::path(
    get,
    path = "/api/v1/sellers/{id}",
    params(("id" = String, Path, description = "Seller identifier")),
    responses(
        (status = 200, description = "Seller profile", body = SellerResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Seller not found", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "getSeller",
    security([])
)]
#[get("/sellers/{id}")]
pub async fn get_seller(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SellerResponse>> {
    let id = seller_id(&path.into_inner())?;
    let seller = state.sellers.get(&id).await?;
    Ok(web::Json(SellerResponse::from(&seller)))
}

/// Deactivate the caller's profile, or as an administrator the profile
/// named by `seller_id`.
#[utoipa::path(
    patch,
    path = "/api/v1/sellers/deactivate",
    params(SellerTargetQuery),
    responses(
        (status = 200, description = "Deactivated profile", body = SellerResponse),
        (status = 400, description = "Missing target", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Seller not found", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "deactivateSeller",
    security(("bearerAuth" = []))
)]
#[patch("/sellers/deactivate")]
pub async fn deactivate_seller(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<SellerTargetQuery>,
) -> ApiResult<web::Json<SellerResponse>> {
    let target = query.into_inner().target()?;
    let seller = state.sellers.deactivate(auth.actor(), target).await?;
    Ok(web::Json(SellerResponse::from(&seller)))
}

/// Delete a seller profile and its catalogue. The owner reverts to an end
/// user.
#[utoipa::path(
    delete,
    path = "/api/v1/sellers/delete",
    params(SellerTargetQuery),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 400, description = "Missing target", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Seller not found", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "deleteSeller",
    security(("bearerAuth" = []))
)]
#[delete("/sellers/delete")]
pub async fn delete_seller(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<SellerTargetQuery>,
) -> ApiResult<HttpResponse> {
    let target = query.into_inner().target()?;
    state.sellers.delete(auth.actor(), target).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Approve and activate a seller profile.
#[utoipa::path(
    post,
    path = "/api/v1/sellers/{id}/approve",
    params(("id" = String, Path, description = "Seller identifier")),
    responses(
        (status = 200, description = "Approved profile", body = SellerResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "Seller not found", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "approveSeller",
    security(("bearerAuth" = []))
)]
#[post("/sellers/{id}/approve")]
pub async fn approve_seller(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<SellerResponse>> {
    let id = seller_id(&path.into_inner())?;
    let seller = state.sellers.approve(auth.actor(), &id).await?;
    Ok(web::Json(SellerResponse::from(&seller)))
}

/// Withdraw approval from a seller profile.
#[utoipa::path(
    post,
    path = "/api/v1/sellers/{id}/reject",
    params(("id" = String, Path, description = "Seller identifier")),
    responses(
        (status = 200, description = "Rejected profile", body = SellerResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "Seller not found", body = Error)
    ),
    tags = ["sellers"],
    operation_id = "rejectSeller",
    security(("bearerAuth" = []))
)]
#[post("/sellers/{id}/reject")]
pub async fn reject_seller(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<SellerResponse>> {
    let id = seller_id(&path.into_inner())?;
    let seller = state.sellers.reject(auth.actor(), &id).await?;
    Ok(web::Json(SellerResponse::from(&seller)))
}

#[cfg(test)]
#[path = "sellers_tests.rs"]
mod tests;
