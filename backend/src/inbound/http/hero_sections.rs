//! Hero section handlers: promotional banners pointing at a seller's
//! product.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, HeroSectionDraft, HeroSectionId, ProductId, SellerId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::HeroSectionResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct HeroSectionRequest {
    /// Product owned by the calling seller.
    pub product_id: Option<String>,
    #[schema(example = "Monsoon sale")]
    pub name: Option<String>,
    #[schema(example = "Featured")]
    pub section_name: Option<String>,
    /// Lower values are shown first.
    pub priority: Option<i32>,
    pub banner_image: Option<String>,
}

impl TryFrom<HeroSectionRequest> for HeroSectionDraft {
    type Error = Error;

    fn try_from(value: HeroSectionRequest) -> Result<Self, Self::Error> {
        let product_id = value
            .product_id
            .map(|raw| parse_uuid(&raw, FieldName::new("product_id")).map(ProductId::from_uuid))
            .transpose()?;
        Ok(Self::try_new(
            product_id,
            value.name,
            value.section_name,
            value.priority,
            value.banner_image,
        )?)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HeroSectionQuery {
    /// Only sections of this seller.
    pub seller_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/hero-sections",
    request_body = HeroSectionRequest,
    responses(
        (status = 201, description = "Section created", body = HeroSectionResponse),
        (status = 400, description = "Invalid section", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Product belongs to another seller", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["hero-sections"],
    operation_id = "createHeroSection",
    security(("bearerAuth" = []))
)]
#[post("/hero-sections")]
pub async fn create_hero_section(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<HeroSectionRequest>,
) -> ApiResult<HttpResponse> {
    let draft = HeroSectionDraft::try_from(payload.into_inner())?;
    let section = state.hero_sections.create(auth.actor(), draft).await?;
    Ok(HttpResponse::Created().json(HeroSectionResponse::from(&section)))
}

/// Sections ordered by ascending priority, then name.
#[utoipa::path(
    get,
    path = "/api/v1/hero-sections",
    params(HeroSectionQuery),
    responses(
        (status = 200, description = "Hero sections", body = [HeroSectionResponse]),
        (status = 400, description = "Malformed seller id", body = Error)
    ),
    tags = ["hero-sections"],
    operation_id = "listHeroSections",
    security([])
)]
#[get("/hero-sections")]
pub async fn list_hero_sections(
    state: web::Data<HttpState>,
    query: web::Query<HeroSectionQuery>,
) -> ApiResult<web::Json<Vec<HeroSectionResponse>>> {
    let seller_id = query
        .into_inner()
        .seller_id
        .map(|raw| parse_uuid(&raw, FieldName::new("seller_id")).map(SellerId::from_uuid))
        .transpose()?;
    let sections = state.hero_sections.list(seller_id).await?;
    Ok(web::Json(
        sections.iter().map(HeroSectionResponse::from).collect(),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hero-sections/{id}",
    params(("id" = String, Path, description = "Hero section identifier")),
    responses(
        (status = 204, description = "Section deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Owner or administrator only", body = Error),
        (status = 404, description = "Section not found", body = Error)
    ),
    tags = ["hero-sections"],
    operation_id = "deleteHeroSection",
    security(("bearerAuth" = []))
)]
#[delete("/hero-sections/{id}")]
pub async fn delete_hero_section(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("id")).map(HeroSectionId::from_uuid)?;
    state.hero_sections.delete(auth.actor(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
