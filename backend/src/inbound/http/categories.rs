//! Category handlers. Every route acts on the calling seller's own catalogue.
//!
//! ```text
//! POST   /api/v1/category
//! GET    /api/v1/category
//! GET    /api/v1/category/{id}
//! PUT    /api/v1/category/{id}
//! DELETE /api/v1/category/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CategoryDraft, CategoryId, CategoryPatch, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{CategoryResponse, CategoryTreeResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Category fields. Creation requires `name`; updates accept any subset.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CategoryRequest {
    #[schema(example = "Chairs")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Parent category owned by the same seller.
    pub parent_category: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryRequest {
    fn parent_id(&self) -> Result<Option<CategoryId>, Error> {
        self.parent_category
            .as_deref()
            .map(|raw| parse_uuid(raw, FieldName::new("parent_category")).map(CategoryId::from_uuid))
            .transpose()
    }
}

impl TryFrom<CategoryRequest> for CategoryDraft {
    type Error = Error;

    fn try_from(value: CategoryRequest) -> Result<Self, Self::Error> {
        let parent_id = value.parent_id()?;
        Ok(Self::try_new(
            value.name,
            value.description,
            value.image,
            parent_id,
            value.is_active,
        )?)
    }
}

impl TryFrom<CategoryRequest> for CategoryPatch {
    type Error = Error;

    fn try_from(value: CategoryRequest) -> Result<Self, Self::Error> {
        let parent_id = value.parent_id()?;
        Ok(Self {
            name: value.name,
            description: value.description,
            image: value.image,
            parent_id,
            is_active: value.is_active,
        })
    }
}

fn category_id(raw: &str) -> Result<CategoryId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(CategoryId::from_uuid)
}

/// Create a category, optionally beneath one of the seller's categories.
#[utoipa::path(
    post,
    path = "/api/v1/category",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid or duplicate name", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Seller profile required", body = Error),
        (status = 404, description = "Parent category not found", body = Error)
    ),
    tags = ["categories"],
    operation_id = "createCategory",
    security(("bearerAuth" = []))
)]
#[post("/category")]
pub async fn create_category(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<HttpResponse> {
    let draft = CategoryDraft::try_from(payload.into_inner())?;
    let category = state.catalogue.create(auth.actor(), draft).await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(&category)))
}

/// The caller's categories as a tree.
#[utoipa::path(
    get,
    path = "/api/v1/category",
    responses(
        (status = 200, description = "Root categories with nested children", body = [CategoryTreeResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Seller profile required", body = Error)
    ),
    tags = ["categories"],
    operation_id = "listCategories",
    security(("bearerAuth" = []))
)]
#[get("/category")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<CategoryTreeResponse>>> {
    let roots = state.catalogue.list(auth.actor()).await?;
    Ok(web::Json(
        roots.into_iter().map(CategoryTreeResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/category/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Category with nested children", body = CategoryTreeResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Category not found", body = Error)
    ),
    tags = ["categories"],
    operation_id = "getCategory",
    security(("bearerAuth" = []))
)]
#[get("/category/{id}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<CategoryTreeResponse>> {
    let id = category_id(&path.into_inner())?;
    let node = state.catalogue.get(auth.actor(), &id).await?;
    Ok(web::Json(CategoryTreeResponse::from(node)))
}

/// Partially update a category. Reparenting under itself or a descendant
/// is rejected.
#[utoipa::path(
    put,
    path = "/api/v1/category/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = CategoryResponse),
        (status = 400, description = "Invalid change", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Category or parent not found", body = Error)
    ),
    tags = ["categories"],
    operation_id = "updateCategory",
    security(("bearerAuth" = []))
)]
#[put("/category/{id}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<CategoryRequest>,
) -> ApiResult<web::Json<CategoryResponse>> {
    let id = category_id(&path.into_inner())?;
    let patch = CategoryPatch::try_from(payload.into_inner())?;
    let category = state.catalogue.update(auth.actor(), &id, patch).await?;
    Ok(web::Json(CategoryResponse::from(&category)))
}

/// Delete a category and its subcategories. Products keep existing without
/// a category.
#[utoipa::path(
    delete,
    path = "/api/v1/category/{id}",
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Category not found", body = Error)
    ),
    tags = ["categories"],
    operation_id = "deleteCategory",
    security(("bearerAuth" = []))
)]
#[delete("/category/{id}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = category_id(&path.into_inner())?;
    state.catalogue.delete(auth.actor(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{bearer, read_json, test_app};
    use crate::test_support::TestBackend;

    async fn seller_token(backend: &TestBackend, name: &str, contact: &str) -> String {
        backend.register_seller(name, contact, 12.97, 77.59).await;
        backend
            .login(&format!("{}@example.com", name.to_lowercase()))
            .await
            .tokens
            .access
            .token
    }

    fn post_category(token: &str, body: Value) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/category")
            .insert_header(bearer(token))
            .set_json(body)
    }

    async fn status_and_json(response: ServiceResponse) -> (StatusCode, Value) {
        let status = response.status();
        (status, read_json(response).await)
    }

    fn id_of(value: &Value) -> String {
        match value["id"].as_str() {
            Some(id) => id.to_owned(),
            None => panic!("response has no id: {value}"),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn categories_nest_under_their_parent() {
        let backend = TestBackend::new();
        let token = seller_token(&backend, "Ada", "9000000001").await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;

        let request = post_category(&token, json!({"name": "Furniture"})).to_request();

        let (status, root) = status_and_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(status, StatusCode::CREATED);
        let root_id = id_of(&root);
        let request = post_category(&token, json!({"name": "Chairs", "parent_category": root_id})).to_request();
        let (status, child) = status_and_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(child["parent_category"], root_id.as_str());

        let listed = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/category")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        let tree = read_json(listed).await;
        assert_eq!(tree.as_array().map(Vec::len), Some(1));
        assert_eq!(tree[0]["name"], "Furniture");
        assert_eq!(tree[0]["subcategories"][0]["name"], "Chairs");

        let single = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/category/{root_id}"))
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(read_json(single).await["subcategories"][0]["name"], "Chairs");
    }

    #[rstest]
    #[case(json!({}), "name", "missing_field")]
    #[case(json!({"name": "Lamps", "parent_category": "nope"}), "parent_category", "invalid_uuid")]
    #[actix_web::test]
    async fn create_validates_the_body(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let backend = TestBackend::new();
        let token = seller_token(&backend, "Ada", "9000000001").await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;

        let request = post_category(&token, body).to_request();

        let (status, payload) = status_and_json(actix_test::call_service(&app, request).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["details"]["field"], field);
        assert_eq!(payload["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn foreign_categories_look_missing() {
        let backend = TestBackend::new();
        let ada = seller_token(&backend, "Ada", "9000000001").await;
        let grace = seller_token(&backend, "Grace", "9000000002").await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let request = post_category(&ada, json!({"name": "Furniture"})).to_request();
        let (_, root) = status_and_json(actix_test::call_service(&app, request).await).await;
        let root_id = id_of(&root);

        for request in [
            actix_test::TestRequest::get().uri(&format!("/api/v1/category/{root_id}")),
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/category/{root_id}"))
                .set_json(json!({"name": "Mine"})),
            actix_test::TestRequest::delete().uri(&format!("/api/v1/category/{root_id}")),
        ] {
            let response =
                actix_test::call_service(&app, request.insert_header(bearer(&grace)).to_request())
                    .await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let request = post_category(&grace, json!({"name": "Borrowed", "parent_category": root_id})).to_request();

        let (status, _) = status_and_json(actix_test::call_service(&app, request).await).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn reparenting_under_a_descendant_is_rejected() {
        let backend = TestBackend::new();
        let token = seller_token(&backend, "Ada", "9000000001").await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let request = post_category(&token, json!({"name": "Furniture"})).to_request();
        let (_, root) = status_and_json(actix_test::call_service(&app, request).await).await;
        let root_id = id_of(&root);
        let request = post_category(&token, json!({"name": "Chairs", "parent_category": root_id})).to_request();
        let (_, child) = status_and_json(actix_test::call_service(&app, request).await).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/category/{root_id}"))
                .insert_header(bearer(&token))
                .set_json(json!({"parent_category": child["id"]}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn deleting_a_category_detaches_its_products() {
        let backend = TestBackend::new();
        let token = seller_token(&backend, "Ada", "9000000001").await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let request = post_category(&token, json!({"name": "Furniture"})).to_request();
        let (_, root) = status_and_json(actix_test::call_service(&app, request).await).await;
        let request = post_category(&token, json!({"name": "Chairs", "parent_category": root["id"]})).to_request();
        let (_, child) = status_and_json(actix_test::call_service(&app, request).await).await;
        let product = json!({
            "name": "Armchair",
            "title": "Armchair",
            "description": "Deep seat",
            "price": "1499.00",
            "banner_image": "https://cdn.example/armchair.jpg",
            "exclusives": "Hand finished",
            "category_id": child["id"],
        });
        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/products")
                .insert_header(bearer(&token))
                .set_json(product)
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let product_id = id_of(&read_json(created).await);

        let deleted = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/category/{}", id_of(&root)))
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let fetched = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/products/{product_id}"))
                .to_request(),
        )
        .await;
        assert_eq!(read_json(fetched).await["category_id"], Value::Null);
    }
}
