//! HTTP tests for the seller endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{bearer, read_json, test_app};
use crate::test_support::TestBackend;

#[fixture]
fn backend() -> TestBackend {
    TestBackend::new()
}

fn shop_body() -> Value {
    json!({
        "business_name": "Teak House",
        "business_address": "4 Church Street, Bengaluru",
        "business_contact_number": "08041234567",
        "seller_category": "furniture",
        "shop_timing_open": "09:30",
        "shop_timing_close": "21:00",
        "shop_location": "Church Street",
        "geo_location_lat": 12.9716,
        "geo_location_lng": 77.5946,
    })
}

async fn access_token(backend: &TestBackend, identifier: &str) -> String {
    backend.login(identifier).await.tokens.access.token
}

#[rstest]
#[actix_web::test]
async fn create_seller_opens_a_pending_profile(backend: TestBackend) {
    backend.register("Ada", "9876543210").await;
    let token = access_token(&backend, "ada@example.com").await;
    let app = actix_test::init_service(test_app(backend.http_state())).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/create-seller")
            .insert_header(bearer(&token))
            .set_json(shop_body())
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json(created).await;
    assert_eq!(body["is_approved"], false);
    assert_eq!(body["is_active"], false);
    assert_eq!(body["shop_timing_open"], "09:30:00");
    assert_eq!(body["seller_category"], "furniture");

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(read_json(me).await["user_type"], "seller");

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/create-seller")
            .insert_header(bearer(&token))
            .set_json(shop_body())
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("business_name", "missing_field")]
#[case("shop_timing_open", "missing_field")]
#[actix_web::test]
async fn create_seller_requires_shop_details(
    backend: TestBackend,
    #[case] field: &str,
    #[case] code: &str,
) {
    backend.register("Ada", "9876543210").await;
    let token = access_token(&backend, "ada@example.com").await;
    let app = actix_test::init_service(test_app(backend.http_state())).await;
    let mut body = shop_body();
    body[field] = Value::Null;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/create-seller")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["details"], json!({"field": field, "code": code}));
}

#[rstest]
#[actix_web::test]
async fn nearby_lists_closest_sellers_with_links(backend: TestBackend) {
    backend.register_seller("Ada", "9000000001", 12.97, 77.59).await;
    backend.register_seller("Grace", "9000000002", 13.0, 77.6).await;
    backend.register_seller("Delhi", "9000000003", 28.6, 77.2).await;
    let app = actix_test::init_service(test_app(backend.http_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/sellers/nearby?lat=12.97&lng=77.59&page_size=1")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["results"][0]["business_name"], "Ada's Shop");
    assert!(
        body["results"][0]["distance_km"]
            .as_f64()
            .is_some_and(|d| d < 0.01)
    );
    assert_eq!(
        body["next"],
        "/api/v1/sellers/nearby?lat=12.97&lng=77.59&page_size=1&page=2"
    );
    assert_eq!(body["previous"], Value::Null);
}

#[rstest]
#[case("/api/v1/sellers/nearby?lng=77.59", "lat", "missing_field")]
#[case("/api/v1/sellers/nearby?lat=91&lng=77.59", "lat", "invalid_value")]
#[case("/api/v1/sellers/nearby?lat=12&lng=200", "lng", "invalid_value")]
#[case("/api/v1/sellers/nearby?lat=12&lng=77&page=0", "page", "invalid_value")]
#[actix_web::test]
async fn nearby_validates_the_query(
    backend: TestBackend,
    #[case] uri: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(backend.http_state())).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn get_seller_reports_missing_and_malformed_ids(backend: TestBackend) {
    let (_, seller) = backend.register_seller("Ada", "9000000001", 12.97, 77.59).await;
    let app = actix_test::init_service(test_app(backend.http_state())).await;

    let found = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/sellers/{}", seller.id))
            .to_request(),
    )
    .await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(read_json(found).await["id"], seller.id.to_string());

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/sellers/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/sellers/not-a-uuid")
            .to_request(),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(malformed).await["details"]["code"], "invalid_uuid");
}

#[rstest]
#[actix_web::test]
async fn moderation_is_admin_only(backend: TestBackend) {
    backend.register("Ada", "9876543210").await;
    backend.register_admin("Root", "9000000009").await;
    let ada = access_token(&backend, "ada@example.com").await;
    let admin = access_token(&backend, "root@example.com").await;
    let app = actix_test::init_service(test_app(backend.http_state())).await;
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/create-seller")
            .insert_header(bearer(&ada))
            .set_json(shop_body())
            .to_request(),
    )
    .await;
    let seller_id = read_json(created).await["id"]
        .as_str()
        .map(str::to_owned)
        .expect("seller id");

    let refused = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/sellers/{seller_id}/approve"))
            .insert_header(bearer(&ada))
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let approved = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/sellers/{seller_id}/approve"))
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(approved.status(), StatusCode::OK);
    let body = read_json(approved).await;
    assert_eq!(body["is_approved"], true);
    assert_eq!(body["is_active"], true);

    let rejected = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/sellers/{seller_id}/reject"))
            .insert_header(bearer(&admin))
            .to_request(),
    )
    .await;
    let body = read_json(rejected).await;
    assert_eq!(body["is_approved"], false);
    assert_eq!(body["is_active"], true);
}

#[rstest]
#[actix_web::test]
async fn owners_deactivate_and_delete_their_profile(backend: TestBackend) {
    let (_, seller) = backend.register_seller("Ada", "9000000001", 12.97, 77.59).await;
    backend.register("Grace", "9000000002").await;
    let ada = access_token(&backend, "ada@example.com").await;
    let grace = access_token(&backend, "grace@example.com").await;
    let app = actix_test::init_service(test_app(backend.http_state())).await;

    let outsider = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/sellers/deactivate")
            .insert_header(bearer(&grace))
            .to_request(),
    )
    .await;
    assert_eq!(outsider.status(), StatusCode::FORBIDDEN);

    let deactivated = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/sellers/deactivate")
            .insert_header(bearer(&ada))
            .to_request(),
    )
    .await;
    assert_eq!(deactivated.status(), StatusCode::OK);
    assert_eq!(read_json(deactivated).await["is_active"], false);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/sellers/delete")
            .insert_header(bearer(&ada))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/sellers/{}", seller.id))
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header(bearer(&ada))
            .to_request(),
    )
    .await;
    assert_eq!(read_json(me).await["user_type"], "end_user");
}
