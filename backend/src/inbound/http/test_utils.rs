//! Test helpers for inbound HTTP components.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, test, web};
use serde_json::Value;

use super::state::HttpState;
use super::{configure_api, validation};

/// Build the API under `/api/v1` over `state`, with the production extractor
/// configuration.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(validation::json_config())
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// `Authorization` header carrying `token`.
#[must_use]
pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Read a response body as JSON, panicking with the raw body otherwise.
pub async fn read_json<B: MessageBody>(response: ServiceResponse<B>) -> Value {
    let body = test::read_body(response).await;
    match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => panic!(
            "response body is not JSON ({err}): {}",
            String::from_utf8_lossy(&body)
        ),
    }
}
