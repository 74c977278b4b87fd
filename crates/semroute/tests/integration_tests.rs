//! Integration tests exercising the public facade surface.

use http::StatusCode;
use semroute::prelude::*;

fn config() -> VersionConfig {
    VersionConfig::new()
}

fn sample_router() -> Router {
    Router::new()
        .route(
            "/items",
            versioned()
                .on("1.0.0", |_req: Request, _next: Next| async { "items v1" })
                .on("1.2.0", |_req: Request, _next: Next| async { "items v1.2" })
                .on("2.0.0", |_req: Request, _next: Next| async { "items v2" })
                .build(&config())
                .unwrap(),
        )
        .layer(RequestIdLayer::new())
        .layer(TracingLayer::new())
}

#[tokio::test]
async fn negotiates_through_the_prelude_surface() {
    let client = TestClient::new(sample_router());

    let response = client
        .request(TestRequest::get("/items").header("Accept-Version", "^1.0"))
        .await;
    response
        .assert_status(StatusCode::OK)
        .assert_header("x-api-version", "1.2.0")
        .assert_body("items v1.2");
}

#[tokio::test]
async fn rejections_surface_as_client_errors() {
    let client = TestClient::new(sample_router());

    let response = client
        .request(TestRequest::get("/items").header("Accept-Version", "=3.0.0"))
        .await;
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body("Version =3.0.0 is not supported");
}

#[tokio::test]
async fn reexported_engine_agrees_with_negotiation() {
    // The re-exported engine is the same primitive the resolver consults.
    let range = semroute::semver::VersionReq::parse("^1.0").unwrap();
    assert!(range.matches(&semroute::semver::Version::new(1, 2, 0)));

    let client = TestClient::new(sample_router());
    let response = client
        .request(TestRequest::get("/items").header("Accept-Version", "^1.0"))
        .await;
    response.assert_header("x-api-version", "1.2.0");
}

#[tokio::test]
async fn handlers_can_read_the_negotiated_version() {
    let router = Router::new().route(
        "/version",
        versioned()
            .on("1.0.0", |req: Request, _next: Next| async move {
                let version = req
                    .extensions()
                    .get::<ApiVersion>()
                    .map(|v| v.as_str().to_string())
                    .unwrap_or_default();
                format!("serving {version}")
            })
            .build(&config())
            .unwrap(),
    );
    let client = TestClient::new(router);

    let response = client.get("/version").await;
    response
        .assert_status(StatusCode::OK)
        .assert_body("serving 1.0.0");
}
