mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{services_for, spawn_apis};
use std::sync::Arc;
use tower::ServiceExt;
use trip_planner::web;

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/plan")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn index_serves_the_form() {
    let app = web::router(Arc::new(services_for("http://127.0.0.1:9", "m")));
    let resp = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("AI Travel Planner"));
    assert!(html.contains("Generate Itinerary"));
    assert!(html.contains(r#"<option value="Budget" selected>"#));
    assert!(html.contains("Mid-range"));
}

#[tokio::test]
async fn health_is_ok() {
    let app = web::router(Arc::new(services_for("http://127.0.0.1:9", "m")));
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");
}

#[tokio::test]
async fn invalid_submission_shows_error_and_keeps_input() {
    let app = web::router(Arc::new(services_for("http://127.0.0.1:9", "m")));
    let resp = app
        .oneshot(post_form("source_city=Pune&destination=&days=3&travel_style=Luxury"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Something went wrong: Invalid trip request: destination is required"));
    assert!(html.contains(r#"value="Pune""#));
    assert!(html.contains(r#"<option value="Luxury" selected>"#));
}

#[tokio::test]
async fn submission_renders_trip_page() {
    let (base, _) = spawn_apis().await;
    let app = web::router(Arc::new(services_for(&base, "gemini-2.5-flash")));
    let resp = app
        .oneshot(post_form(
            "source_city=Mumbai&destination=goa&days=2&interests=food&travel_style=Mid-range&budget=",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("📍 Goa"));
    assert!(html.contains("Day 1"));
    assert!(html.contains("Estimated Cost"));
}

#[tokio::test]
async fn generation_failure_shows_something_went_wrong() {
    let (base, _) = spawn_apis().await;
    let app = web::router(Arc::new(services_for(&base, "broken-model")));
    let resp = app
        .oneshot(post_form("destination=Goa&days=2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Something went wrong: "));
    assert!(html.contains(r#"value="Goa""#));
}

#[tokio::test]
async fn user_text_is_escaped() {
    let app = web::router(Arc::new(services_for("http://127.0.0.1:9", "m")));
    let resp = app
        .oneshot(post_form("destination=&source_city=%3Cscript%3Ex%3C%2Fscript%3E"))
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(!html.contains("<script>x</script>"));
    assert!(html.contains("script"));
}
