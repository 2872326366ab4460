use axum::http::StatusCode;

use appleverse_backend::models::GenericResponse;
use helper::*;

mod helper;

#[tokio::test]
async fn test_default_route_handler() {
    let t = TestApp::new();
    let res = send(&t.app, build_get_request("/", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    let default_res: GenericResponse = serde_json::from_slice(&body).unwrap();
    assert!(default_res.success);
    assert_eq!(default_res.message, "Appleverse server is running");
}

#[tokio::test]
async fn test_ping_handler() {
    let t = TestApp::new();
    let res = send(&t.app, build_get_request("/api/v1/ping", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_global_404_handler() {
    let t = TestApp::new();
    let res = send(&t.app, build_get_request("/a-not-existing-path", None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = read_json(res).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let t = TestApp::new();
    let res = send(&t.app, build_get_request("/api-docs/openapi.json", None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert!(body["paths"]["/api/v1/auth/request-otp"].is_object());
}

#[tokio::test]
async fn test_admin_routes_need_admin_token() {
    let t = TestApp::new();
    let res = send(&t.app, build_get_request("/api/v1/admin/pending-requests", None)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let user = appleverse_backend::jwt::JWT_KEYS
        .generate_token(1, appleverse_backend::models::PrincipalKind::User)
        .unwrap();
    let res = send(
        &t.app,
        build_get_request("/api/v1/admin/pending-requests", Some(&user)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
