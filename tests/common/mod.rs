#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tempfile::TempDir;
use todo_api::test_helpers::{RecordingMailer, TestApp, spawn_test_app};
use tower::ServiceExt;

/// Keeps the upload directory alive for as long as the app is in use.
pub struct Harness {
    pub app: TestApp,
    pub upload_dir: TempDir,
}

pub async fn harness() -> Harness {
    harness_with_mailer(RecordingMailer::new()).await
}

pub async fn harness_with_mailer(mailer: RecordingMailer) -> Harness {
    let upload_dir = tempfile::tempdir().expect("create upload dir");
    let app = spawn_test_app(upload_dir.path(), mailer)
        .await
        .expect("spawn test app");
    Harness { app, upload_dir }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn json_response(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, payload: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

pub async fn user_with_token(app: &TestApp, email: &str) -> (uuid::Uuid, String) {
    let user = app.create_user(email).await.expect("create user");
    let token = app.bearer_for(&user.id).await.expect("issue token");
    (user.id, token)
}

pub async fn admin_token(app: &TestApp) -> String {
    let admin = app.admin_user().await.expect("seeded admin");
    app.bearer_for(&admin.id).await.expect("issue admin token")
}
