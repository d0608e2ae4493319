mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{empty_request, harness, harness_with_mailer, json_request, json_response, user_with_token};
use todo_api::test_helpers::RecordingMailer;

#[tokio::test]
async fn export_mails_rendered_list_to_caller() {
    let h = harness().await;
    let (_, token) = user_with_token(&h.app, "alice@example.com").await;

    for (title, description) in [("A", "B"), ("C", "")] {
        json_response(
            &h.app,
            json_request(
                "POST",
                "/ToDoList",
                Some(&token),
                json!({"title": title, "description": description}),
            ),
        )
        .await;
    }

    let (status, json) = json_response(
        &h.app,
        empty_request("POST", "/ToDoList/send-email", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Email sent");

    let sent = h.app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_address, "alice@example.com");
    assert_eq!(sent[0].to_name, "alice@example.com");
    assert_eq!(sent[0].subject, "Your to-do list");
    assert_eq!(sent[0].body, "Your to-do list:\n- A:\nB\n\n- C:\n\n\n");
}

#[tokio::test]
async fn export_transport_failure_is_server_error() {
    let h = harness_with_mailer(RecordingMailer::failing()).await;
    let (_, token) = user_with_token(&h.app, "alice@example.com").await;

    let (status, json) = json_response(
        &h.app,
        empty_request("POST", "/ToDoList/send-email", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to send email");
    assert!(h.app.mailer.sent().is_empty());
}

#[tokio::test]
async fn export_for_deleted_account_is_not_found() {
    let h = harness().await;
    let token = h
        .app
        .bearer_for(&uuid::Uuid::new_v4())
        .await
        .unwrap();

    let (status, _) = json_response(
        &h.app,
        empty_request("POST", "/ToDoList/send-email", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
