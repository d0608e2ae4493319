mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{admin_token, empty_request, harness, json_request, json_response, send, user_with_token};

#[tokio::test]
async fn admin_routes_reject_missing_token_and_non_admins() {
    let h = harness().await;
    let (_, alice) = user_with_token(&h.app, "alice@example.com").await;

    let (status, json) = json_response(
        &h.app,
        empty_request("GET", "/AdminToDoList/AllToDoLists", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["status"], 401);

    let (status, json) = json_response(
        &h.app,
        empty_request("GET", "/AdminToDoList/AllToDoLists", Some(&alice)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Missing required role");
}

#[tokio::test]
async fn admin_lists_and_deletes_items_of_any_owner() {
    let h = harness().await;
    let admin = admin_token(&h.app).await;
    let (_, alice) = user_with_token(&h.app, "alice@example.com").await;
    let (_, bob) = user_with_token(&h.app, "bob@example.com").await;

    let (_, first) = json_response(
        &h.app,
        json_request("POST", "/ToDoList", Some(&alice), json!({"title": "alice item"})),
    )
    .await;
    json_response(
        &h.app,
        json_request("POST", "/ToDoList", Some(&bob), json!({"title": "bob item"})),
    )
    .await;

    let (status, json) = json_response(
        &h.app,
        empty_request("GET", "/AdminToDoList/AllToDoLists", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let id = first["data"]["id"].as_i64().unwrap();
    let uri = format!("/AdminToDoList/DeleteToDoList/{id}");
    let response = send(&h.app, empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = json_response(&h.app, empty_request("DELETE", &uri, Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_role_validates_and_conflicts_on_duplicates() {
    let h = harness().await;
    let admin = admin_token(&h.app).await;

    let (status, _) = json_response(
        &h.app,
        json_request("POST", "/AdminToDoList/CreateRole", Some(&admin), json!({"roleName": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = json_response(
        &h.app,
        json_request(
            "POST",
            "/AdminToDoList/CreateRole",
            Some(&admin),
            json!({"roleName": "auditor"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Role 'auditor' created");

    let (status, _) = json_response(
        &h.app,
        json_request(
            "POST",
            "/AdminToDoList/CreateRole",
            Some(&admin),
            json!({"roleName": "auditor"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_role_accepts_role_name_in_query_string() {
    let h = harness().await;
    let admin = admin_token(&h.app).await;

    let (status, json) = json_response(
        &h.app,
        empty_request("POST", "/AdminToDoList/CreateRole?roleName=auditor", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Role 'auditor' created");

    let (status, _) = json_response(
        &h.app,
        empty_request("POST", "/AdminToDoList/CreateRole?roleName=auditor", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = json_response(
        &h.app,
        empty_request("POST", "/AdminToDoList/CreateRole", Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Role name is required");
}

#[tokio::test]
async fn assign_role_checks_user_role_and_prior_membership() {
    let h = harness().await;
    let admin = admin_token(&h.app).await;
    let (alice_id, _) = user_with_token(&h.app, "alice@example.com").await;

    json_response(
        &h.app,
        json_request(
            "POST",
            "/AdminToDoList/CreateRole",
            Some(&admin),
            json!({"roleName": "auditor"}),
        ),
    )
    .await;

    let assign = |user_id: String, role: &str| {
        json_request(
            "POST",
            "/AdminToDoList/AssignRole",
            Some(&admin),
            json!({"userId": user_id, "role": role}),
        )
    };

    let (status, _) = json_response(&h.app, assign("not-a-user".to_string(), "auditor")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_response(&h.app, assign(alice_id.to_string(), "ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_response(&h.app, assign(alice_id.to_string(), "auditor")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = json_response(&h.app, assign(alice_id.to_string(), "auditor")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn granted_admin_role_opens_admin_routes_on_next_token() {
    let h = harness().await;
    let admin = admin_token(&h.app).await;
    let (alice_id, _) = user_with_token(&h.app, "alice@example.com").await;

    let (status, _) = json_response(
        &h.app,
        json_request(
            "POST",
            "/AdminToDoList/AssignRole",
            Some(&admin),
            json!({"userId": alice_id.to_string(), "role": "admin"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let alice = h.app.bearer_for(&alice_id).await.unwrap();
    let (status, _) = json_response(
        &h.app,
        empty_request("GET", "/AdminToDoList/AllToDoLists", Some(&alice)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
