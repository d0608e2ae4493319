use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
};
use serde::Deserialize;

use crate::{
    auth::ADMIN_ROLE,
    middleware::{RequireRoleLayer, jwt_auth},
    response::{ApiResult, JsonApiResponse},
    routes::todo_list::TodoItemResponse,
    services::{ServiceContext, admin_service::AdminService},
    state::AppState,
};

/// Accepted as `?roleName=` or as a JSON body; the query string wins.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub role_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub role: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/AdminToDoList/AllToDoLists", get(all_items))
        .route("/AdminToDoList/DeleteToDoList/{id}", delete(delete_item))
        .route("/AdminToDoList/CreateRole", post(create_role))
        .route("/AdminToDoList/AssignRole", post(assign_role))
        .route_layer(RequireRoleLayer::new(ADMIN_ROLE))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

fn admin_service(state: &AppState) -> AdminService {
    ServiceContext::from_state(state).admin(state.identity.clone())
}

async fn all_items(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TodoItemResponse>> {
    let items = admin_service(state.as_ref()).list_all().await?;
    JsonApiResponse::ok(items.into_iter().map(Into::into).collect())
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    admin_service(state.as_ref()).delete_any(id).await?;
    JsonApiResponse::no_content()
}

async fn create_role(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateRoleRequest>,
    body: Option<Json<CreateRoleRequest>>,
) -> ApiResult<serde_json::Value> {
    let role_name = query
        .role_name
        .or_else(|| body.and_then(|Json(body)| body.role_name))
        .unwrap_or_default();
    admin_service(state.as_ref()).create_role(&role_name).await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        format!("Role '{}' created", role_name.trim()),
        serde_json::Value::Null,
    )
}

async fn assign_role(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AssignRoleRequest>,
) -> ApiResult<serde_json::Value> {
    admin_service(state.as_ref())
        .assign_role(&body.user_id, &body.role)
        .await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        format!("Role '{}' assigned", body.role.trim()),
        serde_json::Value::Null,
    )
}
