use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::todo_item,
    error::AppError,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        todo_service::{TodoDraft, TodoReplacement},
    },
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub owner_id: String,
}

impl From<todo_item::Model> for TodoItemResponse {
    fn from(model: todo_item::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            owner_id: model.owner_id.to_string(),
        }
    }
}

/// Any `ownerId` in the body is ignored; the caller becomes the owner.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default, alias = "userId")]
    pub owner_id: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.storage.max_upload_bytes;

    Router::new()
        .route("/ToDoList", get(list_items).post(create_item))
        .route(
            "/ToDoList/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/ToDoList/send-email", post(send_email))
        .route(
            "/ToDoList/upload",
            post(upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/ToDoList/download/{file_name}", get(download_file))
        .with_state(state)
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<Vec<TodoItemResponse>> {
    let caller_id = claims.user_id()?;
    let items = ServiceContext::from_state(state.as_ref())
        .todo()
        .list(&caller_id)
        .await?;
    JsonApiResponse::ok(items.into_iter().map(Into::into).collect())
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<i32>,
) -> ApiResult<TodoItemResponse> {
    let caller_id = claims.user_id()?;
    let item = ServiceContext::from_state(state.as_ref())
        .todo()
        .get(&caller_id, id)
        .await?;
    JsonApiResponse::ok(item.into())
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<CreateTodoRequest>,
) -> ApiResult<TodoItemResponse> {
    let caller_id = claims.user_id()?;
    let draft = TodoDraft {
        title: body.title,
        description: body.description,
    };
    let item = ServiceContext::from_state(state.as_ref())
        .todo()
        .create(&caller_id, draft)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "created", item.into())
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<i32>,
    Json(body): Json<UpdateTodoRequest>,
) -> ApiResult<serde_json::Value> {
    let caller_id = claims.user_id()?;
    let replacement = TodoReplacement {
        id: body.id,
        owner_id: body.owner_id,
        title: body.title,
        description: body.description,
    };
    ServiceContext::from_state(state.as_ref())
        .todo()
        .update(&caller_id, id, replacement)
        .await?;
    JsonApiResponse::no_content()
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let caller_id = claims.user_id()?;
    ServiceContext::from_state(state.as_ref())
        .todo()
        .delete(&caller_id, id)
        .await?;
    JsonApiResponse::no_content()
}

async fn send_email(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<serde_json::Value> {
    let caller_id = claims.user_id()?;
    ServiceContext::from_state(state.as_ref())
        .export(state.identity.clone(), state.mailer.clone())
        .send_to_caller(&caller_id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Email sent", serde_json::Value::Null)
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let caller_id = claims.user_id()?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.body_text()))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(err.body_text()))?;

        let file_name = ServiceContext::from_state(state.as_ref())
            .files(state.files.clone())
            .upload(&caller_id, Some(&original_name), &bytes)
            .await?;
        return JsonApiResponse::ok(UploadResponse { file_name });
    }

    Err(AppError::bad_request("No file uploaded"))
}

async fn download_file(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let caller_id = claims.user_id()?;
    let stored = ServiceContext::from_state(state.as_ref())
        .files(state.files.clone())
        .download(&caller_id, &file_name)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", stored.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, stored.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        stored.bytes,
    )
        .into_response())
}
