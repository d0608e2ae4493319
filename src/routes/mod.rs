pub mod admin;
pub mod auth;
pub mod todo_list;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Every route is served from the root; there is no API prefix.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::router(state.clone()))
        .merge(todo_list::router(state.clone()))
        .merge(admin::router(state))
}
