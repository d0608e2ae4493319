use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::auth::bearer_token;
use crate::{auth::Claims, error::AppError, state::AppState};

// Reuses claims already placed by `jwt_auth`, otherwise verifies the bearer token.
impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(claims);
        }

        let token = bearer_token(&parts.headers)?;
        let claims = state.auth_provider.get().verify(token).await?;
        parts.extensions.insert(claims.clone());
        Ok(claims)
    }
}

pub type AuthGuard = Claims;
