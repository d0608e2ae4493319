use std::sync::Arc;

use crate::{config::AuthConfig, services::ServiceContext};

use super::{
    jwt::JwtKeys,
    providers::{ActiveProvider, AuthProviderId, LocalAuthProvider},
};

pub fn build_provider(cfg: &AuthConfig, services: &ServiceContext) -> ActiveProvider {
    match cfg.provider {
        AuthProviderId::Local => {
            let jwt = JwtKeys::from_secret(cfg.jwt_secret.as_bytes());
            ActiveProvider::new(Arc::new(LocalAuthProvider::new(
                services.user(),
                services.refresh_token_dao(),
                jwt,
                cfg.access_ttl_secs,
            )))
        }
    }
}

/// Builds the configured provider and seeds the admin account before serving.
pub async fn init_provider(
    cfg: &AuthConfig,
    services: &ServiceContext,
) -> anyhow::Result<ActiveProvider> {
    let provider = build_provider(cfg, services);
    services.auth(&provider).seed_admin(cfg).await?;
    tracing::info!(provider = provider.id().as_str(), "auth provider ready");
    Ok(provider)
}
