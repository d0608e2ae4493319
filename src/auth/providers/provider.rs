use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{Claims, TokenBundle},
    config::AuthConfig,
    error::AppError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderId {
    Local,
}

impl AuthProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProviderId::Local => "local",
        }
    }
}

impl std::str::FromStr for AuthProviderId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(AuthProviderId::Local),
            other => Err(format!("unsupported auth provider: {other}")),
        }
    }
}

/// Issues and verifies bearer tokens for one identity backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn id(&self) -> AuthProviderId;

    async fn register(&self, email: &str, password: &str) -> Result<TokenBundle, AppError>;
    async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError>;
    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError>;
    async fn verify(&self, access_token: &str) -> Result<Claims, AppError>;

    /// Makes sure the configured admin account exists and holds the admin role.
    async fn seed_admin(&self, _cfg: &AuthConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The provider chosen by `auth.provider`, shared by every request.
#[derive(Clone)]
pub struct ActiveProvider(Arc<dyn AuthProvider>);

impl ActiveProvider {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self(provider)
    }

    pub fn id(&self) -> AuthProviderId {
        self.0.id()
    }

    pub fn get(&self) -> &dyn AuthProvider {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{ActiveProvider, AuthProvider, AuthProviderId};
    use crate::{
        auth::{Claims, TokenBundle},
        error::AppError,
    };

    struct NullProvider;

    #[async_trait]
    impl AuthProvider for NullProvider {
        fn id(&self) -> AuthProviderId {
            AuthProviderId::Local
        }

        async fn register(&self, _email: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<TokenBundle, AppError> {
            Err(AppError::unauthorized("not used"))
        }

        async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
            Ok(Claims {
                sub: access_token.to_string(),
                exp: 0,
                iat: 0,
                roles: Vec::new(),
            })
        }
    }

    #[test]
    fn provider_id_parses_case_insensitively() {
        assert_eq!("local".parse::<AuthProviderId>(), Ok(AuthProviderId::Local));
        assert_eq!(" LOCAL ".parse::<AuthProviderId>(), Ok(AuthProviderId::Local));
        assert!("ldap".parse::<AuthProviderId>().is_err());
    }

    #[tokio::test]
    async fn active_provider_delegates_to_wrapped_provider() {
        let active = ActiveProvider::new(Arc::new(NullProvider));
        assert_eq!(active.id(), AuthProviderId::Local);

        let claims = active
            .get()
            .verify("subject-1")
            .await
            .expect("verify should succeed");
        assert_eq!(claims.sub, "subject-1");
    }
}
