use crate::{
    auth::{Claims, TokenBundle, providers::ActiveProvider},
    config::AuthConfig,
    error::AppError,
};

#[derive(Clone, Copy)]
pub struct AuthService<'a> {
    provider: &'a ActiveProvider,
}

impl<'a> AuthService<'a> {
    pub fn new(provider: &'a ActiveProvider) -> Self {
        Self { provider }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        self.provider.get().register(email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenBundle, AppError> {
        self.provider.get().login(email, password).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        self.provider.get().refresh(refresh_token).await
    }

    pub async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        self.provider.get().verify(access_token).await
    }

    pub async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        self.provider.get().seed_admin(cfg).await
    }
}
