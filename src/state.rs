use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::providers::ActiveProvider, config::AppConfig, identity::IdentityStore, mail::Mailer,
    storage::FileStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub auth_provider: ActiveProvider,
    pub identity: Arc<dyn IdentityStore>,
    pub mailer: Arc<dyn Mailer>,
    pub files: Arc<dyn FileStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        auth_provider: ActiveProvider,
        identity: Arc<dyn IdentityStore>,
        mailer: Arc<dyn Mailer>,
        files: Arc<dyn FileStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            auth_provider,
            identity,
            mailer,
            files,
        })
    }
}
