use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::providers::ActiveProvider,
    db::dao::{DaoContext, RefreshTokenDao},
    identity::{DbIdentityStore, IdentityStore},
    mail::Mailer,
    services::{
        admin_service::AdminService, auth_service::AuthService, export_service::ExportService,
        file_service::FileService, todo_service::TodoService, user_service::UserService,
    },
    state::AppState,
    storage::FileStore,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user(), self.daos.role())
    }

    pub fn todo(&self) -> TodoService {
        TodoService::new(self.daos.todo())
    }

    pub fn identity(&self) -> DbIdentityStore {
        DbIdentityStore::new(self.user())
    }

    pub fn admin(&self, identity: Arc<dyn IdentityStore>) -> AdminService {
        AdminService::new(self.todo(), identity)
    }

    pub fn export(
        &self,
        identity: Arc<dyn IdentityStore>,
        mailer: Arc<dyn Mailer>,
    ) -> ExportService {
        ExportService::new(self.todo(), identity, mailer)
    }

    pub fn files(&self, store: Arc<dyn FileStore>) -> FileService {
        FileService::new(store)
    }

    pub fn auth<'a>(&self, provider: &'a ActiveProvider) -> AuthService<'a> {
        AuthService::new(provider)
    }

    pub fn refresh_token_dao(&self) -> RefreshTokenDao {
        self.daos.refresh_token()
    }
}
