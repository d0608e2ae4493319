use uuid::Uuid;

use crate::{
    db::dao::{DaoBase, RoleDao, UserDao},
    db::entities::{role, user},
    error::AppError,
};

/// Users, roles and memberships backing both token issuance and the identity store.
#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
    role_dao: RoleDao,
}

impl UserService {
    pub fn new(user_dao: UserDao, role_dao: RoleDao) -> Self {
        Self { user_dao, role_dao }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_id(*id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_email(email).await?)
    }

    pub async fn create_user(
        &self,
        email: &str,
        user_name: &str,
        password_hash: &str,
    ) -> Result<user::Model, AppError> {
        Ok(self
            .user_dao
            .create_user(email, user_name, password_hash)
            .await?)
    }

    pub async fn set_last_login(
        &self,
        user_id: &Uuid,
        last_login: &chrono::DateTime<chrono::FixedOffset>,
    ) -> Result<(), AppError> {
        Ok(self.user_dao.set_last_login(user_id, last_login).await?)
    }

    pub async fn role_names(&self, user_id: &Uuid) -> Result<Vec<String>, AppError> {
        Ok(self.role_dao.names_for_user(user_id).await?)
    }

    pub async fn find_role(&self, name: &str) -> Result<Option<role::Model>, AppError> {
        Ok(self.role_dao.find_by_name(name).await?)
    }

    pub async fn create_role(&self, name: &str) -> Result<role::Model, AppError> {
        Ok(self.role_dao.create_role(name).await?)
    }

    pub async fn has_role(&self, user_id: &Uuid, role_id: &Uuid) -> Result<bool, AppError> {
        Ok(self.role_dao.is_member(user_id, role_id).await?)
    }

    pub async fn add_to_role(&self, user_id: &Uuid, role_id: &Uuid) -> Result<(), AppError> {
        Ok(self.role_dao.add_member(user_id, role_id).await?)
    }
}
