use async_trait::async_trait;
use uuid::Uuid;

use super::{IdentityStore, IdentityUser};
use crate::{db::entities::user, error::AppError, services::user_service::UserService};

#[derive(Clone)]
pub struct DbIdentityStore {
    users: UserService,
}

impl DbIdentityStore {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }

    async fn require_role_id(&self, role: &str) -> Result<Uuid, AppError> {
        self.users
            .find_role(role)
            .await?
            .map(|model| model.id)
            .ok_or_else(|| AppError::not_found(format!("Role '{role}' does not exist")))
    }
}

fn parse_user_id(user: &IdentityUser) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::not_found("User not found"))
}

impl From<user::Model> for IdentityUser {
    fn from(model: user::Model) -> Self {
        let email = Some(model.email).filter(|email| !email.trim().is_empty());
        Self {
            id: model.id.to_string(),
            user_name: model.user_name,
            email,
        }
    }
}

#[async_trait]
impl IdentityStore for DbIdentityStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<IdentityUser>, AppError> {
        let Ok(id) = Uuid::parse_str(user_id.trim()) else {
            return Ok(None);
        };
        Ok(self.users.find_by_id(&id).await?.map(IdentityUser::from))
    }

    async fn is_in_role(&self, user: &IdentityUser, role: &str) -> Result<bool, AppError> {
        let user_id = parse_user_id(user)?;
        let Some(role) = self.users.find_role(role).await? else {
            return Ok(false);
        };
        self.users.has_role(&user_id, &role.id).await
    }

    async fn add_to_role(&self, user: &IdentityUser, role: &str) -> Result<(), AppError> {
        let user_id = parse_user_id(user)?;
        let role_id = self.require_role_id(role).await?;
        self.users.add_to_role(&user_id, &role_id).await
    }

    async fn role_exists(&self, role: &str) -> Result<bool, AppError> {
        Ok(self.users.find_role(role).await?.is_some())
    }

    async fn create_role(&self, role: &str) -> Result<(), AppError> {
        self.users.create_role(role).await?;
        Ok(())
    }
}
