use std::sync::Arc;

use crate::{
    db::entities::todo_item, error::AppError, identity::IdentityStore,
    services::todo_service::TodoService,
};

/// Operations behind the admin surface. Callers are gated on the admin role
/// before reaching this service.
#[derive(Clone)]
pub struct AdminService {
    todos: TodoService,
    identity: Arc<dyn IdentityStore>,
}

impl AdminService {
    pub fn new(todos: TodoService, identity: Arc<dyn IdentityStore>) -> Self {
        Self { todos, identity }
    }

    pub async fn list_all(&self) -> Result<Vec<todo_item::Model>, AppError> {
        let items = self.todos.list_all().await?;
        tracing::info!(items = items.len(), "admin listed every to-do item");
        Ok(items)
    }

    pub async fn delete_any(&self, id: i32) -> Result<(), AppError> {
        self.todos.delete_any(id).await?;
        tracing::info!(item_id = id, "admin deleted to-do item");
        Ok(())
    }

    pub async fn create_role(&self, role_name: &str) -> Result<(), AppError> {
        let role_name = role_name.trim();
        if role_name.is_empty() {
            tracing::warn!("rejected blank role name");
            return Err(AppError::bad_request("Role name is required"));
        }
        if self.identity.role_exists(role_name).await? {
            tracing::warn!(role = role_name, "role already exists");
            return Err(AppError::conflict(format!("Role '{role_name}' already exists")));
        }

        self.identity
            .create_role(role_name)
            .await
            .map_err(|err| AppError::internal_with_source("Failed to create role", err))?;
        tracing::info!(role = role_name, "created role");
        Ok(())
    }

    pub async fn assign_role(&self, user_id: &str, role_name: &str) -> Result<(), AppError> {
        let user = self
            .identity
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id, role = role_name, "role assignment for unknown user");
                AppError::not_found("User not found")
            })?;

        let role_name = role_name.trim();
        if !self.identity.role_exists(role_name).await? {
            tracing::warn!(user_id = %user.id, role = role_name, "role assignment for unknown role");
            return Err(AppError::not_found(format!("Role '{role_name}' does not exist")));
        }
        if self.identity.is_in_role(&user, role_name).await? {
            tracing::warn!(user_id = %user.id, role = role_name, "role already held");
            return Err(AppError::bad_request(format!(
                "User already has role '{role_name}'"
            )));
        }

        self.identity.add_to_role(&user, role_name).await?;
        tracing::info!(user_id = %user.id, role = role_name, "assigned role");
        Ok(())
    }
}
