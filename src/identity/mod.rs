//! User and role lookups consumed by the admin and export services.

mod store;

use async_trait::async_trait;

use crate::error::AppError;

pub use store::DbIdentityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: String,
    pub user_name: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// `None` for unknown ids, including ids that are not well-formed.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<IdentityUser>, AppError>;
    async fn is_in_role(&self, user: &IdentityUser, role: &str) -> Result<bool, AppError>;
    async fn add_to_role(&self, user: &IdentityUser, role: &str) -> Result<(), AppError>;
    async fn role_exists(&self, role: &str) -> Result<bool, AppError>;
    async fn create_role(&self, role: &str) -> Result<(), AppError>;
}
