pub mod base;
mod context;
pub mod error;
pub mod refresh_token_dao;
pub mod role_dao;
pub mod todo_dao;
pub mod user_dao;

pub use base::{ActiveModelOf, DaoBase, ModelOf, PrimaryKeyOf};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use refresh_token_dao::RefreshTokenDao;
pub use role_dao::RoleDao;
pub use todo_dao::TodoDao;
pub use user_dao::UserDao;
