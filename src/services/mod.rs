pub mod admin_service;
pub mod auth_service;
pub mod context;
pub mod export_service;
pub mod file_service;
pub mod todo_service;
pub mod user_service;

pub use context::ServiceContext;
