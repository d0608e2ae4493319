#[allow(unused_imports)]
pub mod prelude {
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::role::Entity as Role;
    pub use super::todo_item::Entity as TodoItem;
    pub use super::user::Entity as User;
    pub use super::user_role::Entity as UserRole;
}

pub mod refresh_token;
pub mod role;
pub mod todo_item;
pub mod user;
pub mod user_role;
