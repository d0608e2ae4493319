pub mod local;
mod provider;

pub use local::LocalAuthProvider;
pub use provider::{ActiveProvider, AuthProvider, AuthProviderId};
