//! Authentication Module
//! Mission: Bearer-token login and per-request identity resolution

pub mod api;
pub mod jwt;
pub mod manager;
pub mod middleware;
pub mod models;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use manager::AuthenticationManager;
pub use middleware::{jwt_auth_filter, require_authentication, AuthFilter};
pub use user_store::{UserDirectory, UserStore};
