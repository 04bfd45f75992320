pub mod auth;

pub use auth::{admin_auth_middleware, ADMIN_SECRET_HEADER};
