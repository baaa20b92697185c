pub mod api;
pub mod auth;
pub mod internal;

pub use api::ApiError;
pub use auth::{AuthError, LOGIN_FAILED_MESSAGE};
pub use internal::StoreError;
