use poem_openapi::payload::{Json, PlainText};
use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::dto::common::ErrorResponse;

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login handle (HIS account code)
    pub username: String,

    /// Plaintext password
    pub password: String,
}

/// Public profile returned after a successful login. Never carries the
/// password hash.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PublicUserProfile {
    /// User ID
    pub id: i64,

    /// Display name
    pub full_name: String,

    /// HIS account code
    pub his_code: String,

    /// Codes of the roles assigned to this user
    pub roles: Vec<String>,
}

/// Response model for a successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token, valid for 24 hours
    pub token: String,

    /// Minimal public profile of the authenticated user
    pub user: PublicUserProfile,
}

/// API response for the bootstrap admin provisioning endpoint
#[derive(ApiResponse)]
pub enum SeedAdminApiResponse {
    /// Admin account created
    #[oai(status = 200)]
    Ok(PlainText<String>),

    /// The store already holds at least one account
    #[oai(status = 400)]
    Conflict(PlainText<String>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}
