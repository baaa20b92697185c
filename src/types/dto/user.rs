use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// User as exposed over the API. The password hash is deliberately absent.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: i64,

    /// Display name
    pub full_name: String,

    /// Login name
    pub user_name: String,

    /// HIS account code
    pub his_code_acc: String,

    /// Contact phone number
    pub phone_number: String,

    /// Job title
    pub job_title: String,

    /// Code of the department this user belongs to
    pub department_code: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            user_name: u.user_name,
            his_code_acc: u.his_code_acc,
            phone_number: u.phone_number,
            job_title: u.job_title,
            department_code: u.department_code,
        }
    }
}

/// Request model for creating a user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Display name
    pub full_name: String,

    /// Login name (unique)
    pub user_name: String,

    /// HIS account code (unique, used as the login handle)
    pub his_code_acc: String,

    /// Initial plaintext password; hashed before storage
    pub password: String,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Job title
    pub job_title: Option<String>,

    /// Code of the department this user belongs to
    pub department_code: Option<String>,
}

/// Request model for updating a user's profile
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// Display name
    pub full_name: String,

    /// HIS account code
    pub his_code_acc: String,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Job title
    pub job_title: Option<String>,

    /// Code of the department this user belongs to
    pub department_code: Option<String>,

    /// New plaintext password; when present the stored hash is rewritten
    pub password: Option<String>,
}

/// Request model for assigning a role to a user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    /// ID of the role to assign
    pub role_id: i32,
}
