use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::department;

/// Department as exposed over the API
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DepartmentResponse {
    /// Department ID
    pub id: i16,

    /// Unique department code, e.g. "CNTT"
    pub department_code: String,

    /// Full department name
    pub full_name: String,

    /// Optional description
    pub description: Option<String>,

    /// Whether the department is active
    pub is_active: bool,
}

impl From<department::Model> for DepartmentResponse {
    fn from(d: department::Model) -> Self {
        Self {
            id: d.id,
            department_code: d.department_code,
            full_name: d.full_name,
            description: d.description,
            is_active: d.is_active,
        }
    }
}

/// Request model for creating a department
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    /// Unique department code
    pub department_code: String,

    /// Full department name
    pub full_name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Request model for updating a department
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateDepartmentRequest {
    /// Department code; uniqueness is re-checked when it changes
    pub department_code: String,

    /// Full department name
    pub full_name: String,

    /// Optional description
    pub description: Option<String>,

    /// Whether the department is active
    pub is_active: bool,
}
