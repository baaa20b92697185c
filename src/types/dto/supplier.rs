use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::supplier;

/// Supplier as exposed over the API
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SupplierResponse {
    /// Supplier ID
    pub id: i32,

    /// Company name
    pub name: String,

    /// Tax code
    pub tax_code: String,

    /// Contact person
    pub contact_person: String,

    /// Technical hotline
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Postal address
    pub address: String,

    /// Free-form capability notes
    pub note: String,
}

impl From<supplier::Model> for SupplierResponse {
    fn from(s: supplier::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            tax_code: s.tax_code,
            contact_person: s.contact_person,
            phone: s.phone,
            email: s.email,
            address: s.address,
            note: s.note,
        }
    }
}

/// Request model for creating or updating a supplier
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SupplierRequest {
    /// Company name
    pub name: String,

    /// Tax code
    pub tax_code: Option<String>,

    /// Contact person
    pub contact_person: Option<String>,

    /// Technical hotline
    pub phone: String,

    /// Contact email
    pub email: Option<String>,

    /// Postal address
    pub address: Option<String>,

    /// Free-form capability notes
    pub note: Option<String>,
}
