use serde::{Deserialize, Serialize};

/// A customer as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub member_since: String, // YYYY-MM-DD
    pub status: String,       // "active" or "suspended"
}

/// Body for create (all fields required) and update (any subset).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_since: Option<String>,
}

impl CustomerInput {
    /// A complete create body.
    pub fn new(name: &str, address: &str, email: &str, phone_number: &str, member_since: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            address: Some(address.to_string()),
            email: Some(email.to_string()),
            phone_number: Some(phone_number.to_string()),
            member_since: Some(member_since.to_string()),
        }
    }
}

/// Query-string filters for listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
