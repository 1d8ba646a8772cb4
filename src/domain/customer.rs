//! The customer record and the payloads that create and modify it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::value_objects::{required_text, Email, PhoneNumber, ADDRESS_MAX_LEN, NAME_MAX_LEN};

/// Account status. Only `Active → Suspended` is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Suspended,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CustomerStatus::Active),
            "suspended" => Ok(CustomerStatus::Suspended),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// A persisted customer as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone_number: String,
    pub member_since: NaiveDate,
    pub status: CustomerStatus,

    /// Audit fields, kept in the store but not exposed over the API.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub last_updated: DateTime<Utc>,
}

impl Customer {
    pub fn is_suspended(&self) -> bool {
        self.status == CustomerStatus::Suspended
    }
}

/// Create request body. Fields are optional here so that a missing one is
/// reported by [`NewCustomer::validate`] rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCustomer {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phone")]
    pub phone_number: Option<String>,
    pub member_since: Option<String>,
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub address: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub member_since: NaiveDate,
}

impl NewCustomer {
    /// Check every required field, in column order.
    pub fn validate(self) -> Result<CustomerDraft, ValidationError> {
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        let address = self.address.ok_or(ValidationError::MissingField("address"))?;
        let email = self.email.ok_or(ValidationError::MissingField("email"))?;
        let phone = self
            .phone_number
            .ok_or(ValidationError::MissingField("phone_number"))?;
        let member_since = self
            .member_since
            .ok_or(ValidationError::MissingField("member_since"))?;

        Ok(CustomerDraft {
            name: required_text("name", &name, NAME_MAX_LEN)?,
            address: required_text("address", &address, ADDRESS_MAX_LEN)?,
            email: Email::parse(&email)?,
            phone_number: PhoneNumber::parse(&phone)?,
            member_since: parse_date("member_since", &member_since)?,
        })
    }
}

/// Update request body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phone")]
    pub phone_number: Option<String>,
    pub member_since: Option<String>,
}

/// A validated update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<Email>,
    pub phone_number: Option<PhoneNumber>,
    pub member_since: Option<NaiveDate>,
}

impl CustomerChanges {
    pub fn validate(self) -> Result<CustomerPatch, ValidationError> {
        Ok(CustomerPatch {
            name: self
                .name
                .map(|v| required_text("name", &v, NAME_MAX_LEN))
                .transpose()?,
            address: self
                .address
                .map(|v| required_text("address", &v, ADDRESS_MAX_LEN))
                .transpose()?,
            email: self.email.map(|v| Email::parse(&v)).transpose()?,
            phone_number: self.phone_number.map(|v| PhoneNumber::parse(&v)).transpose()?,
            member_since: self
                .member_since
                .map(|v| parse_date("member_since", &v))
                .transpose()?,
        })
    }
}

impl CustomerPatch {
    /// Overwrite the provided fields on `customer`. Identity and status are untouched.
    pub fn apply(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(address) = &self.address {
            customer.address = address.clone();
        }
        if let Some(email) = &self.email {
            customer.email = email.as_str().to_string();
        }
        if let Some(phone) = &self.phone_number {
            customer.phone_number = phone.as_str().to_string();
        }
        if let Some(member_since) = self.member_since {
            customer.member_since = member_since;
        }
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewCustomer {
        NewCustomer {
            name: Some("Alice".into()),
            address: Some("1 Main St".into()),
            email: Some("a@x.com".into()),
            phone_number: Some("555-1234".into()),
            member_since: Some("2023-01-01".into()),
        }
    }

    #[test]
    fn test_validate_new_customer() {
        let draft = alice().validate().unwrap();
        assert_eq!(draft.name, "Alice");
        assert_eq!(draft.email.as_str(), "a@x.com");
        assert_eq!(draft.member_since, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn test_missing_field_reported_by_name() {
        let mut body = alice();
        body.phone_number = None;
        assert_eq!(body.validate(), Err(ValidationError::MissingField("phone_number")));

        assert_eq!(
            NewCustomer::default().validate(),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut body = alice();
        body.member_since = Some("01/01/2023".into());
        assert!(matches!(body.validate(), Err(ValidationError::InvalidDate { .. })));
    }

    #[test]
    fn test_phone_alias_and_ignored_fields() {
        let body: NewCustomer = serde_json::from_value(serde_json::json!({
            "id": 99,
            "status": "suspended",
            "name": "Alice",
            "address": "1 Main St",
            "email": "a@x.com",
            "phone": "555-1234",
            "member_since": "2023-01-01"
        }))
        .unwrap();
        assert_eq!(body.validate().unwrap().phone_number.as_str(), "555-1234");
    }

    #[test]
    fn test_patch_applies_only_provided_fields() {
        let mut customer = Customer {
            id: 1,
            name: "Alice".into(),
            address: "1 Main St".into(),
            email: "a@x.com".into(),
            phone_number: "555-1234".into(),
            member_since: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            status: CustomerStatus::Suspended,
            created_at: Utc::now(),
            last_updated: Utc::now(),
        };

        let patch = CustomerChanges {
            name: Some("Ryan".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        patch.apply(&mut customer);

        assert_eq!(customer.id, 1);
        assert_eq!(customer.name, "Ryan");
        assert_eq!(customer.email, "a@x.com");
        assert_eq!(customer.status, CustomerStatus::Suspended);
    }

    #[test]
    fn test_status_parse_and_serialize() {
        assert_eq!("Suspended".parse::<CustomerStatus>().unwrap(), CustomerStatus::Suspended);
        assert!("deleted".parse::<CustomerStatus>().is_err());
        assert_eq!(serde_json::to_value(CustomerStatus::Active).unwrap(), "active");
    }

    #[test]
    fn test_serialized_shape_hides_audit_fields() {
        let customer = Customer {
            id: 7,
            name: "Alice".into(),
            address: "1 Main St".into(),
            email: "a@x.com".into(),
            phone_number: "555-1234".into(),
            member_since: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            status: CustomerStatus::Active,
            created_at: Utc::now(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["member_since"], "2023-01-01");
        assert_eq!(json["status"], "active");
        assert!(json.get("created_at").is_none());
    }
}
