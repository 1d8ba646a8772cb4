//! List filters.
//!
//! `name` and `address` match by prefix; the remaining fields match exactly.
//! All provided filters must hold (conjunction). No filters lists everything.

use chrono::NaiveDate;
use serde::Deserialize;

use super::customer::{parse_date, Customer, CustomerStatus};
use super::error::ValidationError;

/// Query string accepted by `GET /customers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phone")]
    pub phone_number: Option<String>,
    pub member_since: Option<String>,
    pub status: Option<String>,
}

/// Parsed filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerQuery {
    pub name_prefix: Option<String>,
    pub address_prefix: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub member_since: Option<NaiveDate>,
    pub status: Option<CustomerStatus>,
}

impl TryFrom<ListParams> for CustomerQuery {
    type Error = ValidationError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        Ok(Self {
            name_prefix: non_empty(params.name),
            address_prefix: non_empty(params.address),
            email: non_empty(params.email),
            phone_number: non_empty(params.phone_number),
            member_since: non_empty(params.member_since)
                .map(|v| parse_date("member_since", &v))
                .transpose()?,
            status: non_empty(params.status).map(|v| v.parse()).transpose()?,
        })
    }
}

impl CustomerQuery {
    /// In-process evaluation, used by stores that cannot push filters down.
    pub fn matches(&self, customer: &Customer) -> bool {
        self.name_prefix
            .as_deref()
            .map_or(true, |p| customer.name.starts_with(p))
            && self
                .address_prefix
                .as_deref()
                .map_or(true, |p| customer.address.starts_with(p))
            && self.email.as_deref().map_or(true, |e| customer.email == e)
            && self
                .phone_number
                .as_deref()
                .map_or(true, |p| customer.phone_number == p)
            && self.member_since.map_or(true, |d| customer.member_since == d)
            && self.status.map_or(true, |s| customer.status == s)
    }
}

// Empty query-string values (`?name=`) are treated as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn customer(name: &str, address: &str, email: &str) -> Customer {
        Customer {
            id: 1,
            name: name.into(),
            address: address.into(),
            email: email.into(),
            phone_number: "555-1234".into(),
            member_since: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            status: CustomerStatus::Active,
            created_at: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_empty_query_matches_all() {
        let q = CustomerQuery::try_from(ListParams::default()).unwrap();
        assert_eq!(q, CustomerQuery::default());
        assert!(q.matches(&customer("Alice", "1 Main St", "a@x.com")));
    }

    #[test]
    fn test_prefix_and_exact_fields() {
        let q = CustomerQuery {
            name_prefix: Some("Al".into()),
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        assert!(q.matches(&customer("Alice", "1 Main St", "a@x.com")));
        assert!(q.matches(&customer("Albert", "2 Elm St", "a@x.com")));
        assert!(!q.matches(&customer("Bob", "1 Main St", "a@x.com")));

        let exact_email = CustomerQuery {
            email: Some("a@x.co".into()),
            ..Default::default()
        };
        assert!(!exact_email.matches(&customer("Alice", "1 Main St", "a@x.com")));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let q = CustomerQuery {
            name_prefix: Some("Alice".into()),
            address_prefix: Some("9".into()),
            ..Default::default()
        };
        assert!(!q.matches(&customer("Alice", "1 Main St", "a@x.com")));
    }

    #[test]
    fn test_params_parsing() {
        let q = CustomerQuery::try_from(ListParams {
            name: Some("".into()),
            member_since: Some("2023-01-01".into()),
            status: Some("suspended".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(q.name_prefix, None);
        assert_eq!(q.member_since, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(q.status, Some(CustomerStatus::Suspended));

        let bad = CustomerQuery::try_from(ListParams {
            member_since: Some("yesterday".into()),
            ..Default::default()
        });
        assert!(matches!(bad, Err(ValidationError::InvalidDate { .. })));
    }
}
