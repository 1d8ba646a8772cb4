//! Validation errors raised while turning request input into domain values.

/// A field was missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid Customer: missing {0}")]
    MissingField(&'static str),

    #[error("Invalid Customer: {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid Customer: {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Invalid date for {field}: {value} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid status: {0} (expected active or suspended)")]
    InvalidStatus(String),
}
