//! Value objects with format validation.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Column widths of the `customers` table.
pub const NAME_MAX_LEN: usize = 63;
pub const ADDRESS_MAX_LEN: usize = 256;
pub const EMAIL_MAX_LEN: usize = 63;
pub const PHONE_MAX_LEN: usize = 32;

/// Minimum number of digits a phone number must carry.
const PHONE_MIN_DIGITS: usize = 7;

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and validate an email address.
    ///
    /// Accepts `local@domain.tld` with exactly one `@`, no whitespace, and a
    /// domain containing at least one interior dot.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        check_length("email", value, EMAIL_MAX_LEN)?;

        let invalid = || ValidationError::InvalidEmail(value.to_string());

        if value.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
            return Err(invalid());
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// A phone number in a common human-written form.
///
/// Digits plus the separators `space - . ( )`, an optional leading `+`, and an
/// optional extension introduced by `x` or `ext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        check_length("phone_number", value, PHONE_MAX_LEN)?;

        let invalid = || ValidationError::InvalidPhoneNumber(value.to_string());

        let lower = value.to_ascii_lowercase();
        let (main, extension) = match lower.split_once("ext") {
            Some((main, ext)) => (main, Some(ext.trim_start_matches('.'))),
            None => match lower.split_once('x') {
                Some((main, ext)) => (main, Some(ext)),
                None => (lower.as_str(), None),
            },
        };

        if let Some(ext) = extension {
            let ext = ext.trim();
            if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
        }

        let main = main.trim();
        let body = main.strip_prefix('+').unwrap_or(main);
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')'))
        {
            return Err(invalid());
        }

        if body.chars().filter(|c| c.is_ascii_digit()).count() < PHONE_MIN_DIGITS {
            return Err(invalid());
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

/// Trim a free-text field and enforce it is non-empty and within `max` chars.
pub fn required_text(field: &'static str, raw: &str, max: usize) -> Result<String, ValidationError> {
    let value = raw.trim();
    check_length(field, value, max)?;
    Ok(value.to_string())
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_accepts_common_forms() {
        assert!(Email::parse("a@x.com").is_ok());
        assert!(Email::parse("first.last+tag@mail.example.org").is_ok());
        assert_eq!(Email::parse("  a@x.com ").unwrap().as_str(), "a@x.com");
    }

    #[test]
    fn test_email_rejects_malformed() {
        for bad in ["", "plain", "@x.com", "a@", "a@x", "a@@x.com", "a b@x.com", "a@x..com", "a@.com"] {
            assert!(Email::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_email_length_limit() {
        let long = format!("{}@x.com", "a".repeat(EMAIL_MAX_LEN));
        assert_eq!(
            Email::parse(&long),
            Err(ValidationError::TooLong { field: "email", max: EMAIL_MAX_LEN })
        );
    }

    #[test]
    fn test_phone_accepts_common_forms() {
        for good in ["555-1234", "(555) 123-4567", "+1 555.123.4567", "001-555-123-4567x890", "555 1234 ext. 12"] {
            assert!(PhoneNumber::parse(good).is_ok(), "{good:?} should be accepted");
        }
    }

    #[test]
    fn test_phone_rejects_malformed() {
        for bad in ["", "12345", "555-CALL-NOW", "555-1234x", "++1 555 1234", "555#1234"] {
            assert!(PhoneNumber::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Alice ", NAME_MAX_LEN).unwrap(), "Alice");
        assert_eq!(
            required_text("name", "   ", NAME_MAX_LEN),
            Err(ValidationError::EmptyField { field: "name" })
        );
    }
}
