//! Input validation for account identifiers
//!
//! Login and password-reset requests carry a single free-form identifier that
//! is either an email address or a phone number. It is resolved once, at the
//! request boundary, into an [`Identifier`]; everything downstream matches on
//! the variant instead of re-inspecting the string.

use rand::Rng;

/// Validation errors for account fields
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("Invalid format for {field}: '{value}' (expected: {expected})")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Resolved login identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Lower-cased email address
    ByEmail(String),
    /// Phone number as entered (trimmed)
    ByPhone(String),
}

impl Identifier {
    /// Classify a raw identifier. Anything containing `@` is an email.
    ///
    /// # Examples
    /// ```
    /// use paylink::account::validation::Identifier;
    ///
    /// let id = Identifier::parse(" Ada@Example.com ").unwrap();
    /// assert_eq!(id, Identifier::ByEmail("ada@example.com".into()));
    ///
    /// let id = Identifier::parse("08031234567").unwrap();
    /// assert_eq!(id, Identifier::ByPhone("08031234567".into()));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::Missing {
                field: "identifier",
            });
        }
        if raw.contains('@') {
            Ok(Identifier::ByEmail(normalize_email(raw)))
        } else {
            Ok(Identifier::ByPhone(raw.to_string()))
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Identifier::ByEmail(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::ByEmail(s) | Identifier::ByPhone(s) => s,
        }
    }
}

/// Emails are stored and compared lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account numbers are 10 ASCII digits with a non-zero leading digit.
pub fn validate_account_number(value: &str) -> Result<&str, ValidationError> {
    let value = value.trim();
    let ok = value.len() == 10
        && value.chars().all(|c| c.is_ascii_digit())
        && !value.starts_with('0');
    if ok {
        Ok(value)
    } else {
        Err(ValidationError::InvalidFormat {
            field: "recipientAccount",
            value: value.to_string(),
            expected: "10-digit account number",
        })
    }
}

/// Generate a fresh public account number in `1000000000..=9999999999`.
pub fn generate_account_number() -> String {
    rand::thread_rng()
        .gen_range(1_000_000_000u64..=9_999_999_999u64)
        .to_string()
}

/// Generate a 6-digit password reset code in `100000..=999999`.
pub fn generate_reset_code() -> String {
    rand::thread_rng().gen_range(100_000u32..=999_999u32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_email_vs_phone() {
        assert!(Identifier::parse("a@b.co").unwrap().is_email());
        assert!(!Identifier::parse("+2348030000000").unwrap().is_email());
        assert_eq!(
            Identifier::parse("USER@MAIL.COM").unwrap().as_str(),
            "user@mail.com"
        );
    }

    #[test]
    fn test_identifier_empty() {
        assert_eq!(
            Identifier::parse("   "),
            Err(ValidationError::Missing {
                field: "identifier"
            })
        );
    }

    #[test]
    fn test_generated_account_number_is_valid() {
        for _ in 0..100 {
            let n = generate_account_number();
            assert!(validate_account_number(&n).is_ok(), "bad number {}", n);
        }
    }

    #[test]
    fn test_validate_account_number() {
        assert!(validate_account_number("1234567890").is_ok());
        assert!(validate_account_number("0123456789").is_err());
        assert!(validate_account_number("12345").is_err());
        assert!(validate_account_number("12345abcde").is_err());
    }

    #[test]
    fn test_reset_code_shape() {
        for _ in 0..100 {
            let code = generate_reset_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }
}
