//! Client-side form checks shared by the auth, booking and contact forms.
//!
//! Required fields, email shape and minimum password length. The backend
//! still has the final say.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Please pick a date between {earliest} and {latest}")]
    DateOutsideWindow { earliest: NaiveDate, latest: NaiveDate },

    #[error("{0} is not an available time slot")]
    UnknownTimeSlot(String),

    #[error("{0} is not a consultation purpose we offer")]
    UnknownPurpose(String),

    #[error("{0} is not an enquiry subject")]
    UnknownSubject(String),
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Loose email shape check, equivalent to an `<input type="email">`
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

/// Reject blank values
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_email(email: &str) -> Result<(), FormError> {
    require("Email", email)?;
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(FormError::InvalidEmail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ravi@example.in"));
        assert!(is_valid_email("  priya.singh@mail.co.in "));
        assert!(!is_valid_email("ravi@example"));
        assert!(!is_valid_email("ravi example@x.in"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_require() {
        assert_eq!(require("Subject", "   "), Err(FormError::Missing("Subject")));
        assert!(require("Subject", "Fees").is_ok());
        assert_eq!(require_email("nope"), Err(FormError::InvalidEmail));
        assert_eq!(require_email(""), Err(FormError::Missing("Email")));
    }
}
