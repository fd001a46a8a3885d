//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;
use shared::error::ErrorCode;
use shared::models::MAX_AMOUNT;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, banner title, customer name
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, subtitles
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, slug, color, icon, tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length for admin accounts
pub const MIN_PASSWORD_LEN: usize = 8;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Stock levels and thresholds
pub const MAX_COUNT: i64 = 1_000_000_000;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Prices and amounts: finite, not negative, at most `MAX_AMOUNT`
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be a non-negative number"),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// Stock and counts: not negative, at most `MAX_COUNT`
pub fn validate_count(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not be negative"),
        ));
    }
    if value > MAX_COUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} must not exceed {MAX_COUNT}"),
        ));
    }
    Ok(())
}

/// Minimal email shape check: `local@domain.tld`
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!("Invalid email: {}", email)));
    }
    Ok(())
}

/// Password length within [MIN_PASSWORD_LEN, MAX_PASSWORD_LEN]
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Romper", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("  ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", 3).is_ok());
        assert!(validate_optional_text(&Some("abcd".to_string()), "note", 3).is_err());
    }

    #[test]
    fn test_amounts() {
        assert!(validate_amount(0.0, "price").is_ok());
        assert!(validate_amount(-1.0, "price").is_err());
        assert!(validate_amount(f64::NAN, "price").is_err());
        assert!(validate_count(0, "stock").is_ok());
        assert!(validate_count(-2, "stock").is_err());
        assert!(validate_amount(MAX_AMOUNT, "price").is_ok());
        assert!(validate_amount(1e300, "price").is_err());
        assert!(validate_count(i64::MAX, "stock").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ada@brana.kids").is_ok());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("ada.brana.kids").is_err());
        assert!(validate_email("a b@x.io").is_err());
        assert!(validate_email("@x.io").is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("long-enough").is_ok());
        assert!(validate_password("short").is_err());
    }
}
