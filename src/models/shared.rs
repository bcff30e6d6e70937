use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed headword (1-128 Unicode characters).
pub fn validate_headword(word: &str) -> Result<(), AppError> {
    let word = word.trim();
    if word.is_empty() || word.chars().count() > 128 {
        return Err(AppError::Validation(
            "Word headword must be 1-128 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a display name (1-64 Unicode characters).
pub fn validate_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation("Name must be 1-64 characters".into()));
    }
    Ok(())
}

/// Minimal email shape check; real verification is the identity provider's job.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || email.len() > 254 || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_done\\"), "50\\%\\_done\\\\");
        assert_eq!(escape_like("घर"), "घर");
    }

    #[test]
    fn headword_bounds() {
        assert!(validate_headword("घर").is_ok());
        assert!(validate_headword("  ").is_err());
        assert!(validate_headword(&"क".repeat(129)).is_err());
        assert!(validate_headword(&"क".repeat(128)).is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("sita@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn password_bounds() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
