// Validation utilities module
// Provides custom validation functions for account-related rules

use validator::ValidationError;

/// Validates that a display name is at least 2 characters after trimming
pub fn validate_trimmed_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() >= 2 {
        Ok(())
    } else {
        let mut err = ValidationError::new("name_too_short");
        err.message = Some("Name must be at least 2 characters".into());
        Err(err)
    }
}

/// Validates the password complexity policy as a single predicate:
/// length >= 8 and contains a lowercase letter, an uppercase letter and a digit.
/// A violation yields one generic message, never a per-rule reason.
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    let strong = password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit());

    if strong {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_policy");
        err.message = Some(
            "Password must be at least 8 characters and include lowercase, uppercase and numeric characters"
                .into(),
        );
        Err(err)
    }
}
