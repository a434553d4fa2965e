//! Validation utilities.

use validator::{Validate, ValidationErrors};

/// Maximum length of a post body, in characters.
pub const MAX_POST_CONTENT: u64 = 5000;
/// Maximum length of a comment body, in characters.
pub const MAX_COMMENT_CONTENT: u64 = 1000;

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Returns the human-readable failure, or `None` when the value is valid.
    fn validation_failure(&self) -> Option<String> {
        self.validate().err().map(|e| validation_message(&e))
    }
}

impl<T: Validate> ValidateExt for T {}

/// Joins the messages of every failed rule, ordered by field name.
#[must_use]
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Returns the value unless it is absent or only whitespace.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a username meets requirements.
    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        if username.len() < 3 {
            return Err(ValidationError::new("username_too_short"));
        }
        if username.len() > 32 {
            return Err(ValidationError::new("username_too_long"));
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::new("username_invalid_characters"));
        }
        if !username.chars().next().is_some_and(char::is_alphabetic) {
            return Err(ValidationError::new("username_must_start_with_letter"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(max = 3, message = "Too long"))]
        body: Option<String>,
        #[validate(length(min = 1, message = "Title required"))]
        title: String,
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" x ")), Some(" x "));
    }

    #[test]
    fn test_valid_username() {
        assert!(valid_username("john_doe").is_ok());
        assert!(valid_username("ab").is_err());
        assert!(valid_username("123abc").is_err());
        assert!(valid_username("john@doe").is_err());
    }

    #[test]
    fn test_validation_failure_uses_declared_messages() {
        let sample = Sample {
            body: Some("abcd".to_string()),
            title: String::new(),
        };
        assert_eq!(
            sample.validation_failure().as_deref(),
            Some("Too long; Title required")
        );
    }

    #[test]
    fn test_absent_optional_field_is_valid() {
        let sample = Sample {
            body: None,
            title: "ok".to_string(),
        };
        assert!(sample.validation_failure().is_none());
    }
}
