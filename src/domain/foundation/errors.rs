//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// A single violated field constraint.
///
/// Constructors of value objects return one of these; aggregate builders
/// collect them so a caller sees every violation at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' cannot exceed {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' must be one of [{allowed}], got '{value}'")]
    InvalidChoice {
        field: String,
        value: String,
        allowed: String,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid choice validation error for closed enumerations.
    pub fn invalid_choice(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        ValidationError::InvalidChoice {
            field: field.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidChoice { field, .. } => field,
        }
    }

    /// Re-roots the error under a parent path, e.g. `name` -> `ingredients[2].name`.
    pub fn nested(self, prefix: &str) -> Self {
        let join = |field: String| format!("{}.{}", prefix, field);
        match self {
            ValidationError::EmptyField { field } => ValidationError::EmptyField { field: join(field) },
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => ValidationError::OutOfRange {
                field: join(field),
                min,
                max,
                actual,
            },
            ValidationError::TooLong { field, max, actual } => ValidationError::TooLong {
                field: join(field),
                max,
                actual,
            },
            ValidationError::InvalidFormat { field, reason } => ValidationError::InvalidFormat {
                field: join(field),
                reason,
            },
            ValidationError::InvalidChoice {
                field,
                value,
                allowed,
            } => ValidationError::InvalidChoice {
                field: join(field),
                value,
                allowed,
            },
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    RecipeNotFound,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // Concurrency errors
    Conflict,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::RecipeNotFound => "RECIPE_NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// This is what ports return; module errors translate it.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a database error, keeping the driver message.
    pub fn database(context: &str, err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, format!("{}: {}", context, err))
    }

    /// Creates a not-found error for a recipe id.
    pub fn recipe_not_found(id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::RecipeNotFound, "Recipe not found")
            .with_detail("recipe_id", id.to_string())
    }

    /// Creates a concurrent-update conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("title");
        assert_eq!(format!("{}", err), "Field 'title' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("rating", 1, 5, 7);
        assert_eq!(
            format!("{}", err),
            "Field 'rating' must be between 1 and 5, got 7"
        );
    }

    #[test]
    fn validation_error_invalid_choice_lists_allowed_values() {
        let err = ValidationError::invalid_choice("difficulty", "Extreme", &["Easy", "Hard"]);
        assert_eq!(
            format!("{}", err),
            "Field 'difficulty' must be one of [Easy, Hard], got 'Extreme'"
        );
    }

    #[test]
    fn nested_prefixes_field_path() {
        let err = ValidationError::empty_field("name").nested("ingredients[2]");
        assert_eq!(err.field(), "ingredients[2].name");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::RecipeNotFound, "Recipe not found");
        assert_eq!(format!("{}", err), "[RECIPE_NOT_FOUND] Recipe not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::conflict("stale version").with_detail("expected", "3");
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.details.get("expected"), Some(&"3".to_string()));
    }
}
