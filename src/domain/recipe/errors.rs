//! Recipe-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors surfaced by recipe operations.
///
/// Every variant maps to exactly one HTTP status at the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    /// Malformed or out-of-range input; carries every violation found.
    Validation(Vec<ValidationError>),
    /// Unknown or malformed recipe identifier.
    NotFound(String),
    /// Actor is not the recipe's author.
    Forbidden,
    /// A concurrent update was detected; the caller should retry.
    Conflict(String),
    /// Persistence failure.
    Infrastructure(String),
}

impl RecipeError {
    pub fn validation(errors: Vec<ValidationError>) -> Self {
        RecipeError::Validation(errors)
    }

    pub fn not_found(id: impl ToString) -> Self {
        RecipeError::NotFound(id.to_string())
    }

    pub fn forbidden() -> Self {
        RecipeError::Forbidden
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RecipeError::Conflict(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        RecipeError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RecipeError::Validation(_) => ErrorCode::ValidationFailed,
            RecipeError::NotFound(_) => ErrorCode::RecipeNotFound,
            RecipeError::Forbidden => ErrorCode::Forbidden,
            RecipeError::Conflict(_) => ErrorCode::Conflict,
            RecipeError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RecipeError::Validation(errors) => match errors.len() {
                1 => format!("Validation failed: {}", errors[0]),
                n => format!("Validation failed with {} errors", n),
            },
            RecipeError::NotFound(id) => format!("Recipe not found: {}", id),
            RecipeError::Forbidden => "Not authorized to modify this recipe".to_string(),
            RecipeError::Conflict(msg) => format!("Concurrent update detected: {}", msg),
            RecipeError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for RecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for RecipeError {}

impl From<ValidationError> for RecipeError {
    fn from(err: ValidationError) -> Self {
        RecipeError::Validation(vec![err])
    }
}

impl From<Vec<ValidationError>> for RecipeError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RecipeError::Validation(errors)
    }
}

impl From<DomainError> for RecipeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::RecipeNotFound => RecipeError::NotFound(
                err.details
                    .get("recipe_id")
                    .cloned()
                    .unwrap_or_else(|| err.message.clone()),
            ),
            ErrorCode::Forbidden | ErrorCode::Unauthorized => RecipeError::Forbidden,
            ErrorCode::Conflict => RecipeError::Conflict(err.message),
            ErrorCode::ValidationFailed => RecipeError::Validation(vec![
                ValidationError::invalid_format(
                    err.details.get("field").cloned().unwrap_or_else(|| "unknown".to_string()),
                    err.message,
                ),
            ]),
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                RecipeError::Infrastructure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_conflict_maps_to_conflict() {
        let err: RecipeError = DomainError::conflict("version 3 is stale").into();
        assert_eq!(err, RecipeError::Conflict("version 3 is stale".to_string()));
    }

    #[test]
    fn domain_not_found_prefers_recipe_id_detail() {
        let err: RecipeError = DomainError::new(ErrorCode::RecipeNotFound, "gone")
            .with_detail("recipe_id", "abc")
            .into();
        assert_eq!(err, RecipeError::NotFound("abc".to_string()));
    }

    #[test]
    fn database_error_maps_to_infrastructure() {
        let err: RecipeError = DomainError::database("Failed to insert recipe", "timeout").into();
        assert!(matches!(err, RecipeError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn single_violation_message_names_it() {
        let err = RecipeError::from(ValidationError::empty_field("title"));
        assert_eq!(err.message(), "Validation failed: Field 'title' cannot be empty");
    }
}
