use thiserror::Error;

use crate::domain::rules::ValidationError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Business rules broken: {}", codes(.0))]
    BusinessRules(Vec<ValidationError>),

    #[error("Storage: {0}")]
    Storage(String),
}

fn codes(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.code(), e))
        .collect::<Vec<_>>()
        .join(", ")
}

impl DomainError {
    /// Whether the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }

    /// Rule errors carried by this error, if it is a rule rejection.
    pub fn rule_errors(&self) -> Option<&[ValidationError]> {
        match self {
            DomainError::BusinessRules(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(error: ValidationError) -> Self {
        DomainError::BusinessRules(vec![error])
    }
}

impl From<InfraError> for DomainError {
    fn from(error: InfraError) -> Self {
        DomainError::Storage(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_rules_message_lists_codes() {
        let err = DomainError::from(ValidationError::AlreadyClosedDown(
            "571313100000000010".into(),
        ));
        assert!(err.to_string().starts_with("Business rules broken: E19"));
        assert_eq!(err.rule_errors().map(|e| e.len()), Some(1));
    }

    #[test]
    fn storage_errors_are_transient() {
        let err: DomainError = InfraError::Database(sea_orm::DbErr::Custom("gone".into())).into();
        assert!(err.is_transient());
        assert!(!DomainError::Validation("bad".into()).is_transient());
    }
}
