//! Business rule engine
//!
//! A [`BusinessRule`] wraps a single predicate together with the error it
//! reports when broken. Operations build a list of rules and evaluate all of
//! them with [`BusinessRulesValidationResult`], so a sender gets every
//! rejection reason in one answer instead of the first one only.

mod validation_error;

pub use validation_error::{RejectionReason, ValidationError};

use crate::shared::errors::DomainError;

pub trait BusinessRule {
    fn is_broken(&self) -> bool;
    fn error(&self) -> ValidationError;
}

/// Outcome of evaluating a set of business rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessRulesValidationResult {
    errors: Vec<ValidationError>,
}

impl BusinessRulesValidationResult {
    /// Evaluate every rule and keep the error of each broken one.
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn BusinessRule + 'a>>,
    {
        let errors = rules
            .into_iter()
            .filter(|rule| rule.is_broken())
            .map(|rule| rule.error())
            .collect();
        Self { errors }
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn valid() -> Self {
        Self::default()
    }

    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn merge(mut self, other: BusinessRulesValidationResult) -> Self {
        self.errors.extend(other.errors);
        self
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.success() {
            Ok(())
        } else {
            Err(DomainError::BusinessRules(self.errors))
        }
    }
}

impl From<ValidationError> for BusinessRulesValidationResult {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(bool);

    impl BusinessRule for Always {
        fn is_broken(&self) -> bool {
            self.0
        }

        fn error(&self) -> ValidationError {
            ValidationError::MissingValue { field: "test" }
        }
    }

    #[test]
    fn collects_every_broken_rule() {
        let rules: Vec<Box<dyn BusinessRule>> =
            vec![Box::new(Always(true)), Box::new(Always(false)), Box::new(Always(true))];
        let result = BusinessRulesValidationResult::from_rules(rules);
        assert!(!result.success());
        assert_eq!(result.errors().len(), 2);
    }

    #[test]
    fn empty_rule_set_succeeds() {
        let result = BusinessRulesValidationResult::from_rules(Vec::new());
        assert!(result.success());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn into_result_carries_errors() {
        let result = BusinessRulesValidationResult::from(ValidationError::AlreadyClosedDown(
            "571313100000000010".into(),
        ));
        match result.into_result() {
            Err(DomainError::BusinessRules(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code(), "E19");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
