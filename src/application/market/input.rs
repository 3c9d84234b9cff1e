//! Format checks that run before business rules

use validator::{Validate, ValidationErrors};

use crate::domain::rules::ValidationError;

/// Run the payload's `Validate` checks, turning every field failure into an
/// `InvalidInput` rule error.
pub fn validate_input<T: Validate>(payload: &T) -> Vec<ValidationError> {
    match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten(&errors, ""),
    }
}

fn flatten(errors: &ValidationErrors, prefix: &str) -> Vec<ValidationError> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(field, _)| field.to_string());

    let mut out = Vec::new();
    for (field, kind) in fields {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            validator::ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| ValidationError::InvalidInput {
                    field: path.clone(),
                    reason: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            validator::ValidationErrorsKind::Struct(inner) => {
                out.extend(flatten(inner, &path));
            }
            validator::ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    out.extend(flatten(inner, &format!("{}[{}]", path, index)));
                }
            }
        }
    }
    out
}
