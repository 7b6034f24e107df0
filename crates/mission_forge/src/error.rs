//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover missing reference records, exhausted allocations, structural constraint
//! violations between an objective and its sub-tasks, unit-creation failures and invalid
//! configuration.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} '{id}' not found")]
    ReferenceNotFound { kind: &'static str, id: String },

    #[error("task '{task}' is not valid for targets of category {category}")]
    IncompatibleTask { task: String, category: String },

    #[error("failed to allocate {what} ({constraints})")]
    AllocationExhausted { what: String, constraints: String },

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("group creation failed: {0}")]
    GroupCreationFailed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::ReferenceNotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn exhausted(what: impl Into<String>, constraints: impl Into<String>) -> Self {
        Error::AllocationExhausted {
            what: what.into(),
            constraints: constraints.into(),
        }
    }

    /// Whether this error belongs to the reference-lookup family.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Error::ReferenceNotFound { .. } | Error::IncompatibleTask { .. }
        )
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn not_found_formats_kind_and_id() {
        let err = Error::not_found("target", "SAM-Site");
        assert_eq!(err.to_string(), "target 'SAM-Site' not found");
        assert!(err.is_reference_error());
    }

    #[test]
    fn exhausted_carries_constraints() {
        let err = Error::exhausted("objective spawn point", "types [Sea]");
        assert!(matches!(
            err,
            Error::AllocationExhausted { ref constraints, .. } if constraints == "types [Sea]"
        ));
        assert!(!err.is_reference_error());
    }
}
