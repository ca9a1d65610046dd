use thiserror::Error;

/// Invalid input: required identifiers the engine refuses to guess.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("search events require a `term` in metadata")]
    MissingSearchTerm,
}

/// Failures from the profile persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Engine-level error taxonomy. Persistence failures are recoverable: the
/// in-memory profile state remains the source of truth for the rest of the
/// process lifetime.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("behavior store failure: {0}")]
    Persistence(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::{DomainError, EngineError};

    #[test]
    fn domain_error_converts_into_engine_error() {
        let err = EngineError::from(DomainError::MissingField("user_id"));
        assert!(matches!(err, EngineError::Domain(DomainError::MissingField("user_id"))));
        assert_eq!(err.to_string(), "missing required field `user_id`");
    }
}
