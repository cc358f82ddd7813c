//! Unified error types for the PNL core.
//!
//! This module provides a common error type [`CoreError`] for the model
//! container and the symbolic expression substrate. Algorithm-level errors
//! (singular systems, non-convergence) live in `pnl-algo` and wrap this type
//! at the boundary.

use thiserror::Error;

/// Unified error type for model construction and symbolic evaluation.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A symbol referenced by an expression is absent from the evaluation
    /// environment.
    #[error("Unknown symbol '{0}' in evaluation environment")]
    MissingSymbol(String),

    /// Numeric evaluation produced a non-finite value (division by zero,
    /// overflow).
    #[error("Expression did not evaluate to a finite value: {0}")]
    NonFinite(String),

    /// The objective function was read before being set.
    #[error("Objective function has not been set")]
    Objective,

    /// Malformed convexity-domain specification.
    #[error("Domain specification error: {0}")]
    DomainSpec(String),

    /// Structural validation errors (mismatched multiplier/constraint counts,
    /// malformed initial data).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation outside the restricted symbolic subset (e.g. antiderivative
    /// of a non-polynomial term).
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for CoreError {
    fn from(err: anyhow::Error) -> Self {
        CoreError::Other(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(s: String) -> Self {
        CoreError::Other(s)
    }
}

impl From<&str> for CoreError {
    fn from(s: &str) -> Self {
        CoreError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::MissingSymbol("x1".into());
        assert!(err.to_string().contains("x1"));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> CoreResult<()> {
            Err(CoreError::Objective)
        }

        fn outer() -> CoreResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
