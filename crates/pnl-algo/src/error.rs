//! Solver-level error types.
//!
//! Configuration and evaluation errors come in from `pnl-core` as
//! [`CoreError`]; this enum adds the numerical-failure and non-convergence
//! classes. KKT condition violations are deliberately *not* errors — they
//! are reported as diagnostics so a suboptimal candidate can still be
//! inspected.

use pnl_core::CoreError;
use thiserror::Error;

/// Errors raised by the symbolic solver.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The stationarity system is linear but has no unique solution.
    #[error("Singular linear system: stationarity equations have no unique solution")]
    SingularSystem,

    /// The Hessian lost rank at the current Newton iterate.
    #[error("Singular or ill-conditioned Hessian: rank = {rank}, expected = {expected}")]
    SingularHessian {
        /// Numerical rank at the failing iterate.
        rank: usize,
        /// Required rank (the number of variables).
        expected: usize,
    },

    /// The iterative method exhausted its iteration budget.
    #[error("Solver did not converge after {iterations} iterations")]
    NonConvergence {
        /// Iterations performed before giving up.
        iterations: usize,
    },

    /// An ordered initial-guess list does not match the variable count.
    #[error("Initial guess has {got} entries, expected {expected}")]
    GuessLength {
        /// Entries supplied.
        got: usize,
        /// Variables in the model.
        expected: usize,
    },

    /// Model/expression errors from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for Results using SolverError.
pub type SolverResult<T> = Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SolverError::SingularHessian {
            rank: 3,
            expected: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("rank = 3"));
        assert!(msg.contains("expected = 5"));
    }

    #[test]
    fn test_core_error_conversion() {
        fn inner() -> SolverResult<()> {
            Err(CoreError::Objective)?;
            Ok(())
        }
        assert!(matches!(inner(), Err(SolverError::Core(_))));
    }
}
