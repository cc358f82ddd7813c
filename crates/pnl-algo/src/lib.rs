//! # pnl-algo: Symbolic Nonlinear Programming Algorithms
//!
//! Solves constrained optimization problems defined with `pnl-core` by
//! assembling a Lagrangian with squared-slack inequality reformulation and
//! finding a stationary point of its gradient.
//!
//! ## Pipeline
//!
//! - [`LagrangianBuilder`]: model container → one scalar Lagrangian
//! - [`DerivativesCalculator`]: gradient and Hessian over typed variable
//!   subsets
//! - [`ConvexityAnalyzer`]: diagnostic curvature classification from the
//!   sampled Hessian
//! - [`SymbolicSolver`]: linearity detection, closed-form LU solve for
//!   affine systems, Newton-Raphson (or gradient descent) otherwise
//! - [`KktChecker`]: independent six-condition optimality certificate
//!
//! ## Example
//!
//! ```rust
//! use pnl_algo::{KktChecker, LagrangianBuilder, SymbolicSolver};
//! use pnl_core::{Expr, Problem, Relation};
//!
//! // min 2x1² + x2²  s.t.  x1 + x2 = 10
//! let x1 = Expr::symbol("x1");
//! let x2 = Expr::symbol("x2");
//! let model = Problem::new()
//!     .minimize(Expr::pow(x1.clone(), 2) * 2.0 + Expr::pow(x2.clone(), 2))
//!     .subject_to(Relation::Eq(x1 + x2, Expr::num(10.0)))
//!     .build()
//!     .unwrap();
//!
//! let solution = SymbolicSolver::new().solve(&model).unwrap();
//! assert!((solution.value("x1").unwrap() - 10.0 / 3.0).abs() < 1e-6);
//!
//! let lagrangian = LagrangianBuilder::new(&model).build().unwrap();
//! let mut checker = KktChecker::new(&model, &lagrangian, &solution.values, 1e-6);
//! let (passed, _messages) = checker.verify_all().unwrap();
//! assert!(passed);
//! ```

pub mod convexity;
pub mod derivatives;
pub mod error;
pub mod kkt;
pub mod lagrangian;
pub mod linalg;
pub mod solver;

pub use convexity::{ConvexityAnalyzer, Curvature, Domain, Range};
pub use derivatives::DerivativesCalculator;
pub use error::{SolverError, SolverResult};
pub use kkt::KktChecker;
pub use lagrangian::LagrangianBuilder;
pub use solver::{InitialGuess, SolveMethod, Solution, StationaryKind, SymbolicSolver};
