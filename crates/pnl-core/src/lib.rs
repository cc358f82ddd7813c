//! # pnl-core: Symbolic Optimization Model Core
//!
//! Provides the data structures for symbolic nonlinear-programming problems:
//! a restricted expression tree with differentiation and polynomial
//! decomposition, and the per-run model container (variables with typed
//! roles, ordered constraints with retained residuals, objective, constants).
//!
//! ## Quick Start
//!
//! ```rust
//! use pnl_core::{Expr, Problem, Relation};
//!
//! let x1 = Expr::symbol("x1");
//! let x2 = Expr::symbol("x2");
//!
//! let model = Problem::new()
//!     .minimize(Expr::pow(x1.clone(), 2) * 2.0 + Expr::pow(x2.clone(), 2))
//!     .subject_to(Relation::Eq(x1.clone() + x2.clone(), Expr::num(10.0)))
//!     .subject_to(Relation::Ge(x1, 0.0))
//!     .subject_to(Relation::Ge(x2, 0.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.variables().decision().len(), 2);
//! ```
//!
//! Solving and optimality verification live in the `pnl-algo` crate.

pub mod error;
pub mod expr;
pub mod model;

pub use error::{CoreError, CoreResult};
pub use expr::{Expr, Poly, Sym};
pub use model::{
    ConstantSet, ConstraintSet, Model, ObjectiveFunction, Problem, Relation, Sense, Subset,
    VarRole, VariableSet,
};
