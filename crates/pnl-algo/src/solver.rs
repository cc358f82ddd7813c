//! Stationary-point solver for the Lagrangian system.
//!
//! The solve pipeline is: assemble the Lagrangian, take its gradient over
//! the full variable set, then pick a strategy:
//!
//! 1. if every gradient component is affine, the stationarity conditions
//!    are one linear system and are solved directly by LU in a single step;
//! 2. otherwise Newton-Raphson iterates on `∇L = 0`, requiring the Hessian
//!    to keep full rank at every iterate;
//! 3. gradient descent is available as an explicit opt-in for cases where
//!    the Hessian is structurally singular.
//!
//! Curvature analysis is optional and diagnostic: it classifies the
//! Lagrangian's Hessian over the full variable set and never changes the
//! solve path. Under `Sense::Auto`, an indefinite diagnosis additionally
//! triggers an eigenvalue classification of the converged point.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info, warn};

use pnl_core::{Expr, Model, Sense, Subset, Sym};

use crate::convexity::{ConvexityAnalyzer, Curvature, Domain};
use crate::derivatives::DerivativesCalculator;
use crate::error::{SolverError, SolverResult};
use crate::lagrangian::LagrangianBuilder;
use crate::linalg::{self, PIVOT_TOL};

/// Root-finding strategy for nonlinear stationarity systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveMethod {
    /// Newton steps on `∇L = 0` (default).
    NewtonRaphson,
    /// Fixed-step descent along `−∇L`.
    GradientDescent,
}

/// Starting point specification.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialGuess {
    /// One value for every variable.
    Scalar(f64),
    /// One value per variable, in canonical order (x, λ, π_up, π_dn, s).
    Ordered(Vec<f64>),
    /// Values by variable name; unnamed variables get the fallback value.
    ByName(BTreeMap<String, f64>),
}

/// Local nature of a converged stationary point, from the eigenvalues of
/// the Lagrangian's Hessian over the full variable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StationaryKind {
    /// All eigenvalues positive.
    LocalMin,
    /// All eigenvalues negative.
    LocalMax,
    /// Mixed signs.
    Saddle,
    /// A near-zero eigenvalue made the test inconclusive.
    Unclassified,
}

/// A converged stationary point with its diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// Variable values by name (decision, multipliers, slacks).
    pub values: BTreeMap<String, f64>,
    /// Objective evaluated at the solution.
    pub objective_value: f64,
    /// Iterations performed (1 for the linear path).
    pub iterations: usize,
    /// True when the stationarity system was affine and solved directly.
    pub linear: bool,
    /// Hessian rank at the final iterate (Newton path only).
    pub hessian_rank: Option<usize>,
    /// Curvature diagnosis, when a sampling domain was configured.
    pub curvature: Option<Curvature>,
    /// Local classification of the point (`Sense::Auto` only).
    pub stationary_kind: Option<StationaryKind>,
}

impl Solution {
    /// Value of a variable by name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

// One Newton iterate. States are immutable; each step produces the next.
struct NewtonState {
    point: Vec<f64>,
    iteration: usize,
}

impl NewtonState {
    fn advance(&self, delta: &[f64]) -> NewtonState {
        NewtonState {
            point: self
                .point
                .iter()
                .zip(delta)
                .map(|(x, d)| x + d)
                .collect(),
            iteration: self.iteration + 1,
        }
    }
}

/// Configurable stationary-point solver.
///
/// All knobs have working defaults; override with the `with_*` builders.
#[derive(Debug, Clone)]
pub struct SymbolicSolver {
    tolerance: f64,
    max_iterations: usize,
    step: f64,
    fallback_guess: f64,
    method: SolveMethod,
    initial_guess: Option<InitialGuess>,
    convexity_domain: Option<Domain>,
}

impl Default for SymbolicSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolicSolver {
    /// Solver with default settings: tolerance `1e-6`, 20 iterations,
    /// Newton-Raphson, every variable starting at `0.1`.
    pub fn new() -> Self {
        SymbolicSolver {
            tolerance: 1e-6,
            max_iterations: 20,
            step: 0.1,
            fallback_guess: 0.1,
            method: SolveMethod::NewtonRaphson,
            initial_guess: None,
            convexity_domain: None,
        }
    }

    /// Convergence tolerance on `max |∇L|`.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Iteration budget for the nonlinear paths.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Step length for gradient descent.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Value assigned to variables the initial guess leaves out.
    pub fn with_fallback_guess(mut self, fallback: f64) -> Self {
        self.fallback_guess = fallback;
        self
    }

    /// Root-finding strategy for nonlinear systems.
    pub fn with_method(mut self, method: SolveMethod) -> Self {
        self.method = method;
        self
    }

    /// Starting point.
    pub fn with_initial_guess(mut self, guess: InitialGuess) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    /// Enable curvature diagnosis of the Lagrangian over this domain.
    pub fn with_convexity_domain(mut self, domain: Domain) -> Self {
        self.convexity_domain = Some(domain);
        self
    }

    /// Solve for a stationary point of the model's Lagrangian.
    pub fn solve(&self, model: &Model) -> SolverResult<Solution> {
        let lagrangian = LagrangianBuilder::new(model).build()?;
        let vars = model.variables().all();
        let n = vars.len();

        let derivs = DerivativesCalculator::new(&lagrangian, model.variables());
        let gradient = derivs.gradient(Subset::All);
        let hessian = derivs.hessian(Subset::All);

        let curvature = self.diagnose_curvature(&hessian, &vars)?;

        if let Some((a, b)) = linear_system(&gradient, &vars) {
            info!(n, "stationarity system is affine, solving directly");
            let point = linalg::solve_dense(&a, &b)?;
            return self.finish(model, &vars, point, 1, true, None, curvature);
        }

        info!(n, method = ?self.method, "stationarity system is nonlinear");
        let start = self.starting_point(&vars)?;
        match self.method {
            SolveMethod::NewtonRaphson => {
                let (point, iterations, rank) =
                    self.newton(&gradient, &hessian, &vars, start)?;
                self.finish(model, &vars, point, iterations, false, Some(rank), curvature)
            }
            SolveMethod::GradientDescent => {
                let (point, iterations) = self.descend(&gradient, &vars, start)?;
                self.finish(model, &vars, point, iterations, false, None, curvature)
            }
        }
    }

    fn diagnose_curvature(
        &self,
        hessian: &[Vec<Expr>],
        vars: &[Sym],
    ) -> SolverResult<Option<Curvature>> {
        let Some(domain) = &self.convexity_domain else {
            return Ok(None);
        };
        let curvature = ConvexityAnalyzer::new(hessian, vars, domain).classify()?;
        info!(%curvature, "Lagrangian curvature over the sampling domain");
        Ok(Some(curvature))
    }

    fn starting_point(&self, vars: &[Sym]) -> SolverResult<Vec<f64>> {
        let n = vars.len();
        match &self.initial_guess {
            None => Ok(vec![self.fallback_guess; n]),
            Some(InitialGuess::Scalar(v)) => Ok(vec![*v; n]),
            Some(InitialGuess::Ordered(values)) => {
                if values.len() != n {
                    return Err(SolverError::GuessLength {
                        got: values.len(),
                        expected: n,
                    });
                }
                Ok(values.clone())
            }
            Some(InitialGuess::ByName(map)) => {
                let mut missing = 0usize;
                let point = vars
                    .iter()
                    .map(|v| {
                        map.get(v.name()).copied().unwrap_or_else(|| {
                            missing += 1;
                            self.fallback_guess
                        })
                    })
                    .collect();
                if missing > 0 {
                    warn!(
                        missing,
                        fallback = self.fallback_guess,
                        "initial guess left variables unset, using fallback"
                    );
                }
                Ok(point)
            }
        }
    }

    fn newton(
        &self,
        gradient: &[Expr],
        hessian: &[Vec<Expr>],
        vars: &[Sym],
        start: Vec<f64>,
    ) -> SolverResult<(Vec<f64>, usize, usize)> {
        let n = vars.len();
        let mut state = NewtonState {
            point: start,
            iteration: 0,
        };
        let mut last_rank = n;

        loop {
            let env = point_env(vars, &state.point);
            let g = eval_vector(gradient, &env)?;
            let residual = linalg::norm2(&g);
            debug!(
                iteration = state.iteration,
                residual, "Newton iterate"
            );
            // convergence is judged before the rank check, so a start that
            // already satisfies stationarity is a valid solution even when
            // the Hessian is singular there
            if residual < self.tolerance {
                return Ok((state.point, state.iteration.max(1), last_rank));
            }
            if state.iteration >= self.max_iterations {
                return Err(SolverError::NonConvergence {
                    iterations: state.iteration,
                });
            }

            let h = eval_matrix(hessian, &env)?;
            let rank = linalg::rank(&h, PIVOT_TOL);
            if rank != n {
                return Err(SolverError::SingularHessian { rank, expected: n });
            }
            last_rank = rank;

            // H·Δ = −∇L
            let rhs: Vec<f64> = g.iter().map(|v| -v).collect();
            let delta = linalg::solve_dense(&h, &rhs)?;
            state = state.advance(&delta);
        }
    }

    fn descend(
        &self,
        gradient: &[Expr],
        vars: &[Sym],
        start: Vec<f64>,
    ) -> SolverResult<(Vec<f64>, usize)> {
        let mut point = start;
        for iteration in 0..=self.max_iterations {
            let env = point_env(vars, &point);
            let g = eval_vector(gradient, &env)?;
            let residual = max_abs(&g);
            debug!(iteration, residual, "descent iterate");
            if residual <= self.tolerance {
                return Ok((point, iteration.max(1)));
            }
            if iteration == self.max_iterations {
                break;
            }
            // descending the Lagrangian covers both senses: its objective
            // term is already negated in max mode
            for (x, gi) in point.iter_mut().zip(&g) {
                *x -= self.step * gi;
            }
        }
        Err(SolverError::NonConvergence {
            iterations: self.max_iterations,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        model: &Model,
        vars: &[Sym],
        point: Vec<f64>,
        iterations: usize,
        linear: bool,
        hessian_rank: Option<usize>,
        curvature: Option<Curvature>,
    ) -> SolverResult<Solution> {
        let env = point_env(vars, &point);
        let objective_value = model.objective().get()?.eval(&env)?;

        let stationary_kind =
            if model.sense() == Sense::Auto && curvature == Some(Curvature::Indefinite) {
                Some(self.classify_point(model, &env)?)
            } else {
                None
            };

        let values = vars
            .iter()
            .zip(&point)
            .map(|(v, x)| (v.name().to_string(), *x))
            .collect();

        Ok(Solution {
            values,
            objective_value,
            iterations,
            linear,
            hessian_rank,
            curvature,
            stationary_kind,
        })
    }

    // Eigenvalue sign test on the full Lagrangian Hessian at the converged
    // point.
    fn classify_point(
        &self,
        model: &Model,
        env: &HashMap<Sym, f64>,
    ) -> SolverResult<StationaryKind> {
        let lagrangian = LagrangianBuilder::new(model).build()?;
        let hessian = DerivativesCalculator::new(&lagrangian, model.variables())
            .hessian(Subset::All);
        let h = eval_matrix(&hessian, env)?;
        let eigenvalues = linalg::symmetric_eigenvalues(&h);

        if eigenvalues.iter().any(|v| v.abs() < PIVOT_TOL) {
            return Ok(StationaryKind::Unclassified);
        }
        let kind = if eigenvalues.iter().all(|&v| v > 0.0) {
            StationaryKind::LocalMin
        } else if eigenvalues.iter().all(|&v| v < 0.0) {
            StationaryKind::LocalMax
        } else {
            StationaryKind::Saddle
        };
        Ok(kind)
    }
}

// Extracts (A, b) with A·x = b when every gradient component is affine
// in `vars`; None means the system is nonlinear.
fn linear_system(gradient: &[Expr], vars: &[Sym]) -> Option<(Vec<Vec<f64>>, Vec<f64>)> {
    let mut a = Vec::with_capacity(gradient.len());
    let mut b = Vec::with_capacity(gradient.len());
    for component in gradient {
        let (coeffs, constant) = component.as_poly(vars)?.linear_coefficients()?;
        a.push(coeffs);
        b.push(-constant);
    }
    Some((a, b))
}

fn point_env(vars: &[Sym], point: &[f64]) -> HashMap<Sym, f64> {
    vars.iter().cloned().zip(point.iter().copied()).collect()
}

fn eval_vector(exprs: &[Expr], env: &HashMap<Sym, f64>) -> SolverResult<Vec<f64>> {
    exprs
        .iter()
        .map(|e| e.eval(env).map_err(SolverError::from))
        .collect()
}

fn eval_matrix(exprs: &[Vec<Expr>], env: &HashMap<Sym, f64>) -> SolverResult<Vec<Vec<f64>>> {
    exprs.iter().map(|row| eval_vector(row, env)).collect()
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convexity::Range;
    use pnl_core::{Problem, Relation};

    #[test]
    fn test_linear_path_unconstrained_quadratic() {
        // min x² − 4x: stationary at x = 2, solved in one step
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x.clone(), 2) - x * 4.0)
            .build()
            .unwrap();

        let solution = SymbolicSolver::new().solve(&model).unwrap();
        assert!(solution.linear);
        assert_eq!(solution.iterations, 1);
        assert!((solution.value("x").unwrap() - 2.0).abs() < 1e-9);
        assert!((solution.objective_value + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_path_with_equality_constraint() {
        // min x1² + x2² s.t. x1 + x2 = 4: x1 = x2 = 2, λ = 4
        let x1 = Expr::symbol("x1");
        let x2 = Expr::symbol("x2");
        let model = Problem::new()
            .minimize(Expr::pow(x1.clone(), 2) + Expr::pow(x2.clone(), 2))
            .subject_to(Relation::Eq(x1 + x2, Expr::num(4.0)))
            .build()
            .unwrap();

        let solution = SymbolicSolver::new().solve(&model).unwrap();
        assert!(solution.linear);
        assert_eq!(solution.iterations, 1);
        assert!((solution.value("x1").unwrap() - 2.0).abs() < 1e-9);
        assert!((solution.value("x2").unwrap() - 2.0).abs() < 1e-9);
        assert!((solution.value("lambda1").unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_newton_converges_on_quartic() {
        // min x⁴ − 2x²: minima at x = ±1, guess near 1 converges to 1
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x.clone(), 4) - Expr::pow(x, 2) * 2.0)
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::Scalar(1.5))
            .solve(&model)
            .unwrap();
        assert!(!solution.linear);
        assert!((solution.value("x").unwrap() - 1.0).abs() < 1e-6);
        assert!((solution.objective_value + 1.0).abs() < 1e-6);
        assert_eq!(solution.hessian_rank, Some(1));
    }

    #[test]
    fn test_zero_gradient_start_converges_despite_singular_hessian() {
        // x = 0 is the global minimum of x⁴: the gradient vanishes there,
        // so the start is accepted as converged even though the Hessian
        // 12x² has rank 0 at that point
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x, 4))
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::Scalar(0.0))
            .solve(&model)
            .unwrap();
        assert_eq!(solution.value("x"), Some(0.0));
        assert_eq!(solution.iterations, 1);
        assert_eq!(solution.objective_value, 0.0);
    }

    #[test]
    fn test_singular_hessian_reported() {
        // at (0, 1) the gradient (4x³, 2y) = (0, 2) is nonzero, so a Newton
        // step is required, and the Hessian diag(12x², 2) has rank 1
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let model = Problem::new()
            .minimize(Expr::pow(x, 4) + Expr::pow(y, 2))
            .build()
            .unwrap();

        let err = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::Ordered(vec![0.0, 1.0]))
            .solve(&model)
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::SingularHessian { rank: 1, expected: 2 }
        ));
    }

    #[test]
    fn test_newton_convergence_uses_gradient_norm() {
        // min x⁴ + y⁴ from (1, 1): the gradient is (4, 4), with Euclidean
        // norm 4√2 ≈ 5.66 but max-component 4. With tolerance 5 the norm
        // criterion demands one Newton step (to x = y = 2/3); a max-abs
        // criterion would have accepted the start unchanged.
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let model = Problem::new()
            .minimize(Expr::pow(x, 4) + Expr::pow(y, 4))
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_tolerance(5.0)
            .with_initial_guess(InitialGuess::Scalar(1.0))
            .solve(&model)
            .unwrap();
        assert_eq!(solution.iterations, 1);
        assert!((solution.value("x").unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((solution.value("y").unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_convergence_reports_budget() {
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x, 4))
            .build()
            .unwrap();

        let err = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::Scalar(10.0))
            .with_max_iterations(2)
            .solve(&model)
            .unwrap_err();
        assert!(matches!(err, SolverError::NonConvergence { iterations: 2 }));
    }

    #[test]
    fn test_guess_length_mismatch() {
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x.clone(), 4) + Expr::pow(x, 2))
            .build()
            .unwrap();

        let err = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::Ordered(vec![1.0, 2.0]))
            .solve(&model)
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::GuessLength { got: 2, expected: 1 }
        ));
    }

    #[test]
    fn test_gradient_descent_path() {
        // min x⁴/4 + x²: single minimum at 0, gradient x³ + 2x
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x.clone(), 4) / 4.0 + Expr::pow(x, 2))
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_method(SolveMethod::GradientDescent)
            .with_initial_guess(InitialGuess::Scalar(1.0))
            .with_max_iterations(500)
            .solve(&model)
            .unwrap();
        assert!(solution.value("x").unwrap().abs() < 1e-3);
        assert!(solution.iterations > 1);
    }

    #[test]
    fn test_gradient_descent_finds_maximum_in_max_mode() {
        // max −x⁴ + 4x peaks at x = 1; the Lagrangian negates the
        // objective in max mode, so plain descent on L climbs f
        let x = Expr::symbol("x");
        let model = Problem::new()
            .maximize(-Expr::pow(x.clone(), 4) + x * 4.0)
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_method(SolveMethod::GradientDescent)
            .with_max_iterations(100)
            .solve(&model)
            .unwrap();
        assert!((solution.value("x").unwrap() - 1.0).abs() < 1e-5);
        assert!((solution.objective_value - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_curvature_diagnosis_recorded() {
        let x = Expr::symbol("x");
        let model = Problem::new()
            .minimize(Expr::pow(x.clone(), 2) - x * 2.0)
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_convexity_domain(Domain::Global(Range::new(-5.0, 5.0)))
            .solve(&model)
            .unwrap();
        assert_eq!(solution.curvature, Some(Curvature::StrictlyConvex));
    }

    #[test]
    fn test_auto_sense_classifies_minimum_after_indefinite_diagnosis() {
        // x⁴ − x² has second derivative 12x² − 2, mixed in sign over
        // (−5, 5), so the diagnosis is indefinite; Newton from 1.0 lands
        // on the local minimum x = 1/√2 where the Hessian is positive
        let x = Expr::symbol("x");
        let model = Problem::new()
            .objective(
                Sense::Auto,
                Expr::pow(x.clone(), 4) - Expr::pow(x, 2),
            )
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::Scalar(1.0))
            .with_convexity_domain(Domain::Global(Range::new(-5.0, 5.0)))
            .solve(&model)
            .unwrap();
        assert_eq!(solution.curvature, Some(Curvature::Indefinite));
        assert!((solution.value("x").unwrap() - 0.5f64.sqrt()).abs() < 1e-6);
        assert_eq!(solution.stationary_kind, Some(StationaryKind::LocalMin));
    }

    #[test]
    fn test_auto_sense_classifies_saddle() {
        // x² − y² is a saddle at the origin; its stationarity system is
        // affine, so the linear path still carries the classification
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let model = Problem::new()
            .objective(
                Sense::Auto,
                Expr::pow(x, 2) - Expr::pow(y, 2),
            )
            .build()
            .unwrap();

        let solution = SymbolicSolver::new()
            .with_convexity_domain(Domain::Global(Range::new(-2.0, 2.0)))
            .solve(&model)
            .unwrap();
        assert!(solution.linear);
        assert_eq!(solution.curvature, Some(Curvature::Indefinite));
        assert!(solution.value("x").unwrap().abs() < 1e-9);
        assert!(solution.value("y").unwrap().abs() < 1e-9);
        assert_eq!(solution.stationary_kind, Some(StationaryKind::Saddle));
    }

    #[test]
    fn test_auto_sense_skips_classification_without_indefinite_diagnosis() {
        let x = Expr::symbol("x");
        let model = Problem::new()
            .objective(Sense::Auto, Expr::pow(x.clone(), 2) - x * 6.0)
            .build()
            .unwrap();

        // convex diagnosis: no local classification needed
        let solution = SymbolicSolver::new()
            .with_convexity_domain(Domain::Global(Range::new(-5.0, 5.0)))
            .solve(&model)
            .unwrap();
        assert!((solution.value("x").unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(solution.curvature, Some(Curvature::StrictlyConvex));
        assert_eq!(solution.stationary_kind, None);

        // no sampling domain at all: likewise no classification
        let solution = SymbolicSolver::new().solve(&model).unwrap();
        assert_eq!(solution.curvature, None);
        assert_eq!(solution.stationary_kind, None);
    }

    #[test]
    fn test_by_name_guess_fills_missing_with_fallback() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let model = Problem::new()
            .minimize(Expr::pow(x, 2) + Expr::pow(y.clone(), 4) + Expr::pow(y, 2))
            .build()
            .unwrap();

        let mut guess = BTreeMap::new();
        guess.insert("x".to_string(), 2.0);
        let solution = SymbolicSolver::new()
            .with_initial_guess(InitialGuess::ByName(guess))
            .solve(&model)
            .unwrap();
        assert!(solution.value("x").unwrap().abs() < 1e-6);
        assert!(solution.value("y").unwrap().abs() < 1e-6);
    }
}
