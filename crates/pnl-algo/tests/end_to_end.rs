//! End-to-end solve and KKT certification on a constrained quadratic.

use std::collections::BTreeMap;

use pnl_algo::{
    Curvature, DerivativesCalculator, Domain, InitialGuess, KktChecker, LagrangianBuilder,
    Range, SymbolicSolver,
};
use pnl_core::{Expr, Problem, Relation, Subset};

const TOL: f64 = 1e-9;

/// min 2x1² + x2²  s.t.  x1 + x2 = 10,  x1 ≥ 0,  x2 ≥ 0
///
/// Stationary solution: x1 = 10/3, x2 = 20/3, λ = 40/3, both inequality
/// multipliers zero (inactive constraints).
fn dispatch_problem() -> pnl_core::Model {
    let x1 = Expr::symbol("x1");
    let x2 = Expr::symbol("x2");
    Problem::new()
        .minimize(Expr::pow(x1.clone(), 2) * 2.0 + Expr::pow(x2.clone(), 2))
        .subject_to(Relation::Eq(x1.clone() + x2.clone(), Expr::num(10.0)))
        .subject_to(Relation::Ge(x1, 0.0))
        .subject_to(Relation::Ge(x2, 0.0))
        .build()
        .unwrap()
}

fn near_optimum_guess() -> InitialGuess {
    // s1² = x1 and s2² = x2 at the optimum, so start the slacks near
    // sqrt(10/3) and sqrt(20/3)
    let mut guess = BTreeMap::new();
    guess.insert("x1".to_string(), 3.0);
    guess.insert("x2".to_string(), 7.0);
    guess.insert("lambda1".to_string(), 13.0);
    guess.insert("pi_dn1".to_string(), 0.0);
    guess.insert("pi_dn2".to_string(), 0.0);
    guess.insert("s1".to_string(), 1.8);
    guess.insert("s2".to_string(), 2.6);
    InitialGuess::ByName(guess)
}

#[test]
fn test_constrained_quadratic_solution() {
    let model = dispatch_problem();
    let solution = SymbolicSolver::new()
        .with_tolerance(TOL)
        .with_max_iterations(50)
        .with_initial_guess(near_optimum_guess())
        .solve(&model)
        .expect("Newton should converge");

    assert!(!solution.linear, "slack products make the system nonlinear");
    assert!(solution.iterations >= 1);
    assert_eq!(solution.hessian_rank, Some(7));

    assert!((solution.value("x1").unwrap() - 10.0 / 3.0).abs() < 1e-6);
    assert!((solution.value("x2").unwrap() - 20.0 / 3.0).abs() < 1e-6);
    assert!((solution.value("lambda1").unwrap() - 40.0 / 3.0).abs() < 1e-6);
    // both bounds inactive
    assert!(solution.value("pi_dn1").unwrap().abs() < 1e-6);
    assert!(solution.value("pi_dn2").unwrap().abs() < 1e-6);

    // f(10/3, 20/3) = 2·100/9 + 400/9 = 200/3
    assert!((solution.objective_value - 200.0 / 3.0).abs() < 1e-5);
}

#[test]
fn test_kkt_certificate_passes() {
    let model = dispatch_problem();
    let solution = SymbolicSolver::new()
        .with_tolerance(TOL)
        .with_max_iterations(50)
        .with_initial_guess(near_optimum_guess())
        .solve(&model)
        .unwrap();

    let lagrangian = LagrangianBuilder::new(&model).build().unwrap();
    let mut checker = KktChecker::new(&model, &lagrangian, &solution.values, 1e-6);
    let (passed, messages) = checker.verify_all().unwrap();
    assert!(passed, "messages: {messages:?}");
    assert_eq!(messages.last().unwrap(), "All KKT conditions satisfied.");
}

#[test]
fn test_gradient_round_trip_at_solution() {
    let model = dispatch_problem();
    let solution = SymbolicSolver::new()
        .with_tolerance(TOL)
        .with_max_iterations(50)
        .with_initial_guess(near_optimum_guess())
        .solve(&model)
        .unwrap();

    let lagrangian = LagrangianBuilder::new(&model).build().unwrap();
    let gradient =
        DerivativesCalculator::new(&lagrangian, model.variables()).gradient(Subset::All);

    let env = solution
        .values
        .iter()
        .map(|(name, v)| (pnl_core::Sym::new(name), *v))
        .collect();
    for component in &gradient {
        let v = component.eval(&env).unwrap();
        assert!(
            v.abs() <= TOL,
            "gradient component {component} = {v} at the returned solution"
        );
    }
}

#[test]
fn test_curvature_diagnosis_on_lagrangian() {
    // the Lagrangian's full Hessian carries the multiplier cross terms,
    // so the constrained problem diagnoses as indefinite even though the
    // objective itself is strictly convex
    let model = dispatch_problem();
    let solution = SymbolicSolver::new()
        .with_tolerance(TOL)
        .with_max_iterations(50)
        .with_initial_guess(near_optimum_guess())
        .with_convexity_domain(Domain::Global(Range::with_step(-5.0, 5.0, 5.0)))
        .solve(&model)
        .unwrap();
    assert_eq!(solution.curvature, Some(Curvature::Indefinite));
}

#[test]
fn test_solution_serializes() {
    let model = dispatch_problem();
    let solution = SymbolicSolver::new()
        .with_tolerance(TOL)
        .with_max_iterations(50)
        .with_initial_guess(near_optimum_guess())
        .solve(&model)
        .unwrap();

    let json = serde_json::to_value(&solution).unwrap();
    assert!(json["values"]["x1"].is_number());
    assert_eq!(json["linear"], serde_json::json!(false));
    assert!(json["objective_value"].is_number());
}
