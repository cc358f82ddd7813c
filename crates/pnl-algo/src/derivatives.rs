//! Symbolic gradient and Hessian computation.
//!
//! Derivatives are taken with respect to a typed variable subset resolved
//! through [`Subset`]; constants from the model's [`ConstantSet`] never
//! appear in the variable lists, so they are naturally excluded. Every call
//! recomputes from scratch — results are pure functions of the expression
//! and the variable ordering.
//!
//! [`ConstantSet`]: pnl_core::ConstantSet

use pnl_core::{Expr, Subset, VariableSet};

/// Gradient/Hessian calculator for one expression over a variable set.
pub struct DerivativesCalculator<'a> {
    expr: &'a Expr,
    vars: &'a VariableSet,
}

impl<'a> DerivativesCalculator<'a> {
    /// Calculator for `expr` over `vars`.
    pub fn new(expr: &'a Expr, vars: &'a VariableSet) -> Self {
        DerivativesCalculator { expr, vars }
    }

    /// Ordered first partial derivatives over the resolved subset.
    pub fn gradient(&self, subset: Subset) -> Vec<Expr> {
        self.vars
            .subset(subset)
            .iter()
            .map(|v| self.expr.diff(v))
            .collect()
    }

    /// Square matrix of second partials over the resolved subset.
    pub fn hessian(&self, subset: Subset) -> Vec<Vec<Expr>> {
        let varset = self.vars.subset(subset);
        varset
            .iter()
            .map(|vi| {
                let di = self.expr.diff(vi);
                varset.iter().map(|vj| di.diff(vj)).collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_core::Sym;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, f64)]) -> HashMap<Sym, f64> {
        pairs
            .iter()
            .map(|(name, v)| (Sym::new(name), *v))
            .collect()
    }

    #[test]
    fn test_gradient_of_quadratic() {
        let vars = VariableSet::new(2, 0, 0, 0);
        let x1 = Expr::from(&vars.decision()[0]);
        let x2 = Expr::from(&vars.decision()[1]);
        // f = 2x1² + x1·x2
        let f = Expr::pow(x1.clone(), 2) * 2.0 + x1 * x2;

        let calc = DerivativesCalculator::new(&f, &vars);
        let grad = calc.gradient(Subset::All);
        assert_eq!(grad.len(), 2);

        let at = env(&[("x1", 1.0), ("x2", 3.0)]);
        // ∂f/∂x1 = 4x1 + x2 = 7, ∂f/∂x2 = x1 = 1
        assert!((grad[0].eval(&at).unwrap() - 7.0).abs() < 1e-12);
        assert!((grad[1].eval(&at).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hessian_is_symmetric() {
        let vars = VariableSet::new(2, 0, 0, 0);
        let x1 = Expr::from(&vars.decision()[0]);
        let x2 = Expr::from(&vars.decision()[1]);
        let f = Expr::pow(x1.clone(), 3) + x1 * Expr::pow(x2, 2) * 5.0;

        let calc = DerivativesCalculator::new(&f, &vars);
        let h = calc.hessian(Subset::All);
        let at = env(&[("x1", 2.0), ("x2", -1.0)]);

        for i in 0..2 {
            for j in 0..2 {
                let hij = h[i][j].eval(&at).unwrap();
                let hji = h[j][i].eval(&at).unwrap();
                assert!((hij - hji).abs() < 1e-12);
            }
        }
        // ∂²f/∂x1² = 6x1 = 12
        assert!((h[0][0].eval(&at).unwrap() - 12.0).abs() < 1e-12);
        // ∂²f/∂x1∂x2 = 10x2 = −10
        assert!((h[0][1].eval(&at).unwrap() + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_subset_dimensions() {
        let vars = VariableSet::new(2, 1, 1, 1);
        let f = Expr::symbol("x1");
        let calc = DerivativesCalculator::new(&f, &vars);

        assert_eq!(calc.gradient(Subset::All).len(), 7);
        assert_eq!(calc.gradient(Subset::Decision).len(), 2);
        assert_eq!(calc.gradient(Subset::EqMultipliers).len(), 1);
        assert_eq!(calc.gradient(Subset::InequalityMultipliers).len(), 2);
        assert_eq!(calc.gradient(Subset::Slacks).len(), 2);

        let h = calc.hessian(Subset::Decision);
        assert_eq!(h.len(), 2);
        assert!(h.iter().all(|row| row.len() == 2));
    }
}
