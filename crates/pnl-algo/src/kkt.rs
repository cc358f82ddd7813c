//! Karush-Kuhn-Tucker optimality verification.
//!
//! An independent certificate on a candidate solution: the checker takes
//! the model, the assembled Lagrangian, and a complete variable mapping,
//! and runs six checks in a fixed order. Violations are diagnostics, not
//! errors — every check appends a human-readable message on its first
//! violation and [`KktChecker::verify_all`] aggregates the verdicts
//! without short-circuiting, so the full message log is always produced.
//!
//! Constraint residuals come straight from the model's [`ConstraintSet`],
//! never re-derived from the Lagrangian's additive terms.
//!
//! [`ConstraintSet`]: pnl_core::ConstraintSet

use std::collections::{BTreeMap, HashMap};

use pnl_core::{CoreError, CoreResult, Expr, Model, Sym};

/// Six-condition KKT verifier over one candidate solution.
pub struct KktChecker<'a> {
    model: &'a Model,
    lagrangian: &'a Expr,
    env: HashMap<Sym, f64>,
    tol: f64,
    messages: Vec<String>,
}

impl<'a> KktChecker<'a> {
    /// Checker over `solution`, a complete name-keyed variable mapping
    /// (decision variables, multipliers, and slacks all populated).
    pub fn new(
        model: &'a Model,
        lagrangian: &'a Expr,
        solution: &BTreeMap<String, f64>,
        tol: f64,
    ) -> Self {
        let env = solution
            .iter()
            .map(|(name, v)| (Sym::new(name), *v))
            .collect();
        KktChecker {
            model,
            lagrangian,
            env,
            tol,
            messages: Vec::new(),
        }
    }

    /// The diagnostic message log accumulated so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn value(&self, sym: &Sym) -> CoreResult<f64> {
        self.env
            .get(sym)
            .copied()
            .ok_or_else(|| CoreError::MissingSymbol(sym.name().to_string()))
    }

    /// 1. Stationarity: `∂L/∂x ≈ 0` for every decision variable.
    pub fn check_stationarity(&mut self) -> CoreResult<bool> {
        for var in self.model.variables().decision() {
            let d = self.lagrangian.diff(var).eval(&self.env)?;
            if d.abs() > self.tol {
                self.messages
                    .push(format!("Stationarity failed for {var}: dL/d{var} = {d}"));
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 2. Primal complementarity: `x · ∂L/∂x ≈ 0` for every decision
    /// variable.
    pub fn check_primal_complementarity(&mut self) -> CoreResult<bool> {
        for var in self.model.variables().decision() {
            let x = self.value(var)?;
            let d = self.lagrangian.diff(var).eval(&self.env)?;
            let prod = x * d;
            if prod.abs() > self.tol {
                self.messages.push(format!(
                    "Primal complementarity failed for {var}: {var}*dL/d{var} = {prod}"
                ));
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 3. Constraint satisfaction: equality residuals vanish, inequality
    /// residuals respect their direction within tolerance.
    pub fn check_constraints(&mut self) -> CoreResult<bool> {
        let constraints = self.model.constraints();
        for (i, h) in constraints.equalities().iter().enumerate() {
            let r = h.eval(&self.env)?;
            if r.abs() > self.tol {
                self.messages
                    .push(format!("Equality constraint {} violated: residual = {r}", i + 1));
                return Ok(false);
            }
        }
        for (j, (g, bound)) in constraints.inequalities_up().iter().enumerate() {
            let r = g.eval(&self.env)? - bound;
            if r > self.tol {
                self.messages.push(format!(
                    "Upper inequality {} violated: g - bound = {r} > 0",
                    j + 1
                ));
                return Ok(false);
            }
        }
        for (k, (g, bound)) in constraints.inequalities_dn().iter().enumerate() {
            let r = g.eval(&self.env)? - bound;
            if r < -self.tol {
                self.messages.push(format!(
                    "Lower inequality {} violated: g - bound = {r} < 0",
                    k + 1
                ));
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 4. Dual complementarity: `multiplier · residual ≈ 0` for every
    /// constraint.
    pub fn check_dual_complementarity(&mut self) -> CoreResult<bool> {
        let vars = self.model.variables();
        let constraints = self.model.constraints();

        for (i, h) in constraints.equalities().iter().enumerate() {
            let lmd = self.value(&vars.eq_multipliers()[i])?;
            let prod = lmd * h.eval(&self.env)?;
            if prod.abs() > self.tol {
                self.messages.push(format!(
                    "Dual complementarity failed: lambda{} * residual = {prod}",
                    i + 1
                ));
                return Ok(false);
            }
        }
        for (j, (g, bound)) in constraints.inequalities_up().iter().enumerate() {
            let pi = self.value(&vars.upper_multipliers()[j])?;
            let prod = pi * (g.eval(&self.env)? - bound);
            if prod.abs() > self.tol {
                self.messages.push(format!(
                    "Dual complementarity failed: pi_up{} * residual = {prod}",
                    j + 1
                ));
                return Ok(false);
            }
        }
        for (k, (g, bound)) in constraints.inequalities_dn().iter().enumerate() {
            let pi = self.value(&vars.lower_multipliers()[k])?;
            let prod = pi * (g.eval(&self.env)? - bound);
            if prod.abs() > self.tol {
                self.messages.push(format!(
                    "Dual complementarity failed: pi_dn{} * residual = {prod}",
                    k + 1
                ));
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 5. Primal domain: single-variable bound inequalities must respect
    /// their limit; the violated bound is named in the message.
    pub fn check_primal_domain(&mut self) -> CoreResult<bool> {
        let constraints = self.model.constraints();
        for (g, bound) in constraints.inequalities_up() {
            if let Expr::Sym(s) = g {
                let v = self.value(s)?;
                if v > bound + self.tol {
                    self.messages
                        .push(format!("Variable {s} = {v} exceeds its upper bound {bound}"));
                    return Ok(false);
                }
            }
        }
        for (g, bound) in constraints.inequalities_dn() {
            if let Expr::Sym(s) = g {
                let v = self.value(s)?;
                if v < bound - self.tol {
                    self.messages
                        .push(format!("Variable {s} = {v} is below its lower bound {bound}"));
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// 6. Multiplier validity: every multiplier must be finite and the
    /// inequality multipliers must be nonnegative within tolerance.
    pub fn check_multiplier_validity(&mut self) -> CoreResult<bool> {
        let vars = self.model.variables();
        for lmd in vars.eq_multipliers() {
            let v = self.value(lmd)?;
            if !v.is_finite() {
                self.messages
                    .push(format!("Multiplier {lmd} is not finite: {v}"));
                return Ok(false);
            }
        }
        for pi in vars
            .upper_multipliers()
            .iter()
            .chain(vars.lower_multipliers())
        {
            let v = self.value(pi)?;
            if !v.is_finite() {
                self.messages
                    .push(format!("Multiplier {pi} is not finite: {v}"));
                return Ok(false);
            }
            if v < -self.tol {
                self.messages
                    .push(format!("Nonnegativity violated: {pi} = {v} < 0"));
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run all six checks in order and aggregate with logical AND.
    ///
    /// Every check runs even after a failure, so the message log covers
    /// all violated conditions; within one check, only the first violation
    /// is reported. A success message is appended when everything passes.
    pub fn verify_all(&mut self) -> CoreResult<(bool, Vec<String>)> {
        let checks = [
            self.check_stationarity()?,
            self.check_primal_complementarity()?,
            self.check_constraints()?,
            self.check_dual_complementarity()?,
            self.check_primal_domain()?,
            self.check_multiplier_validity()?,
        ];
        let passed = checks.iter().all(|&c| c);
        if passed {
            self.messages
                .push("All KKT conditions satisfied.".to_string());
        }
        Ok((passed, self.messages.clone()))
    }
}
