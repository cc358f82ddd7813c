//! Lagrangian assembly.
//!
//! Combines the model container into a single scalar expression
//!
//! ```text
//! L = ±f(x) − Σ λ_i·h_i(x) + Σ sign·π_up_j·(g_j − b_j + s_j²)
//!                          + Σ sign'·π_dn_k·(g_k − b_k − s_k²)
//! ```
//!
//! Inequalities enter as equalities through squared slacks, so no explicit
//! sign constraint on `s` is ever needed. The term signs flip between min
//! and max mode so the stationarity conditions stay consistent either way.

use pnl_core::{CoreResult, Expr, Model, Sense};

/// Builds the Lagrangian expression for a model.
pub struct LagrangianBuilder<'a> {
    model: &'a Model,
}

impl<'a> LagrangianBuilder<'a> {
    /// Builder over a model container.
    pub fn new(model: &'a Model) -> Self {
        LagrangianBuilder { model }
    }

    /// Assemble the Lagrangian. Fails only when the objective is unset.
    pub fn build(&self) -> CoreResult<Expr> {
        let f = self.model.objective().get()?.clone();
        let vars = self.model.variables();
        let constraints = self.model.constraints();

        // Auto is resolved upstream; at this stage it behaves as Min.
        let maximize = self.model.sense() == Sense::Max;

        let mut terms = vec![if maximize { -f } else { f }];

        for (i, h) in constraints.equalities().iter().enumerate() {
            let lmd = &vars.eq_multipliers()[i];
            terms.push(-(Expr::from(lmd) * h.clone()));
        }

        // g(x) ≤ b  =>  g − b + s² = 0
        let sign_up = if maximize { -1.0 } else { 1.0 };
        for (j, (g, bound)) in constraints.inequalities_up().iter().enumerate() {
            let pi = &vars.upper_multipliers()[j];
            let s = &vars.slacks()[j];
            let residual = g.clone() - *bound + Expr::pow(Expr::from(s), 2);
            terms.push(Expr::from(pi) * residual * sign_up);
        }

        // g(x) ≥ b  =>  g − b − s² = 0, slacks continue after the upper pool
        let sign_dn = -sign_up;
        let n_up = constraints.n_ineq_up();
        for (k, (g, bound)) in constraints.inequalities_dn().iter().enumerate() {
            let pi = &vars.lower_multipliers()[k];
            let s = &vars.slacks()[n_up + k];
            let residual = g.clone() - *bound - Expr::pow(Expr::from(s), 2);
            terms.push(Expr::from(pi) * residual * sign_dn);
        }

        Ok(Expr::sum(terms))
    }
}
