//! Problem model container.
//!
//! Holds the symbolic definition of one constrained-optimization run:
//! variables with typed roles, ordered constraint collections with retained
//! residual expressions, the objective, and optional symbolic constants.
//! Built once per run (usually through [`Problem`]) and read-only afterwards.
//!
//! Variable roles are structural ([`VarRole`]) rather than encoded in name
//! prefixes, so multiplier/slack dispatch never inspects strings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::expr::{Expr, Sym};

/// Optimization sense. `Auto` is treated as `Min` when the Lagrangian is
/// assembled and additionally enables local classification of converged
/// stationary points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// Minimize the objective.
    Min,
    /// Maximize the objective.
    Max,
    /// Minimize, with eigenvalue classification of the solution when the
    /// curvature diagnosis came out indefinite.
    Auto,
}

/// Role of a variable in the optimization problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarRole {
    /// Degree of freedom of the original problem.
    Decision,
    /// Equality-constraint multiplier (λ).
    EqMultiplier,
    /// Multiplier of a `g(x) ≤ b` constraint (π_up).
    UpperMultiplier,
    /// Multiplier of a `g(x) ≥ b` constraint (π_dn).
    LowerMultiplier,
    /// Squared slack variable converting an inequality into an equality.
    Slack,
}

/// Variable subset selector for derivative computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subset {
    /// Decision variables, multipliers, and slacks, in that order.
    All,
    /// Decision variables only.
    Decision,
    /// Equality multipliers only.
    EqMultipliers,
    /// Upper and lower inequality multipliers.
    InequalityMultipliers,
    /// Slack variables only.
    Slacks,
}

/// The complete symbolic variable set for one problem.
///
/// Ordering is significant everywhere: index `i` pairs the i-th equality
/// with `lmd[i]`, the j-th upper inequality with `pi_up[j]` and `s[j]`, and
/// the k-th lower inequality with `pi_dn[k]` and `s[n_ineq_up + k]`.
#[derive(Debug, Clone)]
pub struct VariableSet {
    x: Vec<Sym>,
    lmd: Vec<Sym>,
    pi_up: Vec<Sym>,
    pi_dn: Vec<Sym>,
    s: Vec<Sym>,
}

impl VariableSet {
    /// Allocate with generated decision names `x1..xn`.
    pub fn new(n_decision: usize, n_eq: usize, n_ineq_up: usize, n_ineq_dn: usize) -> Self {
        Self::with_decision(Self::indexed("x", n_decision), n_eq, n_ineq_up, n_ineq_dn)
    }

    /// Allocate with caller-supplied decision names.
    pub fn from_names<I, S>(names: I, n_eq: usize, n_ineq_up: usize, n_ineq_dn: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let x = names.into_iter().map(|n| Sym::new(n.as_ref())).collect();
        Self::with_decision(x, n_eq, n_ineq_up, n_ineq_dn)
    }

    fn with_decision(x: Vec<Sym>, n_eq: usize, n_ineq_up: usize, n_ineq_dn: usize) -> Self {
        VariableSet {
            x,
            lmd: Self::indexed("lambda", n_eq),
            pi_up: Self::indexed("pi_up", n_ineq_up),
            pi_dn: Self::indexed("pi_dn", n_ineq_dn),
            s: Self::indexed("s", n_ineq_up + n_ineq_dn),
        }
    }

    fn indexed(prefix: &str, n: usize) -> Vec<Sym> {
        (1..=n).map(|i| Sym::new(format!("{prefix}{i}"))).collect()
    }

    /// Decision variables.
    pub fn decision(&self) -> &[Sym] {
        &self.x
    }

    /// Equality multipliers (λ).
    pub fn eq_multipliers(&self) -> &[Sym] {
        &self.lmd
    }

    /// Upper-inequality multipliers (π_up).
    pub fn upper_multipliers(&self) -> &[Sym] {
        &self.pi_up
    }

    /// Lower-inequality multipliers (π_dn).
    pub fn lower_multipliers(&self) -> &[Sym] {
        &self.pi_dn
    }

    /// Slack variables (shared pool: upper slacks first, then lower).
    pub fn slacks(&self) -> &[Sym] {
        &self.s
    }

    /// All variables in canonical order: x, λ, π_up, π_dn, s.
    pub fn all(&self) -> Vec<Sym> {
        let mut out =
            Vec::with_capacity(self.x.len() + self.lmd.len() + self.n_ineq() * 2);
        out.extend_from_slice(&self.x);
        out.extend_from_slice(&self.lmd);
        out.extend_from_slice(&self.pi_up);
        out.extend_from_slice(&self.pi_dn);
        out.extend_from_slice(&self.s);
        out
    }

    /// Resolve a subset selector to its ordered variable list.
    pub fn subset(&self, subset: Subset) -> Vec<Sym> {
        match subset {
            Subset::All => self.all(),
            Subset::Decision => self.x.clone(),
            Subset::EqMultipliers => self.lmd.clone(),
            Subset::InequalityMultipliers => {
                let mut out = self.pi_up.clone();
                out.extend_from_slice(&self.pi_dn);
                out
            }
            Subset::Slacks => self.s.clone(),
        }
    }

    /// Role of a symbol, if it belongs to this set.
    pub fn role_of(&self, sym: &Sym) -> Option<VarRole> {
        if self.x.contains(sym) {
            Some(VarRole::Decision)
        } else if self.lmd.contains(sym) {
            Some(VarRole::EqMultiplier)
        } else if self.pi_up.contains(sym) {
            Some(VarRole::UpperMultiplier)
        } else if self.pi_dn.contains(sym) {
            Some(VarRole::LowerMultiplier)
        } else if self.s.contains(sym) {
            Some(VarRole::Slack)
        } else {
            None
        }
    }

    /// Total number of variables across all roles.
    pub fn len(&self) -> usize {
        self.x.len() + self.lmd.len() + self.pi_up.len() + self.pi_dn.len() + self.s.len()
    }

    /// True when the set holds no variables at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of inequality constraints (upper + lower).
    pub fn n_ineq(&self) -> usize {
        self.pi_up.len() + self.pi_dn.len()
    }
}

/// Ordered constraint collections with retained residual expressions.
///
/// Equalities are stored as residuals `h(x)` meaning `h(x) = 0`; inequality
/// entries `(g(x), b)` mean `g(x) ≤ b` (upper) or `g(x) ≥ b` (lower).
/// Retaining the residuals here lets the KKT checker evaluate the original
/// constraints directly instead of re-deriving them from the Lagrangian.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    equalities: Vec<Expr>,
    inequalities_up: Vec<(Expr, f64)>,
    inequalities_dn: Vec<(Expr, f64)>,
}

impl ConstraintSet {
    /// Empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality constraint `h(x) = 0`.
    pub fn equality(&mut self, residual: Expr) {
        self.equalities.push(residual);
    }

    /// Add an upper inequality `g(x) ≤ bound`.
    pub fn upper_inequality(&mut self, expr: Expr, bound: f64) {
        self.inequalities_up.push((expr, bound));
    }

    /// Add a lower inequality `g(x) ≥ bound`.
    pub fn lower_inequality(&mut self, expr: Expr, bound: f64) {
        self.inequalities_dn.push((expr, bound));
    }

    /// Equality residuals, in insertion order.
    pub fn equalities(&self) -> &[Expr] {
        &self.equalities
    }

    /// Upper inequalities `(g, bound)`, in insertion order.
    pub fn inequalities_up(&self) -> &[(Expr, f64)] {
        &self.inequalities_up
    }

    /// Lower inequalities `(g, bound)`, in insertion order.
    pub fn inequalities_dn(&self) -> &[(Expr, f64)] {
        &self.inequalities_dn
    }

    /// Number of equality constraints.
    pub fn n_eq(&self) -> usize {
        self.equalities.len()
    }

    /// Number of upper inequalities.
    pub fn n_ineq_up(&self) -> usize {
        self.inequalities_up.len()
    }

    /// Number of lower inequalities.
    pub fn n_ineq_dn(&self) -> usize {
        self.inequalities_dn.len()
    }
}

/// The scalar objective `f(x)`. Must be set before use.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveFunction {
    expr: Option<Expr>,
}

impl ObjectiveFunction {
    /// Unset objective.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objective with the given expression.
    pub fn from_expr(expr: Expr) -> Self {
        ObjectiveFunction { expr: Some(expr) }
    }

    /// Set (or replace) the objective expression.
    pub fn set(&mut self, expr: Expr) {
        self.expr = Some(expr);
    }

    /// The objective expression; configuration error when unset.
    pub fn get(&self) -> CoreResult<&Expr> {
        self.expr.as_ref().ok_or(CoreError::Objective)
    }

    /// True once an expression has been set.
    pub fn is_set(&self) -> bool {
        self.expr.is_some()
    }
}

/// Optional named symbolic constants excluded from differentiation
/// (currently only the barrier parameter µ).
#[derive(Debug, Clone, Default)]
pub struct ConstantSet {
    mi: Option<Sym>,
}

impl ConstantSet {
    /// No constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant set carrying the barrier parameter µ.
    pub fn with_barrier() -> Self {
        ConstantSet {
            mi: Some(Sym::new("mi")),
        }
    }

    /// The barrier parameter, when present.
    pub fn barrier(&self) -> Option<&Sym> {
        self.mi.as_ref()
    }

    /// All constants.
    pub fn symbols(&self) -> Vec<Sym> {
        self.mi.iter().cloned().collect()
    }
}

/// Immutable per-run problem definition: variables, objective, constraints,
/// constants, and sense.
#[derive(Debug, Clone)]
pub struct Model {
    variables: VariableSet,
    objective: ObjectiveFunction,
    constraints: ConstraintSet,
    constants: ConstantSet,
    sense: Sense,
}

impl Model {
    /// Assemble a model, validating the multiplier/slack count invariants
    /// against the constraint collections.
    pub fn new(
        variables: VariableSet,
        objective: ObjectiveFunction,
        constraints: ConstraintSet,
        constants: ConstantSet,
        sense: Sense,
    ) -> CoreResult<Self> {
        if variables.eq_multipliers().len() != constraints.n_eq() {
            return Err(CoreError::Validation(format!(
                "{} equality multipliers for {} equality constraints",
                variables.eq_multipliers().len(),
                constraints.n_eq()
            )));
        }
        if variables.upper_multipliers().len() != constraints.n_ineq_up() {
            return Err(CoreError::Validation(format!(
                "{} upper multipliers for {} upper inequalities",
                variables.upper_multipliers().len(),
                constraints.n_ineq_up()
            )));
        }
        if variables.lower_multipliers().len() != constraints.n_ineq_dn() {
            return Err(CoreError::Validation(format!(
                "{} lower multipliers for {} lower inequalities",
                variables.lower_multipliers().len(),
                constraints.n_ineq_dn()
            )));
        }
        if variables.slacks().len() != constraints.n_ineq_up() + constraints.n_ineq_dn() {
            return Err(CoreError::Validation(format!(
                "{} slacks for {} inequalities",
                variables.slacks().len(),
                constraints.n_ineq_up() + constraints.n_ineq_dn()
            )));
        }
        Ok(Model {
            variables,
            objective,
            constraints,
            constants,
            sense,
        })
    }

    /// The variable set.
    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// The objective function.
    pub fn objective(&self) -> &ObjectiveFunction {
        &self.objective
    }

    /// The constraint collections.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// The symbolic constants.
    pub fn constants(&self) -> &ConstantSet {
        &self.constants
    }

    /// The optimization sense.
    pub fn sense(&self) -> Sense {
        self.sense
    }
}

/// A relational constraint expression, as handed over by model-building
/// collaborators.
#[derive(Debug, Clone)]
pub enum Relation {
    /// `lhs = rhs`; stored as the residual `lhs - rhs`.
    Eq(Expr, Expr),
    /// `expr ≤ bound`.
    Le(Expr, f64),
    /// `expr ≥ bound`.
    Ge(Expr, f64),
}

/// Declarative problem description: an objective plus an ordered list of
/// relational constraints. [`Problem::build`] discovers the decision
/// variables from the free symbols and produces an immutable [`Model`].
#[derive(Debug, Clone)]
pub struct Problem {
    sense: Sense,
    objective: Option<Expr>,
    relations: Vec<Relation>,
}

impl Default for Problem {
    fn default() -> Self {
        Self::new()
    }
}

impl Problem {
    /// Empty problem (minimization by default).
    pub fn new() -> Self {
        Problem {
            sense: Sense::Min,
            objective: None,
            relations: Vec::new(),
        }
    }

    /// Set a minimization objective.
    pub fn minimize(mut self, expr: Expr) -> Self {
        self.sense = Sense::Min;
        self.objective = Some(expr);
        self
    }

    /// Set a maximization objective.
    pub fn maximize(mut self, expr: Expr) -> Self {
        self.sense = Sense::Max;
        self.objective = Some(expr);
        self
    }

    /// Set the objective with an explicit sense.
    pub fn objective(mut self, sense: Sense, expr: Expr) -> Self {
        self.sense = sense;
        self.objective = Some(expr);
        self
    }

    /// Append a constraint. Order is preserved and fixes multiplier/slack
    /// pairing.
    pub fn subject_to(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Build the model container: collect free symbols into the decision
    /// list (name order), allocate multipliers and slacks, and populate the
    /// constraint collections preserving order.
    pub fn build(self) -> CoreResult<Model> {
        let objective_expr = self.objective.ok_or(CoreError::Objective)?;

        let mut symbols: BTreeSet<Sym> = objective_expr.free_symbols();
        for relation in &self.relations {
            match relation {
                Relation::Eq(lhs, rhs) => {
                    symbols.extend(lhs.free_symbols());
                    symbols.extend(rhs.free_symbols());
                }
                Relation::Le(expr, _) | Relation::Ge(expr, _) => {
                    symbols.extend(expr.free_symbols());
                }
            }
        }

        let mut constraints = ConstraintSet::new();
        for relation in self.relations {
            match relation {
                Relation::Eq(lhs, rhs) => constraints.equality(lhs - rhs),
                Relation::Le(expr, bound) => constraints.upper_inequality(expr, bound),
                Relation::Ge(expr, bound) => constraints.lower_inequality(expr, bound),
            }
        }

        let variables = VariableSet::from_names(
            symbols.iter().map(|s| s.name()),
            constraints.n_eq(),
            constraints.n_ineq_up(),
            constraints.n_ineq_dn(),
        );

        Model::new(
            variables,
            ObjectiveFunction::from_expr(objective_expr),
            constraints,
            ConstantSet::new(),
            self.sense,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_set_invariants() {
        let vars = VariableSet::new(3, 2, 1, 2);
        assert_eq!(vars.decision().len(), 3);
        assert_eq!(vars.eq_multipliers().len(), 2);
        assert_eq!(vars.upper_multipliers().len(), 1);
        assert_eq!(vars.lower_multipliers().len(), 2);
        assert_eq!(vars.slacks().len(), 3);
        assert_eq!(vars.len(), 11);
        assert_eq!(vars.all().len(), 11);
        assert_eq!(vars.decision()[0].name(), "x1");
        assert_eq!(vars.slacks()[2].name(), "s3");
    }

    #[test]
    fn test_subset_resolution() {
        let vars = VariableSet::new(2, 1, 1, 1);
        assert_eq!(vars.subset(Subset::Decision).len(), 2);
        assert_eq!(vars.subset(Subset::EqMultipliers).len(), 1);
        assert_eq!(vars.subset(Subset::InequalityMultipliers).len(), 2);
        assert_eq!(vars.subset(Subset::Slacks).len(), 2);
        assert_eq!(vars.subset(Subset::All).len(), 7);
    }

    #[test]
    fn test_role_of() {
        let vars = VariableSet::new(1, 1, 1, 0);
        assert_eq!(vars.role_of(&Sym::new("x1")), Some(VarRole::Decision));
        assert_eq!(vars.role_of(&Sym::new("lambda1")), Some(VarRole::EqMultiplier));
        assert_eq!(vars.role_of(&Sym::new("pi_up1")), Some(VarRole::UpperMultiplier));
        assert_eq!(vars.role_of(&Sym::new("s1")), Some(VarRole::Slack));
        assert_eq!(vars.role_of(&Sym::new("bogus")), None);
    }

    #[test]
    fn test_objective_unset_is_error() {
        let obj = ObjectiveFunction::new();
        assert!(matches!(obj.get(), Err(CoreError::Objective)));
    }

    #[test]
    fn test_problem_build() {
        let x1 = Expr::symbol("x1");
        let x2 = Expr::symbol("x2");
        let model = Problem::new()
            .minimize(Expr::pow(x1.clone(), 2) + Expr::pow(x2.clone(), 2))
            .subject_to(Relation::Eq(x1.clone() + x2.clone(), Expr::num(10.0)))
            .subject_to(Relation::Ge(x1.clone(), 0.0))
            .subject_to(Relation::Ge(x2.clone(), 0.0))
            .build()
            .unwrap();

        assert_eq!(model.sense(), Sense::Min);
        assert_eq!(model.variables().decision().len(), 2);
        assert_eq!(model.constraints().n_eq(), 1);
        assert_eq!(model.constraints().n_ineq_up(), 0);
        assert_eq!(model.constraints().n_ineq_dn(), 2);
        assert_eq!(model.variables().slacks().len(), 2);

        // equality residual is lhs - rhs
        let h = &model.constraints().equalities()[0];
        let env = [(Sym::new("x1"), 4.0), (Sym::new("x2"), 6.0)]
            .into_iter()
            .collect();
        assert!((h.eval(&env).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_problem_without_objective_fails() {
        let err = Problem::new()
            .subject_to(Relation::Ge(Expr::symbol("x"), 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::Objective));
    }

    #[test]
    fn test_enums_serialize_round_trip() {
        assert_eq!(serde_json::to_string(&Sense::Min).unwrap(), "\"Min\"");
        assert_eq!(
            serde_json::to_string(&Subset::InequalityMultipliers).unwrap(),
            "\"InequalityMultipliers\""
        );
        let role: VarRole = serde_json::from_str("\"Slack\"").unwrap();
        assert_eq!(role, VarRole::Slack);
        let sense: Sense = serde_json::from_str("\"Auto\"").unwrap();
        assert_eq!(sense, Sense::Auto);
    }

    #[test]
    fn test_model_invariant_violation() {
        let vars = VariableSet::new(1, 0, 0, 0);
        let mut constraints = ConstraintSet::new();
        constraints.equality(Expr::symbol("x1"));
        let err = Model::new(
            vars,
            ObjectiveFunction::from_expr(Expr::symbol("x1")),
            constraints,
            ConstantSet::new(),
            Sense::Min,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
