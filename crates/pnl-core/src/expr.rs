//! Symbolic expression substrate.
//!
//! A deliberately small expression tree covering the forms a Lagrangian-based
//! solver actually produces: sums, products, and integer powers of named
//! symbols. This is not a computer algebra system; it supports exactly the
//! operations the engine needs:
//!
//! - symbolic differentiation ([`Expr::diff`])
//! - numeric evaluation against a symbol environment ([`Expr::eval`])
//! - multivariate polynomial decomposition ([`Expr::as_poly`]) for
//!   linear-system detection
//! - closed-form polynomial antiderivatives ([`Expr::integrate`]) for
//!   building integral-of-marginal-cost objectives
//!
//! Constructors fold constants and flatten nested sums/products so that
//! derivative trees stay compact without a separate simplification pass.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// An interned symbol name. Cheap to clone, ordered lexicographically.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sym(Arc<str>);

impl Sym {
    /// Create a symbol from a name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Sym(Arc::from(name.as_ref()))
    }

    /// The symbol's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Sym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sym({})", self.0)
    }
}

/// A symbolic expression over real constants and named symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric constant.
    Num(f64),
    /// Named symbol.
    Sym(Sym),
    /// Sum of terms.
    Add(Vec<Expr>),
    /// Product of factors.
    Mul(Vec<Expr>),
    /// Integer power of a base expression.
    Pow(Box<Expr>, i32),
}

impl Expr {
    /// Numeric constant.
    pub fn num(v: f64) -> Expr {
        Expr::Num(v)
    }

    /// Fresh symbol expression from a name.
    pub fn symbol(name: &str) -> Expr {
        Expr::Sym(Sym::new(name))
    }

    /// Sum with constant folding and one-level flattening.
    pub fn sum(terms: Vec<Expr>) -> Expr {
        let mut constant = 0.0;
        let mut out = Vec::new();
        for term in terms {
            match term {
                Expr::Num(v) => constant += v,
                Expr::Add(inner) => {
                    for t in inner {
                        match t {
                            Expr::Num(v) => constant += v,
                            other => out.push(other),
                        }
                    }
                }
                other => out.push(other),
            }
        }
        if constant != 0.0 {
            out.push(Expr::Num(constant));
        }
        match out.len() {
            0 => Expr::Num(0.0),
            1 => out.pop().unwrap(),
            _ => Expr::Add(out),
        }
    }

    /// Product with constant folding and one-level flattening.
    pub fn product(factors: Vec<Expr>) -> Expr {
        let mut coeff = 1.0;
        let mut out = Vec::new();
        for factor in factors {
            match factor {
                Expr::Num(v) => coeff *= v,
                Expr::Mul(inner) => {
                    for g in inner {
                        match g {
                            Expr::Num(v) => coeff *= v,
                            other => out.push(other),
                        }
                    }
                }
                other => out.push(other),
            }
        }
        if coeff == 0.0 {
            return Expr::Num(0.0);
        }
        if out.is_empty() {
            return Expr::Num(coeff);
        }
        if coeff != 1.0 {
            out.insert(0, Expr::Num(coeff));
        }
        if out.len() == 1 {
            out.pop().unwrap()
        } else {
            Expr::Mul(out)
        }
    }

    /// Integer power with folding of trivial exponents and constant bases.
    pub fn pow(base: Expr, exp: i32) -> Expr {
        match (base, exp) {
            (_, 0) => Expr::Num(1.0),
            (b, 1) => b,
            // 0^-k is left unevaluated; it surfaces as a non-finite value
            // at evaluation time.
            (Expr::Num(v), e) if v != 0.0 || e > 0 => Expr::Num(v.powi(e)),
            (Expr::Pow(b, e0), e) => Expr::Pow(b, e0 * e),
            (b, e) => Expr::Pow(Box::new(b), e),
        }
    }

    /// First partial derivative with respect to `var`.
    pub fn diff(&self, var: &Sym) -> Expr {
        match self {
            Expr::Num(_) => Expr::Num(0.0),
            Expr::Sym(s) => Expr::Num(if s == var { 1.0 } else { 0.0 }),
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.diff(var)).collect()),
            Expr::Mul(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, fi) in factors.iter().enumerate() {
                    let mut parts = vec![fi.diff(var)];
                    for (j, fj) in factors.iter().enumerate() {
                        if j != i {
                            parts.push(fj.clone());
                        }
                    }
                    terms.push(Expr::product(parts));
                }
                Expr::sum(terms)
            }
            Expr::Pow(base, exp) => Expr::product(vec![
                Expr::Num(*exp as f64),
                Expr::pow((**base).clone(), exp - 1),
                base.diff(var),
            ]),
        }
    }

    /// Evaluate against a symbol environment.
    ///
    /// Fails with [`CoreError::MissingSymbol`] when a symbol is absent and
    /// with [`CoreError::NonFinite`] when the result is NaN or infinite.
    pub fn eval(&self, env: &HashMap<Sym, f64>) -> CoreResult<f64> {
        let v = self.eval_inner(env)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(CoreError::NonFinite(self.to_string()))
        }
    }

    fn eval_inner(&self, env: &HashMap<Sym, f64>) -> CoreResult<f64> {
        match self {
            Expr::Num(v) => Ok(*v),
            Expr::Sym(s) => env
                .get(s)
                .copied()
                .ok_or_else(|| CoreError::MissingSymbol(s.name().to_string())),
            Expr::Add(terms) => {
                let mut acc = 0.0;
                for t in terms {
                    acc += t.eval_inner(env)?;
                }
                Ok(acc)
            }
            Expr::Mul(factors) => {
                let mut acc = 1.0;
                for f in factors {
                    acc *= f.eval_inner(env)?;
                }
                Ok(acc)
            }
            Expr::Pow(base, exp) => Ok(base.eval_inner(env)?.powi(*exp)),
        }
    }

    /// All symbols appearing in the expression, in name order.
    pub fn free_symbols(&self) -> BTreeSet<Sym> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Sym>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Add(terms) => terms.iter().for_each(|t| t.collect_symbols(out)),
            Expr::Mul(factors) => factors.iter().for_each(|f| f.collect_symbols(out)),
            Expr::Pow(base, _) => base.collect_symbols(out),
        }
    }

    /// True if `var` appears anywhere in the expression.
    pub fn contains(&self, var: &Sym) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Sym(s) => s == var,
            Expr::Add(terms) => terms.iter().any(|t| t.contains(var)),
            Expr::Mul(factors) => factors.iter().any(|f| f.contains(var)),
            Expr::Pow(base, _) => base.contains(var),
        }
    }

    /// Decompose as a multivariate polynomial over the ordered generator
    /// list `vars`.
    ///
    /// Returns `None` when the expression is not polynomial in `vars`
    /// (negative powers, symbols outside the generator list). Callers treat
    /// `None` as "nonlinear", never as an error.
    pub fn as_poly(&self, vars: &[Sym]) -> Option<Poly> {
        match self {
            Expr::Num(v) => Some(Poly::constant(vars.len(), *v)),
            Expr::Sym(s) => {
                let i = vars.iter().position(|v| v == s)?;
                Some(Poly::monomial(vars.len(), i))
            }
            Expr::Add(terms) => {
                let mut acc = Poly::constant(vars.len(), 0.0);
                for t in terms {
                    acc = acc.add(&t.as_poly(vars)?);
                }
                Some(acc)
            }
            Expr::Mul(factors) => {
                let mut acc = Poly::constant(vars.len(), 1.0);
                for f in factors {
                    acc = acc.mul(&f.as_poly(vars)?);
                }
                Some(acc)
            }
            Expr::Pow(base, exp) => {
                if *exp < 0 {
                    return None;
                }
                Some(base.as_poly(vars)?.powi(*exp as u32))
            }
        }
    }

    /// Closed-form antiderivative with respect to `var`.
    ///
    /// Restricted to expressions polynomial in `var`; anything else is
    /// [`CoreError::Unsupported`]. This is all the objective-construction
    /// path needs (integral of a quadratic marginal-cost curve).
    pub fn integrate(&self, var: &Sym) -> CoreResult<Expr> {
        if !self.contains(var) {
            return Ok(Expr::product(vec![self.clone(), Expr::Sym(var.clone())]));
        }
        match self {
            Expr::Add(terms) => {
                let parts = terms
                    .iter()
                    .map(|t| t.integrate(var))
                    .collect::<CoreResult<Vec<_>>>()?;
                Ok(Expr::sum(parts))
            }
            Expr::Sym(_) => Ok(Expr::product(vec![
                Expr::Num(0.5),
                Expr::pow(Expr::Sym(var.clone()), 2),
            ])),
            Expr::Pow(base, exp) => match &**base {
                Expr::Sym(s) if s == var && *exp >= 0 => Ok(Expr::product(vec![
                    Expr::Num(1.0 / (*exp as f64 + 1.0)),
                    Expr::pow(Expr::Sym(var.clone()), exp + 1),
                ])),
                _ => Err(CoreError::Unsupported(format!(
                    "antiderivative of non-polynomial term: {self}"
                ))),
            },
            Expr::Mul(factors) => {
                let (dep, indep): (Vec<_>, Vec<_>) =
                    factors.iter().cloned().partition(|f| f.contains(var));
                if dep.len() != 1 {
                    return Err(CoreError::Unsupported(format!(
                        "antiderivative of non-polynomial term: {self}"
                    )));
                }
                let mut parts = indep;
                parts.push(dep[0].integrate(var)?);
                Ok(Expr::product(parts))
            }
            _ => Err(CoreError::Unsupported(format!(
                "antiderivative of non-polynomial term: {self}"
            ))),
        }
    }

    // Splits a leading negative coefficient off a term, for display.
    fn display_sign(&self) -> (bool, Expr) {
        match self {
            Expr::Num(v) if *v < 0.0 => (true, Expr::Num(-v)),
            Expr::Mul(factors) => match factors.first() {
                Some(Expr::Num(v)) if *v < 0.0 => {
                    let mut rest = factors.clone();
                    rest[0] = Expr::Num(-v);
                    (true, Expr::product(rest))
                }
                _ => (false, self.clone()),
            },
            _ => (false, self.clone()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        write!(f, "{term}")?;
                    } else {
                        let (neg, inner) = term.display_sign();
                        if neg {
                            write!(f, " - {inner}")?;
                        } else {
                            write!(f, " + {term}")?;
                        }
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    match factor {
                        Expr::Add(_) => write!(f, "({factor})")?,
                        Expr::Num(v) if *v < 0.0 && i > 0 => write!(f, "({factor})")?,
                        _ => write!(f, "{factor}")?,
                    }
                }
                Ok(())
            }
            Expr::Pow(base, exp) => {
                match &**base {
                    Expr::Add(_) | Expr::Mul(_) | Expr::Num(_) => write!(f, "({base})")?,
                    _ => write!(f, "{base}")?,
                }
                write!(f, "^{exp}")
            }
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Expr {
        Expr::Num(v)
    }
}

impl From<Sym> for Expr {
    fn from(s: Sym) -> Expr {
        Expr::Sym(s)
    }
}

impl From<&Sym> for Expr {
    fn from(s: &Sym) -> Expr {
        Expr::Sym(s.clone())
    }
}

impl Add for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, rhs])
    }
}

impl Sub for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum(vec![self, -rhs])
    }
}

impl Mul for Expr {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, rhs])
    }
}

impl Div for Expr {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::product(vec![self, Expr::pow(rhs, -1)])
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::product(vec![Expr::Num(-1.0), self])
    }
}

impl Add<f64> for Expr {
    type Output = Expr;
    fn add(self, rhs: f64) -> Expr {
        Expr::sum(vec![self, Expr::Num(rhs)])
    }
}

impl Sub<f64> for Expr {
    type Output = Expr;
    fn sub(self, rhs: f64) -> Expr {
        Expr::sum(vec![self, Expr::Num(-rhs)])
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;
    fn mul(self, rhs: f64) -> Expr {
        Expr::product(vec![Expr::Num(rhs), self])
    }
}

impl Div<f64> for Expr {
    type Output = Expr;
    fn div(self, rhs: f64) -> Expr {
        Expr::product(vec![Expr::Num(1.0 / rhs), self])
    }
}

impl Add<Expr> for f64 {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::sum(vec![Expr::Num(self), rhs])
    }
}

impl Sub<Expr> for f64 {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::sum(vec![Expr::Num(self), -rhs])
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::product(vec![Expr::Num(self), rhs])
    }
}

/// A multivariate polynomial over an ordered generator list.
///
/// Keys are exponent vectors aligned with the generator list handed to
/// [`Expr::as_poly`]; values are coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    nvars: usize,
    terms: BTreeMap<Vec<u32>, f64>,
}

impl Poly {
    fn constant(nvars: usize, v: f64) -> Poly {
        let mut terms = BTreeMap::new();
        if v != 0.0 {
            terms.insert(vec![0; nvars], v);
        }
        Poly { nvars, terms }
    }

    fn monomial(nvars: usize, index: usize) -> Poly {
        let mut exps = vec![0; nvars];
        exps[index] = 1;
        let mut terms = BTreeMap::new();
        terms.insert(exps, 1.0);
        Poly { nvars, terms }
    }

    fn add(&self, other: &Poly) -> Poly {
        let mut terms = self.terms.clone();
        for (exps, coeff) in &other.terms {
            *terms.entry(exps.clone()).or_insert(0.0) += coeff;
        }
        terms.retain(|_, c| *c != 0.0);
        Poly {
            nvars: self.nvars,
            terms,
        }
    }

    fn mul(&self, other: &Poly) -> Poly {
        let mut terms: BTreeMap<Vec<u32>, f64> = BTreeMap::new();
        for (ea, ca) in &self.terms {
            for (eb, cb) in &other.terms {
                let exps: Vec<u32> = ea.iter().zip(eb).map(|(a, b)| a + b).collect();
                *terms.entry(exps).or_insert(0.0) += ca * cb;
            }
        }
        terms.retain(|_, c| *c != 0.0);
        Poly {
            nvars: self.nvars,
            terms,
        }
    }

    fn powi(&self, exp: u32) -> Poly {
        let mut acc = Poly::constant(self.nvars, 1.0);
        for _ in 0..exp {
            acc = acc.mul(self);
        }
        acc
    }

    /// Highest total degree among nonzero terms (0 for constants and the
    /// zero polynomial).
    pub fn total_degree(&self) -> u32 {
        self.terms
            .keys()
            .map(|exps| exps.iter().sum())
            .max()
            .unwrap_or(0)
    }

    /// For polynomials of total degree ≤ 1, the per-generator coefficients
    /// and the constant term. `None` when any term has higher degree.
    pub fn linear_coefficients(&self) -> Option<(Vec<f64>, f64)> {
        if self.total_degree() > 1 {
            return None;
        }
        let mut coeffs = vec![0.0; self.nvars];
        let mut constant = 0.0;
        for (exps, coeff) in &self.terms {
            match exps.iter().position(|&e| e == 1) {
                Some(i) => coeffs[i] = *coeff,
                None => constant = *coeff,
            }
        }
        Some((coeffs, constant))
    }
}
