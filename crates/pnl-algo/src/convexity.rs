//! Curvature classification from a sampled Hessian.
//!
//! Classifies an expression's curvature by evaluating its Hessian over a
//! sampled domain and applying definiteness tests:
//!
//! - 1 variable: sign of the second derivative at every sample
//! - 2 variables: the 2×2 leading-principal-minor test (`h11`, `h22`, `det`)
//! - n variables: the ordered sequence of leading principal minors, with
//!   alternating-sign rules for concavity
//!
//! Evaluation failures at individual sample points (non-finite values,
//! missing symbols) are skipped rather than escalated; a classification is
//! [`Curvature::Indeterminate`] only when no sample point was usable at all.
//!
//! The displayed labels keep the original solver's Portuguese vocabulary —
//! they are part of the diagnostic output contract.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use pnl_core::{CoreError, CoreResult, Expr, Sym};

use crate::linalg::determinant;

/// Values with magnitude below this count as zero in the definiteness tests.
const ZERO_TOL: f64 = 1e-10;

/// Curvature classification of an expression over a sampled domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Curvature {
    /// Hessian vanishes everywhere sampled.
    Linear,
    /// Positive semidefinite everywhere sampled.
    Convex,
    /// Positive definite everywhere sampled.
    StrictlyConvex,
    /// Negative semidefinite everywhere sampled.
    Concave,
    /// Negative definite everywhere sampled.
    StrictlyConcave,
    /// Mixed signs: neither convex nor concave.
    Indefinite,
    /// No sample point could be evaluated.
    Indeterminate,
}

impl fmt::Display for Curvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Curvature::Linear => "linear",
            Curvature::Convex => "convexa",
            Curvature::StrictlyConvex => "estritamente convexa",
            Curvature::Concave => "côncava",
            Curvature::StrictlyConcave => "estritamente côncava",
            Curvature::Indefinite => "nem convexa nem côncava",
            Curvature::Indeterminate => "indeterminado",
        };
        write!(f, "{label}")
    }
}

/// A sampling range for one variable: 5-point grid over `(min, max)`, or a
/// stepped grid when `step` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower end of the range.
    pub min: f64,
    /// Upper end of the range.
    pub max: f64,
    /// Optional step; `None` means a 5-point uniform grid.
    pub step: Option<f64>,
}

impl Range {
    /// Range sampled with a 5-point uniform grid.
    pub fn new(min: f64, max: f64) -> Self {
        Range {
            min,
            max,
            step: None,
        }
    }

    /// Range sampled every `step`.
    pub fn with_step(min: f64, max: f64, step: f64) -> Self {
        Range {
            min,
            max,
            step: Some(step),
        }
    }

    fn grid(&self) -> CoreResult<Vec<f64>> {
        match self.step {
            None => {
                let n = 5;
                let h = (self.max - self.min) / (n - 1) as f64;
                Ok((0..n).map(|i| self.min + h * i as f64).collect())
            }
            Some(step) => {
                if step <= 0.0 {
                    return Err(CoreError::DomainSpec(format!(
                        "step must be positive, got {step}"
                    )));
                }
                let mut grid = Vec::new();
                let mut v = self.min;
                // inclusive of the upper end, within a half-step of slop
                while v <= self.max + step * 0.5 {
                    grid.push(v);
                    v += step;
                }
                Ok(grid)
            }
        }
    }
}

/// Domain specification for curvature sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Explicit coordinate tuples, one entry per variable each.
    Points(Vec<Vec<f64>>),
    /// One range applied to every variable (full cartesian grid).
    Global(Range),
    /// A range per variable (full cartesian grid).
    PerVariable(BTreeMap<Sym, Range>),
}

/// Classifies curvature from a Hessian sampled over a domain.
pub struct ConvexityAnalyzer<'a> {
    hessian: &'a [Vec<Expr>],
    vars: &'a [Sym],
    domain: &'a Domain,
}

impl<'a> ConvexityAnalyzer<'a> {
    /// Analyzer for `hessian` over `vars`, sampled per `domain`.
    pub fn new(hessian: &'a [Vec<Expr>], vars: &'a [Sym], domain: &'a Domain) -> Self {
        ConvexityAnalyzer {
            hessian,
            vars,
            domain,
        }
    }

    /// Classify the curvature. Fails only on a malformed domain specification.
    pub fn classify(&self) -> CoreResult<Curvature> {
        let points = self.sample_points()?;
        Ok(match self.vars.len() {
            1 => self.classify_1d(&points),
            2 => self.classify_2d(&points),
            _ => self.classify_nd(&points),
        })
    }

    fn sample_points(&self) -> CoreResult<Vec<Vec<f64>>> {
        let nvars = self.vars.len();
        match self.domain {
            Domain::Points(points) => {
                for p in points {
                    if p.len() != nvars {
                        return Err(CoreError::DomainSpec(format!(
                            "point has {} coordinates, expected {}",
                            p.len(),
                            nvars
                        )));
                    }
                }
                Ok(points.clone())
            }
            Domain::Global(range) => {
                let grid = range.grid()?;
                Ok(cartesian_product(&vec![grid; nvars]))
            }
            Domain::PerVariable(ranges) => {
                let mut grids = Vec::with_capacity(nvars);
                for var in self.vars {
                    let range = ranges.get(var).ok_or_else(|| {
                        CoreError::DomainSpec(format!("no range given for variable {var}"))
                    })?;
                    grids.push(range.grid()?);
                }
                Ok(cartesian_product(&grids))
            }
        }
    }

    // Evaluates one Hessian entry at a point; None on any numeric failure.
    fn eval_entry(&self, i: usize, j: usize, env: &HashMap<Sym, f64>) -> Option<f64> {
        self.hessian[i][j].eval(env).ok()
    }

    fn point_env(&self, point: &[f64]) -> HashMap<Sym, f64> {
        self.vars
            .iter()
            .cloned()
            .zip(point.iter().copied())
            .collect()
    }

    fn classify_1d(&self, points: &[Vec<f64>]) -> Curvature {
        let mut values = Vec::new();
        for point in points {
            let env = self.point_env(point);
            if let Some(v) = self.eval_entry(0, 0, &env) {
                values.push(v);
            }
        }
        if values.is_empty() {
            return Curvature::Indeterminate;
        }
        if all_zero(&values) {
            return Curvature::Linear;
        }
        if values.iter().all(|&v| v > 0.0) {
            return Curvature::StrictlyConvex;
        }
        if values.iter().all(|&v| v >= 0.0) {
            return Curvature::Convex;
        }
        if values.iter().all(|&v| v < 0.0) {
            return Curvature::StrictlyConcave;
        }
        if values.iter().all(|&v| v <= 0.0) {
            return Curvature::Concave;
        }
        Curvature::Indefinite
    }

    fn classify_2d(&self, points: &[Vec<f64>]) -> Curvature {
        let mut samples = Vec::new();
        for point in points {
            let env = self.point_env(point);
            let h11 = self.eval_entry(0, 0, &env);
            let h12 = self.eval_entry(0, 1, &env);
            let h21 = self.eval_entry(1, 0, &env);
            let h22 = self.eval_entry(1, 1, &env);
            if let (Some(h11), Some(h12), Some(h21), Some(h22)) = (h11, h12, h21, h22) {
                let det = h11 * h22 - h12 * h21;
                samples.push((h11, h22, det));
            }
        }
        if samples.is_empty() {
            return Curvature::Indeterminate;
        }

        let h11s: Vec<f64> = samples.iter().map(|s| s.0).collect();
        let h22s: Vec<f64> = samples.iter().map(|s| s.1).collect();
        let dets: Vec<f64> = samples.iter().map(|s| s.2).collect();

        if all_zero(&h11s) && all_zero(&h22s) && all_zero(&dets) {
            return Curvature::Linear;
        }
        if dets.iter().any(|&d| d < 0.0) {
            return Curvature::Indefinite;
        }
        if h11s.iter().all(|&v| v > 0.0)
            && h22s.iter().all(|&v| v > 0.0)
            && dets.iter().all(|&d| d >= 0.0)
        {
            return Curvature::StrictlyConvex;
        }
        if h11s.iter().all(|&v| v >= 0.0)
            && h22s.iter().all(|&v| v >= 0.0)
            && dets.iter().all(|&d| d >= 0.0)
        {
            return Curvature::Convex;
        }
        if h11s.iter().all(|&v| v < 0.0)
            && h22s.iter().all(|&v| v < 0.0)
            && dets.iter().all(|&d| d > 0.0)
        {
            return Curvature::StrictlyConcave;
        }
        if h11s.iter().all(|&v| v <= 0.0)
            && h22s.iter().all(|&v| v <= 0.0)
            && dets.iter().all(|&d| d >= 0.0)
        {
            return Curvature::Concave;
        }
        Curvature::Indefinite
    }

    fn classify_nd(&self, points: &[Vec<f64>]) -> Curvature {
        let n = self.vars.len();
        // rows: sample points, columns: leading principal minors 1..n
        let mut samples: Vec<Vec<f64>> = Vec::new();
        for point in points {
            let env = self.point_env(point);
            let mut numeric = vec![vec![0.0; n]; n];
            let mut ok = true;
            'entries: for i in 0..n {
                for j in 0..n {
                    match self.eval_entry(i, j, &env) {
                        Some(v) => numeric[i][j] = v,
                        None => {
                            ok = false;
                            break 'entries;
                        }
                    }
                }
            }
            if !ok {
                continue;
            }
            let minors: Vec<f64> = (1..=n)
                .map(|k| {
                    let sub: Vec<Vec<f64>> =
                        numeric[..k].iter().map(|row| row[..k].to_vec()).collect();
                    determinant(&sub)
                })
                .collect();
            samples.push(minors);
        }
        if samples.is_empty() {
            return Curvature::Indeterminate;
        }

        let columns: Vec<Vec<f64>> = (0..n)
            .map(|k| samples.iter().map(|minors| minors[k]).collect())
            .collect();

        if columns.iter().all(|col| all_zero(col)) {
            return Curvature::Linear;
        }
        if columns.iter().all(|col| col.iter().all(|&v| v > 0.0)) {
            return Curvature::StrictlyConvex;
        }
        if columns.iter().all(|col| col.iter().all(|&v| v >= 0.0)) {
            return Curvature::Convex;
        }
        // (−1)^k · minor_k > 0: odd minors negative, even minors positive
        if columns
            .iter()
            .enumerate()
            .all(|(k, col)| col.iter().all(|&v| if k % 2 == 0 { v < 0.0 } else { v > 0.0 }))
        {
            return Curvature::StrictlyConcave;
        }
        if columns
            .iter()
            .enumerate()
            .all(|(k, col)| col.iter().all(|&v| if k % 2 == 0 { v <= 0.0 } else { v >= 0.0 }))
        {
            return Curvature::Concave;
        }
        Curvature::Indefinite
    }
}

fn all_zero(values: &[f64]) -> bool {
    values.iter().all(|v| v.abs() < ZERO_TOL)
}

fn cartesian_product(grids: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut points: Vec<Vec<f64>> = vec![vec![]];
    for grid in grids {
        let mut next = Vec::with_capacity(points.len() * grid.len());
        for point in &points {
            for &v in grid {
                let mut p = point.clone();
                p.push(v);
                next.push(p);
            }
        }
        points = next;
    }
    points
}
