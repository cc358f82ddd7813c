//! Dense linear-algebra helpers.
//!
//! The systems here are small (one row per variable of one optimization
//! problem), so everything is dense. Linear solves go through faer's LU
//! decomposition; determinant, rank, and symmetric eigenvalues are
//! hand-rolled elimination/rotation routines, which is plenty at this size.

use faer::prelude::SpSolver;
use faer::{FaerMat, Mat};

use crate::error::{SolverError, SolverResult};

/// Pivot threshold below which a value counts as numerically zero.
pub const PIVOT_TOL: f64 = 1e-10;

/// Solve the dense linear system `Ax = b` using faer's LU decomposition
/// with partial pivoting.
pub fn solve_dense(a: &[Vec<f64>], b: &[f64]) -> SolverResult<Vec<f64>> {
    let n = b.len();
    if n == 0 {
        return Ok(vec![]);
    }

    let mut mat = Mat::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            mat.write(i, j, a[i][j]);
        }
    }

    let mut rhs = Mat::zeros(n, 1);
    for i in 0..n {
        rhs.write(i, 0, b[i]);
    }

    let lu = mat.partial_piv_lu();
    let solution = lu.solve(&rhs);

    let x: Vec<f64> = (0..n).map(|i| solution.read(i, 0)).collect();

    // NaN/Inf in the solution indicates a singular matrix
    if x.iter().any(|&v| !v.is_finite()) {
        return Err(SolverError::SingularSystem);
    }

    Ok(x)
}

/// Determinant via Gaussian elimination with partial pivoting.
pub fn determinant(a: &[Vec<f64>]) -> f64 {
    let n = a.len();
    if n == 0 {
        return 1.0;
    }
    let mut m: Vec<Vec<f64>> = a.to_vec();
    let mut det = 1.0;

    for col in 0..n {
        // Find pivot
        let mut max_row = col;
        let mut max_val = m[col][col].abs();
        for row in (col + 1)..n {
            if m[row][col].abs() > max_val {
                max_val = m[row][col].abs();
                max_row = row;
            }
        }

        if max_val < PIVOT_TOL {
            return 0.0;
        }

        if max_row != col {
            m.swap(col, max_row);
            det = -det;
        }
        det *= m[col][col];

        for row in (col + 1)..n {
            let factor = m[row][col] / m[col][col];
            for j in col..n {
                m[row][j] -= factor * m[col][j];
            }
        }
    }

    det
}

/// Numerical rank via row-echelon reduction with partial pivoting.
pub fn rank(a: &[Vec<f64>], tol: f64) -> usize {
    let nrows = a.len();
    if nrows == 0 {
        return 0;
    }
    let ncols = a[0].len();
    let mut m: Vec<Vec<f64>> = a.to_vec();

    let mut rank = 0;
    let mut pivot_row = 0;
    for col in 0..ncols {
        let mut max_row = pivot_row;
        let mut max_val = 0.0;
        for (row, m_row) in m.iter().enumerate().skip(pivot_row) {
            if m_row[col].abs() > max_val {
                max_val = m_row[col].abs();
                max_row = row;
            }
        }

        if max_val < tol {
            continue;
        }

        m.swap(pivot_row, max_row);
        for row in (pivot_row + 1)..nrows {
            let factor = m[row][col] / m[pivot_row][col];
            for j in col..ncols {
                m[row][j] -= factor * m[pivot_row][j];
            }
        }

        rank += 1;
        pivot_row += 1;
        if pivot_row == nrows {
            break;
        }
    }

    rank
}

/// Eigenvalues of a symmetric matrix via cyclic Jacobi rotations.
///
/// Hessians of real-valued Lagrangians are symmetric, so Jacobi is exact
/// here (all eigenvalues real) and robust at the matrix sizes involved.
pub fn symmetric_eigenvalues(a: &[Vec<f64>]) -> Vec<f64> {
    let n = a.len();
    if n == 0 {
        return vec![];
    }
    let mut m: Vec<Vec<f64>> = a.to_vec();

    let max_sweeps = 100;
    let tol = 1e-12;

    for _ in 0..max_sweeps {
        let mut off = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                off += m[i][j] * m[i][j];
            }
        }
        if off.sqrt() < tol {
            break;
        }

        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                if m[p][q].abs() < 1e-300 {
                    continue;
                }
                let theta = (m[q][q] - m[p][p]) / (2.0 * m[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // Rotate columns p and q
                for k in 0..n {
                    let mkp = m[k][p];
                    let mkq = m[k][q];
                    m[k][p] = c * mkp - s * mkq;
                    m[k][q] = s * mkp + c * mkq;
                }
                // Rotate rows p and q
                for k in 0..n {
                    let mpk = m[p][k];
                    let mqk = m[q][k];
                    m[p][k] = c * mpk - s * mqk;
                    m[q][k] = s * mpk + c * mqk;
                }
            }
        }
    }

    (0..n).map(|i| m[i][i]).collect()
}

/// Euclidean norm of a vector.
pub fn norm2(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_dense_2x2() {
        // 2x + y = 5, x - y = 1  =>  x = 2, y = 1
        let a = vec![vec![2.0, 1.0], vec![1.0, -1.0]];
        let b = vec![5.0, 1.0];
        let x = solve_dense(&a, &b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-10);
        assert!((x[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_solve_dense_singular() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let b = vec![1.0, 2.0];
        assert!(matches!(
            solve_dense(&a, &b),
            Err(SolverError::SingularSystem)
        ));
    }

    #[test]
    fn test_determinant() {
        let a = vec![
            vec![2.0, 0.0, 0.0],
            vec![0.0, 3.0, 0.0],
            vec![0.0, 0.0, 4.0],
        ];
        assert!((determinant(&a) - 24.0).abs() < 1e-10);

        // Row swap flips the sign
        let b = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert!((determinant(&b) + 1.0).abs() < 1e-10);

        let singular = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert_eq!(determinant(&singular), 0.0);
    }

    #[test]
    fn test_rank() {
        let full = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(rank(&full, PIVOT_TOL), 2);

        let deficient = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert_eq!(rank(&deficient, PIVOT_TOL), 1);

        let zero = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        assert_eq!(rank(&zero, PIVOT_TOL), 0);
    }

    #[test]
    fn test_symmetric_eigenvalues_diagonal() {
        let a = vec![vec![2.0, 0.0], vec![0.0, 3.0]];
        let mut eig = symmetric_eigenvalues(&a);
        eig.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert!((eig[0] - 2.0).abs() < 1e-8);
        assert!((eig[1] - 3.0).abs() < 1e-8);
    }

    #[test]
    fn test_symmetric_eigenvalues_indefinite() {
        // [[0, 1], [1, 0]] has eigenvalues ±1
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let mut eig = symmetric_eigenvalues(&a);
        eig.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert!((eig[0] + 1.0).abs() < 1e-8);
        assert!((eig[1] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_norm2() {
        assert!((norm2(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(norm2(&[]), 0.0);
    }
}
