//! Symmetric path: Householder tridiagonalisation followed by implicit QL.
//!
//! Both routines follow the Algol procedures `tred2` and `tql2` of Bowdler,
//! Martin, Reinsch and Wilkinson (Handbook for Automatic Computation,
//! Vol. II) as carried into EISPACK.

use log::trace;

use super::{EigenConfig, MACHINE_EPSILON};
use crate::error::{MathError, MathResult};
use crate::linear_algebra::Matrix;

/// Reduces the symmetric matrix held in `v` to tridiagonal form.
///
/// On return `v` holds the accumulated orthogonal transform, `d` the diagonal
/// and `e[1..]` the sub-diagonal of the tridiagonal matrix (`e[0] == 0`).
pub(super) fn tridiagonalize(v: &mut Matrix, d: &mut [f64], e: &mut [f64]) {
    let n = v.rows();

    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        // Scale to avoid under/overflow
        let scale: f64 = d[..i].iter().map(|x| x.abs()).sum();
        let mut h = 0.0;

        if scale == 0.0 {
            // Column already reduced
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
                v[(j, i)] = 0.0;
            }
        } else {
            // Generate Householder vector
            for k in 0..i {
                d[k] /= scale;
                h += d[k] * d[k];
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > 0.0 {
                g = -g;
            }
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            e[..i].fill(0.0);

            // Apply similarity transformation to remaining columns
            for j in 0..i {
                f = d[j];
                v[(j, i)] = f;
                g = e[j] + v[(j, j)] * f;
                for k in j + 1..i {
                    g += v[(k, j)] * d[k];
                    e[k] += v[(k, j)] * f;
                }
                e[j] = g;
            }
            f = 0.0;
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[(k, j)] -= f * e[k] + g * d[k];
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
            }
        }
        d[i] = h;
    }

    // Accumulate transformations
    for i in 0..n - 1 {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = 1.0;
        let h = d[i + 1];
        if h != 0.0 {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = 0.0;
                for k in 0..=i {
                    g += v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    v[(k, j)] -= g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = 0.0;
        }
    }
    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = 0.0;
    }
    v[(n - 1, n - 1)] = 1.0;
    e[0] = 0.0;
}

/// Diagonalises the tridiagonal matrix `(d, e)` by implicit-shift QL.
///
/// Rotations are accumulated into `v`. On success `d` holds the eigenvalues
/// in ascending order, the columns of `v` are the matching eigenvectors and
/// `e` is zero.
pub(super) fn diagonalize(
    v: &mut Matrix,
    d: &mut [f64],
    e: &mut [f64],
    config: &EigenConfig,
) -> MathResult<()> {
    let n = v.rows();

    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = 0.0;

    let mut f = 0.0;
    let mut tst1 = 0.0_f64;
    for l in 0..n {
        // Find small subdiagonal element
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut m = l;
        while m < n - 1 && e[m].abs() > MACHINE_EPSILON * tst1 {
            m += 1;
        }

        // If m == l, d[l] is an eigenvalue, otherwise iterate.
        let mut iter = 0_u32;
        if m > l {
            while e[l].abs() > MACHINE_EPSILON * tst1 {
                iter += 1;
                if let Some(max) = config.max_iterations {
                    if iter > max {
                        return Err(MathError::convergence_failed(max, e[l].abs()));
                    }
                }

                // Compute implicit shift
                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (2.0 * e[l]);
                let mut r = p.hypot(1.0);
                if p < 0.0 {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for di in &mut d[l + 2..n] {
                    *di -= h;
                }
                f += h;

                // Implicit QL transformation
                p = d[m];
                let mut c = 1.0;
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = 0.0;
                let mut s2 = 0.0;
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    // Accumulate transformation
                    for k in 0..n {
                        h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;
            }
        }
        d[l] += f;
        e[l] = 0.0;
        trace!("QL: eigenvalue {l} converged after {iter} sweeps");
    }

    sort_ascending(v, d);
    Ok(())
}

/// Selection sort of the eigenvalues, swapping eigenvector columns in step.
fn sort_ascending(v: &mut Matrix, d: &mut [f64]) {
    let n = d.len();
    for i in 0..n.saturating_sub(1) {
        let mut k = i;
        let mut p = d[i];
        for (j, &dj) in d.iter().enumerate().skip(i + 1) {
            if dj < p {
                k = j;
                p = dj;
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            for row in 0..n {
                let tmp = v[(row, i)];
                v[(row, i)] = v[(row, k)];
                v[(row, k)] = tmp;
            }
        }
    }
}
