//! Nonsymmetric path: Hessenberg reduction followed by double-shift QR.
//!
//! Derived from the Algol procedures `orthes`, `ortran` and `hqr2` of Martin
//! and Wilkinson (Handbook for Automatic Computation, Vol. II) and the
//! corresponding EISPACK routines. No balancing is performed, so the active
//! range is always the whole matrix.

use log::trace;

use super::{EigenConfig, MACHINE_EPSILON};
use crate::error::{MathError, MathResult};
use crate::linear_algebra::complex::complex_div;
use crate::linear_algebra::Matrix;

/// Scratch storage for one nonsymmetric decomposition.
struct Workspace {
    /// Hessenberg, then real Schur, form of the input.
    h: Matrix,
    /// Householder vectors.
    ort: Vec<f64>,
}

/// Computes eigenvalues `(d, e)` and eigenvectors `v` of a general square
/// matrix. The workspace is dropped on return.
pub(super) fn decompose(
    a: &Matrix,
    v: &mut Matrix,
    d: &mut [f64],
    e: &mut [f64],
    config: &EigenConfig,
) -> MathResult<()> {
    let mut ws = Workspace {
        h: a.clone(),
        ort: vec![0.0; a.rows()],
    };

    reduce_to_hessenberg(&mut ws, v);
    reduce_to_schur(&mut ws.h, v, d, e, config)
}

/// Householder similarity reduction to upper Hessenberg form.
///
/// The orthogonal transform is accumulated into `v`, working backwards from
/// the last reflector.
fn reduce_to_hessenberg(ws: &mut Workspace, v: &mut Matrix) {
    let Workspace { h, ort } = ws;
    let n = h.rows();
    let low = 0;
    let high = n - 1;

    for m in low + 1..high {
        // Scale column
        let mut scale = 0.0;
        for i in m..=high {
            scale += h[(i, m - 1)].abs();
        }
        if scale == 0.0 {
            continue;
        }

        // Compute Householder transformation
        let mut hh = 0.0;
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh += ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > 0.0 {
            g = -g;
        }
        hh -= ort[m] * g;
        ort[m] -= g;

        // H = (I - u*u'/h) * H * (I - u*u'/h)
        for j in m..n {
            let mut f = 0.0;
            for i in (m..=high).rev() {
                f += ort[i] * h[(i, j)];
            }
            f /= hh;
            for i in m..=high {
                h[(i, j)] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = 0.0;
            for j in (m..=high).rev() {
                f += ort[j] * h[(i, j)];
            }
            f /= hh;
            for j in m..=high {
                h[(i, j)] -= f * ort[j];
            }
        }
        ort[m] *= scale;
        h[(m, m - 1)] = scale * g;
    }

    // Accumulate transformations (ortran)
    for i in 0..n {
        for j in 0..n {
            v[(i, j)] = if i == j { 1.0 } else { 0.0 };
        }
    }

    for m in (low + 1..high).rev() {
        if h[(m, m - 1)] == 0.0 {
            continue;
        }
        for i in m + 1..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let mut g = 0.0;
            for i in m..=high {
                g += ort[i] * v[(i, j)];
            }
            // Double division avoids possible underflow
            g = (g / ort[m]) / h[(m, m - 1)];
            for i in m..=high {
                v[(i, j)] += g * ort[i];
            }
        }
    }
}

/// Reduces the Hessenberg matrix `h` to real Schur form, then recovers the
/// eigenvectors by back substitution.
fn reduce_to_schur(
    h: &mut Matrix,
    v: &mut Matrix,
    d: &mut [f64],
    e: &mut [f64],
    config: &EigenConfig,
) -> MathResult<()> {
    let nn = h.rows();
    let low = 0;
    let high = nn - 1;
    let mut exshift = 0.0;

    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[(i, j)].abs();
        }
    }

    // Outer loop over eigenvalue index; rows top..nn are deflated.
    let mut top = nn;
    let mut iter = 0_u32;
    while top > low {
        let n = top - 1;

        // Look for single small sub-diagonal element
        let mut l = n;
        while l > low {
            let mut s = h[(l - 1, l - 1)].abs() + h[(l, l)].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[(l, l - 1)].abs() < MACHINE_EPSILON * s {
                break;
            }
            l -= 1;
        }

        if l == n {
            // One root found
            h[(n, n)] += exshift;
            d[n] = h[(n, n)];
            e[n] = 0.0;
            trace!("QR: real eigenvalue {n} after {iter} iterations");
            top -= 1;
            iter = 0;
        } else if l + 1 == n {
            // Two roots found
            let w = h[(n, n - 1)] * h[(n - 1, n)];
            let p = (h[(n - 1, n - 1)] - h[(n, n)]) / 2.0;
            let q = p * p + w;
            let mut z = q.abs().sqrt();
            h[(n, n)] += exshift;
            h[(n - 1, n - 1)] += exshift;
            let x = h[(n, n)];

            if q >= 0.0 {
                // Real pair
                z = if p >= 0.0 { p + z } else { p - z };
                d[n - 1] = x + z;
                d[n] = d[n - 1];
                if z != 0.0 {
                    d[n] = x - w / z;
                }
                e[n - 1] = 0.0;
                e[n] = 0.0;

                let x = h[(n, n - 1)];
                let s = x.abs() + z.abs();
                let mut p = x / s;
                let mut q = z / s;
                let r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;

                // Row modification
                for j in n - 1..nn {
                    let z = h[(n - 1, j)];
                    h[(n - 1, j)] = q * z + p * h[(n, j)];
                    h[(n, j)] = q * h[(n, j)] - p * z;
                }

                // Column modification
                for i in 0..=n {
                    let z = h[(i, n - 1)];
                    h[(i, n - 1)] = q * z + p * h[(i, n)];
                    h[(i, n)] = q * h[(i, n)] - p * z;
                }

                // Accumulate transformations
                for i in low..=high {
                    let z = v[(i, n - 1)];
                    v[(i, n - 1)] = q * z + p * v[(i, n)];
                    v[(i, n)] = q * v[(i, n)] - p * z;
                }
            } else {
                // Complex pair
                d[n - 1] = x + p;
                d[n] = x + p;
                e[n - 1] = z;
                e[n] = -z;
            }
            trace!("QR: eigenvalue pair {}..={n} after {iter} iterations", n - 1);
            top -= 2;
            iter = 0;
        } else {
            // No convergence yet. Form shift.
            let mut x = h[(n, n)];
            let mut y = h[(n - 1, n - 1)];
            let mut w = h[(n, n - 1)] * h[(n - 1, n)];

            // Wilkinson's original ad hoc shift
            if iter == 10 {
                trace!("QR: exceptional shift at index {n}");
                exshift += x;
                for i in low..=n {
                    h[(i, i)] -= x;
                }
                let s = h[(n, n - 1)].abs() + h[(n - 1, n - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }

            // MATLAB's new ad hoc shift
            if iter == 30 {
                let mut s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    trace!("QR: second exceptional shift at index {n}");
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in low..=n {
                        h[(i, i)] -= s;
                    }
                    exshift += s;
                    x = 0.964;
                    y = x;
                    w = x;
                }
            }

            iter += 1;
            if let Some(max) = config.max_iterations {
                if iter > max {
                    return Err(MathError::convergence_failed(max, h[(n, n - 1)].abs()));
                }
            }

            // Look for two consecutive small sub-diagonal elements
            let mut m = n - 2;
            let (mut p, mut q, mut r) = loop {
                let z = h[(m, m)];
                let r = x - z;
                let s = y - z;
                let p = (r * s - w) / h[(m + 1, m)] + h[(m, m + 1)];
                let q = h[(m + 1, m + 1)] - z - r - s;
                let r = h[(m + 2, m + 1)];
                let s = p.abs() + q.abs() + r.abs();
                let (p, q, r) = (p / s, q / s, r / s);
                if m == l {
                    break (p, q, r);
                }
                if h[(m, m - 1)].abs() * (q.abs() + r.abs())
                    < MACHINE_EPSILON
                        * (p.abs() * (h[(m - 1, m - 1)].abs() + z.abs() + h[(m + 1, m + 1)].abs()))
                {
                    break (p, q, r);
                }
                m -= 1;
            };

            for i in m + 2..=n {
                h[(i, i - 2)] = 0.0;
                if i > m + 2 {
                    h[(i, i - 3)] = 0.0;
                }
            }

            // Double QR step involving rows l..=n and columns m..=n
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if notlast { h[(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x != 0.0 {
                        p /= x;
                        q /= x;
                        r /= x;
                    }
                }
                if x == 0.0 {
                    break;
                }
                let mut s = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s = -s;
                }
                if s == 0.0 {
                    continue;
                }

                if k != m {
                    h[(k, k - 1)] = -s * x;
                } else if l != m {
                    h[(k, k - 1)] = -h[(k, k - 1)];
                }
                p += s;
                x = p / s;
                let y = q / s;
                let z = r / s;
                q /= p;
                r /= p;

                // Row modification
                for j in k..nn {
                    let mut t = h[(k, j)] + q * h[(k + 1, j)];
                    if notlast {
                        t += r * h[(k + 2, j)];
                        h[(k + 2, j)] -= t * z;
                    }
                    h[(k, j)] -= t * x;
                    h[(k + 1, j)] -= t * y;
                }

                // Column modification
                for i in 0..=n.min(k + 3) {
                    let mut t = x * h[(i, k)] + y * h[(i, k + 1)];
                    if notlast {
                        t += z * h[(i, k + 2)];
                        h[(i, k + 2)] -= t * r;
                    }
                    h[(i, k)] -= t;
                    h[(i, k + 1)] -= t * q;
                }

                // Accumulate transformations
                for i in low..=high {
                    let mut t = x * v[(i, k)] + y * v[(i, k + 1)];
                    if notlast {
                        t += z * v[(i, k + 2)];
                        v[(i, k + 2)] -= t * r;
                    }
                    v[(i, k)] -= t;
                    v[(i, k + 1)] -= t * q;
                }
            }
        }
    }

    // Zero matrix: V stays the Hessenberg transform.
    if norm == 0.0 {
        return Ok(());
    }

    back_substitute(h, d, e, norm);

    // Back transformation to get eigenvectors of original matrix
    for j in (low..nn).rev() {
        for i in low..=high {
            let mut z = 0.0;
            for k in low..=j.min(high) {
                z += v[(i, k)] * h[(k, j)];
            }
            v[(i, j)] = z;
        }
    }

    Ok(())
}

/// Solves for the eigenvectors of the quasi-triangular Schur form in place.
///
/// Column `n` of `h` receives the eigenvector of `d[n]`; a complex pair
/// stores its real and imaginary parts in columns `n - 1` and `n`.
fn back_substitute(h: &mut Matrix, d: &[f64], e: &[f64], norm: f64) {
    let nn = h.rows();

    for n in (0..nn).rev() {
        let p = d[n];
        let q = e[n];

        if q == 0.0 {
            // Real vector
            let mut l = n;
            let mut z = 0.0;
            let mut s = 0.0;
            h[(n, n)] = 1.0;
            for i in (0..n).rev() {
                let w = h[(i, i)] - p;
                let mut r = 0.0;
                for j in l..=n {
                    r += h[(i, j)] * h[(j, n)];
                }
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                    continue;
                }

                l = i;
                if e[i] == 0.0 {
                    h[(i, n)] = if w != 0.0 {
                        -r / w
                    } else {
                        -r / (MACHINE_EPSILON * norm)
                    };
                } else {
                    // Solve real equations
                    let x = h[(i, i + 1)];
                    let y = h[(i + 1, i)];
                    let denom = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                    let t = (x * s - z * r) / denom;
                    h[(i, n)] = t;
                    h[(i + 1, n)] = if x.abs() > z.abs() {
                        (-r - w * t) / x
                    } else {
                        (-s - y * t) / z
                    };
                }

                // Overflow control
                let t = h[(i, n)].abs();
                if (MACHINE_EPSILON * t) * t > 1.0 {
                    for j in i..=n {
                        h[(j, n)] /= t;
                    }
                }
            }
        } else if q < 0.0 {
            // Complex vector
            let mut l = n - 1;
            let mut z = 0.0;
            let mut r = 0.0;
            let mut s = 0.0;

            // Last vector component imaginary so matrix is triangular
            if h[(n, n - 1)].abs() > h[(n - 1, n)].abs() {
                h[(n - 1, n - 1)] = q / h[(n, n - 1)];
                h[(n - 1, n)] = -(h[(n, n)] - p) / h[(n, n - 1)];
            } else {
                let (cr, ci) = complex_div(0.0, -h[(n - 1, n)], h[(n - 1, n - 1)] - p, q);
                h[(n - 1, n - 1)] = cr;
                h[(n - 1, n)] = ci;
            }
            h[(n, n - 1)] = 0.0;
            h[(n, n)] = 1.0;

            for i in (0..n - 1).rev() {
                let mut ra = 0.0;
                let mut sa = 0.0;
                for j in l..=n {
                    ra += h[(i, j)] * h[(j, n - 1)];
                    sa += h[(i, j)] * h[(j, n)];
                }
                let w = h[(i, i)] - p;

                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                    continue;
                }

                l = i;
                if e[i] == 0.0 {
                    let (cr, ci) = complex_div(-ra, -sa, w, q);
                    h[(i, n - 1)] = cr;
                    h[(i, n)] = ci;
                } else {
                    // Solve complex equations
                    let x = h[(i, i + 1)];
                    let y = h[(i + 1, i)];
                    let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                    let vi = (d[i] - p) * 2.0 * q;
                    if vr == 0.0 && vi == 0.0 {
                        vr = MACHINE_EPSILON
                            * norm
                            * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                    }
                    let (cr, ci) = complex_div(
                        x * r - z * ra + q * sa,
                        x * s - z * sa - q * ra,
                        vr,
                        vi,
                    );
                    h[(i, n - 1)] = cr;
                    h[(i, n)] = ci;
                    if x.abs() > z.abs() + q.abs() {
                        h[(i + 1, n - 1)] = (-ra - w * h[(i, n - 1)] + q * h[(i, n)]) / x;
                        h[(i + 1, n)] = (-sa - w * h[(i, n)] - q * h[(i, n - 1)]) / x;
                    } else {
                        let (cr, ci) =
                            complex_div(-r - y * h[(i, n - 1)], -s - y * h[(i, n)], z, q);
                        h[(i + 1, n - 1)] = cr;
                        h[(i + 1, n)] = ci;
                    }
                }

                // Overflow control
                let t = h[(i, n - 1)].abs().max(h[(i, n)].abs());
                if (MACHINE_EPSILON * t) * t > 1.0 {
                    for j in i..=n {
                        h[(j, n - 1)] /= t;
                        h[(j, n)] /= t;
                    }
                }
            }
        }
    }
}
