//! Scalar complex arithmetic used by the eigenvector back substitution.

/// Complex division `(xr + i·xi) / (yr + i·yi)` by Smith's method.
///
/// Divides through by the larger of `|yr|` and `|yi|` so the intermediate
/// products cannot overflow where the quotient itself is representable.
/// Returns `(re, im)`.
#[inline]
pub(crate) fn complex_div(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}
