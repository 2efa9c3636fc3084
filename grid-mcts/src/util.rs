//! Score normalization and tie-break noise.

/// Map `value` into `[0, 1]` relative to running `[min, max]` bounds.
///
/// When the bounds are degenerate (not yet widened by any backpropagation,
/// or min == max) the value passes through unchanged.
#[inline]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if min < max {
        (value - min) / (max - min)
    } else {
        value
    }
}

/// Multiplicative tie-break perturbation.
///
/// `r` is a fresh uniform draw in `[0, 1)` from the search RNG. The
/// perturbation is small (scaled by `epsilon`) so it only separates exact
/// ties; the `+ epsilon` shift keeps zero-valued inputs perturbable.
#[inline]
pub fn noise(value: f64, epsilon: f64, r: f64) -> f64 {
    (value + epsilon) * (1.0 + epsilon * (r - 0.5))
}
