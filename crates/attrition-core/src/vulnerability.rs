//! Scalar robustness summary of a removal curve.
//!
//! `V = 0.5 - R / n`, where `R` sums the largest-component fraction over the
//! removal steps `1..n` (the untouched step 0 is not counted). `R / n` is
//! the area under the removal curve, so a network whose giant component
//! shrinks exactly one node per removal sits near the 0.5 baseline.
//! Higher values mean the attack fragments the network faster; lower values
//! mean it holds together.

use crate::removal::RemovalCurve;

/// Reference value of a linearly degrading network.
pub const BASELINE: f64 = 0.5;

/// Vulnerability for a run of `n` nodes whose post-removal fractions sum to
/// `removal_sum`. `None` when `n` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vulnerability_index(removal_sum: f64, n: usize) -> Option<f64> {
    (n > 0).then(|| BASELINE - removal_sum / n as f64)
}

/// Recompute the index from a recorded curve.
#[must_use]
pub fn from_curve(curve: &RemovalCurve) -> Option<f64> {
    let removal_sum: f64 = curve.points().skip(1).map(|(_, y)| y).sum();
    vulnerability_index(removal_sum, curve.len())
}
