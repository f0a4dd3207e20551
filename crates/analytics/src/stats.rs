//! Small deterministic numeric helpers shared by the pipelines.

/// Round to the nearest integer, halves towards positive infinity.
///
/// `f64::round` rounds halves away from zero, which disagrees for negative
/// halves (`-2.5` → `-3`). Every rounded quantity in the engine goes through here.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round to one decimal place, halves up.
#[inline]
pub fn round_one_decimal(x: f64) -> f64 {
    round_half_up(x * 10.0) / 10.0
}

/// Round and clamp to a non-negative whole count.
#[inline]
pub fn non_negative_count(x: f64) -> u64 {
    let r = round_half_up(x);
    if r.is_finite() && r > 0.0 { r as u64 } else { 0 }
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Population standard deviation (divides by n).
pub fn stddev_population(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / (xs.len() as f64);
    var.sqrt()
}

/// Ordinary-least-squares slope of `ys` against their index `0..n`.
pub fn ols_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return 0.0;
    }
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denom
}
