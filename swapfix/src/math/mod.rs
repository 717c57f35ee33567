//! Statistics helpers: mean, standard deviation, median, MAD.
//!
//! Median/MAD operate on finite samples only; callers strip NaNs first.
//! Mean and standard deviation propagate NaN.

/// MAD (Median Absolute Deviation) to standard deviation conversion factor.
///
/// For a normal distribution, σ ≈ 1.4826 × MAD.
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// Convert MAD to standard deviation (assuming normal distribution).
#[inline]
pub fn mad_to_sigma(mad: f64) -> f64 {
    mad * MAD_TO_SIGMA
}

/// Arithmetic mean. NaN for an empty slice or if any value is NaN.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two samples have no spread and yield 0.0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return if values.iter().all(|v| v.is_finite()) {
            0.0
        } else {
            f64::NAN
        };
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Calculate the median in-place using quickselect (O(n) average).
/// Mutates the input buffer (partial sort).
#[inline]
pub fn median_f64_mut(data: &mut [f64]) -> f64 {
    debug_assert!(!data.is_empty());

    let len = data.len();
    let mid = len / 2;

    if len % 2 == 1 {
        let (_, median, _) = data.select_nth_unstable_by(mid, f64::total_cmp);
        *median
    } else {
        let (left_part, right_median, _) = data.select_nth_unstable_by(mid, f64::total_cmp);
        let right = *right_median;
        // left median is the max of the left partition
        let left = left_part.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (left + right) * 0.5
    }
}

/// MAD = median(|x_i - median(x)|), using `scratch` for the deviations.
#[inline]
pub fn mad_with_scratch(values: &[f64], median: f64, scratch: &mut Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    scratch.clear();
    scratch.extend(values.iter().map(|&v| (v - median).abs()));
    median_f64_mut(scratch)
}

/// Replace `out` with the finite values of `values`.
#[inline]
pub fn collect_finite(values: &[f64], out: &mut Vec<f64>) {
    out.clear();
    out.extend(values.iter().copied().filter(|v| v.is_finite()));
}
