//! Hampel filter: replaces samples that sit too far from their local median.
//!
//! For each index the window `[i - h, i + h]` (clipped to the series bounds,
//! `h = (window_size - 1) / 2`) gives a median and a MAD-based sigma. A sample
//! deviating from the median by more than `n_sigmas × sigma` is replaced with
//! the median. Missing samples are neither used in the statistics nor filled.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{self, mad_to_sigma};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HampelConfig {
    /// Total window length in frames. Must be odd.
    pub window_size: usize,
    /// Outlier threshold in robust standard deviations.
    pub n_sigmas: f64,
}

impl HampelConfig {
    pub fn new(window_size: usize, n_sigmas: f64) -> Self {
        assert!(
            window_size % 2 == 1,
            "Hampel window size must be odd, got {}",
            window_size
        );
        assert!(n_sigmas >= 0.0, "n_sigmas must be non-negative, got {}", n_sigmas);
        Self {
            window_size,
            n_sigmas,
        }
    }

    /// Frames on each side of the centre sample.
    #[inline]
    pub fn half_window(&self) -> usize {
        self.window_size.saturating_sub(1) / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "hampel.window_size must be an odd number >= 1, got {}",
                self.window_size
            )));
        }
        if !(self.n_sigmas > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "hampel.n_sigmas must be positive, got {}",
                self.n_sigmas
            )));
        }
        Ok(())
    }
}

/// Output of [`hampel_filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct HampelReport {
    pub filtered: Vec<f64>,
    /// Indices whose value was replaced, ascending.
    pub outliers: Vec<usize>,
}

/// Apply the Hampel filter to `data`. Window statistics always come from the
/// unfiltered input, so one replacement never influences its neighbours.
pub fn hampel_filter(data: &[f64], config: &HampelConfig) -> HampelReport {
    let n = data.len();
    let half = config.half_window();
    let mut filtered = data.to_vec();
    let mut outliers = Vec::new();

    let capacity = config.window_size.min(n);
    let mut window = Vec::with_capacity(capacity);
    let mut scratch = Vec::with_capacity(capacity);

    for i in 0..n {
        let value = data[i];
        if !value.is_finite() {
            continue;
        }

        let start = i.saturating_sub(half);
        let end = i.saturating_add(half).saturating_add(1).min(n);
        math::collect_finite(&data[start..end], &mut window);
        if window.is_empty() {
            continue;
        }

        let median = math::median_f64_mut(&mut window);
        let sigma = mad_to_sigma(math::mad_with_scratch(&window, median, &mut scratch));

        if (value - median).abs() > config.n_sigmas * sigma {
            filtered[i] = median;
            outliers.push(i);
        }
    }

    HampelReport { filtered, outliers }
}
