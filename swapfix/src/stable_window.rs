//! Earliest low-variance window search, used as the identity anchor.

use glam::DVec2;

use crate::error::{Error, Result};
use crate::math;
use crate::trajectory::{Axis, Keypoint, PosePair, Trajectory};

/// A run of frames `[start, start + len)` where both keypoints barely move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableWindow {
    pub start: usize,
    pub len: usize,
    /// Mean A and B positions over the window.
    pub mean: PosePair,
    /// Mean of the x and y standard deviations, per keypoint.
    pub dispersion_a: f64,
    pub dispersion_b: f64,
}

impl StableWindow {
    /// One past the last frame of the window.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Stable iff both keypoints are below `threshold`. NaN dispersion never is.
    #[inline]
    pub fn is_below(&self, threshold: f64) -> bool {
        self.dispersion_a < threshold && self.dispersion_b < threshold
    }
}

/// Scans a trajectory front to back for the first stable window.
///
/// The first qualifying window wins, not the least dispersed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableWindowFinder {
    pub window_size: usize,
    pub threshold: f64,
}

impl StableWindowFinder {
    pub fn new(window_size: usize, threshold: f64) -> Self {
        assert!(window_size > 0, "Window size must be at least 1");
        assert!(threshold > 0.0, "Stability threshold must be positive");
        Self {
            window_size,
            threshold,
        }
    }

    pub fn find(&self, trajectory: &Trajectory) -> Result<StableWindow> {
        let frames = trajectory.len();
        let not_found = Error::NoStableWindowFound {
            window_size: self.window_size,
            threshold: self.threshold,
            frames,
        };

        if self.window_size == 0 || frames < self.window_size {
            return Err(not_found);
        }

        let found = (0..=frames - self.window_size)
            .map(|start| self.measure(trajectory, start))
            .find(|window| window.is_below(self.threshold));

        match found {
            Some(window) => {
                tracing::debug!(
                    start = window.start,
                    len = window.len,
                    dispersion_a = window.dispersion_a,
                    dispersion_b = window.dispersion_b,
                    "Stable window found"
                );
                Ok(window)
            }
            None => Err(not_found),
        }
    }

    /// Statistics of the window starting at `start`. Windows containing a
    /// missing sample get NaN dispersion and are therefore never stable.
    pub fn measure(&self, trajectory: &Trajectory, start: usize) -> StableWindow {
        let range = start..start + self.window_size;

        let keypoint_stats = |keypoint: Keypoint| {
            let xs = &trajectory.series(keypoint, Axis::X)[range.clone()];
            let ys = &trajectory.series(keypoint, Axis::Y)[range.clone()];
            let has_missing = xs.iter().chain(ys).any(|v| !v.is_finite());
            let dispersion = if has_missing {
                f64::NAN
            } else {
                (math::std_dev(xs) + math::std_dev(ys)) / 2.0
            };
            (DVec2::new(math::mean(xs), math::mean(ys)), dispersion)
        };

        let (mean_a, dispersion_a) = keypoint_stats(Keypoint::A);
        let (mean_b, dispersion_b) = keypoint_stats(Keypoint::B);

        StableWindow {
            start,
            len: self.window_size,
            mean: PosePair::new(mean_a, mean_b),
            dispersion_a,
            dispersion_b,
        }
    }
}
