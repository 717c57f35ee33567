//! Swap decision policies.
//!
//! A detector looks at the positions of one frame and a reference pose pair
//! and answers whether A and B should trade places. Detectors never mutate
//! anything; the [`Corrector`](crate::corrector::Corrector) applies swaps and
//! decides what the reference is (anchor mean, previous frame, window mean).

use crate::trajectory::{Axis, Keypoint, PosePair, Trajectory};

/// Separation substituted for a zero A-B distance in [`FrameToFrame`].
pub const MIN_SEPARATION: f64 = 1e-5;

/// Default fraction of the previous A-B separation that A must move in one
/// frame before [`FrameToFrame`] considers a swap.
pub const DEFAULT_JUMP_RATIO: f64 = 0.9;

pub trait SwapDetector {
    /// `true` if A and B at `current` should be exchanged, judged against
    /// `reference`. Any NaN involved makes the answer `false`.
    fn should_swap(&self, current: &PosePair, reference: &PosePair) -> bool;
}

/// Nearest-anchor label assignment.
///
/// Swaps iff `|A - ref.B| + |B - ref.A| < |A - ref.A| + |B - ref.B|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorDistance;

impl SwapDetector for AnchorDistance {
    fn should_swap(&self, current: &PosePair, reference: &PosePair) -> bool {
        let same = current.a.distance(reference.a) + current.b.distance(reference.b);
        let cross = current.a.distance(reference.b) + current.b.distance(reference.a);
        cross < same
    }
}

/// Compares a frame against the mean of its `±window_size` neighbours.
///
/// Swaps iff both keypoints are within `distance_threshold` of the other
/// keypoint's neighbourhood mean and each is closer to the other's mean than
/// to its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingWindow {
    pub window_size: usize,
    pub distance_threshold: f64,
}

/// Neighbourhood mean for one frame, see [`RollingWindow::reference`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowedReference {
    pub mean: PosePair,
    /// Frames averaged, current frame excluded.
    pub samples: usize,
}

impl WindowedReference {
    /// No neighbour contributed; the mean is not meaningful.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.samples == 0
    }
}

impl RollingWindow {
    pub fn new(window_size: usize, distance_threshold: f64) -> Self {
        assert!(window_size > 0, "Window size must be at least 1");
        assert!(
            distance_threshold > 0.0,
            "Distance threshold must be positive"
        );
        Self {
            window_size,
            distance_threshold,
        }
    }

    /// Mean A and B positions over `[frame - w, frame + w]` clipped to the
    /// trajectory, excluding `frame` itself. The divisor is clamped to 1, so a
    /// window with no other frames yields a zero mean.
    pub fn reference(&self, trajectory: &Trajectory, frame: usize) -> WindowedReference {
        let start = frame.saturating_sub(self.window_size);
        let end = frame
            .saturating_add(self.window_size)
            .saturating_add(1)
            .min(trajectory.len());
        let samples = end - start - 1;
        let divisor = samples.max(1) as f64;

        let windowed_mean = |keypoint: Keypoint, axis: Axis| {
            let series = trajectory.series(keypoint, axis);
            let sum: f64 = series[start..frame].iter().sum::<f64>()
                + series[frame + 1..end].iter().sum::<f64>();
            sum / divisor
        };

        let mean = PosePair::new(
            glam::DVec2::new(
                windowed_mean(Keypoint::A, Axis::X),
                windowed_mean(Keypoint::A, Axis::Y),
            ),
            glam::DVec2::new(
                windowed_mean(Keypoint::B, Axis::X),
                windowed_mean(Keypoint::B, Axis::Y),
            ),
        );

        WindowedReference { mean, samples }
    }
}

impl SwapDetector for RollingWindow {
    fn should_swap(&self, current: &PosePair, reference: &PosePair) -> bool {
        let a_to_a = current.a.distance(reference.a);
        let b_to_b = current.b.distance(reference.b);
        let a_to_b = current.a.distance(reference.b);
        let b_to_a = current.b.distance(reference.a);

        a_to_b < self.distance_threshold
            && b_to_a < self.distance_threshold
            && a_to_b < a_to_a
            && b_to_a < b_to_b
    }
}

/// Detects a jump of A onto B's previous position.
///
/// Swaps iff A moved more than `jump_ratio` times the previous A-B separation
/// and the crossed assignment needs less total movement than the straight one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameToFrame {
    pub jump_ratio: f64,
}

impl Default for FrameToFrame {
    fn default() -> Self {
        Self {
            jump_ratio: DEFAULT_JUMP_RATIO,
        }
    }
}

impl FrameToFrame {
    pub fn new(jump_ratio: f64) -> Self {
        assert!(jump_ratio > 0.0, "Jump ratio must be positive");
        Self { jump_ratio }
    }

    /// Distance A has to exceed in one frame before a swap is considered.
    /// Coincident keypoints count as [`MIN_SEPARATION`] apart.
    #[inline]
    pub fn jump_threshold(&self, previous: &PosePair) -> f64 {
        let mut separation = previous.separation();
        if separation == 0.0 {
            separation = MIN_SEPARATION;
        }
        self.jump_ratio * separation
    }
}

impl SwapDetector for FrameToFrame {
    fn should_swap(&self, current: &PosePair, previous: &PosePair) -> bool {
        let a_moved = current.a.distance(previous.a);
        let straight = a_moved + current.b.distance(previous.b);
        let crossed = current.a.distance(previous.b) + current.b.distance(previous.a);

        a_moved > self.jump_threshold(previous) && crossed < straight
    }
}
