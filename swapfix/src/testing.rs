//! Synthetic fixtures for unit tests.

use common::float_ext::FloatExt;
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::trajectory::{PosePair, Trajectory, SERIES_ORDER};

const A_REST: DVec2 = DVec2::new(0.0, 0.0);
const B_REST: DVec2 = DVec2::new(10.0, 0.0);

pub fn init_tracing() {
    common::log_setup::init_test_logging();
}

/// A at (0, 0), B at (10, 0) in every frame.
pub fn steady_trajectory(frames: usize) -> Trajectory {
    Trajectory::from_pairs(&vec![PosePair::new(A_REST, B_REST); frames])
}

/// Like [`steady_trajectory`], but odd frames are shifted by `offset` along x.
pub fn alternating_trajectory(frames: usize, offset: f64) -> Trajectory {
    let pairs: Vec<PosePair> = (0..frames)
        .map(|i| {
            let shift = DVec2::new(if i % 2 == 1 { offset } else { 0.0 }, 0.0);
            PosePair::new(A_REST + shift, B_REST + shift)
        })
        .collect();
    Trajectory::from_pairs(&pairs)
}

/// Steady positions plus uniform noise in `[-noise, noise)` on every coordinate.
pub fn noisy_trajectory(frames: usize, noise: f64, seed: u64) -> Trajectory {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut jitter = || {
        if noise > 0.0 {
            DVec2::new(rng.random_range(-noise..noise), rng.random_range(-noise..noise))
        } else {
            DVec2::ZERO
        }
    };
    let pairs: Vec<PosePair> = (0..frames)
        .map(|_| PosePair::new(A_REST + jitter(), B_REST + jitter()))
        .collect();
    Trajectory::from_pairs(&pairs)
}

pub fn with_swaps(trajectory: &Trajectory, frames: &[usize]) -> Trajectory {
    let mut swapped = trajectory.clone();
    for &frame in frames {
        swapped.swap(frame);
    }
    swapped
}

/// Asserts equal length and equal samples; NaN matches NaN.
pub fn assert_trajectories_eq(actual: &Trajectory, expected: &Trajectory) {
    assert_eq!(actual.len(), expected.len(), "frame count differs");
    for (keypoint, axis) in SERIES_ORDER {
        let lhs = actual.series(keypoint, axis);
        let rhs = expected.series(keypoint, axis);
        for (frame, (a, e)) in lhs.iter().zip(rhs).enumerate() {
            assert!(
                a.approximately_eq_nan(*e),
                "{keypoint}.{axis} differs at frame {frame}: {a} != {e}"
            );
        }
    }
}
