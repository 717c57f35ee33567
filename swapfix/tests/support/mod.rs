//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swapfix::{PosePair, Trajectory, SERIES_ORDER};

/// Head position of a crawling animal: fast for the first 15 frames, then slow.
fn head_at(frame: usize) -> DVec2 {
    let t = frame as f64;
    let x = if frame < 15 {
        3.0 * t
    } else {
        45.0 + 0.3 * (t - 15.0)
    };
    DVec2::new(x, 2.0 * (t * 0.1).sin())
}

/// Head (A) leads the tail (B) by roughly 10 units along x, with uniform
/// tracking noise of `noise` on every coordinate.
pub fn crawling_animal(frames: usize, noise: f64, seed: u64) -> Trajectory {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let jitter = |rng: &mut ChaCha8Rng| {
        DVec2::new(rng.random_range(-noise..=noise), rng.random_range(-noise..=noise))
    };
    let pairs: Vec<PosePair> = (0..frames)
        .map(|frame| {
            let head = head_at(frame);
            let tail = head - DVec2::new(10.0, -1.0);
            PosePair::new(head + jitter(&mut rng), tail + jitter(&mut rng))
        })
        .collect();
    Trajectory::from_pairs(&pairs)
}

/// Slow crawl everywhere (no fast start).
pub fn slow_animal(frames: usize, noise: f64, seed: u64) -> Trajectory {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pairs: Vec<PosePair> = (0..frames)
        .map(|frame| {
            let t = frame as f64;
            let head = DVec2::new(0.3 * t, 2.0 * (t * 0.1).sin());
            let tail = head - DVec2::new(10.0, -1.0);
            let mut noisy = |p: DVec2| {
                p + DVec2::new(
                    rng.random_range(-noise..=noise),
                    rng.random_range(-noise..=noise),
                )
            };
            let head = noisy(head);
            let tail = noisy(tail);
            PosePair::new(head, tail)
        })
        .collect();
    Trajectory::from_pairs(&pairs)
}

pub fn with_swaps(trajectory: &Trajectory, frames: impl IntoIterator<Item = usize>) -> Trajectory {
    let mut swapped = trajectory.clone();
    for frame in frames {
        swapped.swap(frame);
    }
    swapped
}

/// Bit-exact comparison; NaN matches NaN.
pub fn assert_bitwise_eq(actual: &Trajectory, expected: &Trajectory) {
    assert_eq!(actual.len(), expected.len());
    for (keypoint, axis) in SERIES_ORDER {
        let lhs = actual.series(keypoint, axis);
        let rhs = expected.series(keypoint, axis);
        for (frame, (a, e)) in lhs.iter().zip(rhs).enumerate() {
            assert!(
                a.to_bits() == e.to_bits() || (a.is_nan() && e.is_nan()),
                "{keypoint}.{axis} differs at frame {frame}: {a} != {e}"
            );
        }
    }
}

/// Largest absolute coordinate difference, ignoring missing samples.
pub fn max_abs_error(actual: &Trajectory, expected: &Trajectory) -> f64 {
    SERIES_ORDER
        .iter()
        .flat_map(|&(keypoint, axis)| {
            actual
                .series(keypoint, axis)
                .iter()
                .zip(expected.series(keypoint, axis))
                .map(|(a, e)| (a - e).abs())
        })
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max)
}
