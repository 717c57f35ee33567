//! Global identity check after all correction passes.
//!
//! Directional passes can agree with themselves while having locked onto the
//! wrong absolute identity. Comparing the corrected trajectory and its global
//! A/B flip against the uncorrected input catches that case.

use crate::trajectory::{Keypoint, Trajectory, SERIES_ORDER};

/// Deviation sums computed by [`AlignmentFinalizer::finalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Sum of |corrected - original| over both keypoints, both axes, all frames.
    pub deviation: f64,
    /// The same sum with the corrected A and B exchanged at every frame.
    pub flipped_deviation: f64,
    pub flipped: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentFinalizer;

impl AlignmentFinalizer {
    /// Flips `corrected` globally iff that strictly reduces its deviation from
    /// `original`. Terms involving a missing sample are skipped.
    ///
    /// # Panics
    ///
    /// Panics if the two trajectories differ in length.
    pub fn finalize(&self, corrected: &mut Trajectory, original: &Trajectory) -> Alignment {
        assert_eq!(
            corrected.len(),
            original.len(),
            "Corrected and original trajectories must have the same length"
        );

        let mut deviation = 0.0;
        let mut flipped_deviation = 0.0;

        for (keypoint, axis) in SERIES_ORDER {
            let ours = corrected.series(keypoint, axis);
            let same = original.series(keypoint, axis);
            let other = original.series(keypoint.other(), axis);

            deviation += abs_diff_sum(ours, same);
            flipped_deviation += abs_diff_sum(ours, other);
        }

        let flipped = flipped_deviation < deviation;
        if flipped {
            corrected.flip_all();
            tracing::info!(
                deviation,
                flipped_deviation,
                a = corrected.label(Keypoint::A),
                b = corrected.label(Keypoint::B),
                "Global identity flip applied"
            );
        } else {
            tracing::debug!(deviation, flipped_deviation, "Global identity kept");
        }

        Alignment {
            deviation,
            flipped_deviation,
            flipped,
        }
    }
}

fn abs_diff_sum(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter()
        .zip(rhs)
        .map(|(a, b)| (a - b).abs())
        .filter(|d| d.is_finite())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_trajectories_eq, noisy_trajectory, steady_trajectory, with_swaps};
    use crate::trajectory::Axis;

    #[test]
    fn keeps_mostly_agreeing_result() {
        let original = with_swaps(&steady_trajectory(10), &[3, 4, 5]);
        let mut corrected = steady_trajectory(10);
        let alignment = AlignmentFinalizer.finalize(&mut corrected, &original);
        assert!(!alignment.flipped);
        assert!((alignment.deviation - 60.0).abs() < 1e-9);
        assert!((alignment.flipped_deviation - 140.0).abs() < 1e-9);
        assert_trajectories_eq(&corrected, &steady_trajectory(10));
    }

    #[test]
    fn flips_inverted_result() {
        let original = steady_trajectory(10);
        let mut corrected = with_swaps(&original, &(0..10).collect::<Vec<_>>());
        corrected.swap(2);
        let alignment = AlignmentFinalizer.finalize(&mut corrected, &original);
        assert!(alignment.flipped);
        assert_trajectories_eq(&corrected, &with_swaps(&original, &[2]));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let original = noisy_trajectory(60, 0.5, 7);
        let mut corrected = with_swaps(&original, &(0..45).collect::<Vec<_>>());

        let first = AlignmentFinalizer.finalize(&mut corrected, &original);
        assert!(first.flipped);
        let after_first = corrected.clone();

        let second = AlignmentFinalizer.finalize(&mut corrected, &original);
        assert!(!second.flipped);
        assert_trajectories_eq(&corrected, &after_first);
    }

    #[test]
    fn equal_deviation_does_not_flip() {
        let original = steady_trajectory(4);
        let mut corrected = with_swaps(&original, &[0, 1]);
        let alignment = AlignmentFinalizer.finalize(&mut corrected, &original);
        assert_eq!(alignment.deviation, alignment.flipped_deviation);
        assert!(!alignment.flipped);
    }

    #[test]
    fn missing_samples_are_skipped() {
        let mut original = steady_trajectory(6);
        original.set(Keypoint::A, Axis::X, 1, f64::NAN);
        let mut corrected = original.clone();
        corrected.flip_all();
        let alignment = AlignmentFinalizer.finalize(&mut corrected, &original);
        assert!(alignment.deviation.is_finite());
        assert!(alignment.flipped);
        assert_eq!(alignment.flipped_deviation, 0.0);
    }
}
