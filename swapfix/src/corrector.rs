//! Frame traversal that applies swap decisions to a working trajectory.
//!
//! Passes run one after another on the same buffer, so a caller can combine
//! e.g. an anchored pass with a Hampel jump cleanup while computing the
//! anchor only once. Each swap is appended to the [`SwapLog`] in the order it
//! was applied.

use rayon::prelude::*;

use crate::detector::{RollingWindow, SwapDetector};
use crate::hampel::{hampel_filter, HampelConfig};
use crate::stable_window::StableWindow;
use crate::trajectory::{PosePair, Trajectory};

/// Frames at which a swap was applied, in application order. The anchored
/// pass visits frames before the anchor in decreasing order, and several
/// passes may log the same frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapLog {
    frames: Vec<usize>,
}

impl SwapLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, frame: usize) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, frame: usize) -> bool {
        self.frames.contains(&frame)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.iter().copied()
    }
}

/// Non-fatal observations gathered while correcting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Rolling-window frames whose neighbourhood had no other frame.
    pub degenerate_windows: usize,
    /// Hampel replacements per series, in [`SERIES_ORDER`](crate::trajectory::SERIES_ORDER).
    pub hampel_replacements: [usize; 4],
    /// The anchored policy found no stable window and the sequential pass ran instead.
    pub used_fallback: bool,
}

impl Diagnostics {
    pub fn total_hampel_replacements(&self) -> usize {
        self.hampel_replacements.iter().sum()
    }
}

/// Identity reference carried through an anchored traversal.
///
/// Starts at the anchor mean and follows the corrected positions of each
/// visited frame. A missing position leaves that keypoint's reference as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceTracker {
    current: PosePair,
}

impl ReferenceTracker {
    pub fn new(anchor: PosePair) -> Self {
        Self { current: anchor }
    }

    #[inline]
    pub fn reference(&self) -> &PosePair {
        &self.current
    }

    #[inline]
    pub fn advance(&mut self, corrected: &PosePair) {
        if corrected.a.is_finite() {
            self.current.a = corrected.a;
        }
        if corrected.b.is_finite() {
            self.current.b = corrected.b;
        }
    }
}

/// Owns the trajectory being corrected plus the swap log.
#[derive(Debug)]
pub struct Corrector {
    trajectory: Trajectory,
    log: SwapLog,
    diagnostics: Diagnostics,
}

impl Corrector {
    pub fn new(trajectory: Trajectory) -> Self {
        Self {
            trajectory,
            log: SwapLog::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn swap_log(&self) -> &SwapLog {
        &self.log
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    #[inline]
    fn apply_swap(&mut self, frame: usize) {
        self.trajectory.swap(frame);
        self.log.push(frame);
    }

    /// Walks outward from `anchor`: from the frame before it down to 0, then
    /// from the frame after it to the end. Each walk starts from the anchor
    /// mean and compares every frame with the corrected frame visited just
    /// before it. Frames inside the anchor are left alone.
    ///
    /// Returns the number of swaps applied.
    pub fn anchored_pass<D: SwapDetector>(&mut self, anchor: &StableWindow, detector: &D) -> usize {
        let end = anchor.end().min(self.trajectory.len());
        let backward = self.walk((0..anchor.start).rev(), anchor.mean, detector);
        let forward = self.walk(end..self.trajectory.len(), anchor.mean, detector);

        tracing::info!(
            anchor_start = anchor.start,
            anchor_len = anchor.len,
            backward,
            forward,
            "Anchored pass done"
        );
        backward + forward
    }

    fn walk<D, I>(&mut self, frames: I, anchor: PosePair, detector: &D) -> usize
    where
        D: SwapDetector,
        I: Iterator<Item = usize>,
    {
        let mut tracker = ReferenceTracker::new(anchor);
        let mut swaps = 0;

        for frame in frames {
            let mut current = self.trajectory.pair(frame);
            if detector.should_swap(&current, tracker.reference()) {
                self.apply_swap(frame);
                current = current.swapped();
                swaps += 1;
            }
            tracker.advance(&current);
        }

        swaps
    }

    /// Single forward sweep from frame 1, comparing each frame with the
    /// already corrected frame before it. A keypoint missing in that frame
    /// is compared at its last known position instead.
    pub fn sequential_pass<D: SwapDetector>(&mut self, detector: &D) -> usize {
        let len = self.trajectory.len();
        if len < 2 {
            return 0;
        }

        let mut previous = ReferenceTracker::new(self.trajectory.pair(0));
        let mut swaps = 0;

        for frame in 1..len {
            let mut current = self.trajectory.pair(frame);
            if detector.should_swap(&current, previous.reference()) {
                self.apply_swap(frame);
                current = current.swapped();
                swaps += 1;
            }
            previous.advance(&current);
        }

        tracing::info!(swaps, "Sequential pass done");
        swaps
    }

    /// Judges every frame against its neighbourhood mean in the pass input,
    /// then applies all swaps at once in increasing frame order.
    pub fn rolling_pass(&mut self, detector: &RollingWindow) -> usize {
        let mut degenerate = 0;
        let swaps: Vec<usize> = (0..self.trajectory.len())
            .filter(|&frame| {
                let reference = detector.reference(&self.trajectory, frame);
                if reference.is_degenerate() {
                    degenerate += 1;
                }
                detector.should_swap(&self.trajectory.pair(frame), &reference.mean)
            })
            .collect();

        if degenerate > 0 {
            tracing::warn!(
                degenerate,
                window_size = detector.window_size,
                "Rolling window had no neighbouring frames; window too small for the data"
            );
        }
        self.diagnostics.degenerate_windows += degenerate;

        for &frame in &swaps {
            self.apply_swap(frame);
        }

        tracing::info!(swaps = swaps.len(), "Rolling-window pass done");
        swaps.len()
    }

    /// Hampel-filters the four coordinate series independently and in
    /// parallel. Returns the total number of replaced samples.
    pub fn hampel_pass(&mut self, config: &HampelConfig) -> usize {
        let counts: Vec<usize> = self
            .trajectory
            .all_series_mut()
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|series| {
                let report = hampel_filter(series, config);
                series.copy_from_slice(&report.filtered);
                report.outliers.len()
            })
            .collect();

        for (total, count) in self.diagnostics.hampel_replacements.iter_mut().zip(&counts) {
            *total += count;
        }

        let replaced: usize = counts.iter().sum();
        tracing::info!(
            replaced,
            window_size = config.window_size,
            n_sigmas = config.n_sigmas,
            "Hampel pass done"
        );
        replaced
    }

    pub fn finish(self) -> (Trajectory, SwapLog, Diagnostics) {
        (self.trajectory, self.log, self.diagnostics)
    }
}
