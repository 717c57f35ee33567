//! End-to-end correction of one trajectory, and of many in parallel.
//!
//! Order of work: validate config and input, find the anchor if the policy
//! needs one, run the policy pass, run the optional Hampel pass, then the
//! global alignment check. Everything that can fail does so before the
//! working copy is created, and the caller's trajectory is never modified.

use rayon::prelude::*;

use crate::config::{CorrectionConfig, Policy};
use crate::corrector::{Corrector, Diagnostics, SwapLog};
use crate::detector::{AnchorDistance, FrameToFrame, RollingWindow};
use crate::error::{Error, Result};
use crate::finalize::{Alignment, AlignmentFinalizer};
use crate::stable_window::{StableWindow, StableWindowFinder};
use crate::trajectory::Trajectory;

/// Output of [`correct`].
#[derive(Debug, Clone)]
pub struct Correction {
    pub trajectory: Trajectory,
    pub swap_log: SwapLog,
    /// The alignment check exchanged A and B over the whole trajectory.
    pub flipped: bool,
    /// Anchor used by the anchored pass, if one ran.
    pub anchor: Option<StableWindow>,
    pub alignment: Alignment,
    pub diagnostics: Diagnostics,
}

/// Main pass chosen for a trajectory, with all parameters resolved.
enum MainPass {
    Anchored(StableWindow),
    Rolling(RollingWindow),
    Sequential { fallback: bool },
}

fn plan(input: &Trajectory, config: &CorrectionConfig) -> Result<MainPass> {
    match config.policy {
        Policy::AnchorDistance => {
            let finder = StableWindowFinder::new(config.window_size, config.stability_threshold);
            match finder.find(input) {
                Ok(anchor) => Ok(MainPass::Anchored(anchor)),
                Err(err @ Error::NoStableWindowFound { .. }) => {
                    if config.fallback_to_sequential {
                        tracing::warn!("{err}; falling back to frame-to-frame correction");
                        Ok(MainPass::Sequential { fallback: true })
                    } else {
                        Err(err)
                    }
                }
                Err(err) => Err(err),
            }
        }
        Policy::RollingWindow => {
            let threshold = config
                .swap_distance_threshold
                .resolve(input)
                .ok_or_else(|| {
                    Error::InvalidConfig(
                        "swap_distance_threshold cannot be derived from a trajectory without finite A-B separation"
                            .to_string(),
                    )
                })?;
            Ok(MainPass::Rolling(RollingWindow::new(
                config.window_size,
                threshold,
            )))
        }
        Policy::FrameToFrame => Ok(MainPass::Sequential { fallback: false }),
    }
}

/// Corrects identity swaps and jumps in `input` according to `config`.
pub fn correct(input: &Trajectory, config: &CorrectionConfig) -> Result<Correction> {
    config.validate()?;
    if input.is_empty() {
        return Err(Error::EmptyTrajectory);
    }

    let pass = plan(input, config)?;

    tracing::info!(
        frames = input.len(),
        policy = %config.policy,
        a = input.label(crate::trajectory::Keypoint::A),
        b = input.label(crate::trajectory::Keypoint::B),
        "Correcting trajectory"
    );

    let mut corrector = Corrector::new(input.clone());
    let mut anchor = None;

    match pass {
        MainPass::Anchored(window) => {
            corrector.anchored_pass(&window, &AnchorDistance);
            anchor = Some(window);
        }
        MainPass::Rolling(detector) => {
            corrector.rolling_pass(&detector);
        }
        MainPass::Sequential { fallback } => {
            corrector.diagnostics_mut().used_fallback = fallback;
            corrector.sequential_pass(&FrameToFrame::new(config.jump_ratio));
        }
    }

    if let Some(hampel) = &config.hampel {
        corrector.hampel_pass(hampel);
    }

    let (mut trajectory, swap_log, diagnostics) = corrector.finish();
    let alignment = AlignmentFinalizer.finalize(&mut trajectory, input);

    tracing::info!(
        swaps = swap_log.len(),
        flipped = alignment.flipped,
        hampel_replacements = diagnostics.total_hampel_replacements(),
        "Trajectory corrected"
    );

    Ok(Correction {
        trajectory,
        swap_log,
        flipped: alignment.flipped,
        anchor,
        alignment,
        diagnostics,
    })
}

/// Corrects independent trajectories in parallel, at most `max_concurrent`
/// at a time. Results are in input order; one failure does not affect the
/// others.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn correct_batch(
    inputs: &[Trajectory],
    config: &CorrectionConfig,
    max_concurrent: usize,
) -> Vec<Result<Correction>> {
    assert!(max_concurrent > 0, "max_concurrent must be > 0");

    let mut results = Vec::with_capacity(inputs.len());
    for chunk in inputs.chunks(max_concurrent) {
        results.par_extend(chunk.par_iter().map(|input| correct(input, config)));
    }

    let failed = results.iter().filter(|result| result.is_err()).count();
    tracing::info!(
        trajectories = inputs.len(),
        failed,
        max_concurrent,
        "Batch correction done"
    );
    results
}
