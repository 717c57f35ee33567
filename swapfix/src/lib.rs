//! Swapfix - identity swap and jump correction for two-keypoint pose tracks.
//!
//! Pose trackers following an elongated animal with a "head" and a "tail"
//! keypoint now and then exchange the two labels, or emit a single-frame jump.
//! This crate takes the per-frame positions of the two keypoints and returns a
//! trajectory with consistent identities and suppressed jumps, plus the list
//! of frames that were swapped.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use swapfix::{correct, CorrectionConfig, Trajectory};
//!
//! let config = CorrectionConfig::from_file("swapfix.yaml")?;
//! let trajectory = Trajectory::from_keypoints(&tracks, "head", "tail")?;
//! let result = correct(&trajectory, &config)?;
//!
//! println!("{} swaps, flipped: {}", result.swap_log.len(), result.flipped);
//! ```

pub mod config;
pub mod corrector;
pub mod detector;
pub mod error;
pub mod finalize;
pub mod hampel;
pub(crate) mod math;
pub mod pipeline;
pub mod stable_window;
pub mod trajectory;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Data model
// ============================================================================

pub use trajectory::{Axis, Keypoint, KeypointSeries, PosePair, Trajectory, SERIES_ORDER};

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{CorrectionConfig, Policy, SwapThreshold};
pub use error::{Error, Result};

// ============================================================================
// Building blocks
// ============================================================================

pub use corrector::{Corrector, Diagnostics, ReferenceTracker, SwapLog};
pub use detector::{AnchorDistance, FrameToFrame, RollingWindow, SwapDetector, WindowedReference};
pub use finalize::{Alignment, AlignmentFinalizer};
pub use hampel::{hampel_filter, HampelConfig, HampelReport};
pub use stable_window::{StableWindow, StableWindowFinder};

// ============================================================================
// Pipeline
// ============================================================================

pub use pipeline::{correct, correct_batch, Correction};
