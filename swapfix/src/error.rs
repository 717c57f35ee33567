//! Error types for trajectory correction.

use thiserror::Error;

use crate::trajectory::Keypoint;

/// Errors surfaced by the correction engine.
///
/// Structural errors (`ShapeMismatch`, `AxisLengthMismatch`, `MissingKeypoint`,
/// `EmptyTrajectory`) and `InvalidConfig` are raised before any data is touched.
/// `NoStableWindowFound` is raised before the first pass mutates anything.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Keypoint length mismatch: A has {a_len} frames, B has {b_len}")]
    ShapeMismatch { a_len: usize, b_len: usize },

    #[error("Keypoint {keypoint} has {x_len} x samples but {y_len} y samples")]
    AxisLengthMismatch {
        keypoint: Keypoint,
        x_len: usize,
        y_len: usize,
    },

    #[error("Keypoint '{0}' not found in input")]
    MissingKeypoint(String),

    #[error("Trajectory has no frames")]
    EmptyTrajectory,

    #[error(
        "No stable window of {window_size} frames with dispersion below {threshold} in {frames} frames"
    )]
    NoStableWindowFound {
        window_size: usize,
        threshold: f64,
        frames: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load configuration")]
    Config(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
