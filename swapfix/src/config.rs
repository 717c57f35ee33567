//! Correction configuration.
//!
//! Every parameter is explicit; only `jump_ratio` and
//! `fallback_to_sequential` have serde defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::detector::DEFAULT_JUMP_RATIO;
use crate::error::{Error, Result};
use crate::hampel::HampelConfig;
use crate::trajectory::Trajectory;

/// Which swap detector drives the main correction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Policy {
    /// Anchored bidirectional traversal from the first stable window.
    AnchorDistance,
    /// Per-frame comparison with the neighbourhood mean.
    RollingWindow,
    /// Forward sweep comparing each frame with the previous one.
    FrameToFrame,
}

/// Distance threshold used by the rolling-window detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum SwapThreshold {
    /// Absolute distance in position units.
    Fixed(f64),
    /// Fraction of the trajectory's mean per-axis A-B offset.
    RelativeToSeparation(f64),
}

impl SwapThreshold {
    /// Resolves to a distance for `trajectory`. `None` if the relative
    /// variant cannot be computed (no finite samples or zero separation).
    pub fn resolve(&self, trajectory: &Trajectory) -> Option<f64> {
        match *self {
            SwapThreshold::Fixed(distance) => Some(distance),
            SwapThreshold::RelativeToSeparation(fraction) => {
                let distance = fraction * trajectory.mean_axis_separation();
                (distance.is_finite() && distance > 0.0).then_some(distance)
            }
        }
    }

    fn value(&self) -> f64 {
        match *self {
            SwapThreshold::Fixed(v) | SwapThreshold::RelativeToSeparation(v) => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionConfig {
    /// Frames per stable window; half-width of the rolling window.
    pub window_size: usize,
    /// Maximum per-keypoint dispersion of a stable window, in position units.
    pub stability_threshold: f64,
    pub swap_distance_threshold: SwapThreshold,
    /// Jump cleanup after the swap pass. `None` skips it.
    pub hampel: Option<HampelConfig>,
    pub policy: Policy,
    /// Frame-to-frame trigger as a fraction of the previous A-B separation.
    #[serde(default = "default_jump_ratio")]
    pub jump_ratio: f64,
    /// Run the frame-to-frame sweep when the anchored policy finds no
    /// stable window, instead of failing.
    #[serde(default)]
    pub fallback_to_sequential: bool,
}

fn default_jump_ratio() -> f64 {
    DEFAULT_JUMP_RATIO
}

impl CorrectionConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = common::serde::load_from_file(path.as_ref()).map_err(Error::Config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidConfig(
                "window_size must be at least 1".to_string(),
            ));
        }
        if !(self.stability_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "stability_threshold must be positive, got {}",
                self.stability_threshold
            )));
        }
        let threshold = self.swap_distance_threshold.value();
        if !(threshold > 0.0) || !threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "swap_distance_threshold must be positive, got {}",
                threshold
            )));
        }
        if !(self.jump_ratio > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "jump_ratio must be positive, got {}",
                self.jump_ratio
            )));
        }
        if let Some(hampel) = &self.hampel {
            hampel.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::file_format::FileFormat;
    use strum::IntoEnumIterator;

    fn base() -> CorrectionConfig {
        CorrectionConfig {
            window_size: 20,
            stability_threshold: 2.0,
            swap_distance_threshold: SwapThreshold::Fixed(10.0),
            hampel: Some(HampelConfig::new(21, 1.0)),
            policy: Policy::AnchorDistance,
            jump_ratio: DEFAULT_JUMP_RATIO,
            fallback_to_sequential: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = base();
        config.window_size = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = base();
        config.stability_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = base();
        config.swap_distance_threshold = SwapThreshold::RelativeToSeparation(-0.5);
        assert!(config.validate().is_err());

        let mut config = base();
        config.hampel = Some(HampelConfig {
            window_size: 4,
            n_sigmas: 1.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_yaml_with_defaults() {
        let yaml = r#"
window_size: 20
stability_threshold: 1.5
swap_distance_threshold:
  kind: relative-to-separation
  value: 0.5
hampel:
  window_size: 5
  n_sigmas: 1.0
policy: rolling-window
"#;
        let config: CorrectionConfig = common::serde::deserialize(yaml, FileFormat::Yaml).unwrap();
        assert_eq!(config.policy, Policy::RollingWindow);
        assert_eq!(config.jump_ratio, 0.9);
        assert!(!config.fallback_to_sequential);
        assert_eq!(
            config.swap_distance_threshold,
            SwapThreshold::RelativeToSeparation(0.5)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let config = base();
        let text = common::serde::serialize(&config, FileFormat::Json).unwrap();
        assert!(text.contains("\"anchor-distance\""));
        let back: CorrectionConfig = common::serde::deserialize(&text, FileFormat::Json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rejects_unknown_fields() {
        let json = r#"{"window_size": 5, "stability_threshold": 1.0,
            "swap_distance_threshold": {"kind": "fixed", "value": 3.0}, "hampel": null,
            "policy": "frame-to-frame", "threshold": 7}"#;
        let parsed: anyhow::Result<CorrectionConfig> =
            common::serde::deserialize(json, FileFormat::Json);
        assert!(parsed.is_err());
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = CorrectionConfig::from_file("no/such/config.yaml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn relative_threshold_resolves_from_separation() {
        let traj = crate::testing::steady_trajectory(10);
        // mean |dx| = 10, mean |dy| = 0
        let threshold = SwapThreshold::RelativeToSeparation(0.5).resolve(&traj);
        assert_eq!(threshold, Some(2.5));
        assert_eq!(SwapThreshold::Fixed(4.0).resolve(&traj), Some(4.0));
    }

    #[test]
    fn policy_names() {
        let names: Vec<String> = Policy::iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["anchor-distance", "rolling-window", "frame-to-frame"]);
    }
}
