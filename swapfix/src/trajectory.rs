//! Per-frame positions of the two tracked keypoints.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::{Error, Result};

/// One of the two mutually exchangeable keypoint slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Keypoint {
    A,
    B,
}

impl Keypoint {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Keypoint::A => Keypoint::B,
            Keypoint::B => Keypoint::A,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Order of the four coordinate series wherever they are listed together.
pub const SERIES_ORDER: [(Keypoint, Axis); 4] = [
    (Keypoint::A, Axis::X),
    (Keypoint::A, Axis::Y),
    (Keypoint::B, Axis::X),
    (Keypoint::B, Axis::Y),
];

/// Positions of both keypoints at a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePair {
    pub a: DVec2,
    pub b: DVec2,
}

impl PosePair {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn get(&self, keypoint: Keypoint) -> DVec2 {
        match keypoint {
            Keypoint::A => self.a,
            Keypoint::B => self.b,
        }
    }

    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }

    /// Distance between A and B. NaN if either position is missing.
    #[inline]
    pub fn separation(&self) -> f64 {
        self.a.distance(self.b)
    }
}

/// A named keypoint track as handed over by the file readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypointSeries {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl KeypointSeries {
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

/// Mutable per-frame position buffer for keypoints A and B.
///
/// Both keypoints always have the same number of frames and the frame count
/// never changes after construction. Missing samples are NaN. `Clone` gives an
/// independent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    labels: [String; 2],
    // [keypoint][axis][frame]
    series: [[Vec<f64>; 2]; 2],
}

impl Trajectory {
    /// Builds a trajectory from raw coordinate vectors, labelled "A" and "B".
    pub fn new(a_x: Vec<f64>, a_y: Vec<f64>, b_x: Vec<f64>, b_y: Vec<f64>) -> Result<Self> {
        Self::with_labels(
            KeypointSeries::new("A", a_x, a_y),
            KeypointSeries::new("B", b_x, b_y),
        )
    }

    fn with_labels(a: KeypointSeries, b: KeypointSeries) -> Result<Self> {
        if a.x.len() != a.y.len() {
            return Err(Error::AxisLengthMismatch {
                keypoint: Keypoint::A,
                x_len: a.x.len(),
                y_len: a.y.len(),
            });
        }
        if b.x.len() != b.y.len() {
            return Err(Error::AxisLengthMismatch {
                keypoint: Keypoint::B,
                x_len: b.x.len(),
                y_len: b.y.len(),
            });
        }
        if a.x.len() != b.x.len() {
            return Err(Error::ShapeMismatch {
                a_len: a.x.len(),
                b_len: b.x.len(),
            });
        }

        Ok(Self {
            labels: [a.name, b.name],
            series: [[a.x, a.y], [b.x, b.y]],
        })
    }

    /// Picks the two named keypoints out of a multi-keypoint track set.
    pub fn from_keypoints(
        keypoints: &[KeypointSeries],
        a_label: &str,
        b_label: &str,
    ) -> Result<Self> {
        let find = |label: &str| {
            keypoints
                .iter()
                .find(|kp| kp.name == label)
                .cloned()
                .ok_or_else(|| Error::MissingKeypoint(label.to_string()))
        };

        Self::with_labels(find(a_label)?, find(b_label)?)
    }

    /// Builds a trajectory from per-frame pose pairs.
    pub fn from_pairs(pairs: &[PosePair]) -> Self {
        let mut series: [[Vec<f64>; 2]; 2] = Default::default();
        for s in series.iter_mut().flatten() {
            s.reserve(pairs.len());
        }
        for pair in pairs {
            series[0][0].push(pair.a.x);
            series[0][1].push(pair.a.y);
            series[1][0].push(pair.b.x);
            series[1][1].push(pair.b.y);
        }

        Self {
            labels: ["A".to_string(), "B".to_string()],
            series,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.series[0][0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn label(&self, keypoint: Keypoint) -> &str {
        &self.labels[keypoint.index()]
    }

    #[inline]
    pub fn get(&self, keypoint: Keypoint, axis: Axis, frame: usize) -> f64 {
        self.series[keypoint.index()][axis.index()][frame]
    }

    #[inline]
    pub fn set(&mut self, keypoint: Keypoint, axis: Axis, frame: usize, value: f64) {
        self.series[keypoint.index()][axis.index()][frame] = value;
    }

    pub fn series(&self, keypoint: Keypoint, axis: Axis) -> &[f64] {
        &self.series[keypoint.index()][axis.index()]
    }

    pub fn series_mut(&mut self, keypoint: Keypoint, axis: Axis) -> &mut [f64] {
        &mut self.series[keypoint.index()][axis.index()]
    }

    /// All four series mutably, in [`SERIES_ORDER`].
    pub(crate) fn all_series_mut(&mut self) -> [&mut [f64]; 4] {
        let [[ax, ay], [bx, by]] = &mut self.series;
        [
            ax.as_mut_slice(),
            ay.as_mut_slice(),
            bx.as_mut_slice(),
            by.as_mut_slice(),
        ]
    }

    #[inline]
    pub fn position(&self, keypoint: Keypoint, frame: usize) -> DVec2 {
        let s = &self.series[keypoint.index()];
        DVec2::new(s[0][frame], s[1][frame])
    }

    #[inline]
    pub fn pair(&self, frame: usize) -> PosePair {
        PosePair::new(
            self.position(Keypoint::A, frame),
            self.position(Keypoint::B, frame),
        )
    }

    pub fn pairs(&self) -> impl Iterator<Item = PosePair> + '_ {
        (0..self.len()).map(|frame| self.pair(frame))
    }

    /// Exchanges both coordinates of A and B at `frame`. Self-inverse.
    #[inline]
    pub fn swap(&mut self, frame: usize) {
        let [a, b] = &mut self.series;
        for (a_axis, b_axis) in a.iter_mut().zip(b.iter_mut()) {
            std::mem::swap(&mut a_axis[frame], &mut b_axis[frame]);
        }
    }

    /// Exchanges A and B at every frame. Labels stay attached to their slots.
    pub fn flip_all(&mut self) {
        let [a, b] = &mut self.series;
        std::mem::swap(a, b);
    }

    /// Mean absolute A-B offset along x and along y, averaged over the two
    /// axes. Frames with a missing coordinate are skipped per axis.
    /// Returns NaN when no frame has finite values.
    pub fn mean_axis_separation(&self) -> f64 {
        let axis_mean = |axis: Axis| {
            let (sum, count) = self
                .series(Keypoint::A, axis)
                .iter()
                .zip(self.series(Keypoint::B, axis))
                .map(|(a, b)| (a - b).abs())
                .filter(|d| d.is_finite())
                .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        };

        (axis_mean(Axis::X) + axis_mean(Axis::Y)) / 2.0
    }

    /// Hands the data back as named series, A first.
    pub fn into_keypoints(self) -> [KeypointSeries; 2] {
        let [a_label, b_label] = self.labels;
        let [[ax, ay], [bx, by]] = self.series;
        [
            KeypointSeries::new(a_label, ax, ay),
            KeypointSeries::new(b_label, bx, by),
        ]
    }
}
