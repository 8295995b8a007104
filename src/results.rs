//! Code-check result matrix and report rows

use serde::{Deserialize, Serialize};

use crate::error::{PipeError, PipeResult};
use crate::math::Mat;

/// Number of columns in a [`StressMatrix`]
pub const STRESS_COLUMNS: usize = 10;

/// Column of the stress ratio
pub const RATIO: usize = 9;

/// One evaluation at a point; field order matches the matrix columns
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StressRow {
    /// Hoop stress
    pub hoop: f64,
    /// Axial stress
    pub axial: f64,
    /// Torsional stress
    pub torsion: f64,
    /// Longitudinal pressure stress
    pub slp: f64,
    /// Bending stress
    pub bending: f64,
    /// Total longitudinal (code) stress
    pub sl: f64,
    /// In-plane SIF
    pub sifi: f64,
    /// Out-of-plane SIF
    pub sifo: f64,
    /// Allowable stress
    pub sallow: f64,
    /// sl / sallow
    pub ratio: f64,
}

impl StressRow {
    pub fn to_array(&self) -> [f64; STRESS_COLUMNS] {
        [
            self.hoop,
            self.axial,
            self.torsion,
            self.slp,
            self.bending,
            self.sl,
            self.sifi,
            self.sifo,
            self.sallow,
            self.ratio,
        ]
    }

    pub fn from_array(arr: [f64; STRESS_COLUMNS]) -> Self {
        Self {
            hoop: arr[0],
            axial: arr[1],
            torsion: arr[2],
            slp: arr[3],
            bending: arr[4],
            sl: arr[5],
            sifi: arr[6],
            sifo: arr[7],
            sallow: arr[8],
            ratio: arr[9],
        }
    }

    /// Ratio of at least 1.0 means the code limit is exceeded
    pub fn is_overstressed(&self) -> bool {
        self.ratio >= 1.0
    }
}

/// Worst-case code stresses, one row per point
///
/// Rows start at zero; a row is replaced only by an evaluation with a
/// strictly higher ratio, so the final state does not depend on the order
/// of evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressMatrix {
    data: Mat,
}

impl StressMatrix {
    /// A zeroed matrix for `npoints` points
    pub fn new(npoints: usize) -> Self {
        Self {
            data: Mat::zeros(npoints, STRESS_COLUMNS),
        }
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn matrix(&self) -> &Mat {
        &self.data
    }

    pub fn row(&self, row: usize) -> Option<StressRow> {
        if row >= self.nrows() {
            return None;
        }
        let mut arr = [0.0; STRESS_COLUMNS];
        for (col, value) in arr.iter_mut().enumerate() {
            *value = self.data[(row, col)];
        }
        Some(StressRow::from_array(arr))
    }

    pub fn ratio(&self, row: usize) -> Option<f64> {
        (row < self.nrows()).then(|| self.data[(row, RATIO)])
    }

    /// Store `stress` at `row` if its ratio beats the stored one
    ///
    /// Returns whether the row was overwritten.
    pub fn update(&mut self, row: usize, stress: &StressRow) -> PipeResult<bool> {
        if row >= self.nrows() {
            return Err(PipeError::InvalidInput(format!(
                "point row {row} outside a stress matrix of {} rows",
                self.nrows()
            )));
        }
        if stress.ratio > self.data[(row, RATIO)] {
            for (col, value) in stress.to_array().into_iter().enumerate() {
                self.data[(row, col)] = value;
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Row and ratio of the most highly stressed point
    pub fn max_ratio(&self) -> Option<(usize, f64)> {
        (0..self.nrows())
            .map(|row| (row, self.data[(row, RATIO)]))
            .fold(None, |best, (row, ratio)| match best {
                Some((_, r)) if r >= ratio => best,
                _ => Some((row, ratio)),
            })
    }
}

/// Worst-case stresses at one named point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStress {
    pub point: String,
    #[serde(flatten)]
    pub stress: StressRow,
}

/// Stress report of one load case, ready for the reporting front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub case: String,
    pub code_units: String,
    pub points: Vec<PointStress>,
}

impl StressReport {
    pub fn to_json(&self) -> PipeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Points at or above the code limit
    pub fn overstressed(&self) -> impl Iterator<Item = &PointStress> + '_ {
        self.points.iter().filter(|p| p.stress.is_overstressed())
    }
}
