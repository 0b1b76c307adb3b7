use ndarray::{Array2, ArrayView1, Axis};
use serde::Serialize;

use crate::math;
use crate::{Error, Result};

/// Repeated measurements laid out as samples (rows) by operators (columns)
///
/// A grid is rectangular, labelled along both axes and holds only finite values.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementGrid {
    samples: Vec<String>,
    operators: Vec<String>,
    values: Array2<f64>,
}

impl MeasurementGrid {
    /// Build a grid from row-major `rows`, one row per sample
    ///
    /// # Errors
    /// - [`Error::EmptyGrid`] if there are no samples or no operators
    /// - [`Error::LabelMismatch`] if the labels disagree with the shape of `rows`
    /// - [`Error::RaggedGrid`] if a row has the wrong number of cells
    /// - [`Error::NonFiniteInput`] if any cell is not finite
    pub fn new(samples: Vec<String>, operators: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if samples.len() != rows.len() {
            return Err(Error::LabelMismatch {
                axis: "sample",
                labels: samples.len(),
                cells: rows.len(),
            });
        }
        let Some(width) = rows.first().map(Vec::len) else {
            return Err(Error::EmptyGrid);
        };
        if operators.is_empty() {
            return Err(Error::EmptyGrid);
        }

        if let Some((row, values)) = rows.iter().enumerate().find(|(_, values)| values.len() != width) {
            return Err(Error::RaggedGrid {
                row,
                expected: width,
                found: values.len(),
            });
        }
        if width != operators.len() {
            return Err(Error::LabelMismatch {
                axis: "operator",
                labels: operators.len(),
                cells: width,
            });
        }

        let mut values = Array2::<f64>::zeros((rows.len(), width));
        for ((mut lane, cells), label) in values.rows_mut().into_iter().zip(&rows).zip(&samples) {
            if let Some(column) = cells.iter().position(|value| !value.is_finite()) {
                return Err(Error::non_finite(format!("sample '{label}'"), column, cells[column]));
            }
            lane.assign(&ArrayView1::from(cells.as_slice()));
        }

        Ok(Self {
            samples,
            operators,
            values,
        })
    }

    /// Build a grid from cells which may be missing, as produced by an editable table
    ///
    /// # Errors
    /// As [`MeasurementGrid::new`], plus [`Error::MissingCell`] for the first empty cell.
    pub fn from_optional(
        samples: Vec<String>,
        operators: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        let mut complete = Vec::with_capacity(rows.len());
        for (row, cells) in rows.into_iter().enumerate() {
            let values = cells
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    cell.ok_or_else(|| Error::MissingCell {
                        sample: samples.get(row).cloned().unwrap_or_default(),
                        operator: operators.get(column).cloned().unwrap_or_default(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            complete.push(values);
        }
        Self::new(samples, operators, complete)
    }

    /// A grid labelled `Sample 1..` by `Operator 1..`
    ///
    /// # Errors
    /// As [`MeasurementGrid::new`].
    pub fn with_default_labels(rows: Vec<Vec<f64>>) -> Result<Self> {
        let num_operators = rows.first().map_or(0, Vec::len);
        Self::new(
            default_labels("Sample", rows.len()),
            default_labels("Operator", num_operators),
            rows,
        )
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of measurements in the grid
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every measurement, row by row
    pub fn flattened(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}

/// `"{prefix} 1"`, `"{prefix} 2"`, ...
pub fn default_labels(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|ii| format!("{prefix} {ii}")).collect()
}

/// Dispersion figures for one sample or one operator
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisStatistics {
    pub label: String,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// Dispersion figures for the whole grid
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation of every measurement, the figure used for conformity
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Relative dispersion in percent
    pub coefficient_of_variation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridStatistics {
    /// One entry per sample, across operators
    pub per_sample: Vec<AxisStatistics>,
    /// One entry per operator, across samples
    pub per_operator: Vec<AxisStatistics>,
    pub overall: SummaryStatistics,
}

/// Compute per-sample, per-operator and overall statistics of `grid`
///
/// Every standard deviation here is the population figure, normalised by `n`.
pub fn estimate_grid(grid: &MeasurementGrid) -> GridStatistics {
    let per_sample = axis_statistics(grid.values(), Axis(0), grid.samples());
    let per_operator = axis_statistics(grid.values(), Axis(1), grid.operators());

    let flattened = grid.flattened();
    let mean = math::mean(&flattened).unwrap_or_default();
    let std_dev = math::population_std_dev(&flattened).unwrap_or_default();
    let (min, max) = math::extremes(&flattened).unwrap_or_default();

    let overall = SummaryStatistics {
        count: flattened.len(),
        mean,
        std_dev,
        min,
        max,
        range: max - min,
        coefficient_of_variation: math::coefficient_of_variation(std_dev, mean),
    };

    tracing::debug!(
        samples = per_sample.len(),
        operators = per_operator.len(),
        mean,
        std_dev,
        "estimated grid dispersion"
    );

    GridStatistics {
        per_sample,
        per_operator,
        overall,
    }
}

/// Statistics of each lane obtained by iterating `values` along `axis`
fn axis_statistics(values: &Array2<f64>, axis: Axis, labels: &[String]) -> Vec<AxisStatistics> {
    values
        .axis_iter(axis)
        .zip(labels)
        .map(|(lane, label)| lane_statistics(lane, label))
        .collect()
}

fn lane_statistics(lane: ArrayView1<'_, f64>, label: &str) -> AxisStatistics {
    let lane = lane.to_vec();
    let (min, max) = math::extremes(&lane).unwrap_or_default();
    AxisStatistics {
        label: label.to_owned(),
        mean: math::mean(&lane).unwrap_or_default(),
        std_dev: math::population_std_dev(&lane).unwrap_or_default(),
        min,
        max,
        range: max - min,
    }
}
