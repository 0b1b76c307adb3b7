//! Reference data sets for exercising the laboratory workflow
//!
//! Each scenario is a samples-by-operators grid representative of a situation met in practice,
//! from tightly grouped operators to a non-conforming spread.

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand_isaac::Isaac64Rng;

use crate::grid::MeasurementGrid;
use crate::Result;

/// Seed of the generator behind [`Scenario::LargeSeries`]
pub const LARGE_SERIES_SEED: u64 = 42;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Operators agree closely, σ within a sample around 0.05
    Excellent,
    /// Moderate spread between operators, σ within a sample around 0.15
    Acceptable,
    /// Operator 2 reads systematically about 0.5 high
    OperatorBias,
    /// Large spread between operators, σ within a sample around 0.6
    NonConforming,
    /// Mixed data set of 5 samples by 3 operators
    Custom,
    /// 10 samples by 5 operators, generated from a seeded normal distribution
    LargeSeries,
}

impl Scenario {
    pub const ALL: [Self; 6] = [
        Self::Excellent,
        Self::Acceptable,
        Self::OperatorBias,
        Self::NonConforming,
        Self::Custom,
        Self::LargeSeries,
    ];

    pub const fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent measurements (low dispersion)",
            Self::Acceptable => "Acceptable measurements (medium dispersion)",
            Self::OperatorBias => "Measurements with operator bias",
            Self::NonConforming => "Non-conforming measurements (high dispersion)",
            Self::Custom => "Custom data (5x3)",
            Self::LargeSeries => "Large series (10x5)",
        }
    }

    /// Build the grid for this scenario
    ///
    /// # Errors
    /// Never fails for the built-in data, the `Result` mirrors [`MeasurementGrid::new`].
    pub fn grid(self) -> Result<MeasurementGrid> {
        let columns: [[f64; 5]; 3] = match self {
            Self::Excellent => [
                [20.15, 25.32, 30.48, 35.62, 40.78],
                [20.18, 25.35, 30.52, 35.68, 40.82],
                [20.12, 25.30, 30.45, 35.60, 40.75],
            ],
            Self::Acceptable => [
                [20.1, 25.3, 30.5, 35.6, 40.8],
                [20.3, 25.4, 30.7, 35.8, 41.0],
                [19.9, 25.2, 30.4, 35.5, 40.6],
            ],
            Self::OperatorBias => [
                [20.15, 25.32, 30.48, 35.62, 40.78],
                [20.45, 25.80, 31.05, 36.20, 41.35],
                [19.95, 25.10, 30.20, 35.35, 40.50],
            ],
            Self::NonConforming => [
                [20.2, 25.5, 30.8, 35.9, 41.2],
                [20.8, 26.2, 31.5, 36.8, 42.0],
                [19.5, 24.8, 29.9, 35.0, 40.1],
            ],
            Self::Custom => [
                [12.45, 15.67, 18.23, 21.89, 24.12],
                [12.50, 15.70, 18.28, 21.95, 24.18],
                [12.42, 15.65, 18.20, 21.85, 24.08],
            ],
            Self::LargeSeries => return large_series(),
        };

        let rows = (0..5)
            .map(|sample| columns.iter().map(|column| column[sample]).collect())
            .collect();
        MeasurementGrid::with_default_labels(rows)
    }
}

/// Base values 20, 25, .., 65 read by 5 operators with N(0, 0.1) noise
fn large_series() -> Result<MeasurementGrid> {
    let mut rng = Isaac64Rng::seed_from_u64(LARGE_SERIES_SEED);
    let noise = Normal::new(0., 0.1).expect("standard deviation must be positive");
    let base: Array1<f64> = (0..10).map(|ii| 5.0f64.mul_add(f64::from(ii), 20.)).collect();

    let values: Array2<f64> =
        Array2::random_using((10, 5), noise, &mut rng) + &base.insert_axis(Axis(1));

    MeasurementGrid::with_default_labels(values.outer_iter().map(|row| row.to_vec()).collect())
}

#[cfg(test)]
mod test {
    use super::Scenario;
    use crate::grid::estimate_grid;
    use crate::Result;

    #[test]
    fn every_scenario_builds_a_valid_grid() -> Result<()> {
        for scenario in Scenario::ALL {
            let grid = scenario.grid()?;
            let expected = if scenario == Scenario::LargeSeries { (10, 5) } else { (5, 3) };
            assert_eq!(grid.values().dim(), expected, "{}", scenario.description());
        }
        Ok(())
    }

    #[test]
    fn operators_are_columns() -> Result<()> {
        let grid = Scenario::OperatorBias.grid()?;
        let stats = estimate_grid(&grid);
        let bias = stats.per_operator[1].mean - stats.per_operator[0].mean;
        approx::assert_relative_eq!(bias, 0.5, max_relative = 1e-9);
        Ok(())
    }

    #[test]
    fn large_series_is_reproducible() -> Result<()> {
        let first = Scenario::LargeSeries.grid()?;
        let second = Scenario::LargeSeries.grid()?;
        assert_eq!(first, second);

        let stats = estimate_grid(&first);
        for (ii, sample) in stats.per_sample.iter().enumerate() {
            let base = 5.0f64.mul_add(ii as f64, 20.);
            assert!((sample.mean - base).abs() < 0.5, "sample {ii} drifted from {base}");
        }
        Ok(())
    }
}
