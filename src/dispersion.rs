use serde::{Deserialize, Serialize};

use crate::error::ensure_finite;
use crate::math;
use crate::{Error, Result};

/// Below this many measurements the standard deviation is estimated from the range
pub const RANGE_METHOD_LIMIT: usize = 20;

/// Coefficient used when `n` misses the d2 table. Unreachable for `n` in `2..RANGE_METHOD_LIMIT`.
const D2_FALLBACK: f64 = 1.0;

/// Bias-correction constants d2(n) relating the expected range of `n` normal observations to
/// their standard deviation, for `n = 2..=19`.
const D2_TABLE: [(usize, f64); 18] = [
    (2, 1.128),
    (3, 1.693),
    (4, 2.059),
    (5, 2.326),
    (6, 2.534),
    (7, 2.704),
    (8, 2.847),
    (9, 2.970),
    (10, 3.078),
    (11, 3.173),
    (12, 3.258),
    (13, 3.336),
    (14, 3.407),
    (15, 3.472),
    (16, 3.532),
    (17, 3.588),
    (18, 3.640),
    (19, 3.689),
];

/// Look up d2 for a series of `n` measurements
pub fn d2(n: usize) -> Option<f64> {
    D2_TABLE
        .iter()
        .find_map(|&(size, coefficient)| (size == n).then_some(coefficient))
}

/// An ordered series of repeated measurements of one measurand
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementSeries(Vec<f64>);

impl MeasurementSeries {
    /// Wrap `values`, rejecting any non-finite element
    ///
    /// # Errors
    /// Returns [`Error::NonFiniteInput`] naming the first offending position.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        ensure_finite("measurement series", &values)?;
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<f64>> for MeasurementSeries {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

/// Whether the measurements are repeats on the same unit or distinct realisations
///
/// Selects the divisor applied to the standard deviation when forming U_A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dependence {
    /// Repeated on the same unit under identical conditions: U_A = σ
    Dependent,
    /// Distinct realisations: U_A = σ / √n
    #[default]
    Independent,
}

/// How σ was obtained for a series
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum DispersionMethod {
    /// σ = range / d2, used for fewer than [`RANGE_METHOD_LIMIT`] measurements
    RangeOverD2 { d2: f64 },
    /// Bessel-corrected sample standard deviation
    SampleStandardDeviation,
}

/// Type-A statistics of a measurement series
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TypeAEstimate {
    pub count: usize,
    pub mean: f64,
    pub range: f64,
    pub std_dev: f64,
    pub method: DispersionMethod,
    pub dependence: Dependence,
    /// Relative dispersion in percent
    pub coefficient_of_variation: f64,
    /// Type-A standard uncertainty
    pub ua: f64,
}

/// Estimate the dispersion and Type-A uncertainty of `series`
///
/// For fewer than [`RANGE_METHOD_LIMIT`] measurements σ is `range / d2(n)`, otherwise it is the
/// sample standard deviation. U_A is σ for dependent measurements and σ/√n for independent ones.
///
/// # Errors
/// Returns [`Error::InsufficientData`] when the series holds fewer than two measurements, as the
/// dispersion is undefined.
#[allow(clippy::cast_precision_loss)]
pub fn estimate(series: &MeasurementSeries, dependence: Dependence) -> Result<TypeAEstimate> {
    let values = series.values();
    let count = values.len();
    let insufficient = Error::InsufficientData {
        required: 2,
        found: count,
    };
    if count < 2 {
        return Err(insufficient);
    }
    let (Some(mean), Some(range)) = (math::mean(values), math::range(values)) else {
        return Err(insufficient);
    };

    let (std_dev, method) = if count < RANGE_METHOD_LIMIT {
        let d2 = d2(count).unwrap_or_else(|| {
            tracing::warn!(count, "no d2 coefficient tabulated, falling back to {D2_FALLBACK}");
            D2_FALLBACK
        });
        (range / d2, DispersionMethod::RangeOverD2 { d2 })
    } else {
        let std_dev = math::sample_std_dev(values).ok_or(insufficient)?;
        (std_dev, DispersionMethod::SampleStandardDeviation)
    };

    let ua = match dependence {
        Dependence::Dependent => std_dev,
        Dependence::Independent => std_dev / (count as f64).sqrt(),
    };

    tracing::debug!(count, mean, range, std_dev, ua, ?method, "estimated type A uncertainty");

    Ok(TypeAEstimate {
        count,
        mean,
        range,
        std_dev,
        method,
        dependence,
        coefficient_of_variation: math::coefficient_of_variation(std_dev, mean),
        ua,
    })
}

#[cfg(test)]
mod test {
    use ndarray::Array;
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use proptest::prelude::*;
    use rand_isaac::Isaac64Rng;

    use super::{d2, estimate, Dependence, DispersionMethod, MeasurementSeries};
    use crate::{math, Error, Result};

    const SCENARIO: [f64; 5] = [20.15, 25.32, 30.48, 35.62, 40.78];

    #[test]
    fn d2_table_covers_small_samples_only() {
        for n in 2..20 {
            assert!(d2(n).is_some(), "d2({n}) should be tabulated");
        }
        assert_eq!(d2(0), None);
        assert_eq!(d2(1), None);
        assert_eq!(d2(20), None);
        assert_eq!(d2(5), Some(2.326));
        assert_eq!(d2(19), Some(3.689));
    }

    #[test]
    fn dependent_small_series_uses_range_over_d2() -> Result<()> {
        let series = MeasurementSeries::new(SCENARIO.to_vec())?;
        let estimate = estimate(&series, Dependence::Dependent)?;

        assert_eq!(estimate.count, 5);
        assert_eq!(estimate.method, DispersionMethod::RangeOverD2 { d2: 2.326 });
        approx::assert_relative_eq!(estimate.range, 20.63, max_relative = 1e-12);
        approx::assert_relative_eq!(estimate.std_dev, 8.869_303_525, max_relative = 1e-9);
        approx::assert_relative_eq!(estimate.ua, estimate.std_dev);
        approx::assert_relative_eq!(estimate.mean, 30.47, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn independent_series_divides_by_root_n() -> Result<()> {
        let series = MeasurementSeries::new(SCENARIO.to_vec())?;
        let estimate = estimate(&series, Dependence::Independent)?;

        approx::assert_relative_eq!(estimate.ua, 3.966_473_119, max_relative = 1e-9);
        approx::assert_relative_eq!(estimate.ua, estimate.std_dev / 5f64.sqrt());
        Ok(())
    }

    #[test]
    fn large_series_uses_bessel_corrected_deviation() -> Result<()> {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let series = MeasurementSeries::new(values.clone())?;
        let estimate = estimate(&series, Dependence::Dependent)?;

        assert_eq!(estimate.method, DispersionMethod::SampleStandardDeviation);
        approx::assert_relative_eq!(estimate.std_dev, 5.916_079_783, max_relative = 1e-9);
        approx::assert_relative_eq!(estimate.std_dev, math::sample_std_dev(&values).unwrap());
        Ok(())
    }

    #[test]
    fn fewer_than_two_measurements_are_insufficient() {
        for values in [vec![], vec![12.5]] {
            let series = MeasurementSeries::new(values).unwrap();
            let err = estimate(&series, Dependence::Independent).unwrap_err();
            assert!(matches!(err, Error::InsufficientData { required: 2, .. }));
        }
    }

    #[test]
    fn non_finite_measurements_are_rejected() {
        let err = MeasurementSeries::new(vec![1.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteInput { index: 1, .. }));
    }

    #[test]
    fn every_tabulated_size_uses_its_own_coefficient() -> Result<()> {
        let seed = 40;
        let mut rng = Isaac64Rng::seed_from_u64(seed);
        for n in 2..20 {
            let values = Array::random_using(n, Uniform::new(10., 20.), &mut rng).to_vec();
            let range = math::range(&values).unwrap();
            let estimate = estimate(&MeasurementSeries::new(values)?, Dependence::Dependent)?;
            approx::assert_relative_eq!(estimate.std_dev, range / d2(n).unwrap());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn independent_uncertainty_never_exceeds_dependent(
            values in prop::collection::vec(-1e3..1e3f64, 2..40)
        ) {
            let series = MeasurementSeries::new(values).unwrap();
            let dependent = estimate(&series, Dependence::Dependent).unwrap();
            let independent = estimate(&series, Dependence::Independent).unwrap();

            prop_assert!(independent.ua <= dependent.ua);
            prop_assert_eq!(dependent.ua, dependent.std_dev);
        }
    }
}
