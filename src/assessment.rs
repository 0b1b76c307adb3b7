use std::fmt;

use serde::Serialize;

use crate::calibration::InstrumentClass;
use crate::conformity::ConformityAssessment;
use crate::dispersion::{self, Dependence, MeasurementSeries, TypeAEstimate};
use crate::grid::{self, GridStatistics, MeasurementGrid};
use crate::margin::UncertaintyResult;
use crate::type_b::{self, Parameter, TypeBResult};

/// The stage of the pipeline that could not produce a figure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Component {
    TypeA,
    TypeB,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeA => f.write_str("type A"),
            Self::TypeB => f.write_str("type B"),
        }
    }
}

/// A component replaced by zero so that the remaining figures stay computable
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub component: Component,
    pub reason: String,
}

/// Type-A, Type-B and combined uncertainty of one measurand
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UncertaintyBudget {
    /// `None` when the series could not be evaluated, U_A is then zero
    pub type_a: Option<TypeAEstimate>,
    pub type_b: TypeBResult,
    pub result: UncertaintyResult,
    pub degradations: Vec<Degradation>,
}

impl UncertaintyBudget {
    /// Evaluate both components and combine them
    ///
    /// A series that cannot be evaluated contributes U_A = 0 and a parameter that fails validation
    /// contributes nothing to U_B. Each such fallback is recorded in `degradations`.
    pub fn compute(
        series: &MeasurementSeries,
        dependence: Dependence,
        parameters: &[Parameter],
    ) -> Self {
        let mut degradations = vec![];

        let type_a = match dispersion::estimate(series, dependence) {
            Ok(estimate) => Some(estimate),
            Err(err) => {
                tracing::warn!(%err, "type A uncertainty unavailable, using zero");
                degradations.push(Degradation {
                    component: Component::TypeA,
                    reason: err.to_string(),
                });
                None
            }
        };

        let mut valid = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            match parameter.validate() {
                Ok(()) => valid.push(parameter.clone()),
                Err(err) => {
                    tracing::warn!(%err, "excluding invalid type B parameter");
                    degradations.push(Degradation {
                        component: Component::TypeB,
                        reason: err.to_string(),
                    });
                }
            }
        }
        let type_b = type_b::combine(&valid);

        let ua = type_a.as_ref().map_or(0., |estimate| estimate.ua);
        let result = UncertaintyResult::new(ua, type_b.ub);
        tracing::debug!(ua = result.ua, ub = result.ub, u = result.u, "computed uncertainty budget");

        Self {
            type_a,
            type_b,
            result,
            degradations,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Dispersion statistics of a samples-by-operators grid judged against an instrument class
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridAssessment {
    pub statistics: GridStatistics,
    pub conformity: ConformityAssessment,
}

impl GridAssessment {
    /// Conformity is decided on the population standard deviation of the whole grid
    pub fn compute(grid: &MeasurementGrid, class: &InstrumentClass) -> Self {
        let statistics = grid::estimate_grid(grid);
        let conformity = ConformityAssessment::new(statistics.overall.std_dev, class.emt);
        tracing::info!(
            class = %class.label,
            measurements = statistics.overall.count,
            verdict = %conformity.verdict,
            "assessed measurement grid"
        );
        Self {
            statistics,
            conformity,
        }
    }
}
