use serde::{Deserialize, Serialize};

use crate::distributions::ProbabilityLaw;
use crate::math::root_sum_of_squares;
use crate::{Error, Result};

/// A declared influence quantity $X_i$ of the measurand $f(X_1, X_2, \dots)$
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Parameter {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub law: ProbabilityLaw,
    /// Partial derivative of the measurand with respect to this parameter
    #[serde(default = "unit_sensitivity")]
    pub sensitivity: f64,
}

const fn unit_sensitivity() -> f64 {
    1.0
}

impl Parameter {
    /// # Errors
    /// Returns [`Error::NonFiniteInput`] if a bound or the sensitivity is not finite.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        law: ProbabilityLaw,
        sensitivity: f64,
    ) -> Result<Self> {
        let parameter = Self {
            name: name.into(),
            min,
            max,
            law,
            sensitivity,
        };
        parameter.validate()?;
        Ok(parameter)
    }

    /// Check the numeric fields, for parameters built from deserialised input
    ///
    /// # Errors
    /// Returns [`Error::NonFiniteInput`] naming the field position (min, max, sensitivity).
    pub fn validate(&self) -> Result<()> {
        [self.min, self.max, self.sensitivity]
            .into_iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite())
            .map_or(Ok(()), |(index, value)| {
                Err(Error::non_finite(format!("parameter '{}'", self.name), index, value))
            })
    }

    /// Width of the declared interval
    pub fn range(&self) -> f64 {
        (self.max - self.min).abs()
    }

    /// Standard uncertainty $u(x_i) = |c_i| \, k_{law} \, (x_{max} - x_{min}) / 2$
    pub fn standard_uncertainty(&self) -> f64 {
        self.sensitivity.abs() * self.law.coefficient() * self.range() / 2.
    }
}

/// The contribution of a single parameter to U_B
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Contribution {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub law: ProbabilityLaw,
    pub law_coefficient: f64,
    pub sensitivity: f64,
    /// $u(x_i)$
    pub standard_uncertainty: f64,
    /// $u(x_i)^2$
    pub variance: f64,
}

impl From<&Parameter> for Contribution {
    fn from(parameter: &Parameter) -> Self {
        let standard_uncertainty = parameter.standard_uncertainty();
        Self {
            name: parameter.name.clone(),
            min: parameter.min,
            max: parameter.max,
            range: parameter.range(),
            law: parameter.law,
            law_coefficient: parameter.law.coefficient(),
            sensitivity: parameter.sensitivity,
            standard_uncertainty,
            variance: standard_uncertainty.powi(2),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TypeBResult {
    /// One entry per parameter, in input order
    pub contributions: Vec<Contribution>,
    /// $\sum_i u(x_i)^2$
    pub sum_of_squares: f64,
    pub ub: f64,
}

/// Combine the declared parameters in quadrature into U_B
///
/// An empty parameter list is valid and gives U_B = 0.
pub fn combine(parameters: &[Parameter]) -> TypeBResult {
    let contributions: Vec<Contribution> = parameters.iter().map(Contribution::from).collect();
    let sum_of_squares = contributions.iter().map(|c| c.variance).sum();
    let ub = root_sum_of_squares(contributions.iter().map(|c| c.standard_uncertainty));

    tracing::debug!(parameters = contributions.len(), ub, "combined type B uncertainty");

    TypeBResult {
        contributions,
        sum_of_squares,
        ub,
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{combine, Parameter};
    use crate::distributions::ProbabilityLaw;
    use crate::{Error, Result};

    fn law() -> impl Strategy<Value = ProbabilityLaw> {
        prop::sample::select(ProbabilityLaw::ALL.to_vec())
    }

    #[test]
    fn rectangular_unit_interval_matches_reference_value() -> Result<()> {
        let parameter = Parameter::new("X1", 0., 1., ProbabilityLaw::Rectangular, 1.)?;
        approx::assert_relative_eq!(parameter.standard_uncertainty(), 0.866_025_4, max_relative = 1e-7);

        let second = Parameter::new("X2", 0., 1., ProbabilityLaw::Rectangular, 1.)?;
        let result = combine(&[parameter, second]);

        assert_eq!(result.contributions.len(), 2);
        approx::assert_relative_eq!(result.sum_of_squares, 1.5, max_relative = 1e-12);
        approx::assert_relative_eq!(result.ub, 1.224_744_9, max_relative = 1e-7);
        Ok(())
    }

    #[test]
    fn empty_parameter_set_has_zero_ub() {
        let result = combine(&[]);
        assert!(result.contributions.is_empty());
        assert_eq!(result.ub, 0.);
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let err = Parameter::new("X1", 0., f64::NAN, ProbabilityLaw::Normal, 1.).unwrap_err();
        assert!(matches!(err, Error::NonFiniteInput { index: 1, .. }));

        let err = Parameter::new("X1", 0., 1., ProbabilityLaw::Normal, f64::INFINITY).unwrap_err();
        assert!(matches!(err, Error::NonFiniteInput { index: 2, .. }));
    }

    #[test]
    fn parameters_deserialize_with_default_sensitivity() {
        let parameter: Parameter =
            toml::from_str("name = \"Resolution\"\nmin = -0.05\nmax = 0.05\nlaw = \"Rectangulaire\"")
                .unwrap();
        assert_eq!(parameter.law, ProbabilityLaw::Rectangular);
        approx::assert_relative_eq!(parameter.sensitivity, 1.);
        approx::assert_relative_eq!(parameter.range(), 0.1, max_relative = 1e-12);
    }

    proptest! {
        #[test]
        fn doubling_sensitivity_doubles_standard_uncertainty(
            min in -1e3..1e3f64,
            width in 0.0..1e3f64,
            sensitivity in -1e2..1e2f64,
            law in law(),
        ) {
            let single = Parameter::new("X", min, min + width, law, sensitivity).unwrap();
            let double = Parameter::new("X", min, min + width, law, 2. * sensitivity).unwrap();

            prop_assert!(single.standard_uncertainty() >= 0.);
            approx::assert_relative_eq!(
                double.standard_uncertainty(),
                2. * single.standard_uncertainty(),
                max_relative = 1e-12
            );
        }

        #[test]
        fn doubling_range_doubles_standard_uncertainty(
            half_width in 0.0..1e3f64,
            sensitivity in -1e2..1e2f64,
            law in law(),
        ) {
            let single = Parameter::new("X", -half_width, half_width, law, sensitivity).unwrap();
            let double =
                Parameter::new("X", -2. * half_width, 2. * half_width, law, sensitivity).unwrap();

            approx::assert_relative_eq!(double.range(), 2. * single.range(), max_relative = 1e-12);
            approx::assert_relative_eq!(
                double.standard_uncertainty(),
                2. * single.standard_uncertainty(),
                max_relative = 1e-12
            );
        }

        #[test]
        fn reversed_bounds_give_the_same_standard_uncertainty(
            min in -1e3..1e3f64,
            width in 0.0..1e3f64,
            law in law(),
        ) {
            let forward = Parameter::new("X", min, min + width, law, 1.).unwrap();
            let reversed = Parameter::new("X", min + width, min, law, 1.).unwrap();
            prop_assert_eq!(forward.standard_uncertainty(), reversed.standard_uncertainty());
        }

        #[test]
        fn widening_a_parameter_never_decreases_ub(
            widths in prop::collection::vec(0.0..1e2f64, 1..10),
            extra in 0.0..1e2f64,
            law in law(),
        ) {
            let parameters: Vec<Parameter> = widths
                .iter()
                .enumerate()
                .map(|(ii, width)| Parameter::new(format!("X{ii}"), 0., *width, law, 1.).unwrap())
                .collect();
            let mut widened = parameters.clone();
            widened[0].max += extra;

            prop_assert!(combine(&widened).ub >= combine(&parameters).ub);
        }
    }
}
