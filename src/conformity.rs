use std::fmt;

use serde::Serialize;

/// Classification of an observed dispersion against an instrument-class EMT
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConformityVerdict {
    /// σ ≤ EMT / 3
    Excellent,
    /// EMT / 3 < σ ≤ EMT / 2
    Acceptable,
    /// σ > EMT / 2
    NonConforming,
}

impl ConformityVerdict {
    pub const fn is_conforming(self) -> bool {
        !matches!(self, Self::NonConforming)
    }
}

impl fmt::Display for ConformityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Acceptable => "Acceptable",
            Self::NonConforming => "Non-conforming",
        };
        f.write_str(label)
    }
}

/// Classify `std_dev` against the maximum tolerable error `emt`
///
/// Both limits are inclusive. `emt` is assumed positive, which the instrument catalogue enforces.
///
/// # Examples
///
/// ```
/// use lab_uncertainty::conformity::{evaluate, ConformityVerdict};
///
/// assert_eq!(evaluate(0.30, 1.0), ConformityVerdict::Excellent);
/// assert_eq!(evaluate(0.45, 1.0), ConformityVerdict::Acceptable);
/// assert_eq!(evaluate(0.51, 1.0), ConformityVerdict::NonConforming);
/// ```
pub fn evaluate(std_dev: f64, emt: f64) -> ConformityVerdict {
    if std_dev <= emt / 3. {
        ConformityVerdict::Excellent
    } else if std_dev <= emt / 2. {
        ConformityVerdict::Acceptable
    } else {
        ConformityVerdict::NonConforming
    }
}

/// A verdict together with the figures it was decided on
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConformityAssessment {
    pub std_dev: f64,
    pub emt: f64,
    pub excellent_limit: f64,
    pub acceptable_limit: f64,
    pub verdict: ConformityVerdict,
}

impl ConformityAssessment {
    pub fn new(std_dev: f64, emt: f64) -> Self {
        let verdict = evaluate(std_dev, emt);
        tracing::debug!(std_dev, emt, %verdict, "evaluated conformity");
        Self {
            std_dev,
            emt,
            excellent_limit: emt / 3.,
            acceptable_limit: emt / 2.,
            verdict,
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{evaluate, ConformityAssessment, ConformityVerdict};

    #[test]
    fn limits_are_inclusive() {
        let emt = 1.5;
        assert_eq!(evaluate(emt / 3., emt), ConformityVerdict::Excellent);
        assert_eq!(evaluate(emt / 2., emt), ConformityVerdict::Acceptable);
        assert_eq!(evaluate(emt / 2. + 1e-9, emt), ConformityVerdict::NonConforming);
    }

    #[test]
    fn zero_dispersion_is_excellent() {
        assert_eq!(evaluate(0., 0.5), ConformityVerdict::Excellent);
    }

    #[test]
    fn assessment_reports_limits() {
        let assessment = ConformityAssessment::new(0.30, 1.0);
        assert_eq!(assessment.verdict, ConformityVerdict::Excellent);
        approx::assert_relative_eq!(assessment.excellent_limit, 1. / 3.);
        approx::assert_relative_eq!(assessment.acceptable_limit, 0.5);
        assert!(assessment.verdict.is_conforming());
    }

    proptest! {
        #[test]
        fn verdict_worsens_monotonically(emt in 0.01..10.0f64, a in 0.0..10.0f64, b in 0.0..10.0f64) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let rank = |verdict: ConformityVerdict| match verdict {
                ConformityVerdict::Excellent => 0,
                ConformityVerdict::Acceptable => 1,
                ConformityVerdict::NonConforming => 2,
            };
            prop_assert!(rank(evaluate(low, emt)) <= rank(evaluate(high, emt)));
        }
    }
}
