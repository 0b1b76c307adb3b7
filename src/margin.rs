use serde::Serialize;

/// Combine the Type-A and Type-B terms in quadrature, $U = \sqrt{U_A^2 + U_B^2}$
///
/// # Examples
///
/// ```
/// use lab_uncertainty::margin::combine;
///
/// assert_eq!(combine(3., 4.), 5.);
/// assert_eq!(combine(0., 0.), 0.);
/// ```
pub fn combine(ua: f64, ub: f64) -> f64 {
    ua.hypot(ub)
}

/// The expanded uncertainty of a measurand with its two components
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct UncertaintyResult {
    pub ua: f64,
    pub ub: f64,
    pub u: f64,
}

impl UncertaintyResult {
    pub fn new(ua: f64, ub: f64) -> Self {
        Self {
            ua,
            ub,
            u: combine(ua, ub),
        }
    }
}
