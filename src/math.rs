use itertools::{Itertools, MinMaxResult};
use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive};

/// Arithmetic mean of `values`, `None` for an empty slice
///
/// # Examples
///
/// ```
/// use lab_uncertainty::math::mean;
///
/// let values: Vec<f64> = vec![1., 2., 3., 6.];
/// assert_eq!(mean(&values), Some(3.));
/// assert_eq!(mean::<f64>(&[]), None);
/// ```
pub fn mean<T: Float + FromPrimitive>(values: &[T]) -> Option<T> {
    ArrayView1::from(values).mean()
}

/// The smallest and largest element of `values`
///
/// Inputs are expected to be finite. With `NaN` present the ordering is not meaningful.
///
/// # Examples
///
/// ```
/// use lab_uncertainty::math::extremes;
///
/// assert_eq!(extremes(&[3., -1., 7., 2.]), Some((-1., 7.)));
/// assert_eq!(extremes(&[4.]), Some((4., 4.)));
/// assert_eq!(extremes::<f64>(&[]), None);
/// ```
pub fn extremes<T: Float>(values: &[T]) -> Option<(T, T)> {
    match values.iter().copied().minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(value) => Some((value, value)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// Spread between the largest and smallest element of `values`
pub fn range<T: Float>(values: &[T]) -> Option<T> {
    extremes(values).map(|(min, max)| max - min)
}

/// Population standard deviation, normalised by `n`
///
/// Returns `None` for an empty slice.
pub fn population_std_dev<T: Float + FromPrimitive>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    Some(ArrayView1::from(values).std(T::zero()))
}

/// Sample standard deviation with Bessel's correction, normalised by `n - 1`
///
/// Returns `None` when fewer than two values are supplied.
///
/// # Examples
///
/// ```
/// use lab_uncertainty::math::sample_std_dev;
///
/// let values: Vec<f64> = vec![2., 4., 4., 4., 5., 5., 7., 9.];
/// let expected = (32f64 / 7.).sqrt();
/// assert!((sample_std_dev(&values).unwrap() - expected).abs() < 1e-12);
/// ```
pub fn sample_std_dev<T: Float + FromPrimitive>(values: &[T]) -> Option<T> {
    if values.len() < 2 {
        return None;
    }
    Some(ArrayView1::from(values).std(T::one()))
}

/// Combine independent terms in quadrature, $\sqrt{\sum_i x_i^2}$
///
/// An empty set of terms sums to zero.
///
/// # Examples
///
/// ```
/// use lab_uncertainty::math::root_sum_of_squares;
///
/// assert_eq!(root_sum_of_squares([3., 4.]), 5.);
/// assert_eq!(root_sum_of_squares(Vec::<f64>::new()), 0.);
/// ```
pub fn root_sum_of_squares<T: Float, I: IntoIterator<Item = T>>(terms: I) -> T {
    terms
        .into_iter()
        .fold(T::zero(), |acc, term| term.mul_add(term, acc))
        .sqrt()
}

/// Relative dispersion in percent, `std_dev / mean * 100`
///
/// A zero mean yields zero rather than an infinite coefficient.
pub fn coefficient_of_variation<T: Float + FromPrimitive>(std_dev: T, mean: T) -> T {
    if mean == T::zero() {
        return T::zero();
    }
    let hundred = T::from_f64(100.).expect("100 must fit in `T`");
    std_dev / mean * hundred
}
