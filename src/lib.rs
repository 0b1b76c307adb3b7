#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

pub mod assessment;
pub mod calibration;
pub mod config;
pub mod conformity;
pub mod dispersion;
pub mod distributions;
mod error;
pub mod grid;
pub mod margin;
pub mod math;
pub mod report;
pub mod scenarios;
pub mod type_b;

pub use error::Error;

pub type Result<T> = ::std::result::Result<T, Error>;
