//! Human-readable reports and CSV exchange of measurement data
//!
//! Text reports print statistics to 3 decimals and uncertainties to 4, the precision used on the
//! laboratory's certificates. CSV files follow a fixed layout: the first column holds sample
//! labels and the header row holds operator labels.

use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::assessment::{GridAssessment, UncertaintyBudget};
use crate::calibration::InstrumentClass;
use crate::config::Config;
use crate::grid::{AxisStatistics, MeasurementGrid};
use crate::type_b::TypeBResult;
use crate::{Error, Result};

const RULE: &str = "=====================================";

/// Summary of a validated measurement grid, as issued by the laboratory
pub struct LabReport<'a> {
    pub config: &'a Config,
    pub class: &'a InstrumentClass,
    pub assessment: &'a GridAssessment,
    pub generated: NaiveDateTime,
}

impl fmt::Display for LabReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = &self.config.unit;
        let stats = &self.assessment.statistics;
        let overall = &stats.overall;
        let conformity = &self.assessment.conformity;

        writeln!(f, "METROLOGY REPORT")?;
        writeln!(f, "Date: {}", self.generated.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "CONFIGURATION")?;
        writeln!(f, "- Measurand: {} ({unit})", self.config.measurand)?;
        writeln!(f, "- Class: {}", self.class.label)?;
        writeln!(f, "- EMT: ±{} {unit}", self.class.emt)?;
        writeln!(f, "- Resolution: {} {unit}", self.class.resolution)?;
        writeln!(f, "- Range: {} {unit}", self.class.range)?;
        writeln!(f, "- Temperature: {}°C", self.config.temperature)?;
        writeln!(f, "- Homogeneity: {}", self.config.homogeneity)?;
        writeln!(f)?;
        writeln!(f, "MEASUREMENT PLAN")?;
        writeln!(f, "- Samples: {}", stats.per_sample.len())?;
        writeln!(f, "- Operators: {}", stats.per_operator.len())?;
        writeln!(f, "- Total measurements: {}", overall.count)?;
        writeln!(f)?;
        writeln!(f, "RESULTS")?;
        writeln!(f, "- Mean: {:.3} {unit}", overall.mean)?;
        writeln!(f, "- Standard deviation: {:.3} {unit}", overall.std_dev)?;
        writeln!(f, "- Min: {:.3} {unit}", overall.min)?;
        writeln!(f, "- Max: {:.3} {unit}", overall.max)?;
        writeln!(f, "- Range: {:.3} {unit}", overall.range)?;
        writeln!(f, "- Coefficient of variation: {:.2} %", overall.coefficient_of_variation)?;
        writeln!(f)?;
        writeln!(f, "CONFORMITY")?;
        writeln!(
            f,
            "- {}: standard deviation {:.3}, EMT/3 = {:.3}, EMT/2 = {:.3}",
            conformity.verdict,
            conformity.std_dev,
            conformity.excellent_limit,
            conformity.acceptable_limit
        )
    }
}

/// Breakdown of U = √(U_A² + U_B²) for one measurand
pub struct UncertaintyReport<'a> {
    pub config: &'a Config,
    pub budget: &'a UncertaintyBudget,
}

impl fmt::Display for UncertaintyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.budget.result;

        writeln!(f, "EXPANDED UNCERTAINTY")?;
        writeln!(f, "Measurand: {} ({})", self.config.measurand, self.config.unit)?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "TYPE A")?;
        match &self.budget.type_a {
            Some(estimate) => {
                writeln!(f, "- Measurements: {}", estimate.count)?;
                writeln!(f, "- Mean: {:.4}", estimate.mean)?;
                writeln!(f, "- Range: {:.4}", estimate.range)?;
                writeln!(f, "- Standard deviation: {:.4}", estimate.std_dev)?;
                writeln!(f, "- U_A = {:.4}", estimate.ua)?;
            }
            None => writeln!(f, "- U_A = {:.4} (not evaluated)", result.ua)?,
        }
        writeln!(f)?;
        writeln!(f, "TYPE B")?;
        for contribution in &self.budget.type_b.contributions {
            writeln!(
                f,
                "- U({}) = {:.4} x {:.4} x {:.4} = {:.4}",
                contribution.name,
                contribution.sensitivity.abs(),
                contribution.law_coefficient,
                contribution.range / 2.,
                contribution.standard_uncertainty
            )?;
        }
        writeln!(
            f,
            "- U_B = √(Σ U(xi)²) = √{:.6} = {:.4}",
            self.budget.type_b.sum_of_squares, result.ub
        )?;
        writeln!(f)?;
        writeln!(f, "RESULT")?;
        writeln!(f, "- U_A² = {:.6}", result.ua.powi(2))?;
        writeln!(f, "- U_B² = {:.6}", result.ub.powi(2))?;
        writeln!(
            f,
            "- U = √({:.4}² + {:.4}²) = {:.4}",
            result.ua, result.ub, result.u
        )?;
        for degradation in &self.budget.degradations {
            writeln!(f, "! {} degraded: {}", degradation.component, degradation.reason)?;
        }
        Ok(())
    }
}

/// Write every measurement of `grid` in the exchange layout
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_grid_csv<W: Write>(grid: &MeasurementGrid, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(std::iter::once("").chain(grid.operators().iter().map(String::as_str)))?;
    for (label, row) in grid.samples().iter().zip(grid.values().rows()) {
        wtr.write_record(std::iter::once(label.clone()).chain(row.iter().map(f64::to_string)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write an empty grid for `num_samples` by `num_operators` measurements, to be filled in
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_template_csv<W: Write>(num_samples: usize, num_operators: usize, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let operators = crate::grid::default_labels("Operator", num_operators);
    wtr.write_record(std::iter::once("").chain(operators.iter().map(String::as_str)))?;
    for sample in crate::grid::default_labels("Sample", num_samples) {
        wtr.write_record(std::iter::once(sample).chain(vec![String::new(); num_operators]))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write per-sample or per-operator statistics, `heading` names the label column
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_axis_statistics_csv<W: Write>(
    heading: &str,
    statistics: &[AxisStatistics],
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([heading, "mean", "std_dev", "min", "max", "range"])?;
    for stats in statistics {
        wtr.write_record([
            stats.label.clone(),
            format!("{:.3}", stats.mean),
            format!("{:.3}", stats.std_dev),
            format!("{:.3}", stats.min),
            format!("{:.3}", stats.max),
            format!("{:.3}", stats.range),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

const CONTRIBUTION_HEADERS: [&str; 9] = [
    "name",
    "min",
    "max",
    "range",
    "law",
    "law_coefficient",
    "sensitivity",
    "standard_uncertainty",
    "variance",
];

/// Write the Type-B table, one row per declared parameter
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_contributions_csv<W: Write>(type_b: &TypeBResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    // serialize only emits the header alongside the first record
    if type_b.contributions.is_empty() {
        wtr.write_record(CONTRIBUTION_HEADERS)?;
    }
    for contribution in &type_b.contributions {
        wtr.serialize(contribution)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a grid in the exchange layout
///
/// Empty cells are reported as [`Error::MissingCell`], unparseable ones as [`Error::InvalidCell`].
///
/// # Errors
/// Returns an error on malformed CSV or any cell which is not a finite number.
pub fn read_grid_csv<R: Read>(reader: R) -> Result<MeasurementGrid> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let operators: Vec<String> = rdr.headers()?.iter().skip(1).map(str::to_owned).collect();

    let mut samples = vec![];
    let mut rows = vec![];
    for result in rdr.records() {
        let record = result?;
        let sample = record.get(0).unwrap_or_default().to_owned();
        let cells = record
            .iter()
            .skip(1)
            .zip(&operators)
            .map(|(cell, operator)| parse_cell(cell, &sample, operator))
            .collect::<Result<Vec<_>>>()?;
        samples.push(sample);
        rows.push(cells);
    }

    MeasurementGrid::from_optional(samples, operators, rows)
}

/// Read a grid from a CSV file in the exchange layout
///
/// # Errors
/// As [`read_grid_csv`], plus IO errors.
pub fn read_grid_file(path: &Path) -> Result<MeasurementGrid> {
    let file = fs::File::open(path)?;
    let grid = read_grid_csv(file)?;
    tracing::info!(
        path = %path.display(),
        samples = grid.samples().len(),
        operators = grid.operators().len(),
        "read measurement grid"
    );
    Ok(grid)
}

fn parse_cell(cell: &str, sample: &str, operator: &str) -> Result<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse().map(Some).map_err(|_| Error::InvalidCell {
        sample: sample.to_owned(),
        operator: operator.to_owned(),
        value: cell.to_owned(),
    })
}
