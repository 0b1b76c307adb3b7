use thiserror::Error;

/// Errors raised by the uncertainty engine and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    #[error("insufficient data: at least {required} measurements are needed, found {found}")]
    InsufficientData { required: usize, found: usize },

    #[error("non-finite value {value} in {context} at position {index}")]
    NonFiniteInput {
        context: String,
        index: usize,
        value: f64,
    },

    #[error("unknown probability law: {0}")]
    UnknownProbabilityLaw(String),

    #[error("measurement grid is empty")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("missing measurement for sample '{sample}', operator '{operator}'")]
    MissingCell { sample: String, operator: String },

    #[error("invalid measurement '{value}' for sample '{sample}', operator '{operator}'")]
    InvalidCell {
        sample: String,
        operator: String,
        value: String,
    },

    #[error("{axis} labels do not match the grid: {labels} labels for {cells} entries")]
    LabelMismatch {
        axis: &'static str,
        labels: usize,
        cells: usize,
    },

    #[error("unknown instrument class: {0}")]
    UnknownInstrumentClass(String),

    #[error("instrument class '{label}' has a non-positive EMT ({emt})")]
    InvalidTolerance { label: String, emt: f64 },

    #[error("instrument class '{0}' is declared more than once")]
    DuplicateInstrumentClass(String),

    #[error("invalid nominal range '{0}', expected '<low>-<high>'")]
    InvalidNominalRange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn non_finite(context: impl Into<String>, index: usize, value: f64) -> Self {
        Self::NonFiniteInput {
            context: context.into(),
            index,
            value,
        }
    }
}

/// Reject the first non-finite element of `values`
pub(crate) fn ensure_finite(context: &str, values: &[f64]) -> crate::Result<()> {
    values
        .iter()
        .position(|value| !value.is_finite())
        .map_or(Ok(()), |index| {
            Err(Error::non_finite(context, index, values[index]))
        })
}

#[cfg(test)]
mod test {
    use super::{ensure_finite, Error};

    #[test]
    fn finite_values_are_accepted() {
        assert!(ensure_finite("series", &[1.0, -2.5, 0.0]).is_ok());
    }

    #[test]
    fn first_non_finite_value_is_reported() {
        let err = ensure_finite("series", &[1.0, f64::NAN, f64::INFINITY]).unwrap_err();
        match err {
            Error::NonFiniteInput { context, index, .. } => {
                assert_eq!(context, "series");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
