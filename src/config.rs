use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::{InstrumentCatalog, InstrumentClass};
use crate::dispersion::Dependence;
use crate::type_b::Parameter;
use crate::Result;

/// Observed homogeneity of the measured samples, recorded for the report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Homogeneity {
    #[default]
    #[serde(alias = "Excellente")]
    Excellent,
    #[serde(alias = "Bonne")]
    Good,
    Acceptable,
}

impl fmt::Display for Homogeneity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
        };
        f.write_str(label)
    }
}

/// Settings for one measurement session
///
/// Every field has a default, so a session file only needs the entries that differ.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Name of the measured quantity
    pub measurand: String,
    pub unit: String,
    /// Label of the instrument class the measurements are judged against
    pub instrument_class: String,
    /// Ambient temperature in °C during the session
    pub temperature: f64,
    pub homogeneity: Homogeneity,
    /// How repeated measurements on the Type-A path relate to one another
    pub dependence: Dependence,
    /// Declared Type-B parameters
    #[serde(rename = "parameter")]
    pub parameters: Vec<Parameter>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            measurand: "Température".to_owned(),
            unit: "°C".to_owned(),
            instrument_class: "Classe 0.5".to_owned(),
            temperature: 20.,
            homogeneity: Homogeneity::default(),
            dependence: Dependence::default(),
            parameters: vec![],
        }
    }
}

impl Config {
    /// # Errors
    /// Returns an error if the TOML is malformed or a declared parameter is not finite.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        for parameter in &config.parameters {
            parameter.validate()?;
        }
        if !(15.0..=30.0).contains(&config.temperature) {
            tracing::warn!(
                temperature = config.temperature,
                "ambient temperature outside the 15-30 °C working range"
            );
        }
        Ok(config)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid session configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), measurand = %config.measurand, "loaded session configuration");
        Ok(config)
    }

    /// Resolve the configured instrument class in `catalog`
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownInstrumentClass`] if the label is not catalogued.
    pub fn instrument<'a>(&self, catalog: &'a InstrumentCatalog) -> Result<&'a InstrumentClass> {
        catalog.lookup(&self.instrument_class)
    }
}
