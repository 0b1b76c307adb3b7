use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The nominal measuring range of an instrument class, written `low-high`
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct NominalRange {
    pub low: f64,
    pub high: f64,
}

impl FromStr for NominalRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidNominalRange(s.to_owned());
        // A leading sign belongs to the lower bound, so split on the first later `-`
        let split = s
            .char_indices()
            .skip(1)
            .find_map(|(ii, c)| (c == '-').then_some(ii))
            .ok_or_else(invalid)?;
        let low: f64 = s[..split].trim().parse().map_err(|_| invalid())?;
        let high: f64 = s[split + 1..].trim().parse().map_err(|_| invalid())?;
        if !(low.is_finite() && high.is_finite()) || high < low {
            return Err(invalid());
        }
        Ok(Self { low, high })
    }
}

impl TryFrom<String> for NominalRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NominalRange> for String {
    fn from(range: NominalRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for NominalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Reference data for one accuracy class of measuring instrument
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InstrumentClass {
    pub label: String,
    /// Maximum tolerable error, always positive
    pub emt: f64,
    /// Display only, takes no part in the computation
    pub resolution: f64,
    pub range: NominalRange,
}

impl InstrumentClass {
    /// # Errors
    /// Returns [`Error::InvalidTolerance`] unless `emt` is finite and strictly positive.
    pub fn new(label: impl Into<String>, emt: f64, resolution: f64, range: NominalRange) -> Result<Self> {
        let class = Self {
            label: label.into(),
            emt,
            resolution,
            range,
        };
        class.validate()?;
        Ok(class)
    }

    fn validate(&self) -> Result<()> {
        if self.emt.is_finite() && self.emt > 0. {
            Ok(())
        } else {
            Err(Error::InvalidTolerance {
                label: self.label.clone(),
                emt: self.emt,
            })
        }
    }
}

/// The set of instrument classes a laboratory works with
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstrumentCatalog {
    #[serde(rename = "class")]
    classes: Vec<InstrumentClass>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(rename = "class", default)]
    classes: Vec<InstrumentClass>,
}

impl InstrumentCatalog {
    /// # Errors
    /// Returns an error if any class has a non-positive EMT or a label is repeated.
    pub fn new(classes: Vec<InstrumentClass>) -> Result<Self> {
        for (ii, class) in classes.iter().enumerate() {
            class.validate()?;
            if classes[..ii].iter().any(|other| other.label == class.label) {
                return Err(Error::DuplicateInstrumentClass(class.label.clone()));
            }
        }
        Ok(Self { classes })
    }

    /// The four accuracy classes in routine use at the laboratory
    pub fn standard() -> Self {
        let class = |label: &str, emt, resolution, high| InstrumentClass {
            label: label.to_owned(),
            emt,
            resolution,
            range: NominalRange { low: 0., high },
        };
        Self {
            classes: vec![
                class("Classe 0.5", 0.5, 0.01, 100.),
                class("Classe 1.0", 1.0, 0.1, 200.),
                class("Classe 1.5", 1.5, 0.1, 500.),
                class("Classe 2.5", 2.5, 0.5, 1000.),
            ],
        }
    }

    /// Parse a catalogue from `[[class]]` tables
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or a class is invalid.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::new(file.classes)
    }

    /// Read a catalogue from disk
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold a valid catalogue.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), classes = catalog.classes.len(), "loaded instrument catalogue");
        Ok(catalog)
    }

    /// Find a class by its label
    ///
    /// # Errors
    /// Returns [`Error::UnknownInstrumentClass`] if no class carries `label`.
    pub fn lookup(&self, label: &str) -> Result<&InstrumentClass> {
        self.classes
            .iter()
            .find(|class| class.label == label)
            .ok_or_else(|| Error::UnknownInstrumentClass(label.to_owned()))
    }

    pub fn classes(&self) -> &[InstrumentClass] {
        &self.classes
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
