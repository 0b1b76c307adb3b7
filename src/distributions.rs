use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String")]
/// The probability law assumed for a declared parameter
///
/// Each law carries a fixed coefficient which scales the half-width of the parameter's declared
/// interval into its standard uncertainty
///
/// $$
///     u\left(x_i\right) = c_i \, k_{law} \, \frac{x_{max} - x_{min}}{2}
/// $$
pub enum ProbabilityLaw {
    Normal,
    Rectangular,
    Triangular,
    #[serde(rename = "Uniform-U")]
    UniformU,
    Arcsine,
}

impl ProbabilityLaw {
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Rectangular,
        Self::Triangular,
        Self::UniformU,
        Self::Arcsine,
    ];

    /// The fixed law coefficient $k_{law}$
    pub fn coefficient(self) -> f64 {
        match self {
            Self::Normal => 2.0,
            Self::Rectangular | Self::UniformU => 3f64.sqrt(),
            Self::Triangular => 6f64.sqrt(),
            Self::Arcsine => std::f64::consts::SQRT_2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Rectangular => "Rectangular",
            Self::Triangular => "Triangular",
            Self::UniformU => "Uniform-U",
            Self::Arcsine => "Arcsine",
        }
    }
}

impl TryFrom<String> for ProbabilityLaw {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ProbabilityLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbabilityLaw {
    type Err = Error;

    /// Parse a law from its English name or the laboratory's French label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "normale" => Ok(Self::Normal),
            "rectangular" | "rectangulaire" => Ok(Self::Rectangular),
            "triangular" | "triangulaire" => Ok(Self::Triangular),
            "uniform-u" | "uniform u" | "u (uniforme)" => Ok(Self::UniformU),
            "arcsine" | "arcsinus" => Ok(Self::Arcsine),
            _ => Err(Error::UnknownProbabilityLaw(s.to_owned())),
        }
    }
}
