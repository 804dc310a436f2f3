use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

pub mod array;
pub mod cache;
pub mod coefficients;
pub mod metric;
pub mod nonzero;
pub mod sweep;

pub use array::Array4;

/// Multiplicative perturbation applied to one initial condition (+1%).
pub const PERTURBATION_RATE: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Amplitude,
    Duration,
    Integral,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [Self::Amplitude, Self::Duration, Self::Integral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amplitude => "amplitude",
            Self::Duration => "duration",
            Self::Integral => "integral",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amplitude" => Ok(Self::Amplitude),
            "duration" => Ok(Self::Duration),
            "integral" => Ok(Self::Integral),
            other => bail!(
                "unknown metric '{}': available metrics are amplitude, duration, integral",
                other
            ),
        }
    }
}
