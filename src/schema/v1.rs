use serde::{Deserialize, Serialize};

use crate::analysis::MetricKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitSensV1 {
    pub tool: ToolInfo,
    pub model: ModelInfo,
    pub analysis: AnalysisInfo,
    pub coefficients: Vec<CoefficientSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub species: Vec<String>,
    pub observables: Vec<String>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub metric: MetricKind,
    pub rate: f64,
    pub parameter_sets: Vec<u32>,
    pub nonzero_species: Vec<String>,
    pub cache_hit: bool,
    /// Absent when the coefficients were loaded from cache.
    pub simulation_failures: Option<usize>,
    pub undefined_coefficients: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientSummary {
    pub species: String,
    pub observable: String,
    pub condition: String,
    pub n_defined: usize,
    pub mean: Option<f64>,
    pub sd: Option<f64>,
}
