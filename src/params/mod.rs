//! Accepted parameter sets from a prior estimation run.

use anyhow::Result;

pub mod store;

pub use store::DirParamStore;

/// One accepted parameter configuration with its baseline initial values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub ordinal: u32,
    pub params: Vec<f64>,
    pub initial_values: Vec<f64>,
}

pub trait ParameterStore {
    /// Ordinals of the accepted parameter sets, ascending.
    fn accepted(&self) -> Result<Vec<u32>>;
    fn load(&self, ordinal: u32) -> Result<ParameterSet>;
}
