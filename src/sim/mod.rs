use anyhow::{Result, bail};

pub mod rk4;

/// Runs the model for every experimental condition from one initial state.
///
/// An `Err` means this particular run failed (e.g. the integrator diverged);
/// callers treat it as a gap in the results, not as a fatal error.
pub trait Simulator {
    fn simulate(&self, params: &[f64], initial_values: &[f64]) -> Result<Trajectories>;
}

/// Simulated observables indexed (observable, time, condition) over a shared
/// time grid. Stored so each (observable, condition) series is contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectories {
    time: Vec<f64>,
    n_observables: usize,
    n_conditions: usize,
    values: Vec<f64>,
}

impl Trajectories {
    pub fn new(time: Vec<f64>, n_observables: usize, n_conditions: usize) -> Self {
        let len = time.len() * n_observables * n_conditions;
        Self {
            time,
            n_observables,
            n_conditions,
            values: vec![0.0; len],
        }
    }

    pub fn from_series(time: Vec<f64>, series: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let n_observables = series.len();
        let n_conditions = series.first().map(|s| s.len()).unwrap_or(0);
        let mut out = Self::new(time, n_observables, n_conditions);
        for (k, per_cond) in series.into_iter().enumerate() {
            if per_cond.len() != n_conditions {
                bail!(
                    "observable {} has {} conditions, expected {}",
                    k,
                    per_cond.len(),
                    n_conditions
                );
            }
            for (l, ys) in per_cond.into_iter().enumerate() {
                if ys.len() != out.time.len() {
                    bail!(
                        "series ({}, {}) has {} samples, expected {}",
                        k,
                        l,
                        ys.len(),
                        out.time.len()
                    );
                }
                out.series_mut(k, l).copy_from_slice(&ys);
            }
        }
        Ok(out)
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn n_observables(&self) -> usize {
        self.n_observables
    }

    pub fn n_conditions(&self) -> usize {
        self.n_conditions
    }

    pub fn get(&self, observable: usize, t: usize, condition: usize) -> f64 {
        self.series(observable, condition)[t]
    }

    pub fn series(&self, observable: usize, condition: usize) -> &[f64] {
        let n_t = self.time.len();
        let start = self.series_offset(observable, condition);
        &self.values[start..start + n_t]
    }

    pub fn series_mut(&mut self, observable: usize, condition: usize) -> &mut [f64] {
        let n_t = self.time.len();
        let start = self.series_offset(observable, condition);
        &mut self.values[start..start + n_t]
    }

    fn series_offset(&self, observable: usize, condition: usize) -> usize {
        assert!(
            observable < self.n_observables && condition < self.n_conditions,
            "series ({}, {}) out of range",
            observable,
            condition
        );
        (observable * self.n_conditions + condition) * self.time.len()
    }
}
