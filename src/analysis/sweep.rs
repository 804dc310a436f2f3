//! Perturbation sweep over accepted parameter sets.
//!
//! For each parameter set the baseline initial vector is perturbed at one
//! nonzero position at a time and re-simulated; the unperturbed baseline is
//! simulated last and stored in the final perturbation slot. A failed
//! simulation leaves its cells unset and the sweep moves on.

use anyhow::{Result, bail};
use tracing::debug;

use crate::analysis::metric::signaling_metric;
use crate::analysis::{Array4, MetricKind};
use crate::model::ModelDefinition;
use crate::params::ParameterStore;
use crate::sim::{Simulator, Trajectories};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Position in the species vector that was perturbed.
    Perturbed(usize),
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRun {
    pub paramset: u32,
    pub slot: Slot,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SweepResult {
    pub paramsets: Vec<u32>,
    /// Shape (parameter sets, nonzero indices + 1, observables, conditions);
    /// the last perturbation slot holds the unperturbed baseline.
    pub metrics: Array4,
    pub failures: Vec<FailedRun>,
}

impl SweepResult {
    pub fn baseline_slot(&self) -> usize {
        self.metrics.shape()[1] - 1
    }
}

pub fn run_sweep(
    metric: MetricKind,
    nonzero_idx: &[usize],
    rate: f64,
    model: &dyn ModelDefinition,
    store: &dyn ParameterStore,
    simulator: &dyn Simulator,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<SweepResult> {
    if nonzero_idx.is_empty() {
        bail!("no nonzero initial conditions");
    }
    let paramsets = store.accepted()?;
    if paramsets.is_empty() {
        bail!("no accepted parameter sets");
    }

    let n_obs = model.observables().len();
    let n_cond = model.conditions().len();
    let n_species = model.species().len();
    if let Some(bad) = nonzero_idx.iter().find(|&&idx| idx >= n_species) {
        bail!("nonzero index {} out of range for {} species", bad, n_species);
    }

    let baseline = nonzero_idx.len();
    let mut metrics = Array4::new([paramsets.len(), baseline + 1, n_obs, n_cond]);
    let mut failures = Vec::new();
    let total = paramsets.len() * nonzero_idx.len();

    for (i, &ordinal) in paramsets.iter().enumerate() {
        let set = store.load(ordinal)?;
        if set.initial_values.len() != n_species {
            bail!(
                "parameter set {} has {} initial values, model has {} species",
                ordinal,
                set.initial_values.len(),
                n_species
            );
        }

        for (j, &idx) in nonzero_idx.iter().enumerate() {
            let mut y0 = set.initial_values.clone();
            y0[idx] *= rate;
            match simulator.simulate(&set.params, &y0) {
                Ok(traj) => record(&mut metrics, metric, &traj, i, j)?,
                Err(err) => {
                    debug!(paramset = ordinal, species = idx, error = %err, "simulation failed");
                    failures.push(FailedRun {
                        paramset: ordinal,
                        slot: Slot::Perturbed(idx),
                        reason: err.to_string(),
                    });
                }
            }
            progress(i * nonzero_idx.len() + j + 1, total);
        }

        match simulator.simulate(&set.params, &set.initial_values) {
            Ok(traj) => record(&mut metrics, metric, &traj, i, baseline)?,
            Err(err) => {
                debug!(paramset = ordinal, error = %err, "baseline simulation failed");
                failures.push(FailedRun {
                    paramset: ordinal,
                    slot: Slot::Baseline,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(SweepResult {
        paramsets,
        metrics,
        failures,
    })
}

fn record(
    metrics: &mut Array4,
    metric: MetricKind,
    traj: &Trajectories,
    i: usize,
    j: usize,
) -> Result<()> {
    let [_, _, n_obs, n_cond] = metrics.shape();
    if traj.n_observables() != n_obs || traj.n_conditions() != n_cond {
        bail!(
            "simulator returned {}x{} trajectories, expected {}x{} (observables x conditions)",
            traj.n_observables(),
            traj.n_conditions(),
            n_obs,
            n_cond
        );
    }
    for k in 0..n_obs {
        for l in 0..n_cond {
            let value = signaling_metric(metric, traj.time(), traj.series(k, l));
            metrics.set(i, j, k, l, value);
        }
    }
    Ok(())
}
