use anyhow::{Context, Result, bail};

use crate::model::ReactionModel;
use crate::sim::rk4::{OdeSystem, integrate};
use crate::sim::{Simulator, Trajectories};

struct MassAction<'a> {
    model: &'a ReactionModel,
    params: &'a [f64],
}

impl OdeSystem for MassAction<'_> {
    fn ndim(&self) -> usize {
        self.model.species.len()
    }

    fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt.iter_mut().for_each(|v| *v = 0.0);
        for rxn in &self.model.reactions {
            let mut net = self.params[rxn.forward] * mass_action(&rxn.reactants, y);
            if let Some(rev) = rxn.reverse {
                net -= self.params[rev] * mass_action(&rxn.products, y);
            }
            for &(s, n) in &rxn.reactants {
                dydt[s] -= n as f64 * net;
            }
            for &(s, n) in &rxn.products {
                dydt[s] += n as f64 * net;
            }
        }
    }
}

fn mass_action(terms: &[(usize, u32)], y: &[f64]) -> f64 {
    terms
        .iter()
        .map(|&(s, n)| y[s].powi(n as i32))
        .product()
}

impl Simulator for ReactionModel {
    fn simulate(&self, params: &[f64], initial_values: &[f64]) -> Result<Trajectories> {
        if params.len() != self.parameters.len() {
            bail!(
                "parameter vector has {} values, model has {} parameters",
                params.len(),
                self.parameters.len()
            );
        }
        let mut out = Trajectories::new(
            self.time.clone(),
            self.observables.len(),
            self.conditions.len(),
        );
        let mut cond_params = params.to_vec();
        for (l, overrides) in self.condition_overrides.iter().enumerate() {
            cond_params.copy_from_slice(params);
            for &(p, value) in overrides {
                cond_params[p] = value;
            }
            let system = MassAction {
                model: self,
                params: &cond_params,
            };
            let states = integrate(&system, initial_values, &self.time, self.substeps)
                .with_context(|| format!("condition '{}'", self.conditions[l]))?;
            for (k, members) in self.observable_species.iter().enumerate() {
                let series = out.series_mut(k, l);
                for (t, state) in states.iter().enumerate() {
                    series[t] = members.iter().map(|&s| state[s]).sum();
                }
            }
        }
        Ok(out)
    }
}
