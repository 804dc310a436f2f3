//! Reaction-network model definition.
//!
//! A model is loaded from `model.json` in the model directory and provides
//! species, baseline initial values, observables and experimental conditions.
//! [`ReactionModel`] also implements [`crate::sim::Simulator`] via mass-action
//! kinetics.

use std::collections::HashMap;

use crate::params::ParameterSet;
use crate::plot::style::PlotStyle;

pub mod kinetics;
pub mod loader;

pub use loader::load_model;

/// What the sensitivity analysis needs to know about a model.
pub trait ModelDefinition {
    fn species(&self) -> &[String];
    /// Baseline initial concentrations, one per species.
    fn initial_values(&self) -> Vec<f64>;
    fn observables(&self) -> &[String];
    fn conditions(&self) -> &[String];
}

#[derive(Debug, Clone)]
pub struct Reaction {
    pub reactants: Vec<(usize, u32)>,
    pub products: Vec<(usize, u32)>,
    pub forward: usize,
    pub reverse: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ReactionModel {
    pub name: String,
    pub species: Vec<String>,
    pub initial: Vec<f64>,
    pub parameters: Vec<String>,
    pub parameter_defaults: Vec<f64>,
    pub reactions: Vec<Reaction>,
    pub observables: Vec<String>,
    /// Species summed into each observable.
    pub observable_species: Vec<Vec<usize>>,
    pub conditions: Vec<String>,
    /// Parameter overrides applied for each condition.
    pub condition_overrides: Vec<Vec<(usize, f64)>>,
    pub time: Vec<f64>,
    pub substeps: usize,
    pub style: PlotStyle,
    pub species_index: HashMap<String, usize>,
    pub parameter_index: HashMap<String, usize>,
}

impl ReactionModel {
    pub fn default_parameter_set(&self) -> ParameterSet {
        ParameterSet {
            ordinal: 0,
            params: self.parameter_defaults.clone(),
            initial_values: self.initial.clone(),
        }
    }

    /// Display name for a species, honouring the style's rename map.
    pub fn species_label(&self, idx: usize) -> String {
        let name = &self.species[idx];
        self.style
            .species_labels
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.clone())
    }
}

impl ModelDefinition for ReactionModel {
    fn species(&self) -> &[String] {
        &self.species
    }

    fn initial_values(&self) -> Vec<f64> {
        self.initial.clone()
    }

    fn observables(&self) -> &[String] {
        &self.observables
    }

    fn conditions(&self) -> &[String] {
        &self.conditions
    }
}
