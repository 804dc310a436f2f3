use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::io::open_maybe_gz;
use crate::model::ReactionModel;
use crate::params::{ParameterSet, ParameterStore};

pub const PARAMS_FILE: &str = "params.json";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamOverrides {
    #[serde(default)]
    parameters: BTreeMap<String, f64>,
    #[serde(default)]
    initial_values: BTreeMap<String, f64>,
}

/// Parameter sets stored as `<model>/out/<n>/params.json`.
///
/// Each file overrides model defaults by name; a numbered directory without
/// `params.json` is an unfinished estimation run and is not accepted.
#[derive(Debug, Clone)]
pub struct DirParamStore {
    out_dir: PathBuf,
    defaults: ParameterSet,
    parameter_index: HashMap<String, usize>,
    species_index: HashMap<String, usize>,
}

impl DirParamStore {
    pub fn new(model_dir: &Path, model: &ReactionModel) -> Self {
        Self {
            out_dir: model_dir.join("out"),
            defaults: model.default_parameter_set(),
            parameter_index: model.parameter_index.clone(),
            species_index: model.species_index.clone(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn params_path(&self, ordinal: u32) -> PathBuf {
        self.out_dir.join(ordinal.to_string()).join(PARAMS_FILE)
    }

    fn update(&self, ordinal: u32, overrides: ParamOverrides) -> Result<ParameterSet> {
        let mut set = self.defaults.clone();
        set.ordinal = ordinal;
        for (name, value) in overrides.parameters {
            let idx = self
                .parameter_index
                .get(&name)
                .with_context(|| format!("unknown parameter '{}'", name))?;
            set.params[*idx] = value;
        }
        for (name, value) in overrides.initial_values {
            let idx = self
                .species_index
                .get(&name)
                .with_context(|| format!("unknown species '{}'", name))?;
            set.initial_values[*idx] = value;
        }
        if let Some(bad) = set.params.iter().chain(&set.initial_values).find(|v| !v.is_finite()) {
            bail!("non-finite value {} in parameter set", bad);
        }
        Ok(set)
    }
}

impl ParameterStore for DirParamStore {
    fn accepted(&self) -> Result<Vec<u32>> {
        if !self.out_dir.is_dir() {
            bail!("parameter directory {} not found", self.out_dir.display());
        }
        let mut ordinals = Vec::new();
        for entry in fs::read_dir(&self.out_dir)
            .with_context(|| format!("failed to list {}", self.out_dir.display()))?
        {
            let entry = entry?;
            let name = entry.file_name();
            let Some(ordinal) = name.to_str().and_then(|s| s.parse::<u32>().ok()) else {
                continue;
            };
            if entry.path().join(PARAMS_FILE).is_file() {
                ordinals.push(ordinal);
            } else {
                debug!(paramset = ordinal, "skipping parameter set without params.json");
            }
        }
        ordinals.sort_unstable();
        Ok(ordinals)
    }

    fn load(&self, ordinal: u32) -> Result<ParameterSet> {
        let path = self.params_path(ordinal);
        let reader = open_maybe_gz(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let overrides: ParamOverrides = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        self.update(ordinal, overrides)
            .with_context(|| format!("invalid parameter set {}", path.display()))
    }
}
