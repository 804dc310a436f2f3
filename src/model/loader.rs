use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::io::open_maybe_gz;
use crate::model::{Reaction, ReactionModel};
use crate::plot::style::PlotStyle;

pub const MODEL_FILE: &str = "model.json";
pub const DEFAULT_CONDITION: &str = "control";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    name: String,
    species: Vec<SpeciesDef>,
    #[serde(default)]
    parameters: Vec<ParameterDef>,
    #[serde(default)]
    reactions: Vec<ReactionDef>,
    observables: Vec<ObservableDef>,
    #[serde(default)]
    conditions: Vec<ConditionDef>,
    time: TimeGrid,
    #[serde(default)]
    sensitivity_style: Option<PlotStyle>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpeciesDef {
    name: String,
    #[serde(default)]
    initial: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterDef {
    name: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReactionDef {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    reactants: BTreeMap<String, u32>,
    #[serde(default)]
    products: BTreeMap<String, u32>,
    rate: String,
    #[serde(default)]
    reverse_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObservableDef {
    name: String,
    species: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionDef {
    name: String,
    #[serde(default)]
    parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TimeGrid {
    end: f64,
    samples: usize,
    #[serde(default = "default_substeps")]
    substeps: usize,
}

fn default_substeps() -> usize {
    10
}

/// Loads `model.json` (or `model.json.gz`) from a model directory.
pub fn load_model(model_dir: &Path) -> Result<ReactionModel> {
    let path = resolve_model_path(model_dir)?;
    let reader = open_maybe_gz(&path)
        .with_context(|| format!("failed to open model file {}", path.display()))?;
    let file: ModelFile = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse model file {}", path.display()))?;
    compile(file).with_context(|| format!("invalid model file {}", path.display()))
}

pub fn resolve_model_path(model_dir: &Path) -> Result<PathBuf> {
    let plain = model_dir.join(MODEL_FILE);
    if plain.is_file() {
        return Ok(plain);
    }
    let gz = model_dir.join(format!("{}.gz", MODEL_FILE));
    if gz.is_file() {
        return Ok(gz);
    }
    bail!("no {} found in {}", MODEL_FILE, model_dir.display());
}

fn compile(file: ModelFile) -> Result<ReactionModel> {
    if file.species.is_empty() {
        bail!("model has no species");
    }
    if file.observables.is_empty() {
        bail!("model has no observables");
    }

    let species: Vec<String> = file.species.iter().map(|s| s.name.clone()).collect();
    let species_index = build_index(&species, "species")?;
    let mut initial = Vec::with_capacity(file.species.len());
    for s in &file.species {
        if !s.initial.is_finite() {
            bail!("species '{}' has a non-finite initial value", s.name);
        }
        initial.push(s.initial);
    }

    let parameters: Vec<String> = file.parameters.iter().map(|p| p.name.clone()).collect();
    let parameter_index = build_index(&parameters, "parameter")?;
    let parameter_defaults: Vec<f64> = file.parameters.iter().map(|p| p.value).collect();

    let mut reactions = Vec::with_capacity(file.reactions.len());
    for (idx, def) in file.reactions.into_iter().enumerate() {
        let name = def.name.unwrap_or_else(|| format!("r{}", idx + 1));
        let reactants = resolve_terms(&def.reactants, &species_index, &name)?;
        let products = resolve_terms(&def.products, &species_index, &name)?;
        let forward = lookup(&parameter_index, &def.rate, "parameter", &name)?;
        let reverse = match &def.reverse_rate {
            Some(rate) => Some(lookup(&parameter_index, rate, "parameter", &name)?),
            None => None,
        };
        reactions.push(Reaction {
            reactants,
            products,
            forward,
            reverse,
        });
    }

    let observables: Vec<String> = file.observables.iter().map(|o| o.name.clone()).collect();
    build_index(&observables, "observable")?;
    let mut observable_species = Vec::with_capacity(file.observables.len());
    for obs in &file.observables {
        if obs.species.is_empty() {
            bail!("observable '{}' lists no species", obs.name);
        }
        let members = obs
            .species
            .iter()
            .map(|s| lookup(&species_index, s, "species", &obs.name))
            .collect::<Result<Vec<_>>>()?;
        observable_species.push(members);
    }

    let mut conditions = Vec::new();
    let mut condition_overrides = Vec::new();
    if file.conditions.is_empty() {
        conditions.push(DEFAULT_CONDITION.to_string());
        condition_overrides.push(Vec::new());
    }
    for cond in &file.conditions {
        let overrides = cond
            .parameters
            .iter()
            .map(|(p, v)| Ok((lookup(&parameter_index, p, "parameter", &cond.name)?, *v)))
            .collect::<Result<Vec<_>>>()?;
        conditions.push(cond.name.clone());
        condition_overrides.push(overrides);
    }
    build_index(&conditions, "condition")?;

    let grid = &file.time;
    if !grid.end.is_finite() || grid.end <= 0.0 {
        bail!("time.end must be positive");
    }
    if grid.samples < 2 {
        bail!("time.samples must be at least 2");
    }
    if grid.substeps == 0 {
        bail!("time.substeps must be at least 1");
    }
    let step = grid.end / (grid.samples - 1) as f64;
    let time = (0..grid.samples).map(|i| i as f64 * step).collect();

    Ok(ReactionModel {
        name: file.name,
        species,
        initial,
        parameters,
        parameter_defaults,
        reactions,
        observables,
        observable_species,
        conditions,
        condition_overrides,
        time,
        substeps: grid.substeps,
        style: file.sensitivity_style.unwrap_or_default(),
        species_index,
        parameter_index,
    })
}

fn build_index(names: &[String], kind: &str) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            bail!("empty {} name at position {}", kind, i + 1);
        }
        if index.insert(name.clone(), i).is_some() {
            bail!("duplicate {} '{}'", kind, name);
        }
    }
    Ok(index)
}

fn lookup(index: &HashMap<String, usize>, name: &str, kind: &str, owner: &str) -> Result<usize> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("'{}' references unknown {} '{}'", owner, kind, name))
}

fn resolve_terms(
    terms: &BTreeMap<String, u32>,
    species_index: &HashMap<String, usize>,
    owner: &str,
) -> Result<Vec<(usize, u32)>> {
    let mut out = Vec::with_capacity(terms.len());
    for (name, &n) in terms {
        if n == 0 {
            bail!("'{}' has zero stoichiometry for '{}'", owner, name);
        }
        out.push((lookup(species_index, name, "species", owner)?, n));
    }
    Ok(out)
}
