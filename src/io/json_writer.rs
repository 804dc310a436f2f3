use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::math::stats::{count_defined, nan_mean, nan_std};
use crate::schema::v1::{AnalysisInfo, CoefficientSummary, InitSensV1, ModelInfo, ToolInfo};

pub fn build_report(ctx: &Ctx) -> Result<InitSensV1> {
    let model = ctx.model()?;
    let coefficients = ctx
        .coefficients
        .as_ref()
        .context("sensitivity coefficients missing")?;

    let nonzero_species: Vec<String> = ctx
        .nonzero_idx
        .iter()
        .map(|&idx| model.species[idx].clone())
        .collect();

    let mut summaries = Vec::new();
    for (j, species) in nonzero_species.iter().enumerate() {
        for (k, observable) in model.observables.iter().enumerate() {
            for (l, condition) in model.conditions.iter().enumerate() {
                let values = coefficients.across_sets(j, k, l);
                summaries.push(CoefficientSummary {
                    species: species.clone(),
                    observable: observable.clone(),
                    condition: condition.clone(),
                    n_defined: count_defined(&values),
                    mean: nan_mean(&values),
                    sd: nan_std(&values),
                });
            }
        }
    }

    Ok(InitSensV1 {
        tool: ToolInfo {
            name: "kira-initsens".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        model: ModelInfo {
            name: model.name.clone(),
            species: model.species.clone(),
            observables: model.observables.clone(),
            conditions: model.conditions.clone(),
        },
        analysis: AnalysisInfo {
            metric: ctx.metric,
            rate: ctx.rate,
            parameter_sets: ctx.paramsets.clone(),
            nonzero_species,
            cache_hit: ctx.cache_hit,
            simulation_failures: ctx.sweep_failures.as_ref().map(|f| f.len()),
            undefined_coefficients: coefficients.missing(),
        },
        coefficients: summaries,
    })
}
