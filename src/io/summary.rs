use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let model = ctx.model()?;
    let coefficients = ctx
        .coefficients
        .as_ref()
        .context("sensitivity coefficients missing")?;

    let mut out = String::new();
    out.push_str(&format!("kira-initsens v{}\n", version));
    out.push_str(&format!(
        "Model: {} ({} species, {} observables, {} conditions)\n",
        model.name,
        model.species.len(),
        model.observables.len(),
        model.conditions.len()
    ));
    out.push_str(&format!(
        "Metric: {}, rate={}, style={}\n",
        ctx.metric, ctx.rate, ctx.figure
    ));
    out.push_str(&format!(
        "Parameter sets: {}, perturbed species: {}\n",
        ctx.paramsets.len(),
        ctx.nonzero_idx.len()
    ));
    out.push_str(&format!(
        "Coefficients: {} ({})\n",
        if ctx.cache_hit { "cached" } else { "computed" },
        ctx.output.coeff_dir.display()
    ));
    if let Some(failures) = &ctx.sweep_failures {
        out.push_str(&format!("Failed simulations: {}\n", failures.len()));
    }
    out.push_str(&format!(
        "Undefined coefficients: {} / {}\n",
        coefficients.missing(),
        coefficients.len()
    ));
    out.push_str(&format!("Figures: {}\n", ctx.figures.len()));

    Ok(out)
}
