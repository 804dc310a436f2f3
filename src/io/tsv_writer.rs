use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;

/// Long-format table, one row per coefficient cell; `NA` marks cells that
/// could not be computed.
pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let model = ctx.model()?;
    let coefficients = ctx
        .coefficients
        .as_ref()
        .context("sensitivity coefficients missing")?;
    let [n_sets, n_species, n_obs, n_cond] = coefficients.shape();
    if n_sets != ctx.paramsets.len() || n_species != ctx.nonzero_idx.len() {
        bail!(
            "coefficient shape {:?} does not match {} parameter sets x {} species",
            coefficients.shape(),
            ctx.paramsets.len(),
            ctx.nonzero_idx.len()
        );
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "paramset\tspecies\tobservable\tcondition\tcoefficient")?;
    for i in 0..n_sets {
        for j in 0..n_species {
            let species = &model.species[ctx.nonzero_idx[j]];
            for k in 0..n_obs {
                for l in 0..n_cond {
                    let value = match coefficients.get(i, j, k, l) {
                        Some(v) => format!("{:.6}", v),
                        None => "NA".to_string(),
                    };
                    writeln!(
                        w,
                        "{}\t{}\t{}\t{}\t{}",
                        ctx.paramsets[i],
                        species,
                        model.observables[k],
                        model.conditions[l],
                        value
                    )?;
                }
            }
        }
    }
    w.flush()?;
    Ok(())
}
