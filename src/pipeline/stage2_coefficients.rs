use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::analysis::coefficients::compute_coefficients;
use crate::analysis::sweep::run_sweep;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Coefficients;

impl Stage2Coefficients {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Coefficients {
    fn name(&self) -> &'static str {
        "stage2_coefficients"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let model = ctx.model()?;
        let store = ctx.param_store.as_ref().context("parameter store missing")?;
        let cache = ctx.cache();
        let metric = ctx.metric;
        let rate = ctx.rate;
        let nonzero_idx = &ctx.nonzero_idx;

        let mut failures = None;
        let outcome = cache.load_or_compute(metric, rate, || {
            let mut progress = progress_logger();
            let sweep = run_sweep(metric, nonzero_idx, rate, model, store, model, &mut progress)?;
            if !sweep.failures.is_empty() {
                warn!(
                    failed = sweep.failures.len(),
                    "some simulations failed; their coefficients are undefined"
                );
            }
            let coefficients =
                compute_coefficients(&sweep.metrics, nonzero_idx, rate, sweep.baseline_slot())?;
            failures = Some(sweep.failures);
            Ok(coefficients)
        })?;

        let expected = [
            ctx.paramsets.len(),
            ctx.nonzero_idx.len(),
            model.observables.len(),
            model.conditions.len(),
        ];
        if outcome.coefficients.shape() != expected {
            bail!(
                "cached coefficients {} have shape {:?}, expected {:?} (delete it to recompute)",
                cache.path(metric).display(),
                outcome.coefficients.shape(),
                expected
            );
        }

        info!(
            cache_hit = outcome.hit,
            undefined = outcome.coefficients.missing(),
            "coefficients_ready"
        );
        ctx.cache_hit = outcome.hit;
        ctx.sweep_failures = failures;
        ctx.coefficients = Some(outcome.coefficients);
        Ok(())
    }
}

fn progress_logger() -> impl FnMut(usize, usize) {
    let mut last_decile = 0;
    move |done, total| {
        let decile = done * 10 / total.max(1);
        if decile > last_decile || done == total {
            last_decile = decile;
            info!(done, total, "sweep_progress");
        }
    }
}
