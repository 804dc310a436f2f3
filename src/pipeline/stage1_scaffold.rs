use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage1Scaffold;

impl Stage1Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Scaffold {
    fn name(&self) -> &'static str {
        "stage1_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for dir in [&ctx.output.heatmap_dir, &ctx.output.coeff_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        info!(
            figure_dir = %ctx.output.figure_dir.display(),
            coeff_dir = %ctx.output.coeff_dir.display(),
            "output_dirs_ready"
        );
        Ok(())
    }
}
