use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::plot::{self, SensitivityFigures};

pub struct Stage3Figures;

impl Stage3Figures {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Figures {
    fn name(&self) -> &'static str {
        "stage3_figures"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let model = ctx.model()?;
        let coefficients = ctx
            .coefficients
            .as_ref()
            .context("sensitivity coefficients missing")?;
        let species: Vec<String> = ctx
            .nonzero_idx
            .iter()
            .map(|&idx| model.species_label(idx))
            .collect();

        let figures = SensitivityFigures {
            metric: ctx.metric,
            coefficients,
            paramsets: &ctx.paramsets,
            species: &species,
            observables: &model.observables,
            conditions: &model.conditions,
            style: &model.style,
        };
        let written = plot::render(
            ctx.figure,
            &figures,
            &ctx.output.figure_dir,
            &ctx.output.heatmap_dir,
        )?;

        info!(style = %ctx.figure, figures = written.len(), "figures_ready");
        ctx.figures = written;
        Ok(())
    }
}
