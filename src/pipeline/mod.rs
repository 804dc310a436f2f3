use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::analysis::MetricKind;
use crate::ctx::Ctx;

pub mod stage0_model;
pub mod stage1_scaffold;
pub mod stage2_coefficients;
pub mod stage3_figures;
pub mod stage4_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Model loading, output directories, coefficient computation (or cache
    /// reuse), figures and tabular output, in that order. Nothing is written
    /// under the model directory until the model has been validated.
    pub fn analysis() -> Self {
        Self::new(vec![
            Box::new(stage0_model::Stage0Model::new()),
            Box::new(stage1_scaffold::Stage1Scaffold::new()),
            Box::new(stage2_coefficients::Stage2Coefficients::new()),
            Box::new(stage3_figures::Stage3Figures::new()),
            Box::new(stage4_output::Stage4Output::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        info!(
            model = %ctx.model_dir.display(),
            metric = %ctx.metric,
            "analysis started"
        );
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}

/// Library entry point: validates `metric` and `style` before any work,
/// then runs the full analysis pipeline with the default perturbation rate.
pub fn analyze(model_dir: &Path, metric: &str, style: &str) -> Result<Ctx> {
    let metric: MetricKind = metric.parse()?;
    let figure = style.parse()?;
    let mut ctx = Ctx::new(
        model_dir.to_path_buf(),
        metric,
        figure,
        crate::analysis::PERTURBATION_RATE,
        false,
        false,
    );
    Pipeline::analysis().run(&mut ctx)?;
    Ok(ctx)
}
