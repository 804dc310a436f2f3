use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::analysis::nonzero::nonzero_indices;
use crate::ctx::Ctx;
use crate::model::{self, ModelDefinition};
use crate::params::{DirParamStore, ParameterStore};
use crate::pipeline::Stage;

pub struct Stage0Model;

impl Stage0Model {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Model {
    fn name(&self) -> &'static str {
        "stage0_model"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let model = model::load_model(&ctx.model_dir)?;
        let nonzero_idx = nonzero_indices(&model.initial_values())?;

        let store = DirParamStore::new(&ctx.model_dir, &model);
        let paramsets = store.accepted()?;
        if paramsets.is_empty() {
            bail!(
                "no accepted parameter sets in {}",
                store.out_dir().display()
            );
        }

        if nonzero_idx.len() < 2 && ctx.figure == crate::plot::FigureKind::Heatmap {
            let msg =
                "heatmap needs at least 2 nonzero initial conditions; no figures will be drawn";
            warn!("{}", msg);
            ctx.warnings.push(msg.to_string());
        }

        info!(
            model = %model.name,
            species = model.species.len(),
            nonzero = nonzero_idx.len(),
            paramsets = paramsets.len(),
            "model_ready"
        );

        ctx.nonzero_idx = nonzero_idx;
        ctx.paramsets = paramsets;
        ctx.param_store = Some(store);
        ctx.model = Some(model);
        Ok(())
    }
}
