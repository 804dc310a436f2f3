use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{self, json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage4Output;

impl Stage4Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Output {
    fn name(&self) -> &'static str {
        "stage4_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = json_writer::build_report(ctx)?;

        if ctx.write_json {
            io::write_json(&ctx.output.json_path, &report)?;
            info!(path = %ctx.output.json_path.display(), "report_written");
        }
        if ctx.write_tsv {
            tsv_writer::write_tsv(&ctx.output.tsv_path, ctx)?;
            info!(path = %ctx.output.tsv_path.display(), "table_written");
        }

        ctx.report = Some(report);
        info!("stage4_output_ready");
        Ok(())
    }
}
