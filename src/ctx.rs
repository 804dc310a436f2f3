use std::path::PathBuf;

use crate::analysis::cache::CoefficientCache;
use crate::analysis::sweep::FailedRun;
use crate::analysis::{Array4, MetricKind};
use crate::model::ReactionModel;
use crate::params::DirParamStore;
use crate::plot::FigureKind;
use crate::schema::v1::InitSensV1;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// `<model>/figure/sensitivity/nonzero_init/<metric>`
    pub figure_dir: PathBuf,
    pub heatmap_dir: PathBuf,
    /// `<model>/sensitivity_coefficients/nonzero_init/<metric>`
    pub coeff_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

#[derive(Debug)]
pub struct Ctx {
    pub model_dir: PathBuf,
    pub metric: MetricKind,
    pub figure: FigureKind,
    pub rate: f64,
    pub write_json: bool,
    pub write_tsv: bool,
    pub model: Option<ReactionModel>,
    pub param_store: Option<DirParamStore>,
    pub paramsets: Vec<u32>,
    pub nonzero_idx: Vec<usize>,
    pub coefficients: Option<Array4>,
    pub cache_hit: bool,
    /// `None` when coefficients came from the cache and no sweep ran.
    pub sweep_failures: Option<Vec<FailedRun>>,
    pub figures: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: Option<InitSensV1>,
}

impl Ctx {
    pub fn new(
        model_dir: PathBuf,
        metric: MetricKind,
        figure: FigureKind,
        rate: f64,
        write_json: bool,
        write_tsv: bool,
    ) -> Self {
        let figure_dir = model_dir
            .join("figure")
            .join("sensitivity")
            .join("nonzero_init")
            .join(metric.as_str());
        let heatmap_dir = figure_dir.join("heatmap");
        let coeff_dir = CoefficientCache::new(&model_dir).dir(metric);
        let json_path = coeff_dir.join("report.json");
        let tsv_path = coeff_dir.join("sc.tsv");
        Self {
            model_dir,
            metric,
            figure,
            rate,
            write_json,
            write_tsv,
            model: None,
            param_store: None,
            paramsets: Vec::new(),
            nonzero_idx: Vec::new(),
            coefficients: None,
            cache_hit: false,
            sweep_failures: None,
            figures: Vec::new(),
            warnings: Vec::new(),
            output: OutputPaths {
                figure_dir,
                heatmap_dir,
                coeff_dir,
                json_path,
                tsv_path,
            },
            report: None,
        }
    }

    pub fn cache(&self) -> CoefficientCache {
        CoefficientCache::new(&self.model_dir)
    }

    pub fn model(&self) -> anyhow::Result<&ReactionModel> {
        self.model
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("model not loaded"))
    }
}
