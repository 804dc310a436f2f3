use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analysis::{MetricKind, PERTURBATION_RATE};
use crate::plot::FigureKind;

#[derive(Debug, Parser)]
#[command(
    name = "kira-initsens",
    version,
    about = "Sensitivity of signaling metrics to nonzero initial conditions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Analyze(AnalyzeArgs),
    Species(SpeciesArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(long, help = "Model directory containing model.json and out/<n>/params.json")]
    pub model: PathBuf,

    #[arg(long, value_enum)]
    pub metric: MetricArg,

    #[arg(long, value_enum, default_value_t = StyleArg::Barplot)]
    pub style: StyleArg,

    #[arg(
        long,
        default_value_t = PERTURBATION_RATE,
        help = "Multiplicative perturbation applied to each initial condition"
    )]
    pub rate: f64,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct SpeciesArgs {
    #[arg(long, help = "Model directory")]
    pub model: PathBuf,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Model directory")]
    pub model: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Amplitude,
    Duration,
    Integral,
}

impl From<MetricArg> for MetricKind {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Amplitude => MetricKind::Amplitude,
            MetricArg::Duration => MetricKind::Duration,
            MetricArg::Integral => MetricKind::Integral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Barplot,
    Heatmap,
}

impl From<StyleArg> for FigureKind {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Barplot => FigureKind::Barplot,
            StyleArg::Heatmap => FigureKind::Heatmap,
        }
    }
}
