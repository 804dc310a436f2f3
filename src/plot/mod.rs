//! SVG rendering of sensitivity coefficients.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::analysis::{Array4, MetricKind};
use crate::plot::style::PlotStyle;

pub mod barplot;
pub mod heatmap;
pub mod style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Barplot,
    Heatmap,
}

impl FigureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Barplot => "barplot",
            Self::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FigureKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "barplot" => Ok(Self::Barplot),
            "heatmap" => Ok(Self::Heatmap),
            other => bail!(
                "unknown style '{}': available styles are barplot, heatmap",
                other
            ),
        }
    }
}

/// Everything a renderer needs; coefficients are shaped
/// (parameter sets, nonzero species, observables, conditions).
#[derive(Debug, Clone, Copy)]
pub struct SensitivityFigures<'a> {
    pub metric: MetricKind,
    pub coefficients: &'a Array4,
    pub paramsets: &'a [u32],
    /// Display labels of the perturbed species, in coefficient order.
    pub species: &'a [String],
    pub observables: &'a [String],
    pub conditions: &'a [String],
    pub style: &'a PlotStyle,
}

impl SensitivityFigures<'_> {
    fn check_shape(&self) -> Result<()> {
        let expected = [
            self.paramsets.len(),
            self.species.len(),
            self.observables.len(),
            self.conditions.len(),
        ];
        if self.coefficients.shape() != expected {
            bail!(
                "coefficient shape {:?} does not match labels {:?}",
                self.coefficients.shape(),
                expected
            );
        }
        Ok(())
    }
}

/// Renders one figure family and returns the files written. Heatmaps need
/// at least two perturbed species; with fewer, nothing is drawn.
pub fn render(
    kind: FigureKind,
    figures: &SensitivityFigures<'_>,
    figure_dir: &Path,
    heatmap_dir: &Path,
) -> Result<Vec<PathBuf>> {
    figures.check_shape()?;
    match kind {
        FigureKind::Barplot => barplot::draw_barplots(figures, figure_dir),
        FigureKind::Heatmap => {
            if figures.species.len() < 2 {
                return Ok(Vec::new());
            }
            heatmap::draw_heatmaps(figures, heatmap_dir)
        }
    }
}

/// Filesystem-safe stem for observable and condition names.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub(crate) fn display_title(name: &str) -> String {
    name.replace("__", " ").replace('_', " ")
}
