//! Figure styling passed explicitly to the renderers.

use std::collections::BTreeMap;

use plotters::prelude::{RGBColor, SeriesLabelPosition};
use serde::Deserialize;

/// matplotlib `tab20`; even entries are the dark tones.
const TAB20: [(u8, u8, u8); 20] = [
    (31, 119, 180),
    (174, 199, 232),
    (255, 127, 14),
    (255, 187, 120),
    (44, 160, 44),
    (152, 223, 138),
    (214, 39, 40),
    (255, 152, 150),
    (148, 103, 189),
    (197, 176, 213),
    (140, 86, 75),
    (196, 156, 148),
    (227, 119, 194),
    (247, 182, 210),
    (127, 127, 127),
    (199, 199, 199),
    (188, 189, 34),
    (219, 219, 141),
    (23, 190, 207),
    (158, 218, 229),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LegendLoc {
    #[serde(rename = "upper left")]
    UpperLeft,
    #[serde(rename = "upper right")]
    UpperRight,
    #[serde(rename = "lower left")]
    LowerLeft,
    #[serde(rename = "lower right")]
    LowerRight,
}

impl From<LegendLoc> for SeriesLabelPosition {
    fn from(loc: LegendLoc) -> Self {
        match loc {
            LegendLoc::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendLoc::UpperRight => SeriesLabelPosition::UpperRight,
            LegendLoc::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendLoc::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    pub font_size: u32,
    pub axes_linewidth: f64,
    /// Figure size in pixels.
    pub width: u32,
    pub height: u32,
    /// Width of one bar in units of a species group.
    pub bar_width: f64,
    pub legend: LegendLoc,
    /// Overrides the tab20 palette when set.
    pub palette: Option<Vec<[u8; 3]>>,
    /// Display names for species, keyed by model species name.
    pub species_labels: BTreeMap<String, String>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_size: 12,
            axes_linewidth: 1.2,
            width: 1200,
            height: 500,
            bar_width: 0.3,
            legend: LegendLoc::UpperLeft,
            palette: None,
            species_labels: BTreeMap::new(),
        }
    }
}

impl PlotStyle {
    /// One colour per condition, cycling when there are more conditions
    /// than colours. With 10 or fewer conditions only dark tones are used.
    pub fn condition_colors(&self, n_conditions: usize) -> Vec<RGBColor> {
        let base: Vec<RGBColor> = match &self.palette {
            Some(colors) if !colors.is_empty() => {
                colors.iter().map(|c| RGBColor(c[0], c[1], c[2])).collect()
            }
            _ => {
                let step = if n_conditions > 10 { 1 } else { 2 };
                TAB20
                    .iter()
                    .step_by(step)
                    .map(|&(r, g, b)| RGBColor(r, g, b))
                    .collect()
            }
        };
        (0..n_conditions).map(|i| base[i % base.len()]).collect()
    }

    pub fn stroke(&self) -> u32 {
        self.axes_linewidth.round().max(1.0) as u32
    }
}
